use crate::domain::model::{DishRecord, GenerationRequest, NutritionSummary};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Text/vision generation backend, treated as a black box returning raw text.
///
/// Implementations return the first choice's message content, or an empty
/// string when the response carries no choices. Transport failures are errors.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn vision_api_key(&self) -> Option<&str>;
    fn reasoning_api_key(&self) -> Option<&str>;
    fn vision_model(&self) -> &str;
    fn reasoning_model(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
}

/// The stages of one menu request, in the order the engine drives them.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String>;
    fn parse(&self, menu_text: &str) -> Vec<DishRecord>;
    async fn enrich(&self, dishes: &[DishRecord]) -> Result<Vec<DishRecord>>;
    async fn recommend(&self, dishes: &[DishRecord]) -> Result<Vec<DishRecord>>;
    async fn summarize(&self, dishes: &[DishRecord]) -> Result<NutritionSummary>;
    fn total_cost(&self, dishes: &[DishRecord]) -> f64;
}
