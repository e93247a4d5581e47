use crate::core::{cost, menu_parser, nutrition, recognition, recommendation, summary};
use crate::core::{DishRecord, GenerationService, NutritionSummary, Pipeline, Result};

/// The menu pipeline wired to a vision service and a reasoning service.
pub struct MenuPipeline<V: GenerationService, R: GenerationService> {
    vision: V,
    reasoning: R,
}

impl<V: GenerationService, R: GenerationService> MenuPipeline<V, R> {
    pub fn new(vision: V, reasoning: R) -> Self {
        Self { vision, reasoning }
    }
}

#[async_trait::async_trait]
impl<V: GenerationService, R: GenerationService> Pipeline for MenuPipeline<V, R> {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        tracing::debug!("Calling vision service for menu recognition");
        recognition::recognize_menu(&self.vision, image).await
    }

    fn parse(&self, menu_text: &str) -> Vec<DishRecord> {
        menu_parser::parse_menu_text(menu_text)
    }

    async fn enrich(&self, dishes: &[DishRecord]) -> Result<Vec<DishRecord>> {
        nutrition::enrich_with_nutrition(&self.reasoning, dishes).await
    }

    async fn recommend(&self, dishes: &[DishRecord]) -> Result<Vec<DishRecord>> {
        recommendation::recommend_dishes(&self.reasoning, dishes).await
    }

    async fn summarize(&self, dishes: &[DishRecord]) -> Result<NutritionSummary> {
        summary::summarize_nutrition(&self.reasoning, dishes).await
    }

    fn total_cost(&self, dishes: &[DishRecord]) -> f64 {
        cost::total_cost_of(dishes)
    }
}
