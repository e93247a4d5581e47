use crate::core::extraction;
use crate::core::prompts;
use crate::domain::model::{DishRecord, NutritionSummary};
use crate::domain::ports::GenerationService;
use crate::utils::error::Result;

/// Aggregate nutrition of the recommended dishes.
///
/// An empty list is answered with zeros without calling the service; output
/// that does not decode to an object also becomes zeros.
pub async fn summarize_nutrition<G>(service: &G, dishes: &[DishRecord]) -> Result<NutritionSummary>
where
    G: GenerationService + ?Sized,
{
    // 沒有推薦菜品時直接回傳全 0
    if dishes.is_empty() {
        tracing::debug!("No recommended dishes, nutrition summary is zero");
        return Ok(NutritionSummary::default());
    }

    let content = service.generate(prompts::summary_request(dishes)).await?;
    Ok(parse_summary(&content))
}

pub fn parse_summary(content: &str) -> NutritionSummary {
    extraction::extract(content)
        .into_value()
        .and_then(|value| NutritionSummary::from_value(&value))
        .unwrap_or_else(|| {
            tracing::warn!("Nutrition summary unavailable, reporting zeros");
            NutritionSummary::default()
        })
}
