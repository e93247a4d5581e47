use crate::core::cost::DishCollection;
use crate::core::extraction;
use crate::core::prompts;
use crate::domain::model::DishRecord;
use crate::domain::ports::GenerationService;
use crate::utils::error::Result;
use crate::utils::numeric::ceil_to;

const CALORIE_CEILING: f64 = 1000.0;
const FAT_CEILING: f64 = 50.0;
const PROTEIN_TARGET: f64 = 50.0;

const CALORIE_WEIGHT: f64 = 0.4;
const FAT_WEIGHT: f64 = 0.3;
const PROTEIN_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthMetrics {
    pub protein_density: f64,
    pub protein_value: f64,
    pub health_score: f64,
}

/// Picks and scores the recommended dishes.
///
/// Only the first dish is checked for nutrition. Without it every dish is a
/// candidate and no call is made; with it the reasoning service ranks the
/// list, and unusable ranking output means no recommendation at all.
pub async fn recommend_dishes<G>(service: &G, dishes: &[DishRecord]) -> Result<Vec<DishRecord>>
where
    G: GenerationService + ?Sized,
{
    // 只看第一道菜是否帶有營養資訊
    let has_nutrition = dishes.first().is_some_and(DishRecord::has_nutrition);

    let candidates = if has_nutrition {
        let content = service
            .generate(prompts::recommendation_request(dishes))
            .await?;
        select_recommendations(dishes, &content)
    } else {
        tracing::info!("No nutrition data on dishes, skipping ranking");
        dishes.to_vec()
    };

    Ok(candidates.iter().map(score_dish).collect())
}

/// Decodes the ranked dishes out of `content`.
///
/// A recommended dish whose name matches a candidate takes its identity
/// fields, and any nutrition it left out, from that candidate.
pub fn select_recommendations(candidates: &[DishRecord], content: &str) -> Vec<DishRecord> {
    let Some(value) = extraction::extract(content).into_value() else {
        tracing::warn!("Recommendation output has no usable JSON, recommending nothing");
        return Vec::new();
    };

    DishCollection::from_value(&value)
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .filter_map(DishRecord::from_generated)
        .map(|mut dish| {
            // 以名稱對回原菜品，還原名稱、描述與價格並補齊缺少的營養欄位
            if let Some(source) = candidates.iter().find(|c| c.name == dish.name) {
                dish.restore_identity(source);
                dish.calories = dish.calories.or(source.calories);
                dish.protein = dish.protein.or(source.protein);
                dish.carbs = dish.carbs.or(source.carbs);
                dish.fat = dish.fat.or(source.fat);
            }
            dish
        })
        .collect()
}

/// Copy of `dish` with its derived metrics filled in.
pub fn score_dish(dish: &DishRecord) -> DishRecord {
    let metrics = compute_metrics(dish);
    let mut scored = dish.clone();
    scored.protein_density = Some(metrics.protein_density);
    scored.protein_value = Some(metrics.protein_value);
    scored.health_score = Some(metrics.health_score);
    scored
}

pub fn compute_metrics(dish: &DishRecord) -> HealthMetrics {
    let calories = dish.calories.unwrap_or(0.0);
    let protein = dish.protein.unwrap_or(0.0);
    let fat = dish.fat.unwrap_or(0.0);

    // 分母為 0 時指標一律為 0
    let protein_density = if calories > 0.0 {
        ceil_to(protein / calories, 3)
    } else {
        0.0
    };

    let protein_value = if dish.price > 0.0 {
        ceil_to(protein / dish.price, 2)
    } else {
        0.0
    };

    HealthMetrics {
        protein_density,
        protein_value,
        health_score: health_score(calories, protein, fat),
    }
}

/// Weighted 0..=1 score favouring low calories, low fat and high protein.
pub fn health_score(calories: f64, protein: f64, fat: f64) -> f64 {
    if calories <= 0.0 {
        return 0.0;
    }

    let calorie_score = sub_score(1.0 - (calories / CALORIE_CEILING).min(1.0));
    let fat_score = sub_score(1.0 - (fat / FAT_CEILING).min(1.0));
    let protein_score = sub_score((protein / PROTEIN_TARGET).min(1.0));

    let composite =
        CALORIE_WEIGHT * calorie_score + FAT_WEIGHT * fat_score + PROTEIN_WEIGHT * protein_score;
    ceil_to(composite, 2).clamp(0.0, 1.0)
}

fn sub_score(raw: f64) -> f64 {
    ceil_to(raw, 2).clamp(0.0, 1.0)
}
