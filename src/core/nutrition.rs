use crate::core::extraction;
use crate::core::prompts;
use crate::domain::model::DishRecord;
use crate::domain::ports::GenerationService;
use crate::utils::error::Result;
use serde_json::Value;

/// Asks the reasoning service for per-dish nutrition and merges it back.
///
/// Transport failures propagate; unusable output leaves the dishes as they were.
pub async fn enrich_with_nutrition<G>(service: &G, dishes: &[DishRecord]) -> Result<Vec<DishRecord>>
where
    G: GenerationService + ?Sized,
{
    // 沒有菜品就不呼叫服務
    if dishes.is_empty() {
        tracing::debug!("No dishes to analyze, skipping nutrition call");
        return Ok(Vec::new());
    }

    let content = service.generate(prompts::nutrition_request(dishes)).await?;
    Ok(merge_nutrition(dishes, &content))
}

/// Pairs decoded nutrition entries with `dishes` by position.
///
/// The service answers in submission order, so entry `i` belongs to dish `i`;
/// names are not cross-checked. The result stops at the shorter of the two
/// lists. Identity fields always come from `dishes`.
pub fn merge_nutrition(dishes: &[DishRecord], content: &str) -> Vec<DishRecord> {
    let entries = match extraction::extract(content).into_value() {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            tracing::warn!("Nutrition analysis is not a JSON array, keeping dishes without nutrition");
            return dishes.to_vec();
        }
        None => {
            tracing::warn!("Nutrition analysis unavailable, keeping dishes without nutrition");
            return dishes.to_vec();
        }
    };

    // 筆數不一致時只記錄警告，以較短者為準
    if entries.len() != dishes.len() {
        tracing::warn!(
            "Nutrition analysis returned {} entries for {} dishes",
            entries.len(),
            dishes.len()
        );
    }

    dishes
        .iter()
        .zip(entries)
        .map(|(dish, entry)| merge_entry(dish, entry))
        .collect()
}

fn merge_entry(dish: &DishRecord, entry: Value) -> DishRecord {
    let Value::Object(mut map) = entry else {
        tracing::debug!("Nutrition entry for {:?} is not an object", dish.name);
        return dish.clone();
    };

    // 名稱由原菜品提供，避免上游缺欄位時被丟棄
    map.insert("name".to_string(), Value::String(dish.name.clone()));
    let mut merged = DishRecord::from_generated(map).unwrap_or_else(|| dish.clone());
    merged.restore_identity(dish);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GenerationRequest;
    use crate::utils::error::AdvisorError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedService {
        reply: String,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl CannedService {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationService for CannedService {
        async fn generate(&self, request: GenerationRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    struct DownService;

    #[async_trait]
    impl GenerationService for DownService {
        async fn generate(&self, _request: GenerationRequest) -> Result<String> {
            Err(AdvisorError::GenerationServiceError {
                service: "reasoning".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    fn menu() -> Vec<DishRecord> {
        let mut cucumber = DishRecord::new("拍黄瓜", "清爽开胃", 12.0);
        cucumber
            .extra
            .insert("originalText".to_string(), json!("拍黄瓜 12元"));
        vec![cucumber, DishRecord::new("宫保鸡丁", "酸甜微辣", 38.0)]
    }

    #[test]
    fn test_identity_fields_come_from_parsed_menu() {
        let content = r#"```json
[
  {"name": "Smashed cucumber", "description": "invented", "price": 1, "calories": 80, "protein": 2, "carbs": 10, "fat": 3, "healthDescription": "light"},
  {"name": "Kung pao", "calories": 450, "protein": 28, "carbs": 20, "fat": 25}
]
```"#;
        let merged = merge_nutrition(&menu(), content);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "拍黄瓜");
        assert_eq!(merged[0].description, "清爽开胃");
        assert_eq!(merged[0].price, 12.0);
        assert_eq!(merged[0].calories, Some(80.0));
        assert_eq!(merged[0].extra.get("originalText"), Some(&json!("拍黄瓜 12元")));
        assert!(!merged[0].extra.contains_key("healthDescription"));
        assert_eq!(merged[1].name, "宫保鸡丁");
        assert_eq!(merged[1].price, 38.0);
        assert_eq!(merged[1].fat, Some(25.0));
    }

    #[test]
    fn test_pairs_up_to_shorter_list() {
        let longer = r#"```json
[{"calories": 80}, {"calories": 450}, {"name": "extra", "calories": 999}]
```"#;
        assert_eq!(merge_nutrition(&menu(), longer).len(), 2);

        let shorter = "```json\n[{\"calories\": 80}]\n```";
        let merged = merge_nutrition(&menu(), shorter);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "拍黄瓜");
    }

    #[test]
    fn test_unusable_output_keeps_dishes() {
        assert_eq!(merge_nutrition(&menu(), "I cannot estimate this."), menu());
        assert_eq!(merge_nutrition(&menu(), "```json\n{\"calories\": 1}\n```"), menu());
    }

    #[tokio::test]
    async fn test_empty_menu_skips_service() {
        let service = CannedService::new("```json\n[]\n```");
        let merged = enrich_with_nutrition(&service, &[]).await.unwrap();

        assert!(merged.is_empty());
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_prompt_lists_every_dish() {
        let service = CannedService::new("```json\n[{\"calories\": 80}, {\"calories\": 450}]\n```");
        let merged = enrich_with_nutrition(&service, &menu()).await.unwrap();

        assert_eq!(merged.len(), 2);
        let requests = service.requests.lock().unwrap();
        assert!(requests[0].prompt.contains("拍黄瓜: 清爽开胃"));
        assert!(requests[0].prompt.contains("宫保鸡丁: 酸甜微辣"));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let result = enrich_with_nutrition(&DownService, &menu()).await;
        assert!(matches!(
            result,
            Err(AdvisorError::GenerationServiceError { status: 503, .. })
        ));
    }
}
