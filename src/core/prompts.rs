//! Prompt contracts for the four generation calls of a menu request.

use crate::domain::model::{DishRecord, GenerationRequest};

pub const RECOGNITION_MAX_TOKENS: u32 = 1024;
pub const NUTRITION_MAX_TOKENS: u32 = 8192;
pub const RECOMMENDATION_MAX_TOKENS: u32 = 1000;
pub const SUMMARY_MAX_TOKENS: u32 = 1000;

const RECOGNITION_PROMPT: &str = r#"识别图片中的菜单，提取每道菜的名称、描述和价格，按菜品类别组织成 JSON：每个类别是一个键，值为该类别的菜品数组。

示例：
```json
{
  "冷菜": [
    {"name": "拍黄瓜", "description": "清爽开胃", "price": 12.0}
  ],
  "热菜": [
    {"name": "宫保鸡丁", "description": "酸甜微辣", "price": 38.0}
  ]
}
```

要求：
1. 只输出一个 ```json 代码块，不要任何解释文字
2. 每道菜必须包含 name、description、price 三个字段
3. price 只写数字，例如 12.0，不带货币符号或单位
4. description 不超过 8 个字"#;

const NUTRITION_SYSTEM: &str = "你是专业营养师，负责估算菜品的营养成分。";
const RECOMMENDATION_SYSTEM: &str = "你是专业营养师，负责根据营养成分推荐健康的菜品组合。";
const SUMMARY_SYSTEM: &str = "你是专业营养师，负责汇总多道菜品的营养信息。";

pub fn recognition_request(image_base64: &str) -> GenerationRequest {
    GenerationRequest {
        system: None,
        prompt: RECOGNITION_PROMPT.to_string(),
        image_base64: Some(image_base64.to_string()),
        max_tokens: RECOGNITION_MAX_TOKENS,
    }
}

pub fn nutrition_request(dishes: &[DishRecord]) -> GenerationRequest {
    let dish_lines: String = dishes
        .iter()
        .map(|dish| format!("{}: {}\n", dish.name, dish.description))
        .collect();

    GenerationRequest {
        system: Some(NUTRITION_SYSTEM.to_string()),
        prompt: format!(
            "请估算以下菜品的营养成分：\n{}\n按原顺序为每道菜给出卡路里、蛋白质(g)、碳水化合物(g)和脂肪(g)。\
             只输出一个 ```json 代码块，内容为 JSON 数组，每个对象包含 name、calories、protein、carbs、fat 字段，不要包含健康评价描述。",
            dish_lines
        ),
        image_base64: None,
        max_tokens: NUTRITION_MAX_TOKENS,
    }
}

pub fn recommendation_request(dishes: &[DishRecord]) -> GenerationRequest {
    GenerationRequest {
        system: Some(RECOMMENDATION_SYSTEM.to_string()),
        prompt: format!(
            "以下是带营养信息的菜品列表：\n{}\n\n请综合低卡路里、低脂肪、高蛋白等因素按健康程度排序，\
             推荐最健康的 1-3 道菜或一个搭配合理的组合。只输出一个 ```json 代码块，内容为推荐菜品的 JSON 数组。",
            pretty_dishes(dishes)
        ),
        image_base64: None,
        max_tokens: RECOMMENDATION_MAX_TOKENS,
    }
}

pub fn summary_request(dishes: &[DishRecord]) -> GenerationRequest {
    GenerationRequest {
        system: Some(SUMMARY_SYSTEM.to_string()),
        prompt: format!(
            "以下是推荐的菜品及其营养信息：\n{}\n\n请汇总这些菜品的总热量(kcal)、总蛋白质(g)、总碳水化合物(g)和总脂肪(g)。\
             只输出一个 ```json 代码块，内容为 JSON 对象，包含 totalCalories、totalProtein、totalCarbs、totalFat 字段。",
            pretty_dishes(dishes)
        ),
        image_base64: None,
        max_tokens: SUMMARY_MAX_TOKENS,
    }
}

fn pretty_dishes(dishes: &[DishRecord]) -> String {
    // DishRecord 只含字串、數字與 JSON 值，序列化不會失敗
    serde_json::to_string_pretty(dishes).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_request_carries_image() {
        let request = recognition_request("aGVsbG8=");
        assert_eq!(request.image_base64.as_deref(), Some("aGVsbG8="));
        assert_eq!(request.max_tokens, RECOGNITION_MAX_TOKENS);
        assert!(request.prompt.contains("```json"));
    }

    #[test]
    fn test_recommendation_prompt_embeds_dishes_as_json() {
        let mut dish = DishRecord::new("宫保鸡丁", "酸甜微辣", 38.0);
        dish.calories = Some(450.0);
        let request = recommendation_request(&[dish]);

        assert!(request.prompt.contains("\"name\": \"宫保鸡丁\""));
        assert!(request.prompt.contains("\"calories\": 450.0"));
        assert!(request.system.is_some());
    }
}
