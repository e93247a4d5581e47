use crate::core::extraction::{self, JSON_FENCE_MARKER};
use crate::domain::model::{resolve_price, resolve_text, DishRecord};
use serde_json::Value;

/// Flattens a `{category: [item, ...]}` menu into dish records.
///
/// Never fails: undecodable text or a non-mapping top level yields an empty
/// list. Category labels are dropped, order of categories and items is kept,
/// and items without a name are skipped.
pub fn parse_menu_text(menu_text: &str) -> Vec<DishRecord> {
    // 有 ```json 標記時先抽出區塊，否則整段當作 JSON 解析
    let decoded = if menu_text.contains(JSON_FENCE_MARKER) {
        tracing::debug!("Menu text contains a fenced JSON block");
        extraction::extract(menu_text).into_value()
    } else {
        serde_json::from_str::<Value>(menu_text).ok()
    };

    let Some(menu) = decoded else {
        tracing::warn!("Menu text is not valid JSON, no dishes parsed");
        return Vec::new();
    };

    let dishes = parse_menu_value(&menu);
    tracing::info!("Parsed {} dishes from menu", dishes.len());
    dishes
}

pub fn parse_menu_value(menu: &Value) -> Vec<DishRecord> {
    let Value::Object(categories) = menu else {
        tracing::warn!("Decoded menu is not a mapping of categories");
        return Vec::new();
    };

    // 依類別原順序展開，類別名稱本身不保留
    let mut dishes = Vec::new();
    for (category, items) in categories {
        let Value::Array(items) = items else {
            tracing::debug!("Skipping category {:?}: not a list", category);
            continue;
        };
        tracing::debug!("Category {:?} has {} items", category, items.len());

        for item in items {
            // 非物件項目直接略過
            let Value::Object(item) = item else {
                continue;
            };
            let name = resolve_text(item, "name");
            if name.trim().is_empty() {
                tracing::debug!("Dropping unnamed item in {:?}", category);
                continue;
            }
            dishes.push(DishRecord::new(
                name,
                resolve_text(item, "description"),
                resolve_price(item),
            ));
        }
    }
    dishes
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"{
  "type1：冷菜": [
    {"name": "拍黄瓜", "description": "清爽开胃", "price": 12.0},
    {"name": "凉拌木耳", "description": "口感爽脆", "price": "15"}
  ],
  "type2：热菜": [
    {"name": "宫保鸡丁", "description": "酸甜微辣", "价格": 38},
    {"description": "no name", "price": 99},
    "not a dish",
    {"name": "鱼香肉丝", "price": "时价"}
  ],
  "note": "prices include tax"
}"#;

    fn names(dishes: &[DishRecord]) -> Vec<&str> {
        dishes.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_flattens_categories_in_order() {
        let dishes = parse_menu_text(MENU);

        assert_eq!(names(&dishes), vec!["拍黄瓜", "凉拌木耳", "宫保鸡丁", "鱼香肉丝"]);
        assert_eq!(dishes[0], DishRecord::new("拍黄瓜", "清爽开胃", 12.0));
        assert_eq!(dishes[1].price, 15.0);
        assert_eq!(dishes[2].price, 38.0);
        assert_eq!(dishes[3].price, 0.0);
        assert_eq!(dishes[3].description, "");
    }

    #[test]
    fn test_parsing_is_repeatable() {
        assert_eq!(parse_menu_text(MENU), parse_menu_text(MENU));
    }

    #[test]
    fn test_fenced_menu_is_extracted() {
        let text = format!("识别结果如下：\n```json\n{}\n```", MENU);
        assert_eq!(parse_menu_text(&text).len(), 4);
    }

    #[test]
    fn test_price_key_wins_over_locale_label() {
        let dishes = parse_menu_text(r#"{"c": [{"name": "A", "price": "n/a", "价格": 20}]}"#);
        assert_eq!(dishes[0].price, 0.0);
    }

    #[test]
    fn test_numeric_name_is_stringified() {
        let dishes = parse_menu_text(r#"{"c": [{"name": 101, "price": 8}]}"#);
        assert_eq!(dishes[0].name, "101");
    }

    #[test]
    fn test_non_mapping_or_invalid_text_yields_nothing() {
        assert!(parse_menu_text(r#"[{"name": "A"}]"#).is_empty());
        assert!(parse_menu_text("菜单无法识别").is_empty());
        assert!(parse_menu_text("```json\n{broken\n```").is_empty());
        assert!(parse_menu_text("").is_empty());
    }
}
