use crate::utils::numeric::coerce_non_negative;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NUTRITION_FIELDS: [&str; 4] = ["calories", "protein", "carbs", "fat"];

/// Keys computed by the scorer. Upstream copies of them are discarded.
pub const DERIVED_FIELDS: [&str; 3] = ["proteinDensity", "proteinValue", "healthScore"];

/// Free-text verdict the reasoning model sometimes adds despite the prompt.
pub const HEALTH_DESCRIPTION_FIELD: &str = "healthDescription";

const PRICE_KEYS: [&str; 2] = ["price", "价格"];

/// Canonical dish flowing through every stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishRecord {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    /// Keys the generation service added that the pipeline does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DishRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            ..Default::default()
        }
    }

    /// Builds a record from a mapping decoded out of generation-service text.
    ///
    /// Returns `None` when no usable `name` is present. Derived metrics and
    /// `healthDescription` are never taken from upstream.
    pub fn from_generated(mut map: Map<String, Value>) -> Option<Self> {
        let name = resolve_text(&map, "name");
        if name.trim().is_empty() {
            return None;
        }
        let description = resolve_text(&map, "description");
        let price = resolve_price(&map);

        let [calories, protein, carbs, fat] =
            NUTRITION_FIELDS.map(|field| map.get(field).map(coerce_non_negative));

        for key in ["name", "description"]
            .into_iter()
            .chain(PRICE_KEYS)
            .chain(NUTRITION_FIELDS)
            .chain(DERIVED_FIELDS)
            .chain([HEALTH_DESCRIPTION_FIELD])
        {
            map.remove(key);
        }

        Some(Self {
            name,
            description,
            price,
            calories,
            protein,
            carbs,
            fat,
            extra: map,
            ..Default::default()
        })
    }

    /// True when any of calories/protein/carbs/fat is present.
    pub fn has_nutrition(&self) -> bool {
        self.calories.is_some() || self.protein.is_some() || self.carbs.is_some() || self.fat.is_some()
    }

    /// Copies name/description/price (and `originalText`) from the dish this
    /// record was derived from.
    pub fn restore_identity(&mut self, source: &DishRecord) {
        self.name = source.name.clone();
        self.description = source.description.clone();
        self.price = source.price;
        if let Some(original) = source.extra.get("originalText") {
            self.extra.insert("originalText".to_string(), original.clone());
        }
    }
}

/// Reads a text field; numbers are stringified, `null` and other shapes count as absent.
pub fn resolve_text(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// `price`, falling back to the locale label only when `price` is missing.
pub fn resolve_price(map: &Map<String, Value>) -> f64 {
    PRICE_KEYS
        .iter()
        .find_map(|key| map.get(*key))
        .map(coerce_non_negative)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

impl NutritionSummary {
    /// Reads an aggregate object leniently; missing or unreadable totals are 0.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let total = |key: &str| map.get(key).map(coerce_non_negative).unwrap_or(0.0);
        Some(Self {
            total_calories: total("totalCalories"),
            total_protein: total("totalProtein"),
            total_carbs: total("totalCarbs"),
            total_fat: total("totalFat"),
        })
    }
}

/// Response object of one menu request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuReport {
    pub menu_text: String,
    pub dish_list: Vec<DishRecord>,
    pub recommended_dishes: Vec<DishRecord>,
    pub nutrition_summary: NutritionSummary,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One prompted call to a generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub image_base64: Option<String>,
    pub max_tokens: u32,
}
