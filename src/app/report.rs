use crate::core::{DishRecord, MenuReport, Storage};
use crate::utils::error::{AdvisorError, Result};

pub const REPORT_JSON: &str = "menu_report.json";
pub const RECOMMENDED_CSV: &str = "recommended_dishes.csv";

const CSV_HEADER: [&str; 10] = [
    "name",
    "description",
    "price",
    "calories",
    "protein",
    "carbs",
    "fat",
    "proteinDensity",
    "proteinValue",
    "healthScore",
];

/// Writes a finished report to storage as JSON plus a CSV of the recommended dishes.
pub struct ReportWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the names of the files written.
    pub async fn write(&self, report: &MenuReport) -> Result<Vec<String>> {
        let json = serde_json::to_vec_pretty(report)?;
        tracing::debug!("Writing {} ({} bytes)", REPORT_JSON, json.len());
        self.storage.write_file(REPORT_JSON, &json).await?;

        // 推薦菜品另存一份 CSV
        let csv = recommended_csv(&report.recommended_dishes)?;
        tracing::debug!("Writing {} ({} bytes)", RECOMMENDED_CSV, csv.len());
        self.storage.write_file(RECOMMENDED_CSV, &csv).await?;

        Ok(vec![REPORT_JSON.to_string(), RECOMMENDED_CSV.to_string()])
    }
}

pub fn recommended_csv(dishes: &[DishRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for dish in dishes {
        let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([
            dish.name.clone(),
            dish.description.clone(),
            dish.price.to_string(),
            optional(dish.calories),
            optional(dish.protein),
            optional(dish.carbs),
            optional(dish.fat),
            optional(dish.protein_density),
            optional(dish.protein_value),
            optional(dish.health_score),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| AdvisorError::IoError(e.into_error()))
}
