pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ChatCompletionClient;
pub use app::pipelines::MenuPipeline;
pub use app::report::ReportWriter;
pub use config::{cli::LocalStorage, ServiceConfig};
pub use core::engine::MenuEngine;
pub use domain::model::{DishRecord, ErrorResponse, MenuReport, NutritionSummary};
pub use utils::error::{AdvisorError, Result};
