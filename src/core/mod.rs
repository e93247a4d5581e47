pub mod cost;
pub mod engine;
pub mod extraction;
pub mod menu_parser;
pub mod nutrition;
pub mod prompts;
pub mod recognition;
pub mod recommendation;
pub mod summary;

pub use crate::domain::model::{DishRecord, MenuReport, NutritionSummary};
pub use crate::domain::ports::{ConfigProvider, GenerationService, Pipeline, Storage};
pub use crate::utils::error::Result;
