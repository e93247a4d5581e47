use crate::domain::model::MenuReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::StageMonitor;

/// Drives one menu request through every stage, strictly in order.
pub struct MenuEngine<P: Pipeline> {
    pipeline: P,
    monitor: StageMonitor,
}

impl<P: Pipeline> MenuEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: StageMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self, image: &[u8]) -> Result<MenuReport> {
        tracing::info!("🍽️ Processing menu image ({} bytes)", image.len());

        // 1. 辨識菜單圖片
        let menu_text = self.pipeline.recognize(image).await?;
        self.monitor.log_stage("Recognition");

        // 2. 解析菜品清單
        let dishes = self.pipeline.parse(&menu_text);
        tracing::info!("Parsed {} dishes", dishes.len());

        // 3. 補上營養資訊
        let dish_list = self.pipeline.enrich(&dishes).await?;
        tracing::info!("Nutrition attached to {} dishes", dish_list.len());
        self.monitor.log_stage("Nutrition");

        // 4. 推薦並評分
        let recommended_dishes = self.pipeline.recommend(&dish_list).await?;
        tracing::info!("Recommended {} dishes", recommended_dishes.len());
        self.monitor.log_stage("Recommendation");

        // 5. 彙總營養與總價
        let nutrition_summary = self.pipeline.summarize(&recommended_dishes).await?;
        self.monitor.log_stage("Summary");

        let total_cost = self.pipeline.total_cost(&recommended_dishes);
        tracing::info!("💰 Total cost: {:.2}", total_cost);

        self.monitor.log_final_stats();

        Ok(MenuReport {
            menu_text,
            dish_list,
            recommended_dishes,
            nutrition_summary,
            total_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DishRecord, NutritionSummary};
    use crate::utils::error::AdvisorError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        stages: Mutex<Vec<&'static str>>,
        fail_enrich: bool,
    }

    impl RecordingPipeline {
        fn record(&self, stage: &'static str) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        async fn recognize(&self, _image: &[u8]) -> Result<String> {
            self.record("recognize");
            Ok("{\"热菜\": []}".to_string())
        }

        fn parse(&self, _menu_text: &str) -> Vec<DishRecord> {
            self.record("parse");
            vec![DishRecord::new("豆腐", "嫩", 18.0)]
        }

        async fn enrich(&self, dishes: &[DishRecord]) -> Result<Vec<DishRecord>> {
            self.record("enrich");
            if self.fail_enrich {
                return Err(AdvisorError::GenerationServiceError {
                    service: "reasoning".to_string(),
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(dishes.to_vec())
        }

        async fn recommend(&self, dishes: &[DishRecord]) -> Result<Vec<DishRecord>> {
            self.record("recommend");
            Ok(dishes.to_vec())
        }

        async fn summarize(&self, _dishes: &[DishRecord]) -> Result<NutritionSummary> {
            self.record("summarize");
            Ok(NutritionSummary::default())
        }

        fn total_cost(&self, _dishes: &[DishRecord]) -> f64 {
            self.record("total_cost");
            18.0
        }
    }

    #[tokio::test]
    async fn test_runs_stages_in_order() {
        let engine = MenuEngine::new(RecordingPipeline::default());
        let report = engine.run(b"img").await.unwrap();

        assert_eq!(
            *engine.pipeline.stages.lock().unwrap(),
            vec!["recognize", "parse", "enrich", "recommend", "summarize", "total_cost"]
        );
        assert_eq!(report.menu_text, "{\"热菜\": []}");
        assert_eq!(report.recommended_dishes.len(), 1);
        assert_eq!(report.total_cost, 18.0);
    }

    #[tokio::test]
    async fn test_stage_failure_stops_the_run() {
        let engine = MenuEngine::new(RecordingPipeline {
            fail_enrich: true,
            ..Default::default()
        });

        assert!(engine.run(b"img").await.is_err());
        assert_eq!(
            *engine.pipeline.stages.lock().unwrap(),
            vec!["recognize", "parse", "enrich"]
        );
    }
}
