use clap::Parser;
use menu_advisor::utils::error::ErrorSeverity;
use menu_advisor::utils::{logger, validation::Validate};
use menu_advisor::{
    AdvisorError, ChatCompletionClient, CliConfig, ErrorResponse, LocalStorage, MenuEngine,
    MenuPipeline, MenuReport, ReportWriter, ServiceConfig,
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting menu-advisor");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(&cli).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(AdvisorError::from(e)),
        },
        Err(e) => exit_with(e),
    }
}

async fn run(cli: &CliConfig) -> menu_advisor::Result<MenuReport> {
    // 讀取環境變數設定，CLI 參數優先
    let mut config = ServiceConfig::from_env();
    if let Some(base_url) = &cli.api_base_url {
        config.api_base_url = base_url.clone();
    }
    config.warn_missing_credentials();
    config.validate()?;

    let vision = ChatCompletionClient::vision(&config)?;
    let reasoning = ChatCompletionClient::reasoning(&config)?;
    tracing::info!(
        "✅ Services ready (vision: {}, reasoning: {})",
        vision.model(),
        reasoning.model()
    );

    // 讀取菜單圖片
    let image = tokio::fs::read(&cli.image).await.map_err(|e| {
        tracing::error!("Cannot read image {}: {}", cli.image, e);
        AdvisorError::InputError {
            message: format!("cannot read image file '{}': {}", cli.image, e),
        }
    })?;

    let engine = MenuEngine::new_with_monitoring(MenuPipeline::new(vision, reasoning), cli.monitor);
    let report = engine.run(&image).await?;

    // 有指定輸出目錄才匯出檔案
    if let Some(output) = &cli.output {
        menu_advisor::utils::validation::validate_path("output", output)?;
        let writer = ReportWriter::new(LocalStorage::new(output.clone()));
        let written = writer.write(&report).await?;
        tracing::info!("📁 Report saved to {}: {}", output, written.join(", "));
    }

    Ok(report)
}

fn exit_with(e: AdvisorError) -> ! {
    tracing::error!(
        "❌ Menu processing failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    let response = ErrorResponse {
        error: e.user_friendly_message(),
    };
    match serde_json::to_string(&response) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{{\"error\": \"internal error\"}}"),
    }
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼，失敗一律非零
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
