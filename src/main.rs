use clap::Parser;
use nws_forecast_summarizer::server::{self, AppState};
use nws_forecast_summarizer::utils::error::ErrorSeverity;
use nws_forecast_summarizer::utils::{logger, validation::Validate};
use nws_forecast_summarizer::{
    CliConfig, ForecastEngine, ForecastError, MetricsCollector, ServiceConfig,
};
use std::sync::Arc;

fn load_config() -> Result<ServiceConfig, ForecastError> {
    let cli = CliConfig::parse();
    match cli.config.clone() {
        Some(path) => ServiceConfig::from_file(path),
        None => {
            let config = ServiceConfig::from(cli);
            config.validate()?;
            Ok(config)
        }
    }
}

async fn run(config: ServiceConfig) -> Result<(), ForecastError> {
    let metrics = MetricsCollector::global().clone();
    let engine = ForecastEngine::from_config(&config, &metrics)?;
    let state = Arc::new(AppState::new(engine, metrics.clone()));

    tracing::info!(
        "welcome to nws-forecast-summarizer! model={} ollama={}",
        config.ollama_model,
        config.ollama_base_url()
    );

    let metrics_addr = config.metrics_addr();
    tokio::spawn(async move {
        if let Err(e) = server::serve_metrics(&metrics_addr, metrics).await {
            tracing::error!("❌ Metrics server failed: {}", e);
        }
    });

    server::serve(&config.api_addr(), state).await
}

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(&config.log_level, config.log_format());
    tracing::debug!("Service config: {:?}", config);

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Service stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}
