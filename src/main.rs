use anyhow::Result;
use receipt_ocr::config::AppConfig;
use receipt_ocr::locale;
use receipt_ocr::observability;
use receipt_ocr::parser::ReceiptParser;
use receipt_ocr::service::{self, AppState};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Validate environment variables at startup
fn validate_environment_variables() -> Result<()> {
    // PORT and METRICS_PORT are optional but must be numeric when present
    for key in ["PORT", "METRICS_PORT"] {
        if let Ok(value) = env::var(key) {
            let port = value
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("{} must be a valid port number (1-65535)", key))?;
            if port == 0 {
                return Err(anyhow::anyhow!("{} cannot be 0", key));
            }
        }
    }

    // Threshold overrides must be numeric when present
    for key in ["STANDALONE_TOTAL_MIN", "MAX_ITEM_PRICE"] {
        if let Ok(value) = env::var(key) {
            value
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("{} must be a valid number", key))?;
        }
    }

    Ok(())
}

/// Validate the locale keyword tables the parser will run with
fn validate_keyword_tables() -> Result<()> {
    let keywords = locale::load_locale_keywords();
    keywords.validate().map_err(|e| {
        anyhow::anyhow!(
            "Receipt keyword configuration validation failed: {}. Please check your receipt_keywords.json file.",
            e
        )
    })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    // Validate environment variables early
    validate_environment_variables()?;

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    // Initialize observability stack (logging, metrics, health endpoints)
    observability::init_observability(&config.server).await?;

    // Validate keyword tables after logging is up so load warnings are visible
    validate_keyword_tables()?;

    let keywords = locale::load_locale_keywords();
    let parser = ReceiptParser::with_keywords(config.parser.clone(), keywords);
    let state = Arc::new(AppState {
        parser,
        debug: config.server.debug,
    });

    if config.server.debug {
        info!("Debug mode enabled, responses will carry the diagnostic trace");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(port = config.server.port, "OCR service listening");

    axum::serve(listener, service::router(state)).await?;

    Ok(())
}
