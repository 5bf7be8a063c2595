//! Service entry point.

use std::sync::Arc;

use checkout_webhook::adapters::http::{build_router, serve, RouterOptions, WebhookAppState};
use checkout_webhook::adapters::stripe::{StripeConfig, StripeCustomerDirectory};
use checkout_webhook::config::{AppConfig, ServerConfig};
use checkout_webhook::domain::webhook::{EventClassifier, WebhookVerifier};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    let payment = &config.payment;
    let stripe_config = StripeConfig::new(payment.stripe_api_key.clone())
        .with_base_url(payment.api_base_url.clone())
        .with_timeout(payment.lookup_timeout())
        .with_retries(payment.lookup_max_retries, payment.lookup_retry_backoff());
    let directory = StripeCustomerDirectory::new(stripe_config)?;

    let state = WebhookAppState::new(
        WebhookVerifier::new(payment.stripe_webhook_secret.clone(), payment.webhook_tolerance_secs),
        EventClassifier::new(config.fulfillment.product_label.clone()),
        Arc::new(directory),
    );

    let options = RouterOptions {
        request_timeout: config.server.request_timeout(),
        static_dir: config.static_files.dir.clone(),
    };

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = payment.is_test_mode(),
        product_label = %config.fulfillment.product_label,
        "Starting checkout webhook service"
    );

    serve(build_router(state, &options), config.server.socket_addr()?).await?;
    Ok(())
}

/// `RUST_LOG` wins over the configured level; production logs are JSON.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}
