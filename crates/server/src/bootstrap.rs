use std::sync::Arc;

use orderdesk_core::config::AppConfig;
use orderdesk_core::CatalogError;
use orderdesk_store::InMemoryCartStore;
use orderdesk_webhook::{CurrencyFormatter, ParameterNormalizer, ReplyFormatter};
use thiserror::Error;
use tracing::info;

use crate::app::{AppState, SharedStore};

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("menu catalog could not be built: {0}")]
    Catalog(#[from] CatalogError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Arc::new(config.build_catalog()?);
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        catalog_items = catalog.len(),
        "menu catalog loaded"
    );

    let store: SharedStore = Arc::new(InMemoryCartStore::new());
    let currency = CurrencyFormatter::new(
        config.checkout.currency.as_str(),
        config.checkout.locale.as_str(),
    );
    info!(
        event_name = "system.bootstrap.checkout_configured",
        correlation_id = "bootstrap",
        tax_rate = %config.checkout.tax_rate,
        currency = currency.currency(),
        locale = currency.locale(),
        localized = currency.is_localized(),
        "checkout formatting configured"
    );

    let state = AppState::new(
        store,
        catalog,
        ParameterNormalizer::from(&config.parameters),
        config.checkout.tax_rate,
        ReplyFormatter::new(currency),
    );
    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        "cart store and dispatcher initialized"
    );

    Ok(Application { config, state })
}
