use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::catalog::{default_menu, Catalog};
use crate::domain::menu::{CatalogEntry, ItemKey};
use crate::errors::CatalogError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub checkout: CheckoutConfig,
    pub catalog: CatalogConfig,
    pub parameters: ParametersConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    pub tax_rate: Decimal,
    /// ISO-4217 code used for every rendered amount.
    pub currency: String,
    pub locale: String,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub items: Vec<CatalogItemConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItemConfig {
    pub key: String,
    pub display_name: String,
    pub unit_price: Decimal,
}

/// Candidate NLU parameter names, highest priority first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParametersConfig {
    pub item_fields: Vec<String>,
    pub quantity_fields: Vec<String>,
    pub order_id_fields: Vec<String>,
}

pub const DEFAULT_ITEM_FIELDS: [&str; 4] = ["item", "food_item", "menu_item", "product"];
pub const DEFAULT_QUANTITY_FIELDS: [&str; 4] = ["quantity", "number", "qty", "amount"];
pub const DEFAULT_ORDER_ID_FIELDS: [&str; 4] = ["order_id", "orderId", "order_number", "number"];

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            item_fields: DEFAULT_ITEM_FIELDS.iter().map(ToString::to_string).collect(),
            quantity_fields: DEFAULT_QUANTITY_FIELDS.iter().map(ToString::to_string).collect(),
            order_id_fields: DEFAULT_ORDER_ID_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub tax_rate: Option<Decimal>,
    pub currency: Option<String>,
    pub locale: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 8080 },
            checkout: CheckoutConfig {
                tax_rate: Decimal::new(5, 2),
                currency: "USD".to_string(),
                locale: "en-US".to_string(),
            },
            catalog: CatalogConfig {
                items: default_menu().into_iter().map(CatalogItemConfig::from).collect(),
            },
            parameters: ParametersConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl From<CatalogEntry> for CatalogItemConfig {
    fn from(entry: CatalogEntry) -> Self {
        Self { key: entry.key.0, display_name: entry.display_name, unit_price: entry.unit_price }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("orderdesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Builds the immutable menu. Keys are normalized here, once.
    pub fn build_catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::new(
            self.catalog
                .items
                .iter()
                .map(|item| CatalogEntry {
                    key: ItemKey(item.key.clone()),
                    display_name: item.display_name.clone(),
                    unit_price: item.unit_price,
                })
                .collect(),
        )
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(checkout) = patch.checkout {
            if let Some(tax_rate) = checkout.tax_rate {
                self.checkout.tax_rate = tax_rate;
            }
            if let Some(currency) = checkout.currency {
                self.checkout.currency = currency;
            }
            if let Some(locale) = checkout.locale {
                self.checkout.locale = locale;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(items) = catalog.items {
                self.catalog.items = items;
            }
        }

        if let Some(parameters) = patch.parameters {
            if let Some(item_fields) = parameters.item_fields {
                self.parameters.item_fields = item_fields;
            }
            if let Some(quantity_fields) = parameters.quantity_fields {
                self.parameters.quantity_fields = quantity_fields;
            }
            if let Some(order_id_fields) = parameters.order_id_fields {
                self.parameters.order_id_fields = order_id_fields;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ORDERDESK_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("ORDERDESK_SERVER_PORT") {
            self.server.port = parse_u16("ORDERDESK_SERVER_PORT", &value)?;
        } else if let Some(value) = read_env("PORT") {
            self.server.port = parse_u16("PORT", &value)?;
        }

        if let Some(value) = read_env("ORDERDESK_CHECKOUT_TAX_RATE") {
            self.checkout.tax_rate = parse_decimal("ORDERDESK_CHECKOUT_TAX_RATE", &value)?;
        }
        if let Some(value) = read_env("ORDERDESK_CHECKOUT_CURRENCY") {
            self.checkout.currency = value;
        }
        if let Some(value) = read_env("ORDERDESK_CHECKOUT_LOCALE") {
            self.checkout.locale = value;
        }

        let log_level =
            read_env("ORDERDESK_LOGGING_LEVEL").or_else(|| read_env("ORDERDESK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ORDERDESK_LOGGING_FORMAT").or_else(|| read_env("ORDERDESK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(tax_rate) = overrides.tax_rate {
            self.checkout.tax_rate = tax_rate;
        }
        if let Some(currency) = overrides.currency {
            self.checkout.currency = currency;
        }
        if let Some(locale) = overrides.locale {
            self.checkout.locale = locale;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_checkout(&self.checkout)?;
        validate_catalog(self)?;
        validate_parameters(&self.parameters)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("orderdesk.toml"), PathBuf::from("config/orderdesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    Ok(())
}

fn validate_checkout(checkout: &CheckoutConfig) -> Result<(), ConfigError> {
    if checkout.tax_rate < Decimal::ZERO || checkout.tax_rate > Decimal::ONE {
        return Err(ConfigError::Validation(
            "checkout.tax_rate must be in range 0..=1 (e.g. 0.05 for 5%)".to_string(),
        ));
    }

    let currency = checkout.currency.as_str();
    if currency.len() != 3 || !currency.chars().all(|ch| ch.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "checkout.currency must be a three-letter ISO-4217 code, got `{currency}`"
        )));
    }

    if checkout.locale.trim().is_empty() {
        return Err(ConfigError::Validation("checkout.locale must not be empty".to_string()));
    }

    Ok(())
}

fn validate_catalog(config: &AppConfig) -> Result<(), ConfigError> {
    let catalog = config.build_catalog()?;
    if catalog.is_empty() {
        return Err(ConfigError::Validation(
            "catalog.items must contain at least one item".to_string(),
        ));
    }

    Ok(())
}

fn validate_parameters(parameters: &ParametersConfig) -> Result<(), ConfigError> {
    for (section, fields) in [
        ("parameters.item_fields", &parameters.item_fields),
        ("parameters.quantity_fields", &parameters.quantity_fields),
        ("parameters.order_id_fields", &parameters.order_id_fields),
    ] {
        if fields.is_empty() || fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{section} must list at least one non-empty field name"
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    checkout: Option<CheckoutPatch>,
    catalog: Option<CatalogPatch>,
    parameters: Option<ParametersPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct CheckoutPatch {
    tax_rate: Option<Decimal>,
    currency: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    items: Option<Vec<CatalogItemConfig>>,
}

#[derive(Debug, Default, Deserialize)]
struct ParametersPatch {
    item_fields: Option<Vec<String>>,
    quantity_fields: Option<Vec<String>>,
    order_id_fields: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
