//! # Webshop Configuration
//!
//! Deployment settings for the webshop, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Built-in defaults (lowest)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. webshop.toml (explicit path, or the platform config dir)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. WEBSHOP_* environment variables (highest)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate() ──► refuse to start on a broken config                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `webshop.toml`
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [storage]
//! database_path = "/var/lib/webshop/webshop.db"
//! basket_key = "shoppingBasket"
//! max_connections = 5
//! min_connections = 1
//! connect_timeout_secs = 30
//!
//! [fees]
//! transaction_fee_cents = 35
//!
//! [currency]
//! symbol = "€"
//! decimal_separator = ","
//!
//! [checkout]
//! key_field = "products[{index}].key"
//! amount_field = "products[{index}].amount"
//! expansion = "per_key"
//!
//! [quantities]
//! key_field = "products[{index}].key"
//! expansion = "per_unit"
//!
//! [notifications]
//! duration_ms = 3000
//!
//! [auth]
//! token_secret = "change-me"
//! groups_claim = "ldap_groups"
//! admin_groups = ["webshop-admins"]
//!
//! [templates.beer]
//! title = "Beer"
//! cost = 250
//! maxSoldPerCustomer = 10
//! ```

use std::path::PathBuf;
use std::time::Duration;

use basket_core::presenter::DEFAULT_NOTIFICATION_DURATION;
use basket_store::DbConfig;
use basket_core::{
    CurrencyFormat, Expansion, FeeRule, FieldSchema, FieldScheme, Money, OrderEncoder,
    PresenterSettings, TemplateCatalog, TemplateError, ValidationError, DEFAULT_BASKET_KEY,
    DEFAULT_TRANSACTION_FEE_CENTS,
};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Default name of the groups claim in identity tokens.
pub const DEFAULT_GROUPS_CLAIM: &str = "ldap_groups";

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// The values do not make a runnable webshop.
    #[error("Invalid webshop configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

impl From<TemplateError> for ConfigError {
    fn from(err: TemplateError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[server]`: where the HTTP listener binds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port`, as handed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[storage]`: the database file, its pool and the basket's storage key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `None` picks `webshop.db` in the platform data directory.
    pub database_path: Option<PathBuf>,
    pub basket_key: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            database_path: None,
            basket_key: DEFAULT_BASKET_KEY.to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 30,
        }
    }
}

/// `[fees]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Flat transaction fee added to every non-empty order.
    pub transaction_fee_cents: i64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        FeeConfig {
            transaction_fee_cents: DEFAULT_TRANSACTION_FEE_CENTS,
        }
    }
}

/// `[checkout]` and `[quantities]`: how one endpoint names its fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncodingConfig {
    pub key_field: String,
    #[serde(default)]
    pub amount_field: Option<String>,
    #[serde(default)]
    pub expansion: Expansion,
}

impl EncodingConfig {
    /// Basket checkout: key/amount pairs, one entry per line.
    pub fn checkout() -> Self {
        EncodingConfig::from_scheme(FieldScheme::key_amount_pairs(), Expansion::PerKey)
    }

    /// Quantity form: one hidden key field per unit.
    pub fn quantities() -> Self {
        EncodingConfig::from_scheme(FieldScheme::per_unit_hidden(), Expansion::PerUnit)
    }

    fn from_scheme(scheme: FieldScheme, expansion: Expansion) -> Self {
        EncodingConfig {
            key_field: scheme.key_field,
            amount_field: scheme.amount_field,
            expansion,
        }
    }

    /// Builds the encoder, rejecting patterns that cannot carry the expansion.
    pub fn to_encoder(&self) -> Result<OrderEncoder, ValidationError> {
        OrderEncoder::new(
            FieldScheme {
                key_field: self.key_field.clone(),
                amount_field: self.amount_field.clone(),
            },
            self.expansion,
        )
    }
}

/// `[notifications]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub duration_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            duration_ms: u64::try_from(DEFAULT_NOTIFICATION_DURATION.as_millis()).unwrap_or(3000),
        }
    }
}

/// `[auth]`: identity token handling for the admin routes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret of the identity tokens. Without one, every token is refused.
    pub token_secret: Option<String>,

    /// Name of the claim listing the caller's groups.
    pub groups_claim: String,

    /// Membership in any of these makes the caller an admin.
    pub admin_groups: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            token_secret: None,
            groups_claim: DEFAULT_GROUPS_CLAIM.to_string(),
            admin_groups: Vec::new(),
        }
    }
}

// =============================================================================
// Webshop Config
// =============================================================================

/// Complete webshop configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebshopConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub fees: FeeConfig,
    pub currency: CurrencyFormat,
    pub checkout: EncodingConfig,
    pub quantities: EncodingConfig,
    pub notifications: NotificationConfig,
    pub auth: AuthConfig,
    pub templates: TemplateCatalog,
}

impl Default for WebshopConfig {
    fn default() -> Self {
        WebshopConfig {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            fees: FeeConfig::default(),
            currency: CurrencyFormat::default(),
            checkout: EncodingConfig::checkout(),
            quantities: EncodingConfig::quantities(),
            notifications: NotificationConfig::default(),
            auth: AuthConfig::default(),
            templates: TemplateCatalog::default(),
        }
    }
}

impl WebshopConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// ## Arguments
    /// * `config_path` - Explicit file; `None` looks in the platform config dir
    ///
    /// A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading webshop config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document on top of the defaults, without env overrides.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: WebshopConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration can run a webshop.
    ///
    /// ## Rules
    /// - port is not 0
    /// - basket key is not blank
    /// - the pool has at least one connection and min ≤ max
    /// - transaction fee is not negative
    /// - both field schemes contain `{index}` and fit their expansion
    /// - every template fits the product form
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be greater than 0".into(),
            ));
        }

        if self.storage.basket_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.basket_key must not be empty".into(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be greater than 0".into(),
            ));
        }

        if self.storage.min_connections > self.storage.max_connections {
            return Err(ConfigError::Invalid(
                "storage.min_connections must not exceed storage.max_connections".into(),
            ));
        }

        if self.fees.transaction_fee_cents < 0 {
            return Err(ConfigError::Invalid(
                "fees.transaction_fee_cents must not be negative".into(),
            ));
        }

        self.checkout
            .to_encoder()
            .map_err(|e| ConfigError::Invalid(format!("checkout: {}", e)))?;
        self.quantities
            .to_encoder()
            .map_err(|e| ConfigError::Invalid(format!("quantities: {}", e)))?;

        self.templates.validate(&FieldSchema::product_form())?;

        Ok(())
    }

    /// Applies `WEBSHOP_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup`; unparseable values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("WEBSHOP_HOST") {
            debug!(host = %host, "Overriding bind host from environment");
            self.server.host = host;
        }

        if let Some(port) = lookup("WEBSHOP_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding port from environment");
                self.server.port = p;
            }
        }

        if let Some(path) = lookup("WEBSHOP_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("WEBSHOP_BASKET_KEY") {
            debug!(basket_key = %key, "Overriding basket key from environment");
            self.storage.basket_key = key;
        }

        if let Some(max) = lookup("WEBSHOP_MAX_CONNECTIONS") {
            if let Ok(max) = max.parse::<u32>() {
                debug!(max_connections = max, "Overriding pool size from environment");
                self.storage.max_connections = max;
            }
        }

        if let Some(fee) = lookup("WEBSHOP_TRANSACTION_FEE_CENTS") {
            if let Ok(cents) = fee.parse::<i64>() {
                self.fees.transaction_fee_cents = cents;
            }
        }

        if let Some(ms) = lookup("WEBSHOP_NOTIFICATION_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.notifications.duration_ms = ms;
            }
        }

        if let Some(secret) = lookup("WEBSHOP_TOKEN_SECRET") {
            self.auth.token_secret = Some(secret);
        }

        if let Some(groups) = lookup("WEBSHOP_ADMIN_GROUPS") {
            self.auth.admin_groups = groups
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from)
                .collect();
            debug!(groups = ?self.auth.admin_groups, "Overriding admin groups from environment");
        }
    }

    /// Platform config file: `<config dir>/webshop.toml`.
    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "events", "webshop")
            .map(|dirs| dirs.config_dir().join("webshop.toml"))
    }

    /// The database file, falling back to the platform data directory.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("org", "events", "webshop").ok_or_else(|| {
            ConfigError::Invalid("could not determine the app data directory".into())
        })?;
        std::fs::create_dir_all(dirs.data_dir())?;
        Ok(dirs.data_dir().join("webshop.db"))
    }

    // =========================================================================
    // Derived Settings
    // =========================================================================

    /// Pool settings for the basket store.
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.storage.max_connections)
            .min_connections(self.storage.min_connections)
            .connect_timeout(Duration::from_secs(self.storage.connect_timeout_secs)))
    }

    /// Presenter settings for the basket pages.
    pub fn presenter_settings(&self) -> ConfigResult<PresenterSettings> {
        Ok(PresenterSettings {
            fee: FeeRule::flat(Money::from_cents(self.fees.transaction_fee_cents)),
            currency: self.currency.clone(),
            encoder: self.checkout.to_encoder()?,
            notification_duration: Duration::from_millis(self.notifications.duration_ms),
        })
    }

    /// Encoder for the quantity form endpoint.
    pub fn quantity_encoder(&self) -> ConfigResult<OrderEncoder> {
        Ok(self.quantities.to_encoder()?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
