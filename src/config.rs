use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::resource::ResourceKind;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;
const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://www.hmmawards.com/wp-content/uploads/woocommerce-placeholder-300x300.png";
const CONFIG_DIR: &str = "config";

/// Backend path for each resource collection.
///
/// The backend has been seen serving the same collection under differently
/// cased paths (`/api/Sale` and `/api/sales`), so every path can be
/// overridden from configuration.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ResourcePaths {
    #[serde(default = "default_employees_path")]
    #[validate(custom = "validate_api_path")]
    pub employees: String,

    #[serde(default = "default_suppliers_path")]
    #[validate(custom = "validate_api_path")]
    pub suppliers: String,

    #[serde(default = "default_inventory_path")]
    #[validate(custom = "validate_api_path")]
    pub inventory: String,

    #[serde(default = "default_quality_path")]
    #[validate(custom = "validate_api_path")]
    pub quality: String,

    #[serde(default = "default_sales_path")]
    #[validate(custom = "validate_api_path")]
    pub sales: String,

    #[serde(default = "default_products_path")]
    #[validate(custom = "validate_api_path")]
    pub products: String,

    #[serde(default = "default_users_path")]
    #[validate(custom = "validate_api_path")]
    pub users: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            employees: default_employees_path(),
            suppliers: default_suppliers_path(),
            inventory: default_inventory_path(),
            quality: default_quality_path(),
            sales: default_sales_path(),
            products: default_products_path(),
            users: default_users_path(),
        }
    }
}

impl ResourcePaths {
    /// Collection path for the given resource, without a trailing slash.
    pub fn path(&self, kind: ResourceKind) -> &str {
        let raw = match kind {
            ResourceKind::Employees => &self.employees,
            ResourceKind::Suppliers => &self.suppliers,
            ResourceKind::Inventory => &self.inventory,
            ResourceKind::Quality => &self.quality,
            ResourceKind::Sales => &self.sales,
            ResourceKind::Products => &self.products,
            ResourceKind::Users => &self.users,
        };
        raw.trim_end_matches('/')
    }
}

/// Client configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Base URL of the backend REST API
    #[validate(url)]
    pub api_base_url: String,

    /// Per-request timeout in seconds (1s - 5min)
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Ask before deleting records
    #[serde(default = "default_true_bool")]
    pub confirm_deletes: bool,

    /// Session lifetime when the login response carries no expiry, at most
    /// 366 days
    #[serde(default = "default_session_ttl_secs")]
    #[validate(range(min = 60, max = 31622400))]
    pub session_ttl_secs: i64,

    /// Image stored on products saved without one
    #[serde(default = "default_placeholder_image_url")]
    #[validate(url)]
    pub placeholder_image_url: String,

    /// Per-resource collection paths
    #[serde(default)]
    #[validate]
    pub resources: ResourcePaths,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL.to_string(), DEFAULT_ENV.to_string())
    }
}

impl AdminConfig {
    /// Creates a new configuration with defaults for everything but the
    /// backend location and environment.
    pub fn new(api_base_url: String, environment: String) -> Self {
        Self {
            api_base_url,
            request_timeout_secs: default_request_timeout_secs(),
            environment,
            log_level: default_log_level(),
            log_json: false,
            confirm_deletes: default_true_bool(),
            session_ttl_secs: default_session_ttl_secs(),
            placeholder_image_url: default_placeholder_image_url(),
            resources: ResourcePaths::default(),
        }
    }

    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL for a path relative to the API base.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AdminConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_session_ttl_secs() -> i64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_placeholder_image_url() -> String {
    DEFAULT_PLACEHOLDER_IMAGE_URL.to_string()
}

fn default_true_bool() -> bool {
    true
}

fn default_employees_path() -> String {
    "/api/Employee".to_string()
}
fn default_suppliers_path() -> String {
    "/api/Supplier".to_string()
}
fn default_inventory_path() -> String {
    "/api/Inventory".to_string()
}
fn default_quality_path() -> String {
    "/api/QualityCheck".to_string()
}
fn default_sales_path() -> String {
    "/api/Sale".to_string()
}
fn default_products_path() -> String {
    "/api/Product".to_string()
}
fn default_users_path() -> String {
    "/api/user".to_string()
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_api_path(path: &str) -> Result<(), ValidationError> {
    let trimmed = path.trim();
    if trimmed.starts_with('/') && trimmed.len() > 1 && !trimmed.contains(char::is_whitespace) {
        Ok(())
    } else {
        let mut err = ValidationError::new("api_path");
        err.message = Some("Resource paths must be absolute, e.g. /api/Product".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("tea_admin={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    // Logs go to stderr so `--json` command output on stdout stays parseable.
    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .with_writer(std::io::stderr)
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Loads client configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AdminConfig, AdminConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    load_config_from(Path::new(CONFIG_DIR), &run_env, true)
}

/// Loads configuration from an explicit directory. Environment variables are
/// layered on top only when `with_env` is set.
pub fn load_config_from(
    dir: &Path,
    run_env: &str,
    with_env: bool,
) -> Result<AdminConfig, AdminConfigError> {
    let mut builder = Config::builder()
        .set_default("api_base_url", DEFAULT_API_BASE_URL)?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(run_env).to_string_lossy()).required(false));

    if with_env {
        builder = builder.add_source(Environment::with_prefix("APP").separator("__"));
    }

    let config = builder.build()?;
    let admin_config: AdminConfig = config.try_deserialize()?;

    admin_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AdminConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(admin_config)
}
