use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::classifier::{
    default_rules, ClassifierConfigError, OuiTable, VendorRuleConfig, VendorRuleTable,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub schemas: SchemasConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    /// Directory holding `<name>.json` view templates
    #[serde(default = "default_views_directory")]
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemasConfig {
    /// Directory holding `*.json` validation schemas
    #[serde(default = "default_schemas_directory")]
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Rules in priority order
    #[serde(default = "default_rules")]
    pub rules: Vec<VendorRuleConfig>,
    /// Additional `prefix -> vendor` OUI entries
    #[serde(default)]
    pub oui: HashMap<String, String>,
    /// Seed the OUI table with well-known vendor prefixes
    #[serde(default = "default_true")]
    pub builtin_oui: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Export spans over OTLP
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Fraction of traces sampled (0.0-1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_views_directory() -> String {
    "data/views".to_string()
}

fn default_schemas_directory() -> String {
    "data/schemas".to_string()
}

fn default_true() -> bool {
    true
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "redfish-render-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("views.directory", default_views_directory())?
            .set_default("schemas.directory", default_schemas_directory())?
            .set_default("telemetry.enabled", false)?
            .set_default("telemetry.sampling_ratio", default_sampling_ratio())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // REDFISH_VIEWS__DIRECTORY, REDFISH_TELEMETRY__SERVICE_NAME, etc.
            .add_source(
                Environment::with_prefix("REDFISH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Compile the configured classifier rules
    pub fn vendor_rules(&self) -> Result<VendorRuleTable, ClassifierConfigError> {
        VendorRuleTable::from_config(&self.classifier.rules)
    }

    /// Build the OUI table from the built-in seed plus configured entries
    pub fn oui_table(&self) -> Result<OuiTable, ClassifierConfigError> {
        let mut table = if self.classifier.builtin_oui {
            OuiTable::builtin()
        } else {
            OuiTable::new()
        };
        table.extend_from_entries(&self.classifier.oui)?;
        Ok(table)
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            directory: default_views_directory(),
        }
    }
}

impl Default for SchemasConfig {
    fn default() -> Self {
        Self {
            directory: default_schemas_directory(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            oui: HashMap::new(),
            builtin_oui: true,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
            log_format: LogFormat::default(),
        }
    }
}
