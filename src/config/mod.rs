mod settings;

pub use settings::{
    ClassifierConfig, LogFormat, SchemasConfig, Settings, TelemetryConfig, ViewsConfig,
};
