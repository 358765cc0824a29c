// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain types
pub mod domain;

// Core services
pub mod classifier;
pub mod render;

// Application layer
pub mod service;

pub use classifier::{Vendor, VendorClassification, VendorClassifier};
pub use domain::ResourceDocument;
pub use render::RenderEngine;
pub use service::RedfishApiService;
