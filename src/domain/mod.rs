//! Domain layer modules
//!
//! - `document`: OData-shaped Redfish resource documents

mod document;

pub use document::{
    CountMismatch, ResourceDocument, ODATA_CONTEXT, ODATA_COUNT_SUFFIX, ODATA_ID, ODATA_TYPE,
};
