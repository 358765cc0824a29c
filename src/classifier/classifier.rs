//! Node vendor classification

use std::sync::Arc;

use crate::metrics::ClassifierMetrics;

use super::directory::NodeDirectory;
use super::oui::{OuiLookup, OuiTable};
use super::rules::VendorRuleTable;
use super::types::{ClassifyError, ClassifyResult, Vendor, VendorClassification};

/// Classifies a node's vendor from its reported identifiers
#[derive(Clone)]
pub struct VendorClassifier {
    directory: Arc<dyn NodeDirectory>,
    rules: Arc<VendorRuleTable>,
    oui: Arc<dyn OuiLookup>,
}

impl VendorClassifier {
    pub fn new(
        directory: Arc<dyn NodeDirectory>,
        rules: Arc<VendorRuleTable>,
        oui: Arc<dyn OuiLookup>,
    ) -> Self {
        Self {
            directory,
            rules,
            oui,
        }
    }

    /// Classifier using the built-in rule table and OUI prefixes
    pub fn with_builtin_rules(directory: Arc<dyn NodeDirectory>) -> Self {
        Self::new(
            directory,
            VendorRuleTable::builtin(),
            Arc::new(OuiTable::builtin()),
        )
    }

    /// Look up a node and guess its vendor.
    ///
    /// Fails with [`ClassifyError::InvalidNode`] when the directory has no
    /// such node. Directory failures are returned as-is and never retried.
    #[tracing::instrument(skip(self))]
    pub async fn get_vendor_name_by_id(&self, id: &str) -> ClassifyResult<VendorClassification> {
        let node = match self.directory.get_node_by_identifier(id).await {
            Ok(Some(node)) => node,
            Ok(None) => {
                let err = ClassifyError::InvalidNode(id.to_string());
                tracing::warn!(node_id = %id, "Node not found in directory");
                ClassifierMetrics::record_failure(&err);
                return Err(err);
            }
            Err(e) => {
                let err = ClassifyError::from(e);
                tracing::error!(node_id = %id, error = %err, "Node directory lookup failed");
                ClassifierMetrics::record_failure(&err);
                return Err(err);
            }
        };

        let vendor = self.classify_identifiers(node.identifiers());
        ClassifierMetrics::record_vendor(vendor);

        Ok(VendorClassification { vendor, node })
    }

    /// Vendor decided by the first identifier any rule recognizes
    pub fn classify_identifiers(&self, identifiers: &[String]) -> Option<Vendor> {
        identifiers.iter().find_map(|token| {
            let (vendor, rule) = self.rules.classify_token(token, self.oui.as_ref())?;
            tracing::debug!(
                identifier = %token,
                rule = rule.matcher().kind(),
                vendor = %vendor,
                "Identifier matched vendor rule"
            );
            Some(vendor)
        })
    }
}
