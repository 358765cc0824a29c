//! OData-shaped resource documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suffix marking a paired collection count (`Members@odata.count`)
pub const ODATA_COUNT_SUFFIX: &str = "@odata.count";

pub const ODATA_CONTEXT: &str = "@odata.context";
pub const ODATA_ID: &str = "@odata.id";
pub const ODATA_TYPE: &str = "@odata.type";

/// A rendered Redfish resource.
///
/// Wraps an insertion-ordered JSON object so that key order from the
/// template survives rendering and serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDocument(Map<String, Value>);

/// A `<X>@odata.count` key whose value disagrees with the paired array
#[derive(Debug, Clone, PartialEq)]
pub struct CountMismatch {
    /// The count key, e.g. `Members@odata.count`
    pub count_key: String,
    /// The paired collection field, e.g. `Members`
    pub field: String,
    /// Declared count value as found in the document
    pub declared: Value,
    /// Actual collection length, `None` when the field is missing or not an array
    pub actual: Option<usize>,
}

impl std::fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.actual {
            Some(len) => write!(
                f,
                "{} is {} but {} has {} entries",
                self.count_key, self.declared, self.field, len
            ),
            None => write!(
                f,
                "{} is present but {} is not a collection",
                self.count_key, self.field
            ),
        }
    }
}

impl ResourceDocument {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a collection resource whose member count matches its members
    pub fn collection(
        context: impl Into<String>,
        id: impl Into<String>,
        odata_type: impl Into<String>,
        name: impl Into<String>,
        member_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        let members: Vec<Value> = member_ids
            .into_iter()
            .map(|member| {
                let mut entry = Map::new();
                entry.insert(ODATA_ID.to_string(), Value::String(member));
                Value::Object(entry)
            })
            .collect();

        let mut doc = Map::new();
        doc.insert(ODATA_CONTEXT.to_string(), Value::String(context.into()));
        doc.insert(ODATA_ID.to_string(), Value::String(id.into()));
        doc.insert(ODATA_TYPE.to_string(), Value::String(odata_type.into()));
        doc.insert("Oem".to_string(), Value::Object(Map::new()));
        doc.insert("Name".to_string(), Value::String(name.into()));
        doc.insert(
            format!("Members{}", ODATA_COUNT_SUFFIX),
            Value::from(members.len()),
        );
        doc.insert("Members".to_string(), Value::Array(members));
        Self(doc)
    }

    pub fn odata_context(&self) -> Option<&str> {
        self.0.get(ODATA_CONTEXT).and_then(Value::as_str)
    }

    pub fn odata_id(&self) -> Option<&str> {
        self.0.get(ODATA_ID).and_then(Value::as_str)
    }

    pub fn odata_type(&self) -> Option<&str> {
        self.0.get(ODATA_TYPE).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("Name").and_then(Value::as_str)
    }

    pub fn oem(&self) -> Option<&Map<String, Value>> {
        self.0.get("Oem").and_then(Value::as_object)
    }

    pub fn members(&self) -> Option<&Vec<Value>> {
        self.0.get("Members").and_then(Value::as_array)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Check every top-level `<X>@odata.count` against the length of `X`.
    ///
    /// Returns all mismatches in document order; an empty list means the
    /// collection-count invariant holds.
    pub fn check_collection_counts(&self) -> Vec<CountMismatch> {
        self.0
            .iter()
            .filter_map(|(key, declared)| {
                let field = key.strip_suffix(ODATA_COUNT_SUFFIX)?;
                if field.is_empty() {
                    return None;
                }
                let actual = self.0.get(field).and_then(Value::as_array).map(Vec::len);
                let matches = matches!(
                    (actual, declared.as_u64()),
                    (Some(len), Some(count)) if len as u64 == count
                );
                (!matches).then(|| CountMismatch {
                    count_key: key.clone(),
                    field: field.to_string(),
                    declared: declared.clone(),
                    actual,
                })
            })
            .collect()
    }
}

impl From<Map<String, Value>> for ResourceDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ResourceDocument> for Value {
    fn from(doc: ResourceDocument) -> Self {
        doc.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_count_matches_members() {
        let doc = ResourceDocument::collection(
            "/redfish/v1/$metadata#Systems",
            "/redfish/v1/Systems/",
            "#ComputerSystemCollection.ComputerSystemCollection",
            "Computer System Collection",
            vec![
                "/redfish/v1/Systems/a".to_string(),
                "/redfish/v1/Systems/b".to_string(),
            ],
        );

        assert_eq!(doc.get("Members@odata.count"), Some(&json!(2)));
        assert_eq!(doc.members().map(Vec::len), Some(2));
        assert_eq!(doc.odata_id(), Some("/redfish/v1/Systems/"));
        assert!(doc.check_collection_counts().is_empty());
    }

    #[test]
    fn test_key_order_preserved() {
        let doc: ResourceDocument = serde_json::from_str(
            r#"{"@odata.type": "t", "Name": "n", "@odata.id": "i"}"#,
        )
        .unwrap();

        let keys: Vec<&str> = doc.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@odata.type", "Name", "@odata.id"]);
    }

    #[test]
    fn test_count_mismatch_detected() {
        let doc: ResourceDocument = serde_json::from_value(json!({
            "Members@odata.count": 3,
            "Members": [{"@odata.id": "/a"}]
        }))
        .unwrap();

        let mismatches = doc.check_collection_counts();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].field, "Members");
        assert_eq!(mismatches[0].actual, Some(1));
    }

    #[test]
    fn test_count_without_collection() {
        let doc: ResourceDocument = serde_json::from_value(json!({
            "Links@odata.count": 0
        }))
        .unwrap();

        let mismatches = doc.check_collection_counts();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].actual, None);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(serde_json::from_str::<ResourceDocument>("[1, 2]").is_err());
    }
}
