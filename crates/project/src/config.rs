use serde::{Deserialize, Serialize};

/// Parsed `project.json`. Only the fields the pipeline needs are typed;
/// everything else is kept verbatim in `extra` so `describe` can report the
/// full configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub id: String,
    pub dataset_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<ReviewEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProjectConfig {
    /// The configuration as a top-level JSON mapping, in field order.
    pub fn as_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_unknown_keys() {
        let raw = r#"{
            "id": "proj-1",
            "dataset_path": "records.csv",
            "name": "Demo",
            "reviews": [{"id": "rev-1", "status": "review"}],
            "created_at_unix": 1712000000
        }"#;
        let config: ProjectConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.id, "proj-1");
        assert_eq!(config.dataset_path, "records.csv");
        assert_eq!(config.reviews[0].id, "rev-1");
        assert_eq!(
            config.extra.get("created_at_unix"),
            Some(&serde_json::json!(1712000000))
        );

        let map = config.as_map();
        assert!(map.contains_key("id"));
        assert!(map.contains_key("created_at_unix"));
    }

    #[test]
    fn parse_requires_id_and_dataset_path() {
        let raw = r#"{"name": "No id"}"#;
        assert!(serde_json::from_str::<ProjectConfig>(raw).is_err());
    }
}
