// src/converters/json.rs
use crate::converters::Result;
use crate::models::VaultData;

/// Serialize the vault into the lossless interchange form: pretty-printed
/// JSON with camelCase keys, the same shape the vault file itself uses.
pub fn to_json(data: &VaultData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Parse interchange JSON back into the vault collections. The legacy
/// `apps` top-level key is accepted alongside `applications`, and missing
/// collections default to empty.
pub fn from_json(text: &str) -> Result<VaultData> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiKey, App, Bookmark};

    fn sample_data() -> VaultData {
        VaultData {
            applications: vec![App {
                id: "app1".into(),
                name: "ChatGPT".into(),
                description: "OpenAI Assistant".into(),
                url: None,
                api_key_id: Some("key1".into()),
                created_at: "2024-01-01".into(),
            }],
            api_keys: vec![ApiKey {
                id: "key1".into(),
                name: "OpenAI Key".into(),
                key: "sk-test-123456789".into(),
                created_at: "2024-01-01".into(),
                last_used: None,
                is_active: true,
            }],
            bookmarks: vec![Bookmark {
                id: "bm1".into(),
                title: "Docs".into(),
                url: "https://docs.example.com".into(),
                tags: vec!["api".into(), "docs".into()],
                created_at: "2024-01-01".into(),
            }],
        }
    }

    #[test]
    fn round_trips_losslessly() {
        let data = sample_data();
        let json = to_json(&data).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn uses_camel_case_keys_and_omits_absent_options() {
        let json = to_json(&sample_data()).unwrap();
        assert!(json.contains("\"applications\""));
        assert!(json.contains("\"apiKeys\""));
        assert!(json.contains("\"apiKeyId\": \"key1\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"isActive\": true"));
        // Absent url and lastUsed are skipped entirely.
        assert!(!json.contains("\"url\": null"));
        assert!(!json.contains("lastUsed"));
    }

    #[test]
    fn is_pretty_printed() {
        let json = to_json(&sample_data()).unwrap();
        assert!(json.starts_with("{\n  \"applications\""));
    }

    #[test]
    fn accepts_legacy_apps_key() {
        let json = r#"{
          "apps": [{ "id": "a", "name": "Tool", "description": "", "createdAt": "2024-01-01" }],
          "apiKeys": [],
          "bookmarks": []
        }"#;
        let data = from_json(json).unwrap();
        assert_eq!(data.applications.len(), 1);
        assert_eq!(data.applications[0].name, "Tool");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let data = from_json("{}").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(from_json("{ not json").is_err());
    }
}
