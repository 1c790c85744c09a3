// src/models.rs
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A cataloged AI application or external service, optionally linked to a
/// stored API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    pub created_at: String,
}

/// A stored API key secret with an active flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub key: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
    pub is_active: bool,
}

/// A tagged web bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

/// The three collections treated as one atomic export/import unit.
///
/// This is also the on-disk shape of the vault file and of the JSON export
/// format. The legacy top-level key `apps` is accepted on import as an
/// alias for `applications`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultData {
    #[serde(default, alias = "apps")]
    pub applications: Vec<App>,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl VaultData {
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty() && self.api_keys.is_empty() && self.bookmarks.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.applications.len() + self.api_keys.len() + self.bookmarks.len()
    }
}

impl App {
    pub fn new(
        name: String,
        description: String,
        url: Option<String>,
        api_key_id: Option<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            name,
            description,
            url,
            api_key_id,
            created_at: today_string(),
        }
    }
}

impl ApiKey {
    pub fn new(name: String, key: String, is_active: bool) -> Self {
        Self {
            id: generate_id(),
            name,
            key,
            created_at: today_string(),
            last_used: None,
            is_active,
        }
    }
}

impl Bookmark {
    pub fn new(title: String, url: String, tags: Vec<String>) -> Self {
        Self {
            id: generate_id(),
            title,
            url,
            tags: normalize_tags(tags.iter().map(String::as_str)),
            created_at: today_string(),
        }
    }
}

/// Generate a record id: base-36 millisecond timestamp plus a base-36
/// random suffix. Collision-resistant for a single-user vault, not
/// cryptographic.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let noise: u64 = rand::thread_rng().gen();
    format!("{}{}", to_base36(millis), to_base36(noise as u128))
}

/// Current calendar date as a plain `YYYY-MM-DD` string.
pub fn today_string() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Trim surrounding whitespace from each tag and drop the empty ones,
/// preserving order and duplicates.
pub fn normalize_tags<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    raw.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut encoded = String::new();
    loop {
        encoded.insert(0, DIGITS[(value % 36) as usize] as char);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_non_empty() {
        let ids: Vec<String> = (0..64).map(|_| generate_id()).collect();
        for id in &ids {
            assert!(!id.is_empty());
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn today_string_is_a_calendar_date() {
        let today = today_string();
        assert_eq!(today.len(), 10);
        assert_eq!(&today[4..5], "-");
        assert_eq!(&today[7..8], "-");
    }

    #[test]
    fn new_records_get_id_and_creation_date() {
        let app = App::new("ChatGPT".into(), "OpenAI Assistant".into(), None, None);
        assert!(!app.id.is_empty());
        assert_eq!(app.created_at, today_string());

        let key = ApiKey::new("OpenAI Key".into(), "sk-test".into(), true);
        assert!(key.last_used.is_none());
        assert!(key.is_active);
    }

    #[test]
    fn bookmark_tags_are_trimmed_and_emptied() {
        let bookmark = Bookmark::new(
            "Docs".into(),
            "https://docs.example.com".into(),
            vec![" api ".into(), "".into(), "  ".into(), "rest".into()],
        );
        assert_eq!(bookmark.tags, vec!["api".to_string(), "rest".to_string()]);
    }

    #[test]
    fn base36_encodes_small_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
