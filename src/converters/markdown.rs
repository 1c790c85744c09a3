// src/converters/markdown.rs
use chrono::Local;

use crate::models::VaultData;

/// Render the vault as a Markdown report: one section per record kind,
/// each a fixed-column table when the collection has entries and a
/// placeholder line when it does not. Key secrets are masked. Output only,
/// never parsed back.
pub fn to_markdown(data: &VaultData) -> String {
    let mut md = String::from("# AI & API Manager Export\n\n");
    md.push_str(&format!(
        "*Exported on {}*\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    md.push_str("## AI Applications\n\n");
    if !data.applications.is_empty() {
        md.push_str("| Name | Description | URL | API Key ID | Created |\n");
        md.push_str("|------|-------------|-----|------------|----------|\n");
        for app in &data.applications {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                app.name,
                app.description,
                app.url.as_deref().unwrap_or("N/A"),
                app.api_key_id.as_deref().unwrap_or("N/A"),
                app.created_at
            ));
        }
    } else {
        md.push_str("*No applications*\n");
    }
    md.push('\n');

    md.push_str("## API Keys\n\n");
    if !data.api_keys.is_empty() {
        md.push_str("| Name | Key | Status | Last Used | Created |\n");
        md.push_str("|------|-----|--------|-----------|----------|\n");
        for key in &data.api_keys {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                key.name,
                mask_key(&key.key),
                if key.is_active { "Active" } else { "Inactive" },
                key.last_used.as_deref().unwrap_or("Never"),
                key.created_at
            ));
        }
    } else {
        md.push_str("*No API keys*\n");
    }
    md.push('\n');

    md.push_str("## Bookmarks\n\n");
    if !data.bookmarks.is_empty() {
        md.push_str("| Title | URL | Tags | Created |\n");
        md.push_str("|-------|-----|------|----------|\n");
        for bookmark in &data.bookmarks {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                bookmark.title,
                bookmark.url,
                bookmark.tags.join(", "),
                bookmark.created_at
            ));
        }
    } else {
        md.push_str("*No bookmarks*\n");
    }

    md
}

/// Mask a key for display: first 8 characters, `...`, last 4 characters.
/// Short keys keep both halves anyway, which may overlap; the value is
/// for human eyes, not parsing.
pub fn mask_key(key: &str) -> String {
    let head: String = key.chars().take(8).collect();
    let total = key.chars().count();
    let tail: String = key.chars().skip(total.saturating_sub(4)).collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiKey, App, Bookmark};

    #[test]
    fn masks_all_but_head_and_tail() {
        assert_eq!(mask_key("sk-test-123456789012"), "sk-test-...9012");
        assert_eq!(mask_key("abcdefghijkl"), "abcdefgh...ijkl");
    }

    #[test]
    fn masks_short_keys_without_panicking() {
        assert_eq!(mask_key("abc"), "abc...abc");
        assert_eq!(mask_key(""), "...");
    }

    #[test]
    fn empty_vault_renders_placeholders() {
        let md = to_markdown(&VaultData::default());
        assert!(md.starts_with("# AI & API Manager Export\n\n*Exported on "));
        assert!(md.contains("## AI Applications\n\n*No applications*\n"));
        assert!(md.contains("## API Keys\n\n*No API keys*\n"));
        assert!(md.contains("## Bookmarks\n\n*No bookmarks*\n"));
    }

    #[test]
    fn populated_vault_renders_tables_with_masked_keys() {
        let data = VaultData {
            applications: vec![App {
                id: "a".into(),
                name: "ChatGPT".into(),
                description: "Assistant".into(),
                url: None,
                api_key_id: Some("key1".into()),
                created_at: "2024-01-01".into(),
            }],
            api_keys: vec![ApiKey {
                id: "key1".into(),
                name: "OpenAI Key".into(),
                key: "sk-test-123456789012".into(),
                created_at: "2024-01-01".into(),
                last_used: None,
                is_active: false,
            }],
            bookmarks: vec![Bookmark {
                id: "b".into(),
                title: "Docs".into(),
                url: "https://docs.example.com".into(),
                tags: vec!["api".into(), "docs".into()],
                created_at: "2024-01-01".into(),
            }],
        };

        let md = to_markdown(&data);
        assert!(md.contains("| ChatGPT | Assistant | N/A | key1 | 2024-01-01 |"));
        assert!(md.contains("| OpenAI Key | sk-test-...9012 | Inactive | Never | 2024-01-01 |"));
        assert!(md.contains("| Docs | https://docs.example.com | api, docs | 2024-01-01 |"));
        // The raw secret never appears in the report.
        assert!(!md.contains("sk-test-123456789012"));
    }
}
