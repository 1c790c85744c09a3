// src/cli/handlers.rs
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use log::info;

use crate::auth::AuthManager;
use crate::cli::commands::{CliCommand, ExportFormat, RecordKind};
use crate::converters::{self, mask_key, ParseMode, CSV_TEMPLATE};
use crate::models::{normalize_tags, today_string, ApiKey, App, Bookmark, VaultData};
use crate::store::VaultStore;

/// Execute one subcommand. Everything except `template` and `set-pin`
/// asks for the PIN first (`set-pin` verifies the current PIN itself).
pub fn run_command(command: CliCommand, store: &VaultStore, auth: &AuthManager) -> Result<()> {
    if !matches!(
        command,
        CliCommand::Template { .. } | CliCommand::SetPin
    ) {
        require_pin(auth)?;
    }

    match command {
        CliCommand::List { kind } => handle_list(store, kind),
        CliCommand::Add => handle_add(store),
        CliCommand::Show { id } => handle_show(store, &id),
        CliCommand::Edit { id } => handle_edit(store, &id),
        CliCommand::Delete { id, yes } => handle_delete(store, &id, yes),
        CliCommand::Export { format, out } => handle_export(store, format, out.as_deref()),
        CliCommand::Import { file, strict, yes } => handle_import(store, &file, strict, yes),
        CliCommand::Template { out } => handle_template(out.as_deref()),
        CliCommand::SetPin => handle_set_pin(auth),
    }
}

// Single PIN prompt for one-shot commands
fn require_pin(auth: &AuthManager) -> Result<()> {
    let pin = Password::new("Enter your PIN:")
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()?;
    auth.verify_pin(&pin)?;
    Ok(())
}

pub fn handle_list(store: &VaultStore, kind: Option<RecordKind>) -> Result<()> {
    let data = store.load()?;
    let wanted = |k: RecordKind| kind.map_or(true, |selected| selected == k);

    if wanted(RecordKind::Apps) {
        println!(
            "{}",
            style(format!("🤖 AI Applications ({})", data.applications.len()))
                .cyan()
                .bold()
        );
        if data.applications.is_empty() {
            println!("  (none)");
        } else {
            println!(
                "  {:<22} {:<24} {:<32} {:<10} {}",
                "ID", "Name", "URL", "Linked Key", "Created"
            );
            for app in &data.applications {
                println!(
                    "  {:<22} {:<24} {:<32} {:<10} {}",
                    app.id,
                    app.name,
                    app.url.as_deref().unwrap_or("-"),
                    if app.api_key_id.is_some() { "yes" } else { "-" },
                    app.created_at
                );
            }
        }
        println!();
    }

    if wanted(RecordKind::Keys) {
        println!(
            "{}",
            style(format!("🔑 API Keys ({})", data.api_keys.len()))
                .cyan()
                .bold()
        );
        if data.api_keys.is_empty() {
            println!("  (none)");
        } else {
            println!(
                "  {:<22} {:<24} {:<24} {:<10} {:<12} {}",
                "ID", "Name", "Key", "Status", "Last Used", "Created"
            );
            for key in &data.api_keys {
                // Listings never show the raw secret, only the mask.
                println!(
                    "  {:<22} {:<24} {:<24} {:<10} {:<12} {}",
                    key.id,
                    key.name,
                    mask_key(&key.key),
                    if key.is_active { "Active" } else { "Inactive" },
                    key.last_used.as_deref().unwrap_or("Never"),
                    key.created_at
                );
            }
        }
        println!();
    }

    if wanted(RecordKind::Bookmarks) {
        println!(
            "{}",
            style(format!("🔖 Bookmarks ({})", data.bookmarks.len()))
                .cyan()
                .bold()
        );
        if data.bookmarks.is_empty() {
            println!("  (none)");
        } else {
            println!(
                "  {:<22} {:<24} {:<32} {:<24} {}",
                "ID", "Title", "URL", "Tags", "Created"
            );
            for bookmark in &data.bookmarks {
                println!(
                    "  {:<22} {:<24} {:<32} {:<24} {}",
                    bookmark.id,
                    bookmark.title,
                    bookmark.url,
                    bookmark.tags.join(", "),
                    bookmark.created_at
                );
            }
        }
        println!();
    }

    Ok(())
}

pub fn handle_add(store: &VaultStore) -> Result<()> {
    let options = vec!["🤖 Application", "🔑 API Key", "🔖 Bookmark"];
    let selection = Select::new("What do you want to add?", options).prompt()?;

    match selection {
        "🤖 Application" => {
            let name = Text::new("Name:").prompt()?;
            let description = Text::new("Description:").prompt()?;
            let url = non_blank(Text::new("URL (optional):").prompt()?);

            let data = store.load()?;
            let api_key_id = select_api_key_link(&data)?;

            let app = store.insert_app(App::new(name, description, url, api_key_id))?;
            println!("✅ Added application '{}' ({})", app.name, app.id);
        }
        "🔑 API Key" => {
            let name = Text::new("Name:").prompt()?;
            let key = Password::new("Key value:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()?;
            let is_active = Confirm::new("Is the key active?")
                .with_default(true)
                .prompt()?;

            let key = store.insert_api_key(ApiKey::new(name, key, is_active))?;
            println!("✅ Added API key '{}' ({})", key.name, key.id);
        }
        "🔖 Bookmark" => {
            let title = Text::new("Title:").prompt()?;
            let url = Text::new("URL:").prompt()?.trim().to_string();
            let tags = Text::new("Tags (comma-separated, optional):").prompt()?;
            let tags = normalize_tags(tags.split(','));

            let bookmark = store.insert_bookmark(Bookmark::new(title, url, tags))?;
            println!("✅ Added bookmark '{}' ({})", bookmark.title, bookmark.id);
        }
        _ => {}
    }

    Ok(())
}

pub fn handle_show(store: &VaultStore, id: &str) -> Result<()> {
    let data = store.load()?;

    if let Some(app) = data.applications.iter().find(|a| a.id == id) {
        println!("\n🤖 Application Details");
        println!("ID: {}", app.id);
        println!("Name: {}", app.name);
        println!("Description: {}", app.description);
        println!("URL: {}", app.url.as_deref().unwrap_or("N/A"));
        match &app.api_key_id {
            Some(key_id) => {
                let name = data
                    .api_keys
                    .iter()
                    .find(|k| &k.id == key_id)
                    .map(|k| k.name.as_str())
                    .unwrap_or("unknown");
                println!("Linked API key: {} ({})", name, key_id);
            }
            None => println!("Linked API key: none"),
        }
        println!("Created: {}", app.created_at);
    } else if let Some(key) = data.api_keys.iter().find(|k| k.id == id) {
        println!("\n🔑 API Key Details");
        println!("ID: {}", key.id);
        println!("Name: {}", key.name);
        println!("Key: {}", key.key);
        println!(
            "Status: {}",
            if key.is_active { "Active" } else { "Inactive" }
        );
        println!("Last used: {}", key.last_used.as_deref().unwrap_or("Never"));
        println!("Created: {}", key.created_at);
    } else if let Some(bookmark) = data.bookmarks.iter().find(|b| b.id == id) {
        println!("\n🔖 Bookmark Details");
        println!("ID: {}", bookmark.id);
        println!("Title: {}", bookmark.title);
        println!("URL: {}", bookmark.url);
        println!("Tags: {}", bookmark.tags.join(", "));
        println!("Created: {}", bookmark.created_at);
    } else {
        bail!("No record with id {id}");
    }

    Ok(())
}

pub fn handle_edit(store: &VaultStore, id: &str) -> Result<()> {
    let data = store.load()?;

    if let Some(app) = data.applications.iter().find(|a| a.id == id).cloned() {
        let name = Text::new("Name:").with_default(&app.name).prompt()?;
        let description = Text::new("Description:")
            .with_default(&app.description)
            .prompt()?;
        let url = non_blank(
            Text::new("URL (empty for none):")
                .with_default(app.url.as_deref().unwrap_or(""))
                .prompt()?,
        );

        let api_key_id = if Confirm::new("Change the linked API key?")
            .with_default(false)
            .prompt()?
        {
            select_api_key_link(&data)?
        } else {
            app.api_key_id.clone()
        };

        let mut updated = app;
        updated.name = name;
        updated.description = description;
        updated.url = url;
        updated.api_key_id = api_key_id;
        store.update_app(id, updated)?;
        println!("✅ Application updated");
    } else if let Some(key) = data.api_keys.iter().find(|k| k.id == id).cloned() {
        let name = Text::new("Name:").with_default(&key.name).prompt()?;
        let value = Text::new("Key value:").with_default(&key.key).prompt()?;
        let is_active = Confirm::new("Is the key active?")
            .with_default(key.is_active)
            .prompt()?;
        let last_used = non_blank(
            Text::new("Last used (YYYY-MM-DD, empty for never):")
                .with_default(key.last_used.as_deref().unwrap_or(""))
                .prompt()?,
        );

        let mut updated = key;
        updated.name = name;
        updated.key = value;
        updated.is_active = is_active;
        updated.last_used = last_used;
        store.update_api_key(id, updated)?;
        println!("✅ API key updated");
    } else if let Some(bookmark) = data.bookmarks.iter().find(|b| b.id == id).cloned() {
        let title = Text::new("Title:").with_default(&bookmark.title).prompt()?;
        let url = Text::new("URL:")
            .with_default(&bookmark.url)
            .prompt()?
            .trim()
            .to_string();
        let tags = Text::new("Tags (comma-separated):")
            .with_default(&bookmark.tags.join(", "))
            .prompt()?;

        let mut updated = bookmark;
        updated.title = title;
        updated.url = url;
        updated.tags = normalize_tags(tags.split(','));
        store.update_bookmark(id, updated)?;
        println!("✅ Bookmark updated");
    } else {
        bail!("No record with id {id}");
    }

    Ok(())
}

pub fn handle_delete(store: &VaultStore, id: &str, yes: bool) -> Result<()> {
    let data = store.load()?;

    let label = if let Some(app) = data.applications.iter().find(|a| a.id == id) {
        format!("application '{}'", app.name)
    } else if let Some(key) = data.api_keys.iter().find(|k| k.id == id) {
        format!("API key '{}'", key.name)
    } else if let Some(bookmark) = data.bookmarks.iter().find(|b| b.id == id) {
        format!("bookmark '{}'", bookmark.title)
    } else {
        bail!("No record with id {id}");
    };

    if !yes {
        let confirm = Confirm::new(&format!("Delete {label}?"))
            .with_default(false)
            .prompt()?;
        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if data.applications.iter().any(|a| a.id == id) {
        store.delete_app(id)?;
    } else if data.api_keys.iter().any(|k| k.id == id) {
        store.delete_api_key(id)?;
    } else {
        store.delete_bookmark(id)?;
    }
    println!("✅ Deleted {label}");
    Ok(())
}

/// Dated default filename for saved exports, matching the report kind.
pub fn default_export_name(format: ExportFormat) -> String {
    let extension = match format {
        ExportFormat::Json => "json",
        ExportFormat::Csv => "csv",
        ExportFormat::Markdown => "md",
    };
    format!("aivault-export-{}.{}", today_string(), extension)
}

pub fn handle_export(store: &VaultStore, format: ExportFormat, out: Option<&Path>) -> Result<()> {
    let data = store.load()?;
    let text = match format {
        ExportFormat::Json => converters::to_json(&data)?,
        ExportFormat::Csv => converters::to_csv(&data),
        ExportFormat::Markdown => converters::to_markdown(&data),
    };

    match out {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
            println!(
                "✅ Exported {} records to {}",
                data.record_count(),
                path.display()
            );
        }
        None => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

pub fn handle_import(store: &VaultStore, file: &Path, strict: bool, yes: bool) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let (data, skipped_rows) = match extension.as_str() {
        "json" => (converters::from_json(&content)?, Vec::new()),
        "csv" => {
            let mode = if strict {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            };
            let report = converters::parse_csv_with_mode(&content, mode)?;
            (report.data, report.skipped_rows)
        }
        other => bail!("Unsupported file format '{other}', use .json or .csv"),
    };

    if !skipped_rows.is_empty() {
        println!(
            "⚠️ Skipped {} malformed row(s): {}",
            skipped_rows.len(),
            skipped_rows
                .iter()
                .map(|row| row.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    println!(
        "Importing {} applications, {} API keys, {} bookmarks",
        data.applications.len(),
        data.api_keys.len(),
        data.bookmarks.len()
    );

    if !yes {
        let confirm = Confirm::new("This replaces every record in the vault. Continue?")
            .with_default(false)
            .prompt()?;
        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.replace_all(&data)?;
    info!(
        "Imported {} records from {}",
        data.record_count(),
        file.display()
    );
    println!("✅ Imported {} records", data.record_count());
    Ok(())
}

pub fn handle_template(out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, CSV_TEMPLATE)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("✅ Template written to {}", path.display());
        }
        None => println!("{CSV_TEMPLATE}"),
    }
    Ok(())
}

pub fn handle_set_pin(auth: &AuthManager) -> Result<()> {
    println!("🔐 Changing the vault PIN");
    let current = Password::new("Current PIN:")
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()?;
    let new_pin = Password::new("New PIN:")
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()?;
    let confirm = Password::new("Confirm new PIN:")
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()?;

    if new_pin != confirm {
        println!("❌ PINs do not match. PIN not changed.");
        return Ok(());
    }
    if new_pin.trim().is_empty() {
        println!("❌ PIN cannot be empty. PIN not changed.");
        return Ok(());
    }

    auth.change_pin(&current, &new_pin)?;
    println!("✅ PIN updated successfully!");
    Ok(())
}

// Whitespace-only input counts as absent; kept values are trimmed.
fn non_blank(raw: String) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Pick an API key to link an application to, or none
fn select_api_key_link(data: &VaultData) -> Result<Option<String>> {
    if data.api_keys.is_empty() {
        return Ok(None);
    }

    let mut options = vec!["[No linked key]".to_string()];
    options.extend(
        data.api_keys
            .iter()
            .map(|key| format!("{} ({})", key.name, key.id)),
    );

    let selection = Select::new("Link an API key:", options.clone())
        .with_page_size(50)
        .prompt()?;
    if selection == "[No linked key]" {
        return Ok(None);
    }

    let index = options.iter().position(|option| option == &selection);
    match index {
        // Offset by one for the leading none entry.
        Some(i) if i >= 1 => Ok(Some(data.api_keys[i - 1].id.clone())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_export_names_are_dated_per_format() {
        let expected_date = today_string();
        assert_eq!(
            default_export_name(ExportFormat::Json),
            format!("aivault-export-{expected_date}.json")
        );
        assert_eq!(
            default_export_name(ExportFormat::Csv),
            format!("aivault-export-{expected_date}.csv")
        );
        assert_eq!(
            default_export_name(ExportFormat::Markdown),
            format!("aivault-export-{expected_date}.md")
        );
    }

    #[test]
    fn blank_optional_input_is_absent() {
        assert_eq!(non_blank(String::new()), None);
        assert_eq!(non_blank("   ".into()), None);
    }

    #[test]
    fn padded_optional_input_is_trimmed() {
        assert_eq!(
            non_blank(" https://x ".into()),
            Some("https://x".to_string())
        );
    }
}
