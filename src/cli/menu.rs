// src/cli/menu.rs
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use inquire::{Password, PasswordDisplayMode, Select, Text};

use crate::auth::{AuthError, AuthManager};
use crate::cli::commands::ExportFormat;
use crate::cli::handlers;
use crate::store::VaultStore;

/// Interactive mode: PIN unlock, then a menu loop that re-locks after the
/// configured idle timeout.
pub fn run_menu(
    store: &VaultStore,
    auth: &AuthManager,
    session_timeout_minutes: u64,
) -> Result<()> {
    println!("🔐 Welcome to");
    println!("╔══════════════════════════════════════╗");
    println!("║          🔐 AIVAULT MANAGER          ║");
    println!("╚══════════════════════════════════════╝");

    if !unlock(auth)? {
        return Ok(());
    }
    if auth.uses_default_pin()? {
        println!("⚠️ The vault still uses the default PIN. Change it with the menu or `set-pin`.");
    }

    let mut idle = IdleTimer::new(Duration::from_secs(session_timeout_minutes * 60));

    loop {
        let options = vec![
            "1️⃣  List records",
            "2️⃣  Add a record",
            "🔍  Show record details",
            "✏️  Edit a record",
            "🗑️  Delete a record",
            "📤  Export vault",
            "📥  Import vault",
            "📋  Write CSV template",
            "🔁  Change PIN",
            "❌  Exit",
        ];

        let selection = Select::new("Choose an option:", options)
            .with_help_message("Use arrow keys to navigate, Enter to select")
            .with_page_size(50)
            .prompt_skippable()?;

        // Esc and Exit leave without touching the vault.
        let Some(selection) = selection else {
            break;
        };
        if selection == "❌  Exit" {
            break;
        }

        // Idle time includes time parked at the menu prompt.
        if idle.expired() {
            println!("🔒 Session expired, the vault is locked again.");
            if !unlock(auth)? {
                return Ok(());
            }
        }

        let outcome = match selection {
            "1️⃣  List records" => handlers::handle_list(store, None),
            "2️⃣  Add a record" => handlers::handle_add(store),
            "🔍  Show record details" => show_flow(store),
            "✏️  Edit a record" => edit_flow(store),
            "🗑️  Delete a record" => delete_flow(store),
            "📤  Export vault" => export_flow(store),
            "📥  Import vault" => import_flow(store),
            "📋  Write CSV template" => template_flow(),
            "🔁  Change PIN" => handlers::handle_set_pin(auth),
            _ => Ok(()),
        };

        if let Err(err) = outcome {
            println!("❌ {err:#}");
        }

        idle.touch();
    }

    println!("👋 Goodbye");
    Ok(())
}

// Tracks menu inactivity: `expired` is consulted once a selection comes
// back, `touch` marks the end of a completed action.
struct IdleTimer {
    timeout: Duration,
    last_activity: Instant,
}

impl IdleTimer {
    fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_activity: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.last_activity.elapsed() >= self.timeout
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

// Prompt for the PIN until it matches or a lockout starts. Returns false
// when locked out.
fn unlock(auth: &AuthManager) -> Result<bool> {
    loop {
        let pin = Password::new("Enter your PIN:")
            .with_display_mode(PasswordDisplayMode::Hidden)
            .without_confirmation()
            .prompt()?;

        match auth.verify_pin(&pin) {
            Ok(()) => {
                println!("✅ Vault unlocked");
                return Ok(true);
            }
            Err(AuthError::InvalidPin { attempts_remaining }) => {
                println!("❌ Invalid PIN, {attempts_remaining} attempts remaining");
            }
            Err(AuthError::LockedOut { seconds }) => {
                println!("🔒 Too many failed attempts, locked for {seconds}s");
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn show_flow(store: &VaultStore) -> Result<()> {
    if let Some(id) = select_record_id(store, "Select a record to show:")? {
        handlers::handle_show(store, &id)?;
        let _ = Text::new("Press enter to continue...").prompt();
    }
    Ok(())
}

fn edit_flow(store: &VaultStore) -> Result<()> {
    if let Some(id) = select_record_id(store, "Select a record to edit:")? {
        handlers::handle_edit(store, &id)?;
    }
    Ok(())
}

fn delete_flow(store: &VaultStore) -> Result<()> {
    if let Some(id) = select_record_id(store, "Select a record to delete:")? {
        handlers::handle_delete(store, &id, false)?;
    }
    Ok(())
}

fn export_flow(store: &VaultStore) -> Result<()> {
    let formats = vec!["JSON (lossless)", "CSV (tabular)", "Markdown (report)"];
    let selection = Select::new("Export format:", formats).prompt()?;
    let format = match selection {
        "CSV (tabular)" => ExportFormat::Csv,
        "Markdown (report)" => ExportFormat::Markdown,
        _ => ExportFormat::Json,
    };

    let default_name = handlers::default_export_name(format);
    let path = Text::new("Write to file:").with_default(&default_name).prompt()?;

    handlers::handle_export(store, format, Some(Path::new(path.trim())))
}

fn import_flow(store: &VaultStore) -> Result<()> {
    let path = Text::new("Enter the .json or .csv file path:").prompt()?;
    let path = path.trim();
    if !Path::new(path).exists() {
        println!("❌ File not found: {path}");
        return Ok(());
    }
    handlers::handle_import(store, Path::new(path), false, false)
}

fn template_flow() -> Result<()> {
    let path = Text::new("Write template to:")
        .with_default("aivault-import-template.csv")
        .prompt()?;
    handlers::handle_template(Some(Path::new(path.trim())))
}

// Pick any record from the vault, returning its id.
fn select_record_id(store: &VaultStore, prompt: &str) -> Result<Option<String>> {
    let data = store.load()?;
    if data.is_empty() {
        println!("❗ The vault is empty.");
        return Ok(None);
    }

    let mut labels = Vec::new();
    let mut ids = Vec::new();
    for app in &data.applications {
        labels.push(format!("🤖 {} ({})", app.name, app.id));
        ids.push(app.id.clone());
    }
    for key in &data.api_keys {
        labels.push(format!("🔑 {} ({})", key.name, key.id));
        ids.push(key.id.clone());
    }
    for bookmark in &data.bookmarks {
        labels.push(format!("🔖 {} ({})", bookmark.title, bookmark.id));
        ids.push(bookmark.id.clone());
    }

    let selection = Select::new(prompt, labels.clone())
        .with_page_size(50)
        .prompt()?;

    match labels.iter().position(|label| label == &selection) {
        Some(index) => Ok(Some(ids[index].clone())),
        None => Ok(None),
    }
}
