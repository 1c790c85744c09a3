// src/converters/csv.rs
use crate::converters::{ConvertError, Result};
use crate::models::{generate_id, normalize_tags, today_string, ApiKey, App, Bookmark, VaultData};

/// Column order of the tabular format. The parser never inspects header
/// text, only its field count, so documents with decorated header labels
/// still import.
pub const CSV_HEADER: &str =
    "Type,Name,Description,URL,API Key ID,Tags,Key,Status,Last Used,Created";

/// Stored in place of an absent key value on import, so exports with
/// masked secrets keep round-tripping.
pub const MASKED_KEY_PLACEHOLDER: &str = "***************";

/// Sample import document: a fully quoted header, five example rows
/// covering the generic kinds plus free-text Type labels, and the import
/// rules as `#` comment lines. This exact text is part of the import
/// contract and must always parse.
pub const CSV_TEMPLATE: &str = r#""Type","Name","Description","URL","API Key ID","Tags","Key","Status","Last Used","Created"
"Application","Sample App","This is a sample application","https://example.com","","",,,,"2024-01-01"
"API Key","Sample Key","","","","","sk_test_123456","Active",,"2024-01-01"
"Bookmark","Sample Bookmark","","https://docs.example.com","","documentation,reference,tutorial",,,,"2024-01-01"
"AI/LLM","OpenAI GPT-4","Advanced language model API","https://platform.openai.com/","sk-***************","ai,llm,gpt,language-model",,,,"2024-01-01"
"WordPress Theme","DIVI","Popular WordPress theme and page builder","https://www.elegantthemes.com/","***************","wordpress,theme,website-builder",,,,"2024-01-01"

# Instructions:
# - Type: Can be generic (Application, API Key, Bookmark) or specific (AI/LLM, WordPress Theme, etc.)
# - Name/Title: Required for all types
# - Description: Optional, recommended for Applications
# - URL: Optional for Applications, Required for Bookmarks
# - API Key ID: If present, will create both an App and linked API Key
# - Tags: Optional, comma-separated within quotes or pipe-separated
# - Key: For standalone API Keys only
# - Status: For API Keys (Active or Inactive)
# - Last Used: Optional, only for API Keys
# - Created: Optional, will use current date if not provided

# Import Notes:
# - Entries with API Key ID will create both an Application and a linked API Key
# - Custom types (like AI/LLM, WordPress Plugin) will be included in the description
# - Tags can be comma-separated (within quotes) or pipe-separated
# - Use quotes around ALL values to handle commas properly
# - Masked API keys (like ***************) are accepted"#;

/// Row-tolerance policy for [`parse_csv_with_mode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Drop rows with fewer fields than the header, reporting their
    /// indices. This is the historical import behavior.
    #[default]
    Lenient,
    /// Abort on the first short row.
    Strict,
}

/// Outcome of a tabular parse: the reconstructed collections plus the
/// 1-based indices of the data rows dropped under [`ParseMode::Lenient`].
#[derive(Debug, Clone, Default)]
pub struct CsvImportReport {
    pub data: VaultData,
    pub skipped_rows: Vec<usize>,
}

/// Serialize the three collections into the flat tabular form, one row per
/// record, with unused columns left empty.
pub fn to_csv(data: &VaultData) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for app in &data.applications {
        let row = [
            "Application".to_string(),
            escape_field(&app.name),
            escape_field(&app.description),
            escape_field(app.url.as_deref().unwrap_or("")),
            escape_field(app.api_key_id.as_deref().unwrap_or("")),
            String::new(), // Tags
            String::new(), // Key
            String::new(), // Status
            String::new(), // Last Used
            escape_field(&app.created_at),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    for key in &data.api_keys {
        let row = [
            "API Key".to_string(),
            escape_field(&key.name),
            String::new(), // Description
            String::new(), // URL
            String::new(), // API Key ID
            String::new(), // Tags
            escape_field(&key.key),
            if key.is_active { "Active" } else { "Inactive" }.to_string(),
            escape_field(key.last_used.as_deref().unwrap_or("")),
            escape_field(&key.created_at),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    for bookmark in &data.bookmarks {
        let row = [
            "Bookmark".to_string(),
            escape_field(&bookmark.title),
            String::new(), // Description
            escape_field(&bookmark.url),
            String::new(), // API Key ID
            escape_field(&bookmark.tags.join("|")),
            String::new(), // Key
            String::new(), // Status
            String::new(), // Last Used
            escape_field(&bookmark.created_at),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Parse tabular text leniently, discarding the row diagnostics.
pub fn parse_csv(text: &str) -> Result<VaultData> {
    parse_csv_with_mode(text, ParseMode::Lenient).map(|report| report.data)
}

/// Parse tabular text back into the three collections.
///
/// Blank lines and `#` comment lines are dropped before the first
/// remaining line is consumed as the header. Each data row is classified
/// by its Type column; anything that is not an API key or bookmark becomes
/// an App, keeping unrecognized labels as a description prefix.
pub fn parse_csv_with_mode(text: &str, mode: ParseMode) -> Result<CsvImportReport> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .collect();

    let header = lines.first().ok_or(ConvertError::MissingHeader)?;
    let column_count = parse_csv_line(header).len();

    let mut report = CsvImportReport::default();

    for (index, line) in lines.iter().skip(1).enumerate() {
        let row_number = index + 1;
        let fields = parse_csv_line(line);
        if fields.len() < column_count {
            match mode {
                ParseMode::Lenient => {
                    report.skipped_rows.push(row_number);
                    continue;
                }
                ParseMode::Strict => {
                    return Err(ConvertError::MalformedRow {
                        row: row_number,
                        expected: column_count,
                        found: fields.len(),
                    });
                }
            }
        }

        let row = CsvRow::from_fields(&fields);
        match classify_type(row.kind) {
            RowKind::ApiKey => report.data.api_keys.push(build_api_key(&row)),
            RowKind::Bookmark => report.data.bookmarks.push(build_bookmark(&row)),
            RowKind::Application { label } => {
                let (app, synthesized) = build_application(&row, label);
                if let Some(key) = synthesized {
                    report.data.api_keys.push(key);
                }
                report.data.applications.push(app);
            }
        }
    }

    Ok(report)
}

/// One tokenized data row. Columns beyond the fields actually present
/// default to empty, so documents narrower than ten columns still map.
struct CsvRow<'a> {
    kind: &'a str,
    name: &'a str,
    description: &'a str,
    url: &'a str,
    api_key_id: &'a str,
    tags: &'a str,
    key: &'a str,
    status: &'a str,
    last_used: &'a str,
    created: &'a str,
}

impl<'a> CsvRow<'a> {
    fn from_fields(fields: &'a [String]) -> Self {
        let column = |index: usize| fields.get(index).map(String::as_str).unwrap_or("");
        Self {
            kind: column(0),
            name: column(1),
            description: column(2),
            url: column(3),
            api_key_id: column(4),
            tags: column(5),
            key: column(6),
            status: column(7),
            last_used: column(8),
            created: column(9),
        }
    }

    fn created_at(&self) -> String {
        if self.created.is_empty() {
            today_string()
        } else {
            self.created.to_string()
        }
    }
}

/// Classification of a row by its Type column, case-insensitive. Anything
/// that is not one of the two reserved kinds falls back to Application,
/// carrying the free-text label when there is one to preserve.
enum RowKind<'a> {
    ApiKey,
    Bookmark,
    Application { label: Option<&'a str> },
}

fn classify_type(raw: &str) -> RowKind<'_> {
    match raw.to_lowercase().as_str() {
        "api key" => RowKind::ApiKey,
        "bookmark" => RowKind::Bookmark,
        "application" | "" => RowKind::Application { label: None },
        _ => RowKind::Application { label: Some(raw) },
    }
}

fn build_api_key(row: &CsvRow) -> ApiKey {
    let key = if row.key.is_empty() {
        MASKED_KEY_PLACEHOLDER.to_string()
    } else {
        row.key.to_string()
    };
    ApiKey {
        id: generate_id(),
        name: row.name.to_string(),
        key,
        created_at: row.created_at(),
        last_used: non_empty(row.last_used),
        is_active: row.status.is_empty() || row.status.to_lowercase() == "active",
    }
}

fn build_bookmark(row: &CsvRow) -> Bookmark {
    // Pipe is the canonical export delimiter; plain commas are accepted
    // for hand-authored documents.
    let tags = if row.tags.contains('|') {
        normalize_tags(row.tags.split('|'))
    } else {
        normalize_tags(row.tags.split(','))
    };
    Bookmark {
        id: generate_id(),
        title: row.name.to_string(),
        url: row.url.to_string(),
        tags,
        created_at: row.created_at(),
    }
}

fn build_application(row: &CsvRow, label: Option<&str>) -> (App, Option<ApiKey>) {
    // A free-text Type label has no field of its own, so it survives as a
    // description prefix.
    let description = match label {
        Some(label) => format!("{}: {}", label, row.description).trim().to_string(),
        None => row.description.to_string(),
    };

    // A key value in the Application row (masked or not) materializes a
    // linked ApiKey record alongside the App.
    let (api_key_id, synthesized) = if row.api_key_id.is_empty() {
        (None, None)
    } else {
        let key = ApiKey {
            id: generate_id(),
            name: format!("{} API Key", row.name),
            key: row.api_key_id.to_string(),
            created_at: row.created_at(),
            last_used: None,
            is_active: true,
        };
        (Some(key.id.clone()), Some(key))
    };

    let app = App {
        id: generate_id(),
        name: row.name.to_string(),
        description,
        url: non_empty(row.url),
        api_key_id,
        created_at: row.created_at(),
    };
    (app, synthesized)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Split one line into fields with CSV quoting semantics: a doubled quote
/// inside a quoted field is a literal quote, and commas separate fields
/// only outside quotes. Every emitted field is trimmed.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields
        .into_iter()
        .map(|field| field.trim().to_string())
        .collect()
}

fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('\n') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
