//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use cipherdrive_entity::folder::FolderRow;
use cipherdrive_entity::item::Item;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Table row for an item.
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Starred")]
    pub starred: String,
    #[tabled(rename = "Folder")]
    pub folder: String,
    #[tabled(rename = "Modified")]
    pub modified: String,
}

impl ItemRow {
    /// Build a row from a cached item.
    pub fn from_item(item: &Item, selected: bool) -> Self {
        let marker = if selected { "* " } else { "" };
        Self {
            id: format!("{marker}{}", item.id),
            name: item.name.clone(),
            starred: if item.starred { "★" } else { "" }.to_string(),
            folder: item
                .parent_id
                .as_ref()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "-".to_string()),
            modified: item.last_modified.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Table row for a sidebar folder.
#[derive(Debug, Serialize, Tabled)]
pub struct FolderTableRow {
    #[tabled(rename = "Folder")]
    pub name: String,
    #[tabled(rename = "ID")]
    pub id: String,
}

impl From<&FolderRow> for FolderTableRow {
    fn from(row: &FolderRow) -> Self {
        let toggle = match (row.has_children, row.expanded) {
            (false, _) => "  ",
            (true, true) => "▾ ",
            (true, false) => "▸ ",
        };
        Self {
            name: format!("{}{toggle}{}", "  ".repeat(row.depth), row.name),
            id: row.id.to_string(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single value as JSON, or its debug form in table mode
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
