//! Configuration persistence using toml_edit to preserve formatting and comments.

use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::{value, DocumentMut, Item, Table};

/// Update just the debrid api_key in the config file, creating it if missing.
///
/// An empty or `None` key removes the entry.
pub fn update_debrid_key(path: &Path, api_key: Option<&str>) -> Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if !doc.contains_table("debrid") {
        doc["debrid"] = Item::Table(Table::new());
    }

    match api_key.filter(|k| !k.is_empty()) {
        Some(key) => doc["debrid"]["api_key"] = value(key),
        None => {
            if let Some(table) = doc["debrid"].as_table_mut() {
                table.remove("api_key");
            }
        }
    }

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}
