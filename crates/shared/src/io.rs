use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::Item;

/// Load the items file. Missing file and empty list are both fatal
/// configuration errors.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    if !path.exists() {
        anyhow::bail!("Items file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read items file: {}", path.display()))?;

    let items: Vec<Item> = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse items JSON from {}. Expected an array of {{title, url, subtitle, impact}} objects.",
            path.display()
        )
    })?;

    if items.is_empty() {
        anyhow::bail!("Items file {} contains no items.", path.display());
    }

    Ok(items)
}

/// Save an item list as pretty-printed JSON.
pub fn save_items(items: &[Item], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(items).context("Failed to serialize items")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write items file: {}", path.display()))?;
    Ok(())
}

/// Feed list file: one URL per line; blank lines and `#` comments ignored.
pub fn read_feed_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed list: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Screenshot filename for the 1-based item index: `shot_01.png`, ...
pub fn shot_filename(index: usize) -> String {
    format!("shot_{:02}.png", index)
}

/// Story filename for the 1-based item index: `story_01.png`, ...
pub fn story_filename(index: usize) -> String {
    format!("story_{:02}.png", index)
}
