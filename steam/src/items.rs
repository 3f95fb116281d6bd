use crate::{Config, HttpClient, Result};
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Drops repeated names, keeping the first occurrence of each.
pub fn dedupe<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Reads one item name per line. A missing file reads as no items.
pub fn read_items_file(path: &Path) -> Result<Vec<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(dedupe(
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from),
    ))
}

/// The item list comes from the items file, or the Steam inventory when the file gives
/// no items.
pub(crate) async fn load_items(config: &Config, http: &HttpClient) -> Result<Vec<String>> {
    let items = read_items_file(&config.items_file)?;
    if !items.is_empty() {
        info!("Loaded {} items from {}", items.len(), config.items_file.display());
        return Ok(items);
    }

    let Some(steam_id) = config.steam_id.as_deref() else {
        warn!(
            "No items in {} and STEAM_ID64 is not set",
            config.items_file.display()
        );
        return Ok(Vec::new());
    };

    match http.fetch_inventory(steam_id).await {
        Ok(inventory) => {
            let items = inventory.marketable_names();
            info!("Loaded {} marketable items from Steam inventory", items.len());
            Ok(items)
        }
        Err(e) => {
            warn!("Failed to fetch inventory for {steam_id}: {e}");
            Ok(Vec::new())
        }
    }
}
