//! `space history`: inspect and prune the persisted search history.

use anyhow::{bail, Result};
use chrono::DateTime;

use crate::service::SpaceSearch;

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn list_history(
    service: &SpaceSearch,
    page: Option<usize>,
    page_size: Option<usize>,
) -> Result<()> {
    let page = service.history(page, page_size, None)?;

    if page.items.is_empty() {
        println!("No search history.");
        return Ok(());
    }

    println!("{:<36}  {:<23}  {:>7}  QUERY", "ID", "SEARCHED", "RESULTS");
    for entry in &page.items {
        println!(
            "{:<36}  {:<23}  {:>7}  {}",
            entry.id,
            format_timestamp(entry.timestamp_millis),
            entry.result_count,
            entry.query
        );
    }
    println!();
    println!(
        "page {} of {} ({} entries)",
        page.page, page.total_pages, page.total_items
    );

    Ok(())
}

pub fn show_history(service: &SpaceSearch, id: &str) -> Result<()> {
    let entry = service.history_entry(id, None)?;

    println!("query:    {}", entry.query);
    println!("searched: {}", format_timestamp(entry.timestamp_millis));
    println!("results:  {}", entry.result_count);
    println!();
    for (i, item) in entry.results.iter().enumerate() {
        let confidence = entry.confidence_scores.get(&item.id).copied().unwrap_or(0.0);
        println!("{}. [{:.2}] {} ({})", i + 1, confidence, item.name, item.kind);
    }

    Ok(())
}

pub fn delete_history(service: &SpaceSearch, id: &str) -> Result<()> {
    if !service.delete_history(id, None)? {
        bail!("search history item not found: {}", id);
    }
    println!("Deleted {}", id);
    Ok(())
}

pub fn clear_history(service: &SpaceSearch) -> Result<()> {
    let removed = service.history_store().len();
    service.clear_history(None)?;
    println!("Cleared {} history entries.", removed);
    Ok(())
}
