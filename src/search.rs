//! `space search`: ranked search from the command line.

use anyhow::Result;

use crate::service::{SearchRequest, SpaceSearch};

pub fn run_search(
    service: &SpaceSearch,
    query: &str,
    page: Option<usize>,
    page_size: Option<usize>,
    no_history: bool,
) -> Result<()> {
    let req = SearchRequest {
        query: query.to_string(),
        page,
        page_size,
        skip_history: no_history,
    };
    let resp = service.search(&req, None)?;

    if resp.results.is_empty() {
        println!("No results.");
    }

    let offset = space_search_core::models::page_offset(resp.page, resp.page_size);
    for (i, item) in resp.results.iter().enumerate() {
        let confidence = resp.confidence_scores.get(&item.id).copied().unwrap_or(0.0);
        println!("{}. [{:.2}] {} ({})", offset + i + 1, confidence, item.name, item.kind);
        if !item.created_date.is_empty() {
            println!("    launched: {}", item.created_date);
        }
        if let Some(ref url) = item.image_url {
            println!("    image: {}", url);
        }
        println!("    id: {}", item.id);
        println!();
    }

    println!(
        "{} match(es), page {} (size {}){}",
        resp.result_count,
        resp.page,
        resp.page_size,
        if resp.has_more { ", more available" } else { "" }
    );
    if let Some(id) = resp.history_id {
        println!("history: {}", id);
    }

    Ok(())
}
