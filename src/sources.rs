//! `space sources`: page through the raw catalog.

use anyhow::Result;

use crate::service::SpaceSearch;

pub fn list_sources(service: &SpaceSearch, page: Option<usize>, limit: Option<usize>) -> Result<()> {
    let page = service.sources(page, limit)?;

    println!("{:<6} {:<10} {:<12} NAME", "ID", "TYPE", "STATUS");
    for item in &page.items {
        println!("{:<6} {:<10} {:<12} {}", item.id, item.kind, item.status, item.name);
    }
    println!();
    println!(
        "{} of {} item(s), page {}{}",
        page.returned_count,
        page.total_items,
        page.page,
        if page.has_more { ", more available" } else { "" }
    );

    Ok(())
}
