//! Catalog feed loader.
//!
//! Reads a NASA image-library style JSON document and turns it into a
//! [`Catalog`]. Only the first `data` element of every item is used, and
//! only `href`/`render` of its links.
//!
//! ```json
//! { "collection": { "items": [
//!     { "data": [ { "title": "...", "media_type": "image",
//!                   "date_created": "...", "description": "..." } ],
//!       "links": [ { "href": "https://...", "render": "image" } ] }
//! ] } }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use space_search_core::catalog::{Catalog, FeedLink, FeedRecord};

#[derive(Debug, Deserialize, Default)]
struct FeedDocument {
    #[serde(default)]
    collection: FeedCollection,
}

#[derive(Debug, Deserialize, Default)]
struct FeedCollection {
    #[serde(default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    data: Vec<FeedData>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize, Default, Clone)]
struct FeedData {
    title: Option<String>,
    media_type: Option<String>,
    date_created: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    href: Option<String>,
    render: Option<String>,
}

impl From<FeedItem> for FeedRecord {
    fn from(item: FeedItem) -> Self {
        let data = item.data.into_iter().next().unwrap_or_default();
        FeedRecord {
            title: data.title,
            kind: data.media_type,
            created_date: data.date_created,
            description: data.description,
            links: item
                .links
                .into_iter()
                .map(|l| FeedLink {
                    href: l.href,
                    render: l.render,
                })
                .collect(),
        }
    }
}

/// Parses a feed document from a JSON string.
pub fn parse_feed(json: &str) -> Result<Catalog> {
    let doc: FeedDocument = serde_json::from_str(json).context("Failed to parse catalog feed")?;
    Ok(Catalog::load(
        doc.collection.items.into_iter().map(FeedRecord::from),
    ))
}

/// Reads and parses the feed at `path`.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog feed: {}", path.display()))?;
    let catalog = parse_feed(&content)?;
    tracing::info!(items = catalog.len(), path = %path.display(), "catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
      "collection": {
        "items": [
          {
            "data": [{
              "title": "Mars Rover",
              "media_type": "image",
              "date_created": "2012-08-06T00:00:00Z",
              "description": "red planet"
            }],
            "links": [
              {"href": "https://images.example/mars.jpg", "rel": "preview", "render": "image"}
            ]
          },
          {
            "data": [{"title": "Saturn", "description": "rings"}],
            "links": [{"href": "https://images.example/saturn.srt", "rel": "captions"}]
          },
          { "links": [] }
        ]
      }
    }"#;

    #[test]
    fn test_parse_feed_maps_records() {
        let catalog = parse_feed(FEED).unwrap();
        assert_eq!(catalog.len(), 3);

        let mars = &catalog.all()[0];
        assert_eq!(mars.id, 1);
        assert_eq!(mars.name, "Mars Rover");
        assert_eq!(mars.kind, "image");
        assert_eq!(mars.created_date, "2012-08-06T00:00:00Z");
        assert_eq!(
            mars.image_url.as_deref(),
            Some("https://images.example/mars.jpg")
        );

        let saturn = &catalog.all()[1];
        assert_eq!(saturn.kind, "unknown");
        assert_eq!(saturn.image_url, None);

        let empty = &catalog.all()[2];
        assert_eq!(empty.id, 3);
        assert_eq!(empty.name, "");
    }

    #[test]
    fn test_bundled_sample_feed_parses() {
        let catalog = parse_feed(include_str!("../data/mock_data.json")).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(3).unwrap().kind, "video");
        assert_eq!(catalog.get(3).unwrap().image_url, None);
        assert!(catalog.all().iter().all(|i| i.status == "Active"));
    }

    #[test]
    fn test_parse_feed_without_collection_is_empty() {
        assert!(parse_feed("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_feed_rejects_invalid_json() {
        assert!(parse_feed("{ not json").is_err());
    }
}
