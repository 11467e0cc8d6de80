//! Read-only media catalog.
//!
//! Built once at startup from an external feed and never mutated afterwards,
//! so a [`Catalog`] can be shared across threads behind an `Arc` without any
//! locking.

use crate::error::{Error, Result};
use crate::models::{page_bounds, page_offset, CatalogItem, CatalogPage};

/// Status assigned to every item loaded from the feed.
pub const DEFAULT_STATUS: &str = "Active";

/// Kind assigned when a feed record carries no media type.
pub const UNKNOWN_KIND: &str = "unknown";

/// Rendition marker identifying an image link.
pub const IMAGE_RENDITION: &str = "image";

/// A typed link attached to a feed record.
#[derive(Debug, Clone, Default)]
pub struct FeedLink {
    pub href: Option<String>,
    /// Rendition type, e.g. `"image"`.
    pub render: Option<String>,
}

/// One record of the external catalog feed, before normalization.
#[derive(Debug, Clone, Default)]
pub struct FeedRecord {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub created_date: Option<String>,
    pub description: Option<String>,
    pub links: Vec<FeedLink>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Normalizes feed records into catalog items.
    ///
    /// Ids are assigned sequentially from 1 in feed order. The image URL is
    /// the first link whose rendition is an image.
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FeedRecord>,
    {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                let image_url = record
                    .links
                    .into_iter()
                    .find(|link| link.render.as_deref() == Some(IMAGE_RENDITION))
                    .and_then(|link| link.href);

                CatalogItem {
                    id: idx as u64 + 1,
                    name: record.title.unwrap_or_default(),
                    kind: record.kind.unwrap_or_else(|| UNKNOWN_KIND.to_string()),
                    created_date: record.created_date.unwrap_or_default(),
                    description: record.description.unwrap_or_default(),
                    image_url,
                    status: DEFAULT_STATUS.to_string(),
                }
            })
            .collect();

        Self { items }
    }

    pub fn all(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by its 1-based id.
    pub fn get(&self, id: u64) -> Option<&CatalogItem> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.items.get(idx)
    }

    /// Returns one page of the catalog in id order.
    pub fn page(&self, page: usize, limit: usize) -> Result<CatalogPage> {
        if page < 1 {
            return Err(Error::invalid("page must be >= 1"));
        }
        if limit < 1 {
            return Err(Error::invalid("limit must be >= 1"));
        }

        let total_items = self.items.len();
        let (start, end) = page_bounds(page, limit, total_items);
        let items = self.items[start..end].to_vec();
        let returned_count = items.len();

        Ok(CatalogPage {
            items,
            page,
            limit,
            total_items,
            has_more: page_offset(page, limit) + returned_count < total_items,
            returned_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> FeedRecord {
        FeedRecord {
            title: Some(title.to_string()),
            kind: Some("image".to_string()),
            created_date: Some("2020-01-01T00:00:00Z".to_string()),
            description: Some(format!("{} description", title)),
            links: Vec::new(),
        }
    }

    fn catalog_of(n: usize) -> Catalog {
        Catalog::load((1..=n).map(|i| record(&format!("Item {}", i))))
    }

    #[test]
    fn test_load_assigns_dense_ids_in_feed_order() {
        let catalog = catalog_of(3);
        let ids: Vec<u64> = catalog.all().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.all()[2].name, "Item 3");
        assert_eq!(catalog.get(2).map(|i| i.name.as_str()), Some("Item 2"));
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_load_defaults_missing_fields() {
        let catalog = Catalog::load(vec![FeedRecord::default()]);
        let item = &catalog.all()[0];
        assert_eq!(item.name, "");
        assert_eq!(item.kind, UNKNOWN_KIND);
        assert_eq!(item.created_date, "");
        assert_eq!(item.description, "");
        assert_eq!(item.image_url, None);
        assert_eq!(item.status, DEFAULT_STATUS);
    }

    #[test]
    fn test_load_picks_first_image_rendition() {
        let mut rec = record("Nebula");
        rec.links = vec![
            FeedLink {
                href: Some("https://example.test/captions.srt".to_string()),
                render: None,
            },
            FeedLink {
                href: Some("https://example.test/thumb.jpg".to_string()),
                render: Some("image".to_string()),
            },
            FeedLink {
                href: Some("https://example.test/large.jpg".to_string()),
                render: Some("image".to_string()),
            },
        ];
        let catalog = Catalog::load(vec![rec]);
        assert_eq!(
            catalog.all()[0].image_url.as_deref(),
            Some("https://example.test/thumb.jpg")
        );
    }

    #[test]
    fn test_page_rejects_non_positive_arguments() {
        let catalog = catalog_of(3);
        assert!(matches!(catalog.page(0, 10), Err(Error::InvalidArgument(_))));
        assert!(matches!(catalog.page(1, 0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_page_math() {
        let catalog = catalog_of(25);

        let first = catalog.page(1, 10).unwrap();
        assert_eq!(first.returned_count, 10);
        assert_eq!(first.total_items, 25);
        assert!(first.has_more);
        assert_eq!(first.items[0].id, 1);

        let last = catalog.page(3, 10).unwrap();
        assert_eq!(last.returned_count, 5);
        assert!(!last.has_more);
        assert_eq!(last.items[0].id, 21);

        let beyond = catalog.page(9, 10).unwrap();
        assert!(beyond.items.is_empty());
        assert!(!beyond.has_more);
    }

    #[test]
    fn test_page_is_idempotent() {
        let catalog = catalog_of(12);
        assert_eq!(catalog.page(2, 5).unwrap(), catalog.page(2, 5).unwrap());
    }
}
