//! Read-side helpers for presenting a guest collection: name search,
//! fixed-size pages with a page-number strip, and headline counts.

use crate::model::Guest;
use serde::Serialize;

/// Guests shown per page.
pub const PAGE_SIZE: usize = 10;

/// Page strips longer than this collapse into ellipses.
const MAX_UNCOLLAPSED_PAGES: usize = 7;

/// Headline counts for a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub checked_in: usize,
    pub awaited: usize,
    pub vip: usize,
}

impl Stats {
    #[must_use]
    pub fn of(guests: &[Guest]) -> Self {
        let checked_in = guests.iter().filter(|g| g.checked_in).count();
        Self {
            total: guests.len(),
            checked_in,
            awaited: guests.len() - checked_in,
            vip: guests.iter().filter(|g| g.vip).count(),
        }
    }
}

/// Guests whose name contains `query`, ignoring case. A blank query
/// matches everyone.
#[must_use]
pub fn filter_by_name<'a>(guests: &'a [Guest], query: &str) -> Vec<&'a Guest> {
    let needle = query.trim().to_lowercase();
    guests
        .iter()
        .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
        .collect()
}

/// One page of a larger list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 1-based page number actually shown.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: &'a [T],
}

/// Slice out page `page` (1-based) of `items`.
///
/// The page number is clamped into `1..=max(total_pages, 1)`, so asking for
/// page 0 or a page past the end shows the nearest real page.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let number = page.clamp(1, total_pages.max(1));
    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        number,
        total_pages,
        total_items: items.len(),
        items: &items[start..end],
    }
}

/// An entry in the page-number strip. Serializes as the page number, or
/// `"..."` for a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Number(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(page) => serializer.serialize_u64(*page as u64),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Page-number strip for `current` of `total` pages.
///
/// Short runs list every page. Longer runs keep the first and last page and
/// the neighbours of `current`, with an ellipsis standing in for each gap.
/// A single page (or none) needs no strip.
#[must_use]
pub fn page_markers(current: usize, total: usize) -> Vec<PageMarker> {
    if total <= 1 {
        return Vec::new();
    }
    if total <= MAX_UNCOLLAPSED_PAGES {
        return (1..=total).map(PageMarker::Number).collect();
    }

    let mut markers = vec![PageMarker::Number(1)];
    if current > 3 {
        markers.push(PageMarker::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);
    for page in start..=end {
        markers.push(PageMarker::Number(page));
    }

    if current + 2 < total {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Number(total));
    markers
}
