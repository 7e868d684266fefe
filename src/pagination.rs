use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_SIZE: usize = 10;

/// ListQuery
///
/// The accepted query parameters on listing endpoints. `page` and `size` are
/// kept as raw strings so junk values fall back to the defaults instead of
/// rejecting the request at the extractor.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Requested page number, 1-based. Defaults to 1.
    pub page: Option<String>,
    /// Requested page size. Defaults to 10.
    pub size: Option<String>,
    /// Optional case-insensitive substring search term.
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> usize {
        parse_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn size(&self) -> usize {
        parse_or(self.size.as_deref(), DEFAULT_SIZE)
    }
}

// Values below 1 are treated like non-numeric input: silently ignored.
fn parse_or(raw: Option<&str>, default: usize) -> usize {
    match raw.and_then(|value| value.parse::<usize>().ok()) {
        Some(n) if n >= 1 => n,
        _ => default,
    }
}

/// PageMeta
///
/// Page metadata returned alongside every listing. `start_index` and
/// `end_index` are the 1-based inclusive positions of the page's items
/// within the whole collection; both are 0 when the collection is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PageMeta {
    pub number: usize,
    #[serde(rename = "hasNext")]
    pub has_next: bool,
    #[serde(rename = "hasPrev")]
    pub has_prev: bool,
    #[serde(rename = "startIndex")]
    pub start_index: usize,
    #[serde(rename = "endIndex")]
    pub end_index: usize,
    pub size: usize,
}

/// paginate
///
/// Cuts an already-ordered collection into the requested page. A page past
/// the end clamps to the last page, so the caller always gets a valid
/// (possibly empty) window together with its metadata.
pub fn paginate<T>(items: Vec<T>, requested_page: usize, size: usize) -> (Vec<T>, PageMeta) {
    let size = size.max(1);
    let count = items.len();
    let num_pages = count.div_ceil(size).max(1);
    let number = requested_page.clamp(1, num_pages);
    let start = (number - 1) * size;

    let page_items: Vec<T> = items.into_iter().skip(start).take(size).collect();

    let meta = PageMeta {
        number,
        has_next: number < num_pages,
        has_prev: number > 1,
        start_index: if count == 0 { 0 } else { start + 1 },
        end_index: if count == 0 { 0 } else { start + page_items.len() },
        size,
    };
    (page_items, meta)
}
