//! Abstractions for pagination.
//!
//! Every list endpoint of the platform API accepts a page number, a page
//! size, an optional fuzzy search string and a resource-specific filter,
//! and replies with the matching items plus the total count.

use serde::{Deserialize, Serialize};

/// Default number of items on a [`Page`].
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Selector of a [`Page`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Selector<F> {
    /// 1-based number of the requested [`Page`].
    pub page: u32,

    /// Number of items on the requested [`Page`].
    #[serde(rename = "itemPerPage")]
    pub per_page: u32,

    /// Fuzzy search string applied to the listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Additional filter being applied to the listing.
    #[serde(flatten)]
    pub filter: F,
}

impl<F: Default> Default for Selector<F> {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: None,
            filter: F::default(),
        }
    }
}

impl<F> Selector<F> {
    /// Returns this [`Selector`] moved to the provided 1-based `page`.
    ///
    /// Page numbers below `1` are coerced to the first page.
    #[must_use]
    pub fn to_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Returns this [`Selector`] with the provided `search` string.
    ///
    /// An empty string clears the search.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }
}

/// A single page of a listing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Page<I> {
    /// Items on this [`Page`].
    ///
    /// Some platform endpoints name this field `data`, others `items`.
    #[serde(alias = "data")]
    pub items: Vec<I>,

    /// Total count of items matching the [`Selector`], across all pages.
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

impl<I> Page<I> {
    /// Indicates whether a [`Selector`] moved past this [`Page`] would
    /// select anything.
    #[must_use]
    pub fn has_more<F>(&self, selector: &Selector<F>) -> bool {
        u64::from(selector.page) * u64::from(selector.per_page)
            < self.total_count
    }

    /// Total count of pages the listing spans.
    #[must_use]
    pub fn total_pages<F>(&self, selector: &Selector<F>) -> u64 {
        self.total_count.div_ceil(u64::from(selector.per_page.max(1)))
    }
}

/// Defines pagination type aliases for a listing module.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of listed nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use serde::Serialize;

    use super::{Page, Selector, DEFAULT_PER_PAGE};

    #[derive(Debug, Default, Eq, PartialEq, Serialize)]
    struct NoFilter {}

    #[test]
    fn selector_defaults_to_first_page() {
        let selector = Selector::<NoFilter>::default();

        assert_eq!(selector.page, 1);
        assert_eq!(selector.per_page, DEFAULT_PER_PAGE);
        assert_eq!(selector.search, None);
    }

    #[test]
    fn selector_coerces_page_to_valid_range() {
        let selector = Selector::<NoFilter>::default().to_page(0);

        assert_eq!(selector.page, 1);
    }

    #[test]
    fn empty_search_clears_previous_one() {
        let selector = Selector::<NoFilter>::default().search("smith");
        assert_eq!(selector.search.as_deref(), Some("smith"));

        let selector = selector.search("");
        assert_eq!(selector.search, None);
    }

    #[test]
    fn selector_serializes_in_wire_format() {
        let selector = Selector::<NoFilter>::default().to_page(3).search("jo");

        assert_eq!(
            serde_json::to_value(&selector).unwrap(),
            serde_json::json!({
                "page": 3,
                "itemPerPage": 10,
                "search": "jo",
            }),
        );
    }

    #[test]
    fn page_accepts_both_wire_spellings() {
        let items: Page<u32> = serde_json::from_value(serde_json::json!({
            "items": [1, 2],
            "totalCount": 7,
        }))
        .unwrap();
        let data: Page<u32> = serde_json::from_value(serde_json::json!({
            "data": [1, 2],
            "totalCount": 7,
        }))
        .unwrap();

        assert_eq!(items, data);
        assert_eq!(items.total_count, 7);
    }

    #[test]
    fn has_more_follows_total_count() {
        let page = Page {
            items: vec![1, 2, 3],
            total_count: 25,
        };

        assert!(page.has_more(&Selector::<NoFilter>::default().to_page(2)));
        assert!(!page.has_more(&Selector::<NoFilter>::default().to_page(3)));
        assert_eq!(page.total_pages(&Selector::<NoFilter>::default()), 3);
    }
}
