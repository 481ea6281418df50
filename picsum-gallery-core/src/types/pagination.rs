//! Pagination state

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Pagination settings supplied when the gallery context is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    /// Total number of items, when the listing source reports one.
    pub total_items: Option<u64>,
    pub items_per_page: u32,
    pub initial_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            total_items: None,
            items_per_page: 10,
            initial_page: 1,
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.items_per_page == 0 {
            return Err(CoreError::InvalidConfig(
                "items_per_page must be at least 1".to_string(),
            ));
        }
        if self.initial_page == 0 {
            return Err(CoreError::InvalidConfig(
                "initial_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 1-based page counter, bounded only when `total_items` is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    current_page: u32,
    total_items: Option<u64>,
    items_per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PaginationConfig::default())
    }
}

impl Pagination {
    /// Build from config; out-of-range values are clamped, never rejected.
    pub fn new(config: PaginationConfig) -> Self {
        if config.items_per_page == 0 {
            log::warn!("items_per_page of 0 clamped to 1");
        }
        let mut pagination = Self {
            current_page: 1,
            total_items: config.total_items,
            items_per_page: config.items_per_page.max(1),
        };
        if !pagination.go_to_page(config.initial_page) && config.initial_page != 1 {
            log::warn!(
                "initial page {} out of range, starting at page 1",
                config.initial_page
            );
        }
        pagination
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub fn total_items(&self) -> Option<u64> {
        self.total_items
    }

    /// `ceil(total_items / items_per_page)`; `None` means unbounded.
    pub fn total_pages(&self) -> Option<u64> {
        self.total_items
            .map(|total| total.div_ceil(u64::from(self.items_per_page)))
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        match self.total_pages() {
            None => true,
            Some(total_pages) => u64::from(self.current_page) < total_pages,
        }
    }

    /// Returns whether the page changed.
    pub fn go_to_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        match self.current_page.checked_add(1) {
            Some(next) => {
                self.current_page = next;
                true
            }
            None => false,
        }
    }

    pub fn go_to_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jump to `page` if it is in range; otherwise a silent no-op.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if !self.is_valid_page(page) || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Replace the known item count. The current page is pulled back to the
    /// last page if the new total no longer reaches it.
    pub fn set_total_items(&mut self, total_items: Option<u64>) -> bool {
        if self.total_items == total_items {
            return false;
        }
        self.total_items = total_items;
        if let Some(total_pages) = self.total_pages() {
            let last = u32::try_from(total_pages.max(1)).unwrap_or(u32::MAX);
            if self.current_page > last {
                self.current_page = last;
            }
        }
        true
    }

    fn is_valid_page(&self, page: u32) -> bool {
        page >= 1
            && self
                .total_pages()
                .is_none_or(|total_pages| u64::from(page) <= total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(total_items: u64, items_per_page: u32) -> Pagination {
        Pagination::new(PaginationConfig {
            total_items: Some(total_items),
            items_per_page,
            initial_page: 1,
        })
    }

    #[test]
    fn starts_at_page_one() {
        let p = Pagination::default();
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.items_per_page(), 10);
        assert_eq!(p.total_pages(), None);
    }

    #[test]
    fn previous_from_first_page_is_noop() {
        let mut p = Pagination::default();
        assert!(!p.can_go_previous());
        assert!(!p.go_to_previous());
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn previous_decrements_from_any_later_page() {
        for start in 2..50 {
            let mut p = Pagination::default();
            assert!(p.go_to_page(start));
            assert!(p.go_to_previous());
            assert_eq!(p.current_page(), start - 1);
        }
    }

    #[test]
    fn unknown_total_always_has_next() {
        let mut p = Pagination::default();
        for _ in 0..1_000 {
            assert!(p.can_go_next());
            assert!(p.go_to_next());
        }
        assert_eq!(p.current_page(), 1_001);
        assert!(p.go_to_page(4_000_000));
        assert!(p.can_go_next());
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(bounded(95, 10).total_pages(), Some(10));
        assert_eq!(bounded(100, 10).total_pages(), Some(10));
        assert_eq!(bounded(101, 10).total_pages(), Some(11));
        assert_eq!(bounded(0, 10).total_pages(), Some(0));
    }

    #[test]
    fn next_on_last_page_is_noop() {
        let mut p = bounded(30, 10);
        assert!(p.go_to_next());
        assert!(p.go_to_next());
        assert_eq!(p.current_page(), 3);
        assert!(!p.can_go_next());
        assert!(!p.go_to_next());
        assert_eq!(p.current_page(), 3);
    }

    #[test]
    fn go_to_page_ignores_out_of_range() {
        let mut p = bounded(50, 10);
        assert!(!p.go_to_page(0));
        assert!(!p.go_to_page(6));
        assert_eq!(p.current_page(), 1);
        assert!(p.go_to_page(5));
        assert_eq!(p.current_page(), 5);
    }

    #[test]
    fn empty_total_cannot_advance() {
        let mut p = bounded(0, 10);
        assert_eq!(p.current_page(), 1);
        assert!(!p.can_go_next());
        assert!(!p.go_to_next());
    }

    #[test]
    fn invalid_initial_page_falls_back_to_first() {
        let p = Pagination::new(PaginationConfig {
            total_items: Some(20),
            items_per_page: 10,
            initial_page: 7,
        });
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn zero_items_per_page_is_clamped() {
        let p = Pagination::new(PaginationConfig {
            total_items: Some(3),
            items_per_page: 0,
            initial_page: 1,
        });
        assert_eq!(p.items_per_page(), 1);
        assert_eq!(p.total_pages(), Some(3));
    }

    #[test]
    fn shrinking_total_pulls_back_current_page() {
        let mut p = Pagination::default();
        assert!(p.go_to_page(8));
        assert!(p.set_total_items(Some(45)));
        assert_eq!(p.current_page(), 5);
        assert!(!p.set_total_items(Some(45)));
        assert!(p.set_total_items(None));
        assert!(p.can_go_next());
    }

    #[test]
    fn config_validation() {
        assert!(PaginationConfig::default().validate().is_ok());
        let zero_size = PaginationConfig {
            items_per_page: 0,
            ..PaginationConfig::default()
        };
        assert!(matches!(
            zero_size.validate(),
            Err(CoreError::InvalidConfig(_))
        ));
        let zero_page = PaginationConfig {
            initial_page: 0,
            ..PaginationConfig::default()
        };
        assert!(zero_page.validate().is_err());
    }
}
