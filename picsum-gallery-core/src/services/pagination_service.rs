//! Shared pagination handle

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::{Pagination, PaginationConfig};

/// Observable, shared page counter.
///
/// Clones share one underlying state; subscribers are woken only when a
/// transition actually changes it.
#[derive(Clone)]
pub struct PaginationHandle {
    tx: Arc<watch::Sender<Pagination>>,
}

impl PaginationHandle {
    pub fn new(config: PaginationConfig) -> Self {
        let (tx, _) = watch::channel(Pagination::new(config));
        Self { tx: Arc::new(tx) }
    }

    /// Copy of the current state
    pub fn current(&self) -> Pagination {
        *self.tx.borrow()
    }

    pub fn current_page(&self) -> u32 {
        self.tx.borrow().current_page()
    }

    pub fn can_go_next(&self) -> bool {
        self.tx.borrow().can_go_next()
    }

    pub fn can_go_previous(&self) -> bool {
        self.tx.borrow().can_go_previous()
    }

    pub fn total_pages(&self) -> Option<u64> {
        self.tx.borrow().total_pages()
    }

    pub fn go_to_next(&self) -> bool {
        self.update(Pagination::go_to_next)
    }

    pub fn go_to_previous(&self) -> bool {
        self.update(Pagination::go_to_previous)
    }

    pub fn go_to_page(&self, page: u32) -> bool {
        self.update(|p| p.go_to_page(page))
    }

    pub fn set_total_items(&self, total_items: Option<u64>) -> bool {
        self.update(|p| p.set_total_items(total_items))
    }

    /// Receiver that observes every page change
    pub fn subscribe(&self) -> watch::Receiver<Pagination> {
        self.tx.subscribe()
    }

    fn update(&self, transition: impl FnOnce(&mut Pagination) -> bool) -> bool {
        let changed = self.tx.send_if_modified(|p| transition(p));
        if changed {
            log::debug!("Page changed to {}", self.current_page());
        }
        changed
    }
}
