//! Query result state

use serde::Serialize;

use picsum_gallery_provider::{HttpError, Image, ListParams};

/// Result of a keyed query as seen by a front-end.
///
/// Loading and error are never set together; the constructors are the only
/// way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState<T> {
    data: T,
    is_loading: bool,
    error: Option<HttpError>,
}

impl<T: Default> FetchState<T> {
    /// No data yet for the key.
    pub fn loading() -> Self {
        Self {
            data: T::default(),
            is_loading: true,
            error: None,
        }
    }

    /// Failed without any data for the key.
    pub fn failure(error: HttpError) -> Self {
        Self {
            data: T::default(),
            is_loading: false,
            error: Some(error),
        }
    }
}

impl<T> FetchState<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
        }
    }

    /// Data from an earlier success for the same key, plus the error of the
    /// latest attempt.
    pub fn stale_with_error(data: T, error: HttpError) -> Self {
        Self {
            data,
            is_loading: false,
            error: Some(error),
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&HttpError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        !self.is_loading && self.error.is_none()
    }
}

/// Query state tagged with the key it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub params: ListParams,
    pub state: FetchState<Vec<Image>>,
}

impl PageSnapshot {
    pub fn loading(params: ListParams) -> Self {
        Self {
            params,
            state: FetchState::loading(),
        }
    }
}
