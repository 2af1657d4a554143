//! History backends: where the serialized query string actually goes.
//!
//! `BrowserHistory` uses `history.replaceState` so navigation entries are
//! not polluted by viewer movement. Everything else (tests, native
//! harnesses) runs against `InMemoryHistory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UrlSyncError {
    #[error("history API unavailable on this target")]
    Unavailable,
    #[error("history write rejected: {0}")]
    WriteRejected(String),
}

pub trait HistoryBackend {
    /// Replaces the query string of the current entry, no new entry.
    fn replace_query(&mut self, query: &str) -> Result<(), UrlSyncError>;

    /// Current query string, including the leading `?` (empty when none).
    fn current_query(&self) -> Result<String, UrlSyncError>;
}

/// Test/native backend that records every write and can be scripted to
/// fail the next N writes.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    query: String,
    writes: Vec<String>,
    fail_next: usize,
}

impl InMemoryHistory {
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            query: initial_query.into(),
            writes: Vec::new(),
            fail_next: 0,
        }
    }

    pub fn fail_next_writes(&mut self, count: usize) {
        self.fail_next = count;
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl HistoryBackend for InMemoryHistory {
    fn replace_query(&mut self, query: &str) -> Result<(), UrlSyncError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(UrlSyncError::WriteRejected("scripted failure".into()));
        }
        self.query = query.to_owned();
        self.writes.push(query.to_owned());
        Ok(())
    }

    fn current_query(&self) -> Result<String, UrlSyncError> {
        Ok(self.query.clone())
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::JsValue;

    use super::{HistoryBackend, UrlSyncError};

    #[derive(Debug, Default)]
    pub struct BrowserHistory;

    impl BrowserHistory {
        pub fn new() -> Self {
            Self
        }
    }

    fn window() -> Result<web_sys::Window, UrlSyncError> {
        web_sys::window().ok_or(UrlSyncError::Unavailable)
    }

    fn rejected(err: JsValue) -> UrlSyncError {
        UrlSyncError::WriteRejected(format!("{err:?}"))
    }

    impl HistoryBackend for BrowserHistory {
        fn replace_query(&mut self, query: &str) -> Result<(), UrlSyncError> {
            let history = window()?.history().map_err(rejected)?;
            history
                .replace_state_with_url(&JsValue::NULL, "", Some(query))
                .map_err(rejected)
        }

        fn current_query(&self) -> Result<String, UrlSyncError> {
            window()?.location().search().map_err(rejected)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod browser {
    use super::{HistoryBackend, UrlSyncError};

    /// Stub so non-wasm builds of downstream crates type-check; every
    /// call reports the backend as unavailable.
    #[derive(Debug, Default)]
    pub struct BrowserHistory;

    impl BrowserHistory {
        pub fn new() -> Self {
            Self
        }
    }

    impl HistoryBackend for BrowserHistory {
        fn replace_query(&mut self, _query: &str) -> Result<(), UrlSyncError> {
            Err(UrlSyncError::Unavailable)
        }

        fn current_query(&self) -> Result<String, UrlSyncError> {
            Err(UrlSyncError::Unavailable)
        }
    }
}

pub use browser::BrowserHistory;
