//! Loader types
//!
//! State, events and effects for the incremental loader, plus the
//! [`PageSource`] seam the runtime fetches through.

use crate::error::Result;
use crate::types::{PageRequest, Product, DEFAULT_LIMIT};
use async_trait::async_trait;
use std::time::Duration;

// ============================================================================
// Configuration
// ============================================================================

/// Loader settings fixed for the lifetime of one loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Items requested per page
    pub page_size: u32,
    /// Minimum spacing between scroll evaluations
    pub throttle: Duration,
    /// Name filter sent with every request
    pub query: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_LIMIT,
            throttle: Duration::from_millis(200),
            query: None,
        }
    }
}

impl LoaderConfig {
    /// Create a config with the given page size; zero falls back to the default
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: if page_size == 0 { DEFAULT_LIMIT } else { page_size },
            ..Self::default()
        }
    }

    /// Set the scroll throttle interval
    #[must_use]
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set the name filter
    #[must_use]
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    /// Page request for the given cursor
    pub fn request_at(&self, cursor: u64) -> PageRequest {
        PageRequest::new(cursor, self.page_size).with_query(self.query.clone())
    }
}

// ============================================================================
// State
// ============================================================================

/// Everything the loader knows. Owned by exactly one loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderState {
    /// Accumulated items, append-only
    pub items: Vec<Product>,
    /// Next offset to request; always `items.len()`
    pub cursor: u64,
    /// A request is outstanding
    pub in_flight: bool,
    /// No more requests will be issued
    pub exhausted: bool,
    /// The first request has settled
    pub initial_load_done: bool,
    /// Why the stream ended, if it ended on a failed fetch
    pub failure: Option<String>,
}

impl LoaderState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, derived from the flags
    pub fn phase(&self) -> Phase {
        if self.exhausted {
            Phase::Exhausted
        } else if self.in_flight {
            Phase::Loading
        } else {
            Phase::Idle
        }
    }

    /// Render-facing summary
    pub fn view(&self) -> LoaderView {
        LoaderView {
            item_count: self.items.len(),
            is_loading: self.in_flight,
            no_more_items: self.exhausted && !self.in_flight,
            error: self.failure.clone(),
        }
    }
}

/// Loader phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a trigger
    Idle,
    /// One request outstanding
    Loading,
    /// Terminal; nothing more will be fetched
    Exhausted,
}

/// What a renderer needs from the loader.
///
/// `no_more_items` is set for both an empty page and a failed fetch;
/// `error` tells the two apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderView {
    pub item_count: usize,
    pub is_loading: bool,
    pub no_more_items: bool,
    pub error: Option<String>,
}

// ============================================================================
// Scroll Geometry
// ============================================================================

/// Scroll position of the hosting viewport, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the document
    pub scroll_top: f64,
    /// Height of the visible area
    pub viewport_height: f64,
    /// Total height of the document
    pub document_height: f64,
}

impl ScrollMetrics {
    /// Create scroll metrics
    pub fn new(scroll_top: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    /// Metrics for a reader parked at the very bottom of the document
    pub fn at_bottom(viewport_height: f64, document_height: f64) -> Self {
        Self::new(
            (document_height - viewport_height).max(0.0),
            viewport_height,
            document_height,
        )
    }

    /// `ceil(scroll_top + viewport_height) >= document_height`.
    ///
    /// Rounding up absorbs fractional scroll offsets on scaled displays.
    pub fn is_at_bottom(&self) -> bool {
        (self.scroll_top + self.viewport_height).ceil() >= self.document_height
    }
}

// ============================================================================
// Events and Effects
// ============================================================================

/// Inputs to the transition function
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Loader created; loads the first page regardless of scroll position
    Mount,
    /// A (throttled) scroll notification
    Scroll(ScrollMetrics),
    /// The outstanding request returned a page (possibly empty)
    PageLoaded(Vec<Product>),
    /// The outstanding request failed
    FetchFailed(String),
}

/// Work the host must perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue exactly one page request
    Fetch(PageRequest),
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: LoaderState,
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Transition with no effects
    pub fn quiet(state: LoaderState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

// ============================================================================
// Page Source
// ============================================================================

/// Anything the loader can fetch pages from
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Fetch one page. An empty page means the collection is exhausted.
    async fn fetch(&self, request: &PageRequest) -> Result<Vec<Product>>;
}
