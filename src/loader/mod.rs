//! Incremental loader module
//!
//! Client side of the pagination protocol: accumulate pages while the
//! reader scrolls, with at most one request outstanding and none after the
//! stream has ended.
//!
//! # Overview
//!
//! The loader module provides:
//! - `step` - Pure transition function `(state, event) -> (state, effects)`
//! - `Loader` - In-place wrapper around `step`
//! - `Throttle` - Leading/trailing rate limit for scroll notifications
//! - `LoaderHandle` - Async runtime that owns one loader and its fetches
//! - `PageSource` - Where pages come from (the HTTP client, or a test double)

mod driver;
mod machine;
mod throttle;
mod types;

pub use driver::LoaderHandle;
pub use machine::{step, Loader};
pub use throttle::Throttle;
pub use types::{
    Effect, Event, LoaderConfig, LoaderState, LoaderView, PageSource, Phase, ScrollMetrics,
    Transition,
};
