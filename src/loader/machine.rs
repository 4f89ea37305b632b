//! Loader state machine
//!
//! [`step`] is a pure function: it never performs I/O, it only returns the
//! next state and the requests the host must issue. [`Loader`] wraps it for
//! callers that prefer to hold the state in place.

use super::types::{Effect, Event, LoaderConfig, LoaderState, Phase, Transition};
use crate::types::Product;
use tracing::{debug, info, warn};

/// Apply one event to the loader state
pub fn step(state: LoaderState, event: Event, config: &LoaderConfig) -> Transition {
    match event {
        Event::Mount => trigger_load(state, config),
        Event::Scroll(metrics) => {
            // Before the first page lands the document height is not real yet
            if state.initial_load_done && metrics.is_at_bottom() && state.phase() == Phase::Idle {
                trigger_load(state, config)
            } else {
                Transition::quiet(state)
            }
        }
        Event::PageLoaded(items) => settle(state, Ok(items)),
        Event::FetchFailed(reason) => settle(state, Err(reason)),
    }
}

/// `Idle -> Loading`, guarded by `!in_flight && !exhausted`
fn trigger_load(mut state: LoaderState, config: &LoaderConfig) -> Transition {
    if state.in_flight || state.exhausted {
        return Transition::quiet(state);
    }

    state.in_flight = true;
    let request = config.request_at(state.cursor);
    debug!("Requesting page at cursor {}", request.cursor);

    Transition {
        state,
        effects: vec![Effect::Fetch(request)],
    }
}

/// Apply a request completion
fn settle(mut state: LoaderState, outcome: Result<Vec<Product>, String>) -> Transition {
    if !state.in_flight {
        debug!("Ignoring completion with no request in flight");
        return Transition::quiet(state);
    }

    state.in_flight = false;
    state.initial_load_done = true;

    match outcome {
        Ok(items) if items.is_empty() => {
            info!("Collection exhausted after {} items", state.items.len());
            state.exhausted = true;
        }
        Ok(items) => {
            state.cursor += items.len() as u64;
            state.items.extend(items);
            debug!("Cursor advanced to {}", state.cursor);
        }
        Err(reason) => {
            warn!("Page fetch failed, no more pages will be loaded: {}", reason);
            state.exhausted = true;
            state.failure = Some(reason);
        }
    }

    Transition::quiet(state)
}

/// In-place wrapper around [`step`]
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
    state: LoaderState,
}

impl Loader {
    /// Create a loader with empty state
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            state: LoaderState::new(),
        }
    }

    /// Apply an event, returning the effects to perform
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let Transition { state, effects } = step(state, event, &self.config);
        self.state = state;
        effects
    }

    /// Current state
    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    /// Loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Consume the loader, keeping the state
    pub fn into_state(self) -> LoaderState {
        self.state
    }
}
