//! Loader runtime
//!
//! Runs one loader on a dedicated task. Scroll notifications and fetch
//! completions are handled one at a time by a single `select!` loop, so the
//! `in_flight` flag is the only exclusion the state needs. The scroll
//! handler is long-lived: it reads the current state on every notification.
//!
//! Tearing the loader down, either through [`LoaderHandle::shutdown`] or by
//! dropping the handle, aborts the outstanding fetch so its completion can
//! never touch the state afterwards.

use super::machine::Loader;
use super::throttle::Throttle;
use super::types::{Effect, Event, LoaderConfig, LoaderState, LoaderView, PageSource, ScrollMetrics};
use crate::error::{Error, Result};
use crate::types::{PageRequest, Product};
use futures::future::OptionFuture;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, warn};

type FetchTask = JoinHandle<Result<Vec<Product>>>;

#[derive(Debug)]
enum Command {
    Scroll(ScrollMetrics),
    Shutdown,
}

/// Handle to a running loader
#[derive(Debug)]
pub struct LoaderHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<LoaderState>,
    task: JoinHandle<LoaderState>,
}

impl LoaderHandle {
    /// Start a loader; the mount fetch is issued immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(source: Arc<dyn PageSource>, config: LoaderConfig) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(LoaderState::new());

        // Mount before the task starts so no observer sees a pre-mount state
        let throttle = Throttle::new(config.throttle);
        let mut loader = Loader::new(config);
        let mut fetch = None;
        apply(&mut loader, Event::Mount, &source, &mut fetch, &publisher);

        let task = tokio::spawn(run(loader, throttle, fetch, source, receiver, publisher));

        Self {
            commands,
            state,
            task,
        }
    }

    /// Deliver a scroll notification
    pub fn scroll(&self, metrics: ScrollMetrics) -> Result<()> {
        self.commands
            .send(Command::Scroll(metrics))
            .map_err(|_| Error::loader_stopped("scroll after loader shut down"))
    }

    /// Snapshot of the current state
    pub fn state(&self) -> LoaderState {
        self.state.borrow().clone()
    }

    /// Render-facing view of the current state
    pub fn view(&self) -> LoaderView {
        self.state.borrow().view()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<LoaderState> {
        self.state.clone()
    }

    /// Wait until the state satisfies `predicate`
    pub async fn wait_for<F>(&mut self, predicate: F) -> Result<LoaderState>
    where
        F: FnMut(&LoaderState) -> bool,
    {
        self.state
            .wait_for(predicate)
            .await
            .map(|state| state.clone())
            .map_err(|_| Error::loader_stopped("loader exited while waiting"))
    }

    /// Wait until no request is outstanding
    pub async fn settled(&mut self) -> Result<LoaderState> {
        self.wait_for(|state| !state.in_flight).await
    }

    /// Stop the loader, aborting any outstanding fetch, and return its final state
    pub async fn shutdown(self) -> Result<LoaderState> {
        // The loop may already have exited; the join below still reports its state
        let _ = self.commands.send(Command::Shutdown);
        self.task
            .await
            .map_err(|e| Error::loader_stopped(format!("loader task failed: {e}")))
    }
}

async fn run(
    mut loader: Loader,
    mut throttle: Throttle<ScrollMetrics>,
    mut fetch: Option<FetchTask>,
    source: Arc<dyn PageSource>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    publisher: watch::Sender<LoaderState>,
) -> LoaderState {
    loop {
        let deadline = throttle.deadline();

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Scroll(metrics)) => {
                    if let Some(metrics) = throttle.offer(Instant::now(), metrics) {
                        apply(&mut loader, Event::Scroll(metrics), &source, &mut fetch, &publisher);
                    }
                }
                Some(Command::Shutdown) | None => break,
            },
            joined = join_fetch(&mut fetch) => {
                fetch = None;
                apply(&mut loader, completion_event(joined), &source, &mut fetch, &publisher);
            }
            Some(()) = OptionFuture::from(deadline.map(tokio::time::sleep_until)), if deadline.is_some() => {
                if let Some(metrics) = throttle.poll(Instant::now()) {
                    apply(&mut loader, Event::Scroll(metrics), &source, &mut fetch, &publisher);
                }
            }
        }
    }

    if let Some(task) = fetch.take() {
        debug!("Aborting in-flight fetch on teardown");
        task.abort();
    }

    loader.into_state()
}

/// Run one transition, start any requested fetch, and publish the new state
fn apply(
    loader: &mut Loader,
    event: Event,
    source: &Arc<dyn PageSource>,
    fetch: &mut Option<FetchTask>,
    publisher: &watch::Sender<LoaderState>,
) {
    for effect in loader.handle(event) {
        match effect {
            Effect::Fetch(request) => {
                debug_assert!(fetch.is_none(), "second fetch while one is in flight");
                *fetch = Some(start_fetch(source, request));
            }
        }
    }
    publisher.send_replace(loader.state().clone());
}

fn start_fetch(source: &Arc<dyn PageSource>, request: PageRequest) -> FetchTask {
    let source = Arc::clone(source);
    tokio::spawn(async move { source.fetch(&request).await })
}

/// Resolve the outstanding fetch; pending forever when there is none
async fn join_fetch(
    fetch: &mut Option<FetchTask>,
) -> std::result::Result<Result<Vec<Product>>, JoinError> {
    match fetch.as_mut() {
        Some(task) => task.await,
        None => std::future::pending().await,
    }
}

fn completion_event(joined: std::result::Result<Result<Vec<Product>>, JoinError>) -> Event {
    match joined {
        Ok(Ok(items)) => Event::PageLoaded(items),
        Ok(Err(e)) => Event::FetchFailed(e.to_string()),
        Err(e) => {
            warn!("Fetch task did not complete: {}", e);
            Event::FetchFailed(format!("fetch task did not complete: {e}"))
        }
    }
}
