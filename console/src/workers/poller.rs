//! Status polling worker

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use deploy_api::models::{StatusSnapshot, TagTarget};

use crate::http::repo::StatusSource;
use crate::sync::page::PageState;
use crate::sync::reconciler::reconcile;
use crate::view::ViewPort;

/// Delay between the end of one poll and the start of the next
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Repository shown on the panel
    pub repo: String,

    /// Tags rendered as rollback targets when the panel is rebuilt
    pub release_tags: Vec<TagTarget>,

    /// Polling interval
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            repo: String::new(),
            release_tags: Vec::new(),
            interval: POLL_INTERVAL,
        }
    }
}

/// What one poll cycle did to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Mutations applied in place
    Patched,
    /// Identity fields moved; the panel was rebuilt
    Resynced,
    /// Fetch failed; the view is untouched
    FetchFailed,
}

/// Run the poller worker.
///
/// The next poll starts `interval` after the previous one completed, so at
/// most one request is in flight. Failed fetches are dropped silently and
/// never stop the loop; only the shutdown signal does.
pub async fn run<C, V, S, F>(
    options: &Options,
    source: &C,
    view: &Mutex<V>,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    C: StatusSource + ?Sized,
    V: ViewPort,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Poller worker starting for {}...", options.repo);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {
                // Continue with poll
            }
        }

        tokio::select! {
            biased;
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            outcome = poll_once(options, source, view) => {
                debug!("Poll cycle finished: {:?}", outcome);
            }
        }
    }
}

/// Fetch one snapshot and reconcile it into the view
pub async fn poll_once<C, V>(options: &Options, source: &C, view: &Mutex<V>) -> PollOutcome
where
    C: StatusSource + ?Sized,
    V: ViewPort,
{
    let snapshot = match source.fetch_status(&options.repo).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            debug!("Status fetch failed: {}", e);
            return PollOutcome::FetchFailed;
        }
    };

    let mut view = view.lock().await;
    apply_snapshot(&mut *view, &options.repo, &options.release_tags, &snapshot)
}

/// Reconcile `snapshot` into `view`, rebuilding the panel when its identity
/// fields no longer match.
pub fn apply_snapshot<V>(
    view: &mut V,
    repo: &str,
    release_tags: &[TagTarget],
    snapshot: &StatusSnapshot,
) -> PollOutcome
where
    V: ViewPort + ?Sized,
{
    let result = reconcile(view.model().displayed(), snapshot);
    if !result.resync {
        view.apply_all(&result.mutations);
        return PollOutcome::Patched;
    }

    info!(
        "Commit or waiting queue of {} changed, rebuilding panel at {}",
        repo, snapshot.last_commit
    );
    view.rebuild(PageState::from_snapshot(repo, snapshot, release_tags));

    let result = reconcile(view.model().displayed(), snapshot);
    view.apply_all(&result.mutations);
    PollOutcome::Resynced
}
