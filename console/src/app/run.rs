//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

use deploy_api::models::TagTarget;

use crate::actions::dispatch::{self, Outcome};
use crate::actions::prompt::Prompter;
use crate::actions::Intent;
use crate::app::options::{AppOptions, LifecycleOptions};
use crate::app::state::AppState;
use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::view::model::ViewModel;
use crate::view::ViewPort;
use crate::workers::poller;

/// Rollback target named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSelection {
    pub name: String,

    /// Commit of the tag, looked up among the rendered tags when absent
    pub commit_id: Option<String>,
}

/// Watch the repository: render the panel and keep it in sync until
/// `shutdown_signal` resolves.
pub async fn run<V, M>(
    options: AppOptions,
    make_view: M,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ConsoleError>
where
    V: ViewPort + 'static,
    M: FnOnce(ViewModel) -> V,
{
    info!("Initializing deploy console for {}...", options.repo());

    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), options.lifecycle.clone());

    let app_state = AppState::init(&options, make_view).await?;

    if let Err(e) = init_poller_worker(
        options.poller.clone(),
        &app_state,
        &mut shutdown_manager,
        shutdown_tx.subscribe(),
    ) {
        error!("Failed to start poller: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

/// Render the panel once and perform a single user action on it
pub async fn run_action<P>(
    options: AppOptions,
    intent: Intent,
    selection: Option<TagSelection>,
    prompter: &P,
) -> Result<Outcome, ConsoleError>
where
    P: Prompter + ?Sized,
{
    let app_state = AppState::init(&options, |model| model).await?;

    if let Some(selection) = selection {
        let mut view = app_state.view.lock().await;
        let target = resolve_selection(view.model(), selection)?;
        view.select_tag(Some(target));
    }

    let outcome = dispatch::request(
        options.repo(),
        intent,
        app_state.http_client.as_ref(),
        prompter,
        app_state.view.as_ref(),
    )
    .await;

    Ok(outcome)
}

fn resolve_selection(model: &ViewModel, selection: TagSelection) -> Result<TagTarget, ConsoleError> {
    if let Some(commit_id) = selection.commit_id {
        return Ok(TagTarget::new(selection.name, commit_id));
    }
    model
        .release_tag(&selection.name)
        .cloned()
        .ok_or_else(|| {
            ConsoleError::ConfigError(format!(
                "Unknown release tag {}, pass --commit=<id>",
                selection.name
            ))
        })
}

// =============================== INITIALIZATION ================================== //

fn init_poller_worker<V>(
    options: poller::Options,
    app_state: &AppState<V>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ConsoleError>
where
    V: ViewPort + 'static,
{
    info!("Initializing poller worker...");

    let http_client: Arc<HttpClient> = app_state.http_client.clone();
    let view: Arc<Mutex<V>> = app_state.view.clone();

    let poller_handle = tokio::spawn(async move {
        poller::run(
            &options,
            http_client.as_ref(),
            view.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_poller_worker_handle(poller_handle)
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    lifecycle_options: LifecycleOptions,
    poller_worker_handle: Option<JoinHandle<()>>,
}

impl ShutdownManager {
    pub fn new(shutdown_tx: broadcast::Sender<()>, lifecycle_options: LifecycleOptions) -> Self {
        Self {
            shutdown_tx,
            lifecycle_options,
            poller_worker_handle: None,
        }
    }

    pub fn with_poller_worker_handle(&mut self, handle: JoinHandle<()>) -> Result<(), ConsoleError> {
        if self.poller_worker_handle.is_some() {
            return Err(ConsoleError::ShutdownError("poller_handle already set".to_string()));
        }
        self.poller_worker_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), ConsoleError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, aborting workers...",
                    self.lifecycle_options.max_shutdown_delay
                );
                if let Some(handle) = self.poller_worker_handle.take() {
                    handle.abort();
                }
                Err(ConsoleError::ShutdownError("shutdown timed out".to_string()))
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), ConsoleError> {
        info!("Shutting down deploy console...");

        if let Some(handle) = self.poller_worker_handle.as_mut() {
            handle
                .await
                .map_err(|e| ConsoleError::ShutdownError(e.to_string()))?;
            self.poller_worker_handle = None;
        }

        info!("Shutdown complete");
        Ok(())
    }
}
