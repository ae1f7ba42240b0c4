//! Application state management

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use deploy_api::models::TagTarget;

use crate::app::options::AppOptions;
use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::http::repo::StatusSource;
use crate::sync::page::PageState;
use crate::sync::reconciler::reconcile;
use crate::view::model::ViewModel;
use crate::view::ViewPort;

/// Main application state
pub struct AppState<V> {
    /// HTTP client for backend communication
    pub http_client: Arc<HttpClient>,

    /// The rendered panel, shared by the poller and user actions
    pub view: Arc<Mutex<V>>,
}

impl<V: ViewPort> AppState<V> {
    /// Initialize application state and render the first page.
    ///
    /// Unlike later polls, a failed initial fetch is an error.
    pub async fn init<M>(options: &AppOptions, make_view: M) -> Result<Self, ConsoleError>
    where
        M: FnOnce(ViewModel) -> V,
    {
        info!("Initializing application state...");

        let http_client = Arc::new(HttpClient::new(
            &options.backend_base_url,
            options.request_timeout,
        )?);

        let model = load_page(
            http_client.as_ref(),
            options.repo(),
            &options.poller.release_tags,
        )
        .await?;

        let mut view = make_view(model);
        view.flush();

        Ok(Self {
            http_client,
            view: Arc::new(Mutex::new(view)),
        })
    }
}

/// Fetch the current status of `repo` and render a fresh panel from it
pub async fn load_page<C>(
    source: &C,
    repo: &str,
    release_tags: &[TagTarget],
) -> Result<ViewModel, ConsoleError>
where
    C: StatusSource + ?Sized,
{
    let snapshot = source.fetch_status(repo).await?;

    let mut model = ViewModel::new(PageState::from_snapshot(repo, &snapshot, release_tags));
    let result = reconcile(model.displayed(), &snapshot);
    for mutation in &result.mutations {
        model.apply(mutation);
    }

    Ok(model)
}
