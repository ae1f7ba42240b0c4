//! Repository status and command endpoints

use async_trait::async_trait;

use deploy_api::models::StatusSnapshot;

use crate::actions::Action;
use crate::errors::ConsoleError;
use crate::http::client::HttpClient;

/// Source of status snapshots
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current status of `repo`
    async fn fetch_status(&self, repo: &str) -> Result<StatusSnapshot, ConsoleError>;
}

/// Receiver of mutating commands
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Send `action` for `repo`. Resolves once the request is accepted, not when
    /// the deployment or rollback it starts has finished.
    async fn send(&self, repo: &str, action: &Action) -> Result<(), ConsoleError>;
}

#[async_trait]
impl StatusSource for HttpClient {
    async fn fetch_status(&self, repo: &str) -> Result<StatusSnapshot, ConsoleError> {
        let url = self.url(&["repo", repo, "status"])?;
        self.get(url).await
    }
}

#[async_trait]
impl CommandSink for HttpClient {
    async fn send(&self, repo: &str, action: &Action) -> Result<(), ConsoleError> {
        let url = match action {
            Action::CancelAndRollbackNow => self.url(&["repo", repo, "cancel"])?,
            Action::EnableAutoDeploy => self.url(&["repo", repo, "enable_auto"])?,
            Action::DisableAutoDeploy => self.url(&["repo", repo, "disable_auto"])?,
            Action::RollbackToTag(target) => self.url(&[
                "repo",
                repo,
                "rollback",
                &target.commit_id,
                &target.name,
            ])?,
        };
        self.put_empty(url).await
    }
}
