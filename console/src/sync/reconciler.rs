//! Status reconciler
//!
//! Turns a fetched [`StatusSnapshot`] into the list of view mutations that
//! brings the panel in line with it, or decides that the panel has to be
//! rebuilt because its identity fields moved.

use deploy_api::models::{DeployStatus, StatusSnapshot};

use crate::sync::page::DisplayedState;
use crate::view::{host_badge, status_badge, Region, ViewMutation};

/// Placeholder of the task label when nothing runs
pub const NO_TASK: &str = "none";

/// Result of reconciling one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileResult {
    pub mutations: Vec<ViewMutation>,

    /// The page must be rebuilt; `mutations` is empty
    pub resync: bool,
}

impl ReconcileResult {
    fn resync() -> Self {
        Self {
            mutations: Vec::new(),
            resync: true,
        }
    }
}

/// Reconcile `next` against the page identified by `prev`
pub fn reconcile(prev: &DisplayedState, next: &StatusSnapshot) -> ReconcileResult {
    if prev.diverges_from(next) {
        return ReconcileResult::resync();
    }

    let mut mutations = Vec::new();

    let (style, label) = status_badge(next.status);
    mutations.push(ViewMutation::ReplaceClass {
        region: Region::RepoStatus,
        style,
    });
    mutations.push(ViewMutation::text(Region::RepoStatus, label));

    if let Some(text) = task_label(next.status, &next.task_running) {
        mutations.push(ViewMutation::text(Region::TaskRunning, text));
    }

    mutations.push(ViewMutation::text(Region::StageInfo, next.stage.clone()));

    for (hostname, status) in &next.hosts_status {
        let (style, label) = host_badge(*status);
        let region = Region::Host(hostname.clone());
        mutations.push(ViewMutation::ReplaceClass {
            region: region.clone(),
            style,
        });
        mutations.push(ViewMutation::text(region, label));
    }

    mutations.push(ViewMutation::SetHidden {
        region: Region::DeployStatusBlock,
        hidden: next.status == DeployStatus::Idle,
    });

    mutations.push(ViewMutation::text(Region::CommitId, commit_label(next)));
    mutations.push(ViewMutation::text(
        Region::CurrentTag,
        next.last_commit_tag.clone(),
    ));
    mutations.push(ViewMutation::ShowTagIndicator {
        tag: next.last_commit_tag.clone(),
    });

    mutations.push(ViewMutation::SetEnabled {
        region: Region::CancelButton,
        enabled: cancel_enabled(next),
    });

    mutations.extend(ViewMutation::auto_deploy(next.auto_deploy_enable));

    mutations.push(ViewMutation::SetWidth {
        region: Region::ProgressBar,
        percent: next.process_percent,
    });
    mutations.push(ViewMutation::text(
        Region::ProgressBar,
        format!("{}%", next.process_percent),
    ));

    ReconcileResult {
        mutations,
        resync: false,
    }
}

/// Task label text, `None` when the label is left as it is.
///
/// An idle repository reporting a task in flight keeps its previous label.
pub fn task_label(status: DeployStatus, task_running: &str) -> Option<String> {
    if task_running.is_empty() {
        return Some(NO_TASK.to_string());
    }
    match status {
        DeployStatus::Running => Some(format!("deploying {}", task_running)),
        DeployStatus::RollingBack => Some(format!(
            "reverting deployment of {}, rolling back",
            task_running
        )),
        DeployStatus::Idle => None,
    }
}

/// Commit id, suffixed with ` / <tag>` when the commit is tagged
pub fn commit_label(snapshot: &StatusSnapshot) -> String {
    if snapshot.last_commit_tag.is_empty() {
        snapshot.last_commit.clone()
    } else {
        format!("{} / {}", snapshot.last_commit, snapshot.last_commit_tag)
    }
}

/// A cancel can be requested unless one is already in flight or the
/// repository is rolling back.
pub fn cancel_enabled(snapshot: &StatusSnapshot) -> bool {
    !snapshot.cancel_flag && snapshot.status != DeployStatus::RollingBack
}
