//! View regions, mutations and the view port capability
//!
//! The reconciler never touches a view directly. It emits [`ViewMutation`]s
//! against named [`Region`]s and a [`ViewPort`] applies them.

pub mod model;
pub mod terminal;

use std::fmt;

use deploy_api::models::{DeployStatus, HostStatus};

use crate::sync::page::PageState;
use crate::view::model::ViewModel;

/// Badge style classes. A badge carries at most one of them at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeStyle {
    Primary,
    Success,
    Danger,
    Info,
}

impl BadgeStyle {
    /// CSS-style class name of the badge
    pub fn class_name(&self) -> &'static str {
        match self {
            BadgeStyle::Primary => "label-primary",
            BadgeStyle::Success => "label-success",
            BadgeStyle::Danger => "label-danger",
            BadgeStyle::Info => "label-info",
        }
    }
}

/// Style and label of the repository status badge
pub fn status_badge(status: DeployStatus) -> (BadgeStyle, &'static str) {
    match status {
        DeployStatus::Running => (BadgeStyle::Success, "deploying"),
        DeployStatus::RollingBack => (BadgeStyle::Danger, "rolling back"),
        DeployStatus::Idle => (BadgeStyle::Primary, "idle"),
    }
}

/// Style and label of a host badge
pub fn host_badge(status: HostStatus) -> (BadgeStyle, &'static str) {
    match status {
        HostStatus::Normal => (BadgeStyle::Primary, "normal"),
        HostStatus::Deploying => (BadgeStyle::Info, "deploying"),
        HostStatus::Success => (BadgeStyle::Success, "deploy succeeded"),
        HostStatus::Fault => (BadgeStyle::Danger, "deploy failed"),
    }
}

/// Named region of the status panel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    RepoStatus,
    TaskRunning,
    StageInfo,
    /// Badge of one host, keyed by hostname
    Host(String),
    CommitId,
    /// Hidden label holding the tag of the deployed commit
    CurrentTag,
    /// Block holding the cancel button, shown while a deployment is active
    DeployStatusBlock,
    CancelButton,
    AutoDeployEnable,
    AutoDeployDisable,
    ProgressBar,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::RepoStatus => write!(f, "repo-status"),
            Region::TaskRunning => write!(f, "task-running"),
            Region::StageInfo => write!(f, "stage-info"),
            Region::Host(hostname) => write!(f, "host[{}]", hostname),
            Region::CommitId => write!(f, "commit-id"),
            Region::CurrentTag => write!(f, "current-tag"),
            Region::DeployStatusBlock => write!(f, "deploy-status"),
            Region::CancelButton => write!(f, "btn-cancel"),
            Region::AutoDeployEnable => write!(f, "btn-auto-enable"),
            Region::AutoDeployDisable => write!(f, "btn-auto-disable"),
            Region::ProgressBar => write!(f, "progress-bar"),
        }
    }
}

/// A single change to a view region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMutation {
    SetText { region: Region, text: String },

    /// Clear every badge style on the region, then apply `style`
    ReplaceClass { region: Region, style: BadgeStyle },

    SetHidden { region: Region, hidden: bool },

    SetEnabled { region: Region, enabled: bool },

    /// An active toggle is highlighted and disabled; an inactive one is clickable
    SetActive { region: Region, active: bool },

    SetWidth { region: Region, percent: u8 },

    /// Show the indicator of `tag` and hide all others. An empty tag hides all.
    ShowTagIndicator { tag: String },
}

impl ViewMutation {
    pub fn text(region: Region, text: impl Into<String>) -> Self {
        ViewMutation::SetText {
            region,
            text: text.into(),
        }
    }

    /// Mutations putting the auto-deploy toggles in the given state.
    /// Exactly one of the two buttons ends up active.
    pub fn auto_deploy(enabled: bool) -> Vec<ViewMutation> {
        vec![
            ViewMutation::SetActive {
                region: Region::AutoDeployEnable,
                active: enabled,
            },
            ViewMutation::SetActive {
                region: Region::AutoDeployDisable,
                active: !enabled,
            },
        ]
    }
}

/// A rendered status panel
///
/// Implementations own a [`ViewModel`] and decide how to present it. Mutations
/// are applied to the model; `flush` is called once per applied batch.
pub trait ViewPort: Send {
    fn model(&self) -> &ViewModel;

    fn model_mut(&mut self) -> &mut ViewModel;

    /// Present the current model
    fn flush(&mut self) {}

    fn apply(&mut self, mutation: &ViewMutation) {
        self.model_mut().apply(mutation);
    }

    fn apply_all(&mut self, mutations: &[ViewMutation]) {
        for mutation in mutations {
            self.apply(mutation);
        }
        self.flush();
    }

    /// Discard all render state and rebuild the panel from `page`
    fn rebuild(&mut self, page: PageState) {
        *self.model_mut() = ViewModel::new(page);
    }
}

impl ViewPort for ViewModel {
    fn model(&self) -> &ViewModel {
        self
    }

    fn model_mut(&mut self) -> &mut ViewModel {
        self
    }
}
