//! User actions on the panel

pub mod dispatch;
pub mod gate;
pub mod prompt;

use std::fmt;

use deploy_api::models::TagTarget;

use crate::view::{Region, ViewMutation};

/// What the user asked for, before preconditions are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CancelAndRollbackNow,
    EnableAutoDeploy,
    DisableAutoDeploy,
    /// Roll back to the tag currently selected on the panel
    RollbackToSelectedTag,
}

/// A command that passed the gate and can be sent to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CancelAndRollbackNow,
    EnableAutoDeploy,
    DisableAutoDeploy,
    RollbackToTag(TagTarget),
}

impl Action {
    /// Question the user has to confirm before the command is sent
    pub fn confirmation_prompt(&self) -> String {
        match self {
            Action::CancelAndRollbackNow => {
                "Stop the current deployment immediately and roll back?".to_string()
            }
            Action::EnableAutoDeploy => "Enable auto-deploy?".to_string(),
            Action::DisableAutoDeploy => "Disable auto-deploy?".to_string(),
            Action::RollbackToTag(target) => format!("Roll back to tag {}?", target.name),
        }
    }

    /// Local update applied as soon as the backend accepts the command.
    /// The next poll overrides it.
    pub fn optimistic_mutations(&self) -> Vec<ViewMutation> {
        match self {
            Action::CancelAndRollbackNow => vec![ViewMutation::SetEnabled {
                region: Region::CancelButton,
                enabled: false,
            }],
            Action::EnableAutoDeploy => ViewMutation::auto_deploy(true),
            // the backend pins the repository to the target tag
            Action::DisableAutoDeploy | Action::RollbackToTag(_) => {
                ViewMutation::auto_deploy(false)
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CancelAndRollbackNow => write!(f, "cancel"),
            Action::EnableAutoDeploy => write!(f, "enable_auto"),
            Action::DisableAutoDeploy => write!(f, "disable_auto"),
            Action::RollbackToTag(target) => {
                write!(f, "rollback to {} ({})", target.name, target.commit_id)
            }
        }
    }
}
