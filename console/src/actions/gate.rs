//! Preconditions of user actions
//!
//! Checks run against the rendered panel, not a fresh fetch. A poll landing
//! between the check and the request can make the decision stale; the backend
//! stays authoritative.

use thiserror::Error;

use deploy_api::models::TagTarget;

use crate::actions::{Action, Intent};
use crate::view::model::ViewModel;

/// Reason an action is refused before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionViolation {
    #[error("no tag selected")]
    NoTagSelected,

    #[error("must be idle to rollback")]
    NotIdle,

    #[error("already on this tag")]
    AlreadyOnTag,

    #[error("auto-deploy disabled, enable and retry")]
    AutoDeployDisabled,
}

/// Resolve `intent` into an [`Action`] if the panel allows it
pub fn check(intent: Intent, view: &ViewModel) -> Result<Action, PreconditionViolation> {
    match intent {
        Intent::CancelAndRollbackNow => Ok(Action::CancelAndRollbackNow),
        Intent::EnableAutoDeploy => Ok(Action::EnableAutoDeploy),
        Intent::DisableAutoDeploy => Ok(Action::DisableAutoDeploy),
        Intent::RollbackToSelectedTag => check_rollback(view).map(Action::RollbackToTag),
    }
}

fn check_rollback(view: &ViewModel) -> Result<TagTarget, PreconditionViolation> {
    let target = view
        .selected_tag()
        .ok_or(PreconditionViolation::NoTagSelected)?;

    if !view.is_idle() {
        return Err(PreconditionViolation::NotIdle);
    }

    if view.current_tag() == target.name {
        return Err(PreconditionViolation::AlreadyOnTag);
    }

    if view.auto_deploy_disable().active {
        return Err(PreconditionViolation::AutoDeployDisabled);
    }

    Ok(target.clone())
}
