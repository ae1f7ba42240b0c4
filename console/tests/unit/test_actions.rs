//! Action gate and dispatcher tests

use deploy_api::models::{DeployStatus, TagTarget};
use deploy_console::actions::dispatch::{request, Outcome};
use deploy_console::actions::gate::PreconditionViolation;
use deploy_console::actions::prompt::Notice;
use deploy_console::actions::{Action, Intent};
use deploy_console::sync::page::PageState;
use deploy_console::sync::reconciler::reconcile;
use deploy_console::view::model::ViewModel;
use deploy_console::view::ViewPort;
use pretty_assertions::assert_eq;
use tokio::sync::Mutex;

use crate::common::{idle_snapshot, running_snapshot, RecordingSink, ScriptedPrompter};

/// Idle panel on r0.0.2 with auto-deploy on and r0.0.1 selected
fn ready_view() -> ViewModel {
    let snapshot = idle_snapshot();
    let page = PageState::from_snapshot(
        "shop",
        &snapshot,
        &[TagTarget::new("r0.0.1", "aaa"), TagTarget::new("r0.0.2", "abc")],
    );
    let mut view = ViewModel::new(page);
    view.apply_all(&reconcile(view.displayed(), &snapshot).mutations);
    view.select_tag(Some(TagTarget::new("r0.0.1", "aaa")));
    view
}

async fn rollback(view: ViewModel) -> (Outcome, RecordingSink, ScriptedPrompter, ViewModel) {
    let sink = RecordingSink::accepting();
    let prompter = ScriptedPrompter::answering(true);
    let view = Mutex::new(view);

    let outcome = request(
        "shop",
        Intent::RollbackToSelectedTag,
        &sink,
        &prompter,
        &view,
    )
    .await;

    (outcome, sink, prompter, view.into_inner())
}

async fn assert_rejected(view: ViewModel, violation: PreconditionViolation, message: &str) {
    let before = view.clone();
    let (outcome, sink, prompter, after) = rollback(view).await;

    assert_eq!(outcome, Outcome::Rejected(violation));
    assert!(sink.sent().is_empty());
    assert!(prompter.prompts().is_empty());
    assert_eq!(prompter.notices(), vec![Notice::Rejected(message.to_string())]);
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_rollback_without_selection_is_rejected() {
    let mut view = ready_view();
    view.select_tag(None);

    assert_rejected(view, PreconditionViolation::NoTagSelected, "no tag selected").await;
}

#[tokio::test]
async fn test_rollback_while_deploying_is_rejected() {
    let mut view = ready_view();
    let mut snapshot = running_snapshot();
    snapshot.last_commit_tag = "r0.0.2".to_string();
    view.apply_all(&reconcile(view.displayed(), &snapshot).mutations);

    assert_rejected(view, PreconditionViolation::NotIdle, "must be idle to rollback").await;
}

#[tokio::test]
async fn test_rollback_while_rolling_back_is_rejected() {
    let mut view = ready_view();
    let mut snapshot = idle_snapshot();
    snapshot.status = DeployStatus::RollingBack;
    view.apply_all(&reconcile(view.displayed(), &snapshot).mutations);

    assert_rejected(view, PreconditionViolation::NotIdle, "must be idle to rollback").await;
}

#[tokio::test]
async fn test_rollback_to_current_tag_is_rejected() {
    let mut view = ready_view();
    view.select_tag(Some(TagTarget::new("r0.0.2", "abc")));

    assert_rejected(view, PreconditionViolation::AlreadyOnTag, "already on this tag").await;
}

#[tokio::test]
async fn test_rollback_with_auto_deploy_off_is_rejected() {
    let mut view = ready_view();
    let mut snapshot = idle_snapshot();
    snapshot.auto_deploy_enable = false;
    view.apply_all(&reconcile(view.displayed(), &snapshot).mutations);

    assert_rejected(
        view,
        PreconditionViolation::AutoDeployDisabled,
        "auto-deploy disabled, enable and retry",
    )
    .await;
}

#[tokio::test]
async fn test_first_failing_check_wins() {
    let mut view = ready_view();
    let mut snapshot = running_snapshot();
    snapshot.auto_deploy_enable = false;
    view.apply_all(&reconcile(view.displayed(), &snapshot).mutations);
    view.select_tag(Some(TagTarget::new("r0.0.2", "abc")));

    assert_rejected(view, PreconditionViolation::NotIdle, "must be idle to rollback").await;
}

#[tokio::test]
async fn test_rollback_sent_after_confirmation() {
    let (outcome, sink, prompter, view) = rollback(ready_view()).await;

    assert_eq!(outcome, Outcome::Sent);
    assert_eq!(
        sink.sent(),
        vec![Action::RollbackToTag(TagTarget::new("r0.0.1", "aaa"))]
    );
    assert_eq!(prompter.prompts(), vec!["Roll back to tag r0.0.1?".to_string()]);
    assert_eq!(prompter.notices(), vec![Notice::Sent]);
    assert!(view.auto_deploy_disable().active);
    assert!(!view.auto_deploy_enable().active);
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let sink = RecordingSink::accepting();
    let prompter = ScriptedPrompter::answering(false);
    let view = Mutex::new(ready_view());
    let before = view.lock().await.clone();

    for intent in [
        Intent::CancelAndRollbackNow,
        Intent::EnableAutoDeploy,
        Intent::DisableAutoDeploy,
        Intent::RollbackToSelectedTag,
    ] {
        let outcome = request("shop", intent, &sink, &prompter, &view).await;
        assert_eq!(outcome, Outcome::Declined);
    }

    assert!(sink.sent().is_empty());
    assert!(prompter.notices().is_empty());
    assert_eq!(
        prompter.prompts(),
        vec![
            "Stop the current deployment immediately and roll back?".to_string(),
            "Enable auto-deploy?".to_string(),
            "Disable auto-deploy?".to_string(),
            "Roll back to tag r0.0.1?".to_string(),
        ]
    );
    assert_eq!(*view.lock().await, before);
}

#[tokio::test]
async fn test_cancel_disables_button_on_success() {
    let sink = RecordingSink::accepting();
    let prompter = ScriptedPrompter::answering(true);
    let mut model = ready_view();
    model.apply_all(&reconcile(model.displayed(), &running_snapshot_on_tag()).mutations);
    assert!(model.cancel_button().enabled);
    let view = Mutex::new(model);

    let outcome = request("shop", Intent::CancelAndRollbackNow, &sink, &prompter, &view).await;

    assert_eq!(outcome, Outcome::Sent);
    assert_eq!(sink.sent(), vec![Action::CancelAndRollbackNow]);
    assert!(!view.lock().await.cancel_button().enabled);
}

#[tokio::test]
async fn test_auto_deploy_toggles_on_success() {
    let sink = RecordingSink::accepting();
    let prompter = ScriptedPrompter::answering(true);
    let view = Mutex::new(ready_view());

    let outcome = request("shop", Intent::DisableAutoDeploy, &sink, &prompter, &view).await;
    assert_eq!(outcome, Outcome::Sent);
    {
        let view = view.lock().await;
        assert!(view.auto_deploy_disable().active);
        assert!(view.auto_deploy_enable().enabled);
    }

    let outcome = request("shop", Intent::EnableAutoDeploy, &sink, &prompter, &view).await;
    assert_eq!(outcome, Outcome::Sent);
    {
        let view = view.lock().await;
        assert!(view.auto_deploy_enable().active);
        assert!(view.auto_deploy_disable().enabled);
    }

    assert_eq!(
        sink.sent(),
        vec![Action::DisableAutoDeploy, Action::EnableAutoDeploy]
    );
    assert_eq!(prompter.notices(), vec![Notice::Sent, Notice::Sent]);
}

#[tokio::test]
async fn test_failed_command_leaves_view_untouched() {
    let sink = RecordingSink::failing();
    let prompter = ScriptedPrompter::answering(true);
    let view = Mutex::new(ready_view());
    let before = view.lock().await.clone();

    for intent in [
        Intent::CancelAndRollbackNow,
        Intent::EnableAutoDeploy,
        Intent::DisableAutoDeploy,
        Intent::RollbackToSelectedTag,
    ] {
        let outcome = request("shop", intent, &sink, &prompter, &view).await;
        assert_eq!(outcome, Outcome::Failed);
    }

    assert_eq!(sink.sent().len(), 4);
    assert_eq!(prompter.notices(), vec![Notice::Failed; 4]);
    assert_eq!(*view.lock().await, before);
}

#[tokio::test]
async fn test_next_poll_overrides_optimistic_update() {
    let sink = RecordingSink::accepting();
    let prompter = ScriptedPrompter::answering(true);
    let view = Mutex::new(ready_view());

    request("shop", Intent::DisableAutoDeploy, &sink, &prompter, &view).await;
    assert!(view.lock().await.auto_deploy_disable().active);

    // backend still reports auto-deploy on
    let mut view = view.into_inner();
    view.apply_all(&reconcile(view.displayed(), &idle_snapshot()).mutations);
    assert!(view.auto_deploy_enable().active);
}

#[test]
fn test_notice_messages() {
    assert_eq!(Notice::Sent.to_string(), "command sent");
    assert_eq!(Notice::Failed.to_string(), "command failed");
    assert_eq!(
        Notice::Rejected("no tag selected".to_string()).to_string(),
        "no tag selected"
    );
}

fn running_snapshot_on_tag() -> deploy_api::models::StatusSnapshot {
    let mut snapshot = running_snapshot();
    snapshot.last_commit_tag = "r0.0.2".to_string();
    snapshot
}
