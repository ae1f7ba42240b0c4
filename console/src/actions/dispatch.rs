//! Command dispatcher

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::actions::gate::{self, PreconditionViolation};
use crate::actions::prompt::{Notice, Prompter};
use crate::actions::{Action, Intent};
use crate::http::repo::CommandSink;
use crate::view::ViewPort;

/// How an action request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Refused by the gate, nothing sent
    Rejected(PreconditionViolation),
    /// The user did not confirm
    Declined,
    /// Accepted by the backend
    Sent,
    /// Refused by the backend or not delivered
    Failed,
}

/// Gate, confirm and send one user action.
///
/// The view lock is only held while reading the gate inputs and while applying
/// the optimistic update, never across the request.
pub async fn request<C, P, V>(
    repo: &str,
    intent: Intent,
    sink: &C,
    prompter: &P,
    view: &Mutex<V>,
) -> Outcome
where
    C: CommandSink + ?Sized,
    P: Prompter + ?Sized,
    V: ViewPort,
{
    let checked = {
        let view = view.lock().await;
        gate::check(intent, view.model())
    };

    let action = match checked {
        Ok(action) => action,
        Err(violation) => {
            prompter.notify(&Notice::Rejected(violation.to_string()));
            return Outcome::Rejected(violation);
        }
    };

    if !prompter.confirm(&action.confirmation_prompt()) {
        return Outcome::Declined;
    }

    send(repo, &action, sink, prompter, view).await
}

/// Send a confirmed action and acknowledge the result
pub async fn send<C, P, V>(
    repo: &str,
    action: &Action,
    sink: &C,
    prompter: &P,
    view: &Mutex<V>,
) -> Outcome
where
    C: CommandSink + ?Sized,
    P: Prompter + ?Sized,
    V: ViewPort,
{
    match sink.send(repo, action).await {
        Ok(()) => {
            info!("Command {} accepted for {}", action, repo);
            prompter.notify(&Notice::Sent);
            view.lock().await.apply_all(&action.optimistic_mutations());
            Outcome::Sent
        }
        Err(e) => {
            warn!("Command {} failed for {}: {}", action, repo, e);
            prompter.notify(&Notice::Failed);
            Outcome::Failed
        }
    }
}
