//! Interactive confirmation and acknowledgments

use colored::Colorize;
use dialoguer::Confirm;
use tracing::warn;

/// User-facing interaction of the panel
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&self, prompt: &str) -> bool;

    /// Show a message the user has to see
    fn notify(&self, notice: &Notice);
}

/// Message shown to the user after an action request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The backend accepted the command
    Sent,
    /// The backend refused the command or could not be reached
    Failed,
    /// The request never left the panel
    Rejected(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Sent => write!(f, "command sent"),
            Notice::Failed => write!(f, "command failed"),
            Notice::Rejected(reason) => write!(f, "{}", reason),
        }
    }
}

/// Prompter on the controlling terminal
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    /// Reads the terminal on the current worker thread. Requires the
    /// multi-thread runtime.
    fn confirm(&self, prompt: &str) -> bool {
        let answer = tokio::task::block_in_place(|| {
            Confirm::new().with_prompt(prompt).default(false).interact()
        });
        match answer {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }

    fn notify(&self, notice: &Notice) {
        let text = notice.to_string();
        match notice {
            Notice::Sent => println!("{}", text.green()),
            Notice::Failed => println!("{}", text.red()),
            Notice::Rejected(_) => println!("{}", text.yellow()),
        }
    }
}
