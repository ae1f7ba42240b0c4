//! Terminal rendering of the status panel

use std::io::{IsTerminal, Write};

use chrono::Local;
use colored::{ColoredString, Colorize};
use tracing::warn;

use crate::view::model::{Badge, ViewModel};
use crate::view::{BadgeStyle, ViewPort};

/// Clear screen and move the cursor home
const CLEAR: &str = "\x1B[2J\x1B[H";

/// Status panel redrawn on stdout after every applied batch
pub struct TerminalView {
    model: ViewModel,
    clear_screen: bool,
}

impl TerminalView {
    pub fn new(model: ViewModel) -> Self {
        Self {
            model,
            clear_screen: std::io::stdout().is_terminal(),
        }
    }
}

impl ViewPort for TerminalView {
    fn model(&self) -> &ViewModel {
        &self.model
    }

    fn model_mut(&mut self) -> &mut ViewModel {
        &mut self.model
    }

    fn flush(&mut self) {
        let mut stdout = std::io::stdout().lock();
        let frame = render(&self.model, &Local::now().format("%H:%M:%S").to_string());
        let result = if self.clear_screen {
            write!(stdout, "{}{}", CLEAR, frame)
        } else {
            write!(stdout, "{}", frame)
        };
        if let Err(e) = result.and_then(|_| stdout.flush()) {
            warn!("Failed to render status panel: {}", e);
        }
    }
}

fn paint(text: &str, style: Option<BadgeStyle>) -> ColoredString {
    match style {
        Some(BadgeStyle::Primary) => text.blue().bold(),
        Some(BadgeStyle::Success) => text.green().bold(),
        Some(BadgeStyle::Danger) => text.red().bold(),
        Some(BadgeStyle::Info) => text.cyan().bold(),
        None => text.normal(),
    }
}

fn badge(badge: &Badge) -> ColoredString {
    paint(&format!("[{}]", badge.text), badge.style)
}

/// Render the panel as text
pub fn render(model: &ViewModel, updated_at: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {}  {}\n",
        model.repo().bold(),
        badge(model.status()),
        format!("updated {}", updated_at).dimmed()
    ));
    out.push_str(&format!("task:     {}\n", model.task_running()));
    out.push_str(&format!("stage:    {}\n", model.stage()));
    out.push_str(&format!("progress: {}\n", model.progress_text()));

    out.push_str("hosts:\n");
    for (hostname, host) in model.hosts() {
        out.push_str(&format!("  {:<24} {}\n", hostname, badge(host)));
    }

    out.push_str(&format!("commit:   {}\n", model.commit_label()));

    let tags: Vec<String> = model
        .tag_indicators()
        .iter()
        .map(|indicator| {
            if indicator.visible {
                format!("*{}", indicator.tag.name).green().to_string()
            } else {
                indicator.tag.name.clone()
            }
        })
        .collect();
    if !tags.is_empty() {
        out.push_str(&format!("tags:     {}\n", tags.join("  ")));
    }

    let auto_deploy = if model.auto_deploy_enable().active {
        "on".green()
    } else {
        "off".red()
    };
    out.push_str(&format!("auto:     {}\n", auto_deploy));

    if !model.deploy_status_hidden() {
        let cancel = if model.cancel_button().enabled {
            "available".normal()
        } else {
            "unavailable".dimmed()
        };
        out.push_str(&format!("cancel:   {}\n", cancel));
    }

    out
}
