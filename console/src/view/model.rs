//! In-memory status panel

use std::collections::BTreeMap;

use deploy_api::models::TagTarget;
use tracing::trace;

use crate::sync::page::{DisplayedState, PageState};
use crate::sync::reconciler::NO_TASK;
use crate::view::{BadgeStyle, Region, ViewMutation};

/// A labeled element whose style encodes one value of a small enum
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Badge {
    pub style: Option<BadgeStyle>,
    pub text: String,
}

impl Badge {
    fn replace_class(&mut self, style: BadgeStyle) {
        self.style = Some(style);
    }
}

/// Button state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub enabled: bool,
    pub active: bool,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            enabled: true,
            active: false,
        }
    }
}

/// Indicator marking a release tag as the deployed one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIndicator {
    pub tag: TagTarget,
    pub visible: bool,
}

/// Region store of one rendered panel
///
/// Host badges and tag indicators are created once from the [`PageState`] the
/// panel was built from. Mutations addressed to hosts or tags that were not
/// rendered are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    repo: String,
    displayed: DisplayedState,
    status: Badge,
    task_running: String,
    stage: String,
    hosts: BTreeMap<String, Badge>,
    commit_label: String,
    current_tag: String,
    tag_indicators: Vec<TagIndicator>,
    deploy_status_hidden: bool,
    cancel: Button,
    auto_enable: Button,
    auto_disable: Button,
    progress_width: u8,
    progress_text: String,
    selected_tag: Option<TagTarget>,
}

impl ViewModel {
    /// Render an empty panel for `page`
    pub fn new(page: PageState) -> Self {
        let hosts = page
            .hosts
            .into_iter()
            .map(|hostname| (hostname, Badge::default()))
            .collect();

        let tag_indicators = page
            .release_tags
            .into_iter()
            .map(|tag| TagIndicator {
                tag,
                visible: false,
            })
            .collect();

        Self {
            repo: page.repo,
            displayed: page.displayed,
            status: Badge::default(),
            task_running: NO_TASK.to_string(),
            stage: String::new(),
            hosts,
            commit_label: String::new(),
            current_tag: String::new(),
            tag_indicators,
            deploy_status_hidden: true,
            cancel: Button {
                enabled: false,
                active: false,
            },
            auto_enable: Button::default(),
            auto_disable: Button::default(),
            progress_width: 0,
            progress_text: String::new(),
            selected_tag: None,
        }
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Identity fields of the page as it was last rebuilt
    pub fn displayed(&self) -> &DisplayedState {
        &self.displayed
    }

    pub fn status(&self) -> &Badge {
        &self.status
    }

    /// Whether the status badge currently shows the idle style
    pub fn is_idle(&self) -> bool {
        self.status.style == Some(BadgeStyle::Primary)
    }

    pub fn task_running(&self) -> &str {
        &self.task_running
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn host(&self, hostname: &str) -> Option<&Badge> {
        self.hosts.get(hostname)
    }

    pub fn hosts(&self) -> impl Iterator<Item = (&str, &Badge)> {
        self.hosts.iter().map(|(name, badge)| (name.as_str(), badge))
    }

    pub fn commit_label(&self) -> &str {
        &self.commit_label
    }

    pub fn current_tag(&self) -> &str {
        &self.current_tag
    }

    pub fn tag_indicators(&self) -> &[TagIndicator] {
        &self.tag_indicators
    }

    /// Tags whose indicator is shown
    pub fn visible_tags(&self) -> Vec<&str> {
        self.tag_indicators
            .iter()
            .filter(|indicator| indicator.visible)
            .map(|indicator| indicator.tag.name.as_str())
            .collect()
    }

    pub fn deploy_status_hidden(&self) -> bool {
        self.deploy_status_hidden
    }

    pub fn cancel_button(&self) -> Button {
        self.cancel
    }

    pub fn auto_deploy_enable(&self) -> Button {
        self.auto_enable
    }

    pub fn auto_deploy_disable(&self) -> Button {
        self.auto_disable
    }

    pub fn progress_width(&self) -> u8 {
        self.progress_width
    }

    pub fn progress_text(&self) -> &str {
        &self.progress_text
    }

    pub fn selected_tag(&self) -> Option<&TagTarget> {
        self.selected_tag.as_ref()
    }

    /// Choose the rollback target, or clear the choice with `None`
    pub fn select_tag(&mut self, tag: Option<TagTarget>) {
        self.selected_tag = tag;
    }

    /// Release tag rendered on this panel, by name
    pub fn release_tag(&self, name: &str) -> Option<&TagTarget> {
        self.tag_indicators
            .iter()
            .map(|indicator| &indicator.tag)
            .find(|tag| tag.name == name)
    }

    pub fn apply(&mut self, mutation: &ViewMutation) {
        match mutation {
            ViewMutation::SetText { region, text } => match self.text_mut(region) {
                Some(slot) => *slot = text.clone(),
                None => trace!("No text slot for {}", region),
            },
            ViewMutation::ReplaceClass { region, style } => match self.badge_mut(region) {
                Some(badge) => badge.replace_class(*style),
                None => trace!("No badge for {}", region),
            },
            ViewMutation::SetHidden { region, hidden } => match region {
                Region::DeployStatusBlock => self.deploy_status_hidden = *hidden,
                other => trace!("Region {} cannot be hidden", other),
            },
            ViewMutation::SetEnabled { region, enabled } => match self.button_mut(region) {
                Some(button) => button.enabled = *enabled,
                None => trace!("No button for {}", region),
            },
            ViewMutation::SetActive { region, active } => match self.button_mut(region) {
                Some(button) => {
                    button.active = *active;
                    button.enabled = !*active;
                }
                None => trace!("No button for {}", region),
            },
            ViewMutation::SetWidth { region, percent } => match region {
                Region::ProgressBar => self.progress_width = *percent,
                other => trace!("Region {} has no width", other),
            },
            ViewMutation::ShowTagIndicator { tag } => {
                for indicator in &mut self.tag_indicators {
                    indicator.visible = false;
                }
                if let Some(indicator) = self
                    .tag_indicators
                    .iter_mut()
                    .find(|indicator| indicator.tag.name == *tag)
                {
                    indicator.visible = true;
                }
            }
        }
    }

    fn text_mut(&mut self, region: &Region) -> Option<&mut String> {
        match region {
            Region::RepoStatus => Some(&mut self.status.text),
            Region::TaskRunning => Some(&mut self.task_running),
            Region::StageInfo => Some(&mut self.stage),
            Region::Host(hostname) => self.hosts.get_mut(hostname).map(|badge| &mut badge.text),
            Region::CommitId => Some(&mut self.commit_label),
            Region::CurrentTag => Some(&mut self.current_tag),
            Region::ProgressBar => Some(&mut self.progress_text),
            Region::DeployStatusBlock
            | Region::CancelButton
            | Region::AutoDeployEnable
            | Region::AutoDeployDisable => None,
        }
    }

    fn badge_mut(&mut self, region: &Region) -> Option<&mut Badge> {
        match region {
            Region::RepoStatus => Some(&mut self.status),
            Region::Host(hostname) => self.hosts.get_mut(hostname),
            _ => None,
        }
    }

    fn button_mut(&mut self, region: &Region) -> Option<&mut Button> {
        match region {
            Region::CancelButton => Some(&mut self.cancel),
            Region::AutoDeployEnable => Some(&mut self.auto_enable),
            Region::AutoDeployDisable => Some(&mut self.auto_disable),
            _ => None,
        }
    }
}
