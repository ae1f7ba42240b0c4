//! Page identity and rebuild input

use deploy_api::models::{StatusSnapshot, TagTarget};

/// Identity fields of the rendered page
///
/// Reflects the page as it was last rebuilt, not the last fetched snapshot.
/// A change in either field means the page is stale as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayedState {
    pub commit_id: String,
    pub tag_waiting_list: Vec<String>,
}

impl DisplayedState {
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        Self {
            commit_id: snapshot.last_commit.clone(),
            tag_waiting_list: snapshot.task_waiting.clone(),
        }
    }

    /// Whether `snapshot` changed the deployed commit or the waiting queue.
    /// Queues are compared in their comma-joined form.
    pub fn diverges_from(&self, snapshot: &StatusSnapshot) -> bool {
        self.commit_id != snapshot.last_commit
            || self.tag_waiting_list.join(",") != snapshot.task_waiting.join(",")
    }
}

/// Everything needed to render a panel from scratch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub repo: String,

    /// Hosts that get a badge
    pub hosts: Vec<String>,

    /// Tags that get an indicator and can be selected for rollback
    pub release_tags: Vec<TagTarget>,

    pub displayed: DisplayedState,
}

impl PageState {
    /// Build the page for `snapshot`.
    ///
    /// The tag of the deployed commit is always rendered, even when it is not
    /// among `release_tags`.
    pub fn from_snapshot(repo: &str, snapshot: &StatusSnapshot, release_tags: &[TagTarget]) -> Self {
        let mut tags = release_tags.to_vec();
        if !snapshot.last_commit_tag.is_empty()
            && !tags.iter().any(|tag| tag.name == snapshot.last_commit_tag)
        {
            tags.push(TagTarget::new(
                snapshot.last_commit_tag.clone(),
                snapshot.last_commit.clone(),
            ));
        }

        Self {
            repo: repo.to_string(),
            hosts: snapshot.hosts_status.keys().cloned().collect(),
            release_tags: tags,
            displayed: DisplayedState::from_snapshot(snapshot),
        }
    }
}
