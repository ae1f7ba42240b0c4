//! API models

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Deployment phase of a repository.
///
/// Encoded on the wire as `1` (running), `2` (rolling back) or `3` (idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeployStatus {
    Running,
    RollingBack,
    Idle,
}

impl TryFrom<u8> for DeployStatus {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(DeployStatus::Running),
            2 => Ok(DeployStatus::RollingBack),
            3 => Ok(DeployStatus::Idle),
            other => Err(UnknownCode {
                kind: "deploy status",
                code: other,
            }),
        }
    }
}

impl From<DeployStatus> for u8 {
    fn from(status: DeployStatus) -> Self {
        match status {
            DeployStatus::Running => 1,
            DeployStatus::RollingBack => 2,
            DeployStatus::Idle => 3,
        }
    }
}

/// Per-host deployment state.
///
/// Encoded on the wire as `1` (normal) through `4` (fault).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HostStatus {
    Normal,
    Deploying,
    Success,
    Fault,
}

impl TryFrom<u8> for HostStatus {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(HostStatus::Normal),
            2 => Ok(HostStatus::Deploying),
            3 => Ok(HostStatus::Success),
            4 => Ok(HostStatus::Fault),
            other => Err(UnknownCode {
                kind: "host status",
                code: other,
            }),
        }
    }
}

impl From<HostStatus> for u8 {
    fn from(status: HostStatus) -> Self {
        match status {
            HostStatus::Normal => 1,
            HostStatus::Deploying => 2,
            HostStatus::Success => 3,
            HostStatus::Fault => 4,
        }
    }
}

/// Integer code outside the known range of an enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: u8,
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} code: {}", self.kind, self.code)
    }
}

impl std::error::Error for UnknownCode {}

/// Repository status returned by `GET /repo/{repo}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: DeployStatus,

    /// Tag or head commit of the task in flight, empty when none
    #[serde(deserialize_with = "null_as_empty")]
    pub task_running: String,

    /// Free-text progress description, `null` between deployments
    #[serde(deserialize_with = "null_as_empty")]
    pub stage: String,

    pub hosts_status: BTreeMap<String, HostStatus>,

    #[serde(deserialize_with = "null_as_empty")]
    pub last_commit: String,

    /// Tag of `last_commit`, empty when untagged
    #[serde(deserialize_with = "null_as_empty")]
    pub last_commit_tag: String,

    /// Tags queued behind the running task, in order
    pub task_waiting: Vec<String>,

    pub cancel_flag: bool,

    pub auto_deploy_enable: bool,

    /// 0 to 100
    pub process_percent: u8,
}

/// Decode a nullable string, reading `null` as empty
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A release tag that can be rolled back to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagTarget {
    pub name: String,
    pub commit_id: String,
}

impl TagTarget {
    pub fn new(name: impl Into<String>, commit_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_id: commit_id.into(),
        }
    }
}
