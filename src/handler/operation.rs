//! The four operations of the local extension protocol
use std::fmt;
use std::str::FromStr;

/// Operation requested by the deployment tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalOperation {
    Get,
    Delete,
    Preview,
    CreateOrUpdate,
}

impl LocalOperation {
    pub const ALL: [LocalOperation; 4] = [
        LocalOperation::Get,
        LocalOperation::Delete,
        LocalOperation::Preview,
        LocalOperation::CreateOrUpdate,
    ];

    /// Protocol name of the operation
    pub fn name(self) -> &'static str {
        match self {
            LocalOperation::Get => "Get",
            LocalOperation::Delete => "Delete",
            LocalOperation::Preview => "Preview",
            LocalOperation::CreateOrUpdate => "CreateOrUpdate",
        }
    }
}

impl fmt::Display for LocalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized operation name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for LocalOperation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocalOperation::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}
