//! Local resource extension protocol spoken by the deployment tool
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Status reported for every successful operation
pub const SUCCEEDED_STATUS: &str = "Succeeded";

/// Reference to an existing resource, used by get and delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Provider configuration as a JSON document
    pub config: String,

    /// Identifiers of the resource instance as a JSON document
    pub identifiers: String,
}

/// Desired state of a resource, used by preview and create-or-update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpecification {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Provider configuration as a JSON document
    pub config: String,

    /// Desired resource body as a JSON document
    pub properties: String,
}

/// Resource returned to the tool on success
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalResource {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub status: String,

    /// Provider-facing view of the output
    pub properties: Map<String, Value>,

    pub provisioning_error: Option<ErrorRecord>,

    /// Tool-facing view of the output
    pub extra_properties: Map<String, Value>,
}

/// One entry of an aggregate error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub target: String,
    pub message: String,
}

/// Error returned to the tool
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub code: String,
    pub target: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ErrorDetail>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<Value>,
}

impl ErrorRecord {
    /// A standalone error with no details
    pub fn new(
        code: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
            message: message.into(),
            details: None,
            inner_error: None,
        }
    }
}

/// Response of a local operation, exactly one of a resource or an error
#[derive(Debug, Clone, PartialEq)]
pub enum LocalOperationResponse {
    Success(LocalResource),
    Error(ErrorRecord),
}

impl LocalOperationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn result(&self) -> Option<&LocalResource> {
        match self {
            Self::Success(resource) => Some(resource),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Success(_) => None,
            Self::Error(error) => Some(error),
        }
    }
}

// Wire shape is `{ "result": ..., "error": ... }` with the unused side null
impl Serialize for LocalOperationResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LocalOperationResponse", 2)?;
        state.serialize_field("result", &self.result())?;
        state.serialize_field("error", &self.error())?;
        state.end()
    }
}
