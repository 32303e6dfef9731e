//! Extensibility operation protocol spoken by resource providers
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::pointer::JsonPointer;

/// Identifies which provider plugin handles a request, with its configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub name: String,
    pub version: String,
    /// Provider configuration (e.g. cluster context)
    pub config: Value,
}

/// The resource part of a provider request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Resource identity key, `type` or `type@apiVersion`
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Identifiers for reference operations, desired body for specification operations
    pub properties: Value,
}

/// Request passed to a provider operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensibilityOperationRequest {
    pub provider: ProviderIdentity,
    pub resource: ResourceRequest,
}

/// Resource body returned by a successful provider operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensibilityResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub properties: Map<String, Value>,
}

/// A structured error reported by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensibilityError {
    pub code: String,
    pub target: JsonPointer,
    pub message: String,
}

impl ExtensibilityError {
    pub fn new(code: impl Into<String>, target: JsonPointer, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target,
            message: message.into(),
        }
    }
}

/// Outcome of a provider operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensibilityOperationResponse {
    Success { resource: ExtensibilityResource },
    Error { errors: Vec<ExtensibilityError> },
}

impl ExtensibilityOperationResponse {
    /// Successful response carrying the given resource properties
    pub fn success(resource_type: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self::Success {
            resource: ExtensibilityResource {
                resource_type: resource_type.into(),
                properties,
            },
        }
    }

    /// Error response carrying the given errors
    pub fn error(errors: impl IntoIterator<Item = ExtensibilityError>) -> Self {
        Self::Error {
            errors: errors.into_iter().collect(),
        }
    }
}
