//! Wire types for both sides of the adapter
pub mod extensibility;
pub mod local;
pub mod pointer;

pub use extensibility::{
    ExtensibilityError, ExtensibilityOperationRequest, ExtensibilityOperationResponse,
    ExtensibilityResource, ProviderIdentity, ResourceRequest,
};
pub use local::{
    ErrorDetail, ErrorRecord, LocalOperationResponse, LocalResource, ResourceReference,
    ResourceSpecification, SUCCEEDED_STATUS,
};
pub use pointer::{JsonPointer, PointerError};
