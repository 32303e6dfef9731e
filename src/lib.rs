//! Kubernetes resource extension
//!
//! Adapts the local resource extension protocol of a declarative deployment
//! tool to the generic extensibility operations of a resource provider.
//! Requests are converted, handed to a freshly created provider, and the
//! provider's outcome (a response, a raised error, or a panic) is normalized
//! into a single response shape.
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod protocol;
pub mod provider;

pub use config::{AdapterConfig, ProviderConfig};
pub use error::{HandlerError, Result};
pub use handler::{
    dispatch, dispatch_json, to_local_error, GenericResourceHandler, LocalOperation,
    ResourceHandler,
};
pub use logging::init_tracing;
pub use protocol::{
    ErrorDetail, ErrorRecord, ExtensibilityError, ExtensibilityOperationRequest,
    ExtensibilityOperationResponse, JsonPointer, LocalOperationResponse, LocalResource,
    ResourceReference, ResourceSpecification,
};
pub use provider::{ExtensibilityProvider, ProviderFactory, ProviderFault};

// Re-exported so providers can share the caller's token type
pub use tokio_util::sync::CancellationToken;
