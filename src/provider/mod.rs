//! Contract for the resource provider that performs the actual operations
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::protocol::{
    ExtensibilityError, ExtensibilityOperationRequest, ExtensibilityOperationResponse,
};

/// Result of a provider operation
pub type ProviderResult = Result<ExtensibilityOperationResponse, ProviderFault>;

/// A failure raised by a provider instead of being reported as a response
#[derive(Debug, thiserror::Error)]
pub enum ProviderFault {
    /// Raised failure carrying structured errors
    #[error("provider raised {} error(s)", .errors.len())]
    Extensibility { errors: Vec<ExtensibilityError> },

    /// Any other failure
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ProviderFault {
    pub fn extensibility(errors: impl IntoIterator<Item = ExtensibilityError>) -> Self {
        Self::Extensibility {
            errors: errors.into_iter().collect(),
        }
    }
}

/// Generic extensibility operations implemented by a provider
///
/// Implementations should observe `cancel` and stop work promptly once it
/// fires. Retries, if any, are the provider's business.
#[async_trait]
pub trait ExtensibilityProvider: Send + Sync {
    /// Read the current state of an existing resource
    async fn get(
        &self,
        request: ExtensibilityOperationRequest,
        cancel: CancellationToken,
    ) -> ProviderResult;

    /// Remove an existing resource
    async fn delete(
        &self,
        request: ExtensibilityOperationRequest,
        cancel: CancellationToken,
    ) -> ProviderResult;

    /// Compute the result of a save without committing it
    async fn preview_save(
        &self,
        request: ExtensibilityOperationRequest,
        cancel: CancellationToken,
    ) -> ProviderResult;

    /// Converge the resource to the requested state
    async fn save(
        &self,
        request: ExtensibilityOperationRequest,
        cancel: CancellationToken,
    ) -> ProviderResult;
}

/// Creates a fresh provider for every operation
pub trait ProviderFactory: Send + Sync {
    type Provider: ExtensibilityProvider;

    fn create(&self) -> Self::Provider;
}

impl<F, P> ProviderFactory for F
where
    F: Fn() -> P + Send + Sync,
    P: ExtensibilityProvider,
{
    type Provider = P;

    fn create(&self) -> P {
        self()
    }
}
