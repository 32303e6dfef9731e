//! Resource handler that forwards local operations to an extensibility provider
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::convert::{
    fault_to_local_response, provider_failed, reference_request, specification_request,
    to_local_response,
};
use super::operation::LocalOperation;
use crate::config::AdapterConfig;
use crate::error::{HandlerError, Result};
use crate::protocol::{
    ExtensibilityOperationRequest, LocalOperationResponse, ResourceReference,
    ResourceSpecification,
};
use crate::provider::{ExtensibilityProvider, ProviderFactory, ProviderResult};

/// Handler for every resource type of the local extension protocol
#[async_trait]
pub trait GenericResourceHandler: Send + Sync {
    /// Read the current state of an existing resource
    async fn get(
        &self,
        request: ResourceReference,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse>;

    /// Remove an existing resource
    async fn delete(
        &self,
        request: ResourceReference,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse>;

    /// Compute what would change without committing it
    async fn preview(
        &self,
        request: ResourceSpecification,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse>;

    /// Converge the resource to the desired specification
    async fn create_or_update(
        &self,
        request: ResourceSpecification,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse>;
}

/// Adapter from the local extension protocol to an extensibility provider
///
/// Holds no state besides its configuration and provider factory, so one
/// handler can serve concurrent requests.
pub struct ResourceHandler<F> {
    config: AdapterConfig,
    factory: F,
}

impl<F: ProviderFactory> ResourceHandler<F> {
    /// Create a new resource handler
    pub fn new(config: AdapterConfig, factory: F) -> Self {
        Self { config, factory }
    }

    async fn execute(
        &self,
        operation: LocalOperation,
        resource_type: &str,
        api_version: Option<&str>,
        request: Result<ExtensibilityOperationRequest>,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse> {
        if cancel.is_cancelled() {
            warn!("{} of {} cancelled before start", operation, resource_type);
            return Err(HandlerError::Cancelled {
                operation: operation.name(),
            });
        }

        let request = request?;
        debug!("{} {}", operation, request.resource.resource_type);

        // factory and synchronous provider panics are caught here as well
        let call = AssertUnwindSafe(async {
            let provider = self.factory.create();
            invoke(&provider, operation, request, cancel.clone()).await
        })
        .catch_unwind();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(
                    "{} of {} cancelled while waiting for the provider",
                    operation, resource_type
                );
                return Err(HandlerError::Cancelled {
                    operation: operation.name(),
                });
            }
            outcome = call => outcome,
        };

        let response = match outcome {
            Ok(Ok(response)) => to_local_response(response, resource_type, api_version),
            Ok(Err(fault)) => {
                debug!("{} of {} raised: {}", operation, resource_type, fault);
                fault_to_local_response(fault)
            }
            Err(panic) => {
                error!(
                    "Provider panicked during {} of {}: {}",
                    operation,
                    resource_type,
                    panic_message(&*panic)
                );
                provider_failed()
            }
        };

        debug!(
            "{} of {} finished (success: {})",
            operation,
            resource_type,
            response.is_success()
        );

        Ok(response)
    }
}

fn invoke<'a, P: ExtensibilityProvider>(
    provider: &'a P,
    operation: LocalOperation,
    request: ExtensibilityOperationRequest,
    cancel: CancellationToken,
) -> BoxFuture<'a, ProviderResult> {
    match operation {
        LocalOperation::Get => provider.get(request, cancel),
        LocalOperation::Delete => provider.delete(request, cancel),
        LocalOperation::Preview => provider.preview_save(request, cancel),
        LocalOperation::CreateOrUpdate => provider.save(request, cancel),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[async_trait]
impl<F: ProviderFactory> GenericResourceHandler for ResourceHandler<F> {
    async fn get(
        &self,
        request: ResourceReference,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse> {
        let converted = reference_request(&self.config.provider, &request);
        self.execute(
            LocalOperation::Get,
            &request.resource_type,
            request.api_version.as_deref(),
            converted,
            cancel,
        )
        .await
    }

    async fn delete(
        &self,
        request: ResourceReference,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse> {
        let converted = reference_request(&self.config.provider, &request);
        self.execute(
            LocalOperation::Delete,
            &request.resource_type,
            request.api_version.as_deref(),
            converted,
            cancel,
        )
        .await
    }

    async fn preview(
        &self,
        request: ResourceSpecification,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse> {
        let converted = specification_request(&self.config.provider, &request);
        self.execute(
            LocalOperation::Preview,
            &request.resource_type,
            request.api_version.as_deref(),
            converted,
            cancel,
        )
        .await
    }

    async fn create_or_update(
        &self,
        request: ResourceSpecification,
        cancel: CancellationToken,
    ) -> Result<LocalOperationResponse> {
        let converted = specification_request(&self.config.provider, &request);
        self.execute(
            LocalOperation::CreateOrUpdate,
            &request.resource_type,
            request.api_version.as_deref(),
            converted,
            cancel,
        )
        .await
    }
}
