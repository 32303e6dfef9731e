//! JSON entry point for hosts that receive raw request bodies
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::operation::LocalOperation;
use super::resource::GenericResourceHandler;
use crate::error::{HandlerError, Result};
use crate::protocol::LocalOperationResponse;

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| HandlerError::InvalidRequestPayload {
        field: "request",
        source,
    })
}

/// Run `operation` with a request decoded from `body`
pub async fn dispatch<H>(
    handler: &H,
    operation: LocalOperation,
    body: &str,
    cancel: CancellationToken,
) -> Result<LocalOperationResponse>
where
    H: GenericResourceHandler + ?Sized,
{
    debug!("Dispatching {} ({} bytes)", operation, body.len());

    match operation {
        LocalOperation::Get => handler.get(decode(body)?, cancel).await,
        LocalOperation::Delete => handler.delete(decode(body)?, cancel).await,
        LocalOperation::Preview => handler.preview(decode(body)?, cancel).await,
        LocalOperation::CreateOrUpdate => handler.create_or_update(decode(body)?, cancel).await,
    }
}

/// Like [`dispatch`], returning the encoded response
pub async fn dispatch_json<H>(
    handler: &H,
    operation: LocalOperation,
    body: &str,
    cancel: CancellationToken,
) -> Result<String>
where
    H: GenericResourceHandler + ?Sized,
{
    let response = dispatch(handler, operation, body, cancel).await?;
    serde_json::to_string(&response).map_err(HandlerError::ResponseEncoding)
}
