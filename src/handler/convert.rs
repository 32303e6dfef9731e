//! Conversions between the local extension protocol and the provider protocol
use serde_json::Value;
use tracing::{error, warn};

use crate::config::ProviderConfig;
use crate::error::{HandlerError, Result};
use crate::protocol::{
    ErrorDetail, ErrorRecord, ExtensibilityError, ExtensibilityOperationRequest,
    ExtensibilityOperationResponse, LocalOperationResponse, LocalResource, ResourceReference,
    ResourceRequest, ResourceSpecification, SUCCEEDED_STATUS,
};
use crate::provider::ProviderFault;

/// Code of the aggregate error reported when a provider returns several errors
pub const MULTIPLE_ERRORS_CODE: &str = "MultipleErrorsOccurred";
const MULTIPLE_ERRORS_MESSAGE: &str = "Multiple errors occurred";

/// Code reported when a provider signals failure without any error
pub const EMPTY_ERROR_RESPONSE_CODE: &str = "EmptyErrorResponse";
const EMPTY_ERROR_RESPONSE_MESSAGE: &str = "The provider reported a failure without any error";

/// Code reported when a provider fails without structured errors
pub const PROVIDER_FAILED_CODE: &str = "ProviderOperationFailed";
const PROVIDER_FAILED_MESSAGE: &str = "The provider failed to complete the operation";

/// Resource identity key: `type` when there is no API version, else `type@apiVersion`
pub fn resource_type_key(resource_type: &str, api_version: Option<&str>) -> String {
    match api_version {
        Some(version) if !version.is_empty() => format!("{}@{}", resource_type, version),
        _ => resource_type.to_string(),
    }
}

fn parse_payload(field: &'static str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|source| HandlerError::InvalidRequestPayload { field, source })
}

fn build_request(
    provider: &ProviderConfig,
    resource_type: &str,
    api_version: Option<&str>,
    config: &str,
    body_field: &'static str,
    body: &str,
) -> Result<ExtensibilityOperationRequest> {
    let config = parse_payload("config", config)?;
    let properties = parse_payload(body_field, body)?;

    Ok(ExtensibilityOperationRequest {
        provider: provider.identity(config),
        resource: ResourceRequest {
            resource_type: resource_type_key(resource_type, api_version),
            properties,
        },
    })
}

/// Provider request for a reference (get, delete), carrying the identifiers
pub fn reference_request(
    provider: &ProviderConfig,
    reference: &ResourceReference,
) -> Result<ExtensibilityOperationRequest> {
    build_request(
        provider,
        &reference.resource_type,
        reference.api_version.as_deref(),
        &reference.config,
        "identifiers",
        &reference.identifiers,
    )
}

/// Provider request for a specification (preview, create-or-update), carrying the properties
pub fn specification_request(
    provider: &ProviderConfig,
    specification: &ResourceSpecification,
) -> Result<ExtensibilityOperationRequest> {
    build_request(
        provider,
        &specification.resource_type,
        specification.api_version.as_deref(),
        &specification.config,
        "properties",
        &specification.properties,
    )
}

fn detail(error: &ExtensibilityError) -> ErrorDetail {
    ErrorDetail {
        code: error.code.clone(),
        target: error.target.to_string(),
        message: error.message.clone(),
    }
}

/// Normalize provider errors into the single error record the tool expects
///
/// One error is forwarded as-is. Several errors are summarized under
/// [`MULTIPLE_ERRORS_CODE`] with every original kept, in order, in `details`.
pub fn to_local_error(errors: &[ExtensibilityError]) -> ErrorRecord {
    match errors {
        [] => {
            warn!("Provider reported an error response with no errors");
            ErrorRecord::new(EMPTY_ERROR_RESPONSE_CODE, "", EMPTY_ERROR_RESPONSE_MESSAGE)
        }
        [single] => ErrorRecord::new(
            single.code.clone(),
            single.target.to_string(),
            single.message.clone(),
        ),
        many => ErrorRecord {
            details: Some(many.iter().map(detail).collect()),
            ..ErrorRecord::new(MULTIPLE_ERRORS_CODE, "", MULTIPLE_ERRORS_MESSAGE)
        },
    }
}

/// Convert a provider response into the tool's response
pub fn to_local_response(
    response: ExtensibilityOperationResponse,
    resource_type: &str,
    api_version: Option<&str>,
) -> LocalOperationResponse {
    match response {
        ExtensibilityOperationResponse::Success { resource } => {
            LocalOperationResponse::Success(LocalResource {
                resource_type: resource_type.to_string(),
                api_version: api_version.map(str::to_string),
                status: SUCCEEDED_STATUS.to_string(),
                properties: resource.properties.clone(),
                provisioning_error: None,
                extra_properties: resource.properties,
            })
        }
        ExtensibilityOperationResponse::Error { errors } => {
            LocalOperationResponse::Error(to_local_error(&errors))
        }
    }
}

/// Convert a raised provider failure into the tool's response
///
/// Structured failures go through [`to_local_error`] exactly like error
/// responses. Anything else is logged and reported with a fixed message.
pub fn fault_to_local_response(fault: ProviderFault) -> LocalOperationResponse {
    match fault {
        ProviderFault::Extensibility { errors } => {
            LocalOperationResponse::Error(to_local_error(&errors))
        }
        ProviderFault::Unexpected(err) => {
            error!("Provider operation failed: {:#}", err);
            provider_failed()
        }
    }
}

/// Response used when the provider failed without any usable error
pub(crate) fn provider_failed() -> LocalOperationResponse {
    LocalOperationResponse::Error(ErrorRecord::new(
        PROVIDER_FAILED_CODE,
        "",
        PROVIDER_FAILED_MESSAGE,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::JsonPointer;
    use serde_json::{json, Map};

    fn reference(api_version: Option<&str>) -> ResourceReference {
        ResourceReference {
            resource_type: "Pod".to_string(),
            api_version: api_version.map(str::to_string),
            config: r#"{"cluster":"a"}"#.to_string(),
            identifiers: r#"{"namespace":"ns","name":"x"}"#.to_string(),
        }
    }

    fn error(code: &str, target: &str, message: &str) -> ExtensibilityError {
        ExtensibilityError::new(code, JsonPointer::parse(target).unwrap(), message)
    }

    #[test]
    fn test_resource_type_key() {
        assert_eq!(resource_type_key("Pod", None), "Pod");
        assert_eq!(resource_type_key("Pod", Some("")), "Pod");
        assert_eq!(resource_type_key("Pod", Some("v1")), "Pod@v1");
        assert_eq!(resource_type_key("apps/Deployment", Some("v1")), "apps/Deployment@v1");
        // no normalization
        assert_eq!(resource_type_key(" pod ", Some(" V1")), " pod @ V1");
    }

    #[test]
    fn test_reference_request() {
        let request =
            reference_request(&ProviderConfig::default(), &reference(Some("v1"))).unwrap();

        assert_eq!(request.provider.name, "Kubernetes");
        assert_eq!(request.provider.version, "1.0.0");
        assert_eq!(request.provider.config, json!({"cluster": "a"}));
        assert_eq!(request.resource.resource_type, "Pod@v1");
        assert_eq!(request.resource.properties, json!({"namespace": "ns", "name": "x"}));
    }

    #[test]
    fn test_specification_request_uses_properties() {
        let specification = ResourceSpecification {
            resource_type: "Namespace".to_string(),
            api_version: None,
            config: "{}".to_string(),
            properties: r#"{"metadata":{"name":"ns"}}"#.to_string(),
        };
        let provider = ProviderConfig {
            name: "Other".to_string(),
            version: "2.1.0".to_string(),
        };

        let request = specification_request(&provider, &specification).unwrap();
        assert_eq!(request.provider.name, "Other");
        assert_eq!(request.provider.version, "2.1.0");
        assert_eq!(request.resource.resource_type, "Namespace");
        assert_eq!(request.resource.properties, json!({"metadata": {"name": "ns"}}));
    }

    #[test]
    fn test_malformed_payloads_name_the_field() {
        let provider = ProviderConfig::default();

        let mut bad_config = reference(None);
        bad_config.config = "{cluster".to_string();
        let err = reference_request(&provider, &bad_config).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidRequestPayload { field: "config", .. }));

        let mut bad_identifiers = reference(None);
        bad_identifiers.identifiers = String::new();
        let err = reference_request(&provider, &bad_identifiers).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidRequestPayload { field: "identifiers", .. }));

        let bad_properties = ResourceSpecification {
            resource_type: "Pod".to_string(),
            api_version: None,
            config: "{}".to_string(),
            properties: "[1,".to_string(),
        };
        let err = specification_request(&provider, &bad_properties).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidRequestPayload { field: "properties", .. }));
    }

    #[test]
    fn test_success_duplicates_properties() {
        let mut properties = Map::new();
        properties.insert("phase".to_string(), json!("Running"));
        properties.insert("podIP".to_string(), json!("10.0.0.7"));

        let response = to_local_response(
            ExtensibilityOperationResponse::success("Pod@v1", properties.clone()),
            "Pod",
            Some("v1"),
        );

        let resource = response.result().unwrap();
        assert_eq!(resource.status, "Succeeded");
        assert_eq!(resource.resource_type, "Pod");
        assert_eq!(resource.api_version.as_deref(), Some("v1"));
        assert_eq!(resource.properties, properties);
        assert_eq!(resource.extra_properties, properties);
        assert!(resource.provisioning_error.is_none());
        assert!(response.error().is_none());
    }

    #[test]
    fn test_single_error_is_forwarded() {
        let record = to_local_error(&[error("NotFound", "/metadata/name", "missing")]);

        assert_eq!(record, ErrorRecord::new("NotFound", "/metadata/name", "missing"));
        assert!(record.details.is_none());
        assert!(record.inner_error.is_none());
    }

    #[test]
    fn test_multiple_errors_are_aggregated_in_order() {
        let errors = [
            error("NotFound", "/a", "missing"),
            error("Conflict", "/b", "locked"),
            error("Invalid", "", "bad"),
        ];

        let record = to_local_error(&errors);
        assert_eq!(record.code, MULTIPLE_ERRORS_CODE);
        assert_eq!(record.target, "");
        assert_eq!(record.message, "Multiple errors occurred");

        let details = record.details.unwrap();
        assert_eq!(details.len(), 3);
        assert_eq!(
            details
                .iter()
                .map(|d| (d.code.as_str(), d.target.as_str(), d.message.as_str()))
                .collect::<Vec<_>>(),
            vec![
                ("NotFound", "/a", "missing"),
                ("Conflict", "/b", "locked"),
                ("Invalid", "", "bad")
            ]
        );
    }

    #[test]
    fn test_empty_error_list() {
        let record = to_local_error(&[]);
        assert_eq!(record.code, EMPTY_ERROR_RESPONSE_CODE);
        assert!(record.details.is_none());
    }

    #[test]
    fn test_raised_and_returned_errors_match() {
        let errors = vec![error("NotFound", "/a", "missing"), error("Conflict", "/b", "locked")];

        let returned = to_local_response(
            ExtensibilityOperationResponse::error(errors.clone()),
            "Pod",
            None,
        );
        let raised = fault_to_local_response(ProviderFault::extensibility(errors));

        assert_eq!(
            serde_json::to_string(&returned).unwrap(),
            serde_json::to_string(&raised).unwrap()
        );
    }

    #[test]
    fn test_unexpected_fault_hides_details() {
        let fault: ProviderFault =
            anyhow::anyhow!("dial tcp 10.0.0.1:6443: connection refused").into();
        let response = fault_to_local_response(fault);

        let record = response.error().unwrap();
        assert_eq!(record.code, PROVIDER_FAILED_CODE);
        assert!(!record.message.contains("10.0.0.1"));
    }
}
