use std::sync::Mutex;

use super::types::{GatewayRequest, GatewayResponse, ModelGateway};
use super::SynthesisError;

/// Failure a [`MockGateway`] reports on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    NotConfigured,
    Unreachable,
    Timeout,
    ServerError,
}

impl MockFailure {
    fn to_error(self) -> SynthesisError {
        match self {
            Self::NotConfigured => SynthesisError::NotConfigured("no API key".into()),
            Self::Unreachable => SynthesisError::Unreachable("http://mock.invalid".into()),
            Self::Timeout => SynthesisError::Timeout(1),
            Self::ServerError => SynthesisError::GatewayStatus {
                status: 503,
                body: "unavailable".into(),
            },
        }
    }
}

/// Mock gateway for testing: returns configurable content and records
/// every request it receives.
pub struct MockGateway {
    outcome: Result<String, MockFailure>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl MockGateway {
    pub fn new(content: &str) -> Self {
        Self {
            outcome: Ok(content.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            outcome: Err(failure),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ModelGateway for MockGateway {
    fn invoke(&self, request: &GatewayRequest) -> Result<GatewayResponse, SynthesisError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let content = self.outcome.clone().map_err(MockFailure::to_error)?;
        Ok(GatewayResponse {
            raw_audit_record: serde_json::json!({
                "backend": "mock",
                "content": content,
            }),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::synthesis::FailureKind;

    fn request() -> GatewayRequest {
        GatewayRequest::structured("system".into(), "user".into())
    }

    #[test]
    fn mock_returns_configured_content() {
        let gateway = MockGateway::new(r#"{"technique": "x"}"#);
        let response = gateway.invoke(&request()).unwrap();
        assert_eq!(response.content, r#"{"technique": "x"}"#);
        assert_eq!(response.raw_audit_record["backend"], "mock");
    }

    #[test]
    fn mock_records_requests_in_order() {
        let gateway = MockGateway::new("{}");
        gateway.invoke(&request()).unwrap();
        gateway
            .invoke(&GatewayRequest::structured("second".into(), "payload".into()))
            .unwrap();
        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].system_directive, "system");
        assert_eq!(requests[1].system_directive, "second");
    }

    #[test]
    fn failing_mock_reports_configuration_errors() {
        for failure in [
            MockFailure::NotConfigured,
            MockFailure::Unreachable,
            MockFailure::Timeout,
            MockFailure::ServerError,
        ] {
            let gateway = MockGateway::failing(failure);
            let err = gateway.invoke(&request()).unwrap_err();
            assert_eq!(err.kind(), FailureKind::Configuration, "{failure:?}");
        }
    }

    #[test]
    fn failing_mock_still_records_request() {
        let gateway = MockGateway::failing(MockFailure::Timeout);
        assert!(gateway.invoke(&request()).is_err());
        assert_eq!(gateway.requests().len(), 1);
    }
}
