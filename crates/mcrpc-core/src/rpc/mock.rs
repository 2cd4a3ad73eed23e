use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::TransportError;

use super::{HttpRequest, HttpResponse, Transport};

/// A scripted transport for testing. Replays canned responses in order and
/// records every request it is handed.
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("mock transport poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock transport poisoned").len()
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<Result<HttpResponse, TransportError>>,
}

impl MockTransportBuilder {
    pub fn with_response(mut self, status: StatusCode, body: Vec<u8>) -> Self {
        self.replies.push_back(Ok(HttpResponse {
            status,
            reason: None,
            body,
        }));
        self
    }

    /// A response whose status line carries a non-canonical reason phrase.
    pub fn with_reason(mut self, status: StatusCode, reason: &str, body: Vec<u8>) -> Self {
        self.replies.push_back(Ok(HttpResponse {
            status,
            reason: Some(reason.to_owned()),
            body,
        }));
        self
    }

    pub fn with_json(self, status: StatusCode, body: Value) -> Self {
        self.with_response(status, body.to_string().into_bytes())
    }

    /// A 200 response wrapping `result` in a daemon-style envelope.
    pub fn with_result(self, result: Value) -> Self {
        self.with_json(
            StatusCode::OK,
            json!({"result": result, "error": null, "id": 1}),
        )
    }

    /// No HTTP response at all.
    pub fn with_failure(mut self, reason: &str) -> Self {
        self.replies.push_back(Err(TransportError(reason.to_owned())));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .expect("mock transport poisoned")
            .push(request);
        self.replies
            .lock()
            .expect("mock transport poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("mock transport has no reply queued".into())))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderMap;

    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            url: "http://127.0.0.1:1/".into(),
            headers: HeaderMap::new(),
            body: b"{}".to_vec(),
            verify_tls: true,
        }
    }

    #[tokio::test]
    async fn replays_in_order_then_fails() {
        let mock = MockTransport::builder()
            .with_result(json!(1))
            .with_failure("down")
            .build();

        let first = mock.post(request()).await.expect("first reply is a response");
        assert_eq!(first.status, StatusCode::OK);

        let second = mock.post(request()).await.expect_err("second reply is a failure");
        assert_eq!(second.0, "down");

        assert!(mock.post(request()).await.is_err());
        assert_eq!(mock.request_count(), 3);
    }
}
