/*!
Mock transport for developing against the pipeline without a backend

Replies are scripted per endpoint. Every request is recorded so tests can
assert on the URLs and query strings the controllers produced.
*/

use async_trait::async_trait;
use dashlytics_core::{FetchError, HttpResponse, Transport};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    /// Last path segment, e.g. `country-revenue`.
    pub endpoint: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
enum ReplyKind {
    Response(HttpResponse),
    NetworkError(String),
}

/// One scripted answer, optionally delayed.
#[derive(Debug, Clone)]
pub struct MockReply {
    kind: ReplyKind,
    delay: Option<Duration>,
}

impl MockReply {
    pub fn body(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Response(HttpResponse::new(status, body)),
            delay: None,
        }
    }

    /// 200 with `value` serialised as JSON.
    pub fn json<V: Serialize>(value: &V) -> Self {
        let body = serde_json::to_string(value).unwrap_or_else(|_| "null".into());
        Self::body(200, body)
    }

    pub fn status(status: u16) -> Self {
        Self::body(status, format!("{{\"error\":\"status {status}\"}}"))
    }

    pub fn network_error(msg: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::NetworkError(msg.into()),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct Script {
    sticky: HashMap<String, MockReply>,
    queued: HashMap<String, VecDeque<MockReply>>,
    requests: Vec<RecordedRequest>,
}

/// Mock transport standing in for `HttpTransport`.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used for every request to `endpoint` once its queue is empty.
    pub fn respond(&self, endpoint: &str, reply: MockReply) -> &Self {
        self.script.lock().sticky.insert(endpoint.to_string(), reply);
        self
    }

    /// One-shot reply, consumed in FIFO order before the sticky reply.
    pub fn enqueue(&self, endpoint: &str, reply: MockReply) -> &Self {
        self.script
            .lock()
            .queued
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().requests.clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.script
            .lock()
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.script.lock().requests.len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.script.lock().requests.last().cloned()
    }

    /// Forgets recorded requests and every scripted reply.
    pub fn clear(&self) {
        let mut script = self.script.lock();
        script.sticky.clear();
        script.queued.clear();
        script.requests.clear();
    }

    fn next_reply(&self, url: &Url) -> (RecordedRequest, Option<MockReply>) {
        let endpoint = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();
        let request = RecordedRequest {
            url: url.to_string(),
            query: url.query_pairs().into_owned().collect(),
            endpoint,
        };

        let mut script = self.script.lock();
        script.requests.push(request.clone());
        let queued = script
            .queued
            .get_mut(&request.endpoint)
            .and_then(|q| q.pop_front());
        let reply = match queued {
            Some(reply) => Some(reply),
            None => script.sticky.get(&request.endpoint).cloned(),
        };
        (request, reply)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        let (request, reply) = self.next_reply(url);

        let Some(reply) = reply else {
            log::warn!("🕳️ [MOCK] No reply scripted for {}, answering 404", request.url);
            return Ok(HttpResponse::new(404, "not found"));
        };

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        match reply.kind {
            ReplyKind::Response(response) => {
                log::info!("📤 [MOCK] GET {} -> {}", request.url, response.status);
                Ok(response)
            }
            ReplyKind::NetworkError(msg) => {
                log::info!("💥 [MOCK] GET {} -> network error", request.url);
                Err(FetchError::Network(msg))
            }
        }
    }
}
