use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};

use crate::error::BoxError;

use super::{HttpResponse, Transport};

/// A scripted transport for testing. Replies are served in the order they
/// were queued via the builder; every request is recorded for inspection.
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[derive(Clone)]
enum Reply {
    Http(StatusCode, String),
    Fail(String),
}

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
            fallback: None,
            delay: None,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log lock poisoned")
            .clone()
    }

    /// Highest number of concurrent `post` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<Reply>,
    fallback: Option<Reply>,
    delay: Option<Duration>,
}

impl MockTransportBuilder {
    pub fn reply(mut self, status: StatusCode, body: String) -> Self {
        self.replies.push_back(Reply::Http(status, body));
        self
    }

    pub fn reply_ok(self, body: String) -> Self {
        self.reply(StatusCode::OK, body)
    }

    /// Served once the queued replies run out.
    pub fn repeat_ok(mut self, body: String) -> Self {
        self.fallback = Some(Reply::Http(StatusCode::OK, body));
        self
    }

    pub fn fail(mut self, message: &str) -> Self {
        self.replies.push_back(Reply::Fail(message.to_owned()));
        self
    }

    /// Hold every request open for `delay` before replying.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn build(self) -> Arc<MockTransport> {
        Arc::new(MockTransport {
            replies: Mutex::new(self.replies),
            fallback: self.fallback,
            delay: self.delay,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        url: Url,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<HttpResponse, BoxError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let recorded = RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: serde_json::from_slice(&body)?,
        };
        self.requests
            .lock()
            .expect("request log lock poisoned")
            .push(recorded);

        let reply = self
            .replies
            .lock()
            .expect("reply queue lock poisoned")
            .pop_front()
            .or_else(|| self.fallback.clone());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Some(Reply::Http(status, body)) => Ok(HttpResponse { status, body }),
            Some(Reply::Fail(message)) => Err(message.into()),
            None => Err("mock transport has no reply queued".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_served_in_order_then_fallback() {
        let transport = MockTransport::builder()
            .reply_ok("first".into())
            .reply(StatusCode::BAD_GATEWAY, "second".into())
            .repeat_ok("again".into())
            .build();
        let url = Url::parse("http://127.0.0.1:37128/").expect("static url");

        let mut bodies = Vec::new();
        for _ in 0..4 {
            let reply = transport
                .post(url.clone(), &HeaderMap::new(), b"{}".to_vec())
                .await
                .expect("reply must be queued");
            bodies.push((reply.status, reply.body));
        }

        assert_eq!(bodies[0], (StatusCode::OK, "first".to_owned()));
        assert_eq!(bodies[1], (StatusCode::BAD_GATEWAY, "second".to_owned()));
        assert_eq!(bodies[3], (StatusCode::OK, "again".to_owned()));
        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test]
    async fn empty_queue_is_an_error() {
        let transport = MockTransport::builder().build();
        let url = Url::parse("http://127.0.0.1:37128/").expect("static url");
        assert!(transport
            .post(url, &HeaderMap::new(), b"null".to_vec())
            .await
            .is_err());
    }
}
