//! Requesting filtered results and broadcasting them.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use async_trait::async_trait;
use contracts::shared::Payload;
use contracts::wire::{ACCEPT_HEADER, ACCEPT_JSON, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE};

use crate::error::FetchError;
use crate::hooks::Hooks;
use crate::subscribers::{FetchedEvent, Subscriber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub include_credentials: bool,
}

impl FetchRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn wants_json(&self) -> bool {
        self.header(ACCEPT_HEADER)
            .is_some_and(|accept| accept.to_ascii_lowercase().contains("json"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// Performs a single GET. One request per call, no retries.
#[async_trait(?Send)]
pub trait Transport {
    async fn get(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// `before_fetch` returned `false`.
    Cancelled,
    Delivered(Payload),
    /// A newer request was issued before this one answered.
    Stale,
    Failed,
}

pub type PendingFetch = Pin<Box<dyn Future<Output = FetchOutcome>>>;

/// Default headers with `additional` merged over them, names compared case-insensitively.
pub fn merge_headers(additional: &BTreeMap<String, String>) -> Vec<(String, String)> {
    let mut headers = vec![
        (ACCEPT_HEADER.to_string(), ACCEPT_JSON.to_string()),
        (
            REQUESTED_WITH_HEADER.to_string(),
            REQUESTED_WITH_VALUE.to_string(),
        ),
    ];

    for (name, value) in additional {
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}

#[derive(Clone)]
pub struct FetchPipeline {
    inner: Rc<PipelineInner>,
}

struct PipelineInner {
    action: String,
    headers: Vec<(String, String)>,
    transport: Rc<dyn Transport>,
    hooks: Rc<Hooks>,
    subscribers: RefCell<Vec<Rc<dyn Subscriber>>>,
    latest: Cell<u64>,
}

impl FetchPipeline {
    pub fn new(
        action: String,
        additional_headers: &BTreeMap<String, String>,
        transport: Rc<dyn Transport>,
        hooks: Rc<Hooks>,
    ) -> Self {
        Self {
            inner: Rc::new(PipelineInner {
                action,
                headers: merge_headers(additional_headers),
                transport,
                hooks,
                subscribers: RefCell::new(Vec::new()),
                latest: Cell::new(0),
            }),
        }
    }

    pub fn set_subscribers(&self, subscribers: Vec<Rc<dyn Subscriber>>) {
        *self.inner.subscribers.borrow_mut() = subscribers;
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    pub fn request_for(&self, query: &str) -> FetchRequest {
        FetchRequest {
            url: format!("{}?{}", self.inner.action, query.trim_start_matches('?')),
            headers: self.inner.headers.clone(),
            include_credentials: true,
        }
    }

    /// Fetches results for `query` (without the leading `?`).
    ///
    /// `before_fetch` runs immediately; the request goes out when the returned
    /// future is polled. Only the newest request's response is delivered.
    pub fn run(&self, query: &str) -> PendingFetch {
        if !self.inner.hooks.before_fetch() {
            log::debug!("livefilter: fetch cancelled by beforeFetch");
            return Box::pin(async { FetchOutcome::Cancelled });
        }

        let id = self.inner.latest.get() + 1;
        self.inner.latest.set(id);

        let request = self.request_for(query);
        let inner = self.inner.clone();

        Box::pin(async move {
            let payload = match inner.perform(&request).await {
                Ok(payload) => payload,
                Err(e) => {
                    log::error!("livefilter: fetch of {} failed: {}", request.url, e);
                    return FetchOutcome::Failed;
                }
            };

            if id != inner.latest.get() {
                log::debug!("livefilter: dropping stale response for {}", request.url);
                return FetchOutcome::Stale;
            }

            inner.hooks.after_fetch(&payload);
            inner.broadcast(&payload);
            FetchOutcome::Delivered(payload)
        })
    }
}

impl PipelineInner {
    async fn perform(&self, request: &FetchRequest) -> Result<Payload, FetchError> {
        let response = self.transport.get(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(FetchError::Status(response.status));
        }

        if request.wants_json() {
            Ok(Payload::Json(serde_json::from_str(&response.body)?))
        } else {
            Ok(Payload::Text(response.body))
        }
    }

    fn broadcast(&self, payload: &Payload) {
        let event = FetchedEvent::new(payload.clone());
        // Subscribers may run arbitrary page code; don't hold the borrow across it.
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber.deliver(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeTransport, RecordingSubscriber};
    use serde_json::json;

    fn pipeline(transport: Rc<FakeTransport>, hooks: Hooks) -> FetchPipeline {
        FetchPipeline::new(
            "/search".to_string(),
            &BTreeMap::new(),
            transport,
            Rc::new(hooks),
        )
    }

    #[test]
    fn test_merge_headers_overrides_case_insensitively() {
        let headers = merge_headers(&BTreeMap::from([
            ("accept".to_string(), "text/html".to_string()),
            ("X-Csrf-Token".to_string(), "abc".to_string()),
        ]));
        assert_eq!(
            headers,
            vec![
                ("Accept".to_string(), "text/html".to_string()),
                ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
                ("X-Csrf-Token".to_string(), "abc".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_delivers_json_to_hook_and_subscribers() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond("/search?q=socks", 200, r#"{"items":[1,2]}"#);
        let seen = Rc::new(RefCell::new(None));
        let hooks = {
            let seen = seen.clone();
            Hooks::new().with_after_fetch(move |payload| *seen.borrow_mut() = Some(payload.clone()))
        };
        let pipeline = pipeline(transport.clone(), hooks);
        let subscriber = Rc::new(RecordingSubscriber::default());
        pipeline.set_subscribers(vec![subscriber.clone(), subscriber.clone()]);

        let outcome = pipeline.run("q=socks").await;

        let expected = Payload::Json(json!({ "items": [1, 2] }));
        assert_eq!(outcome, FetchOutcome::Delivered(expected.clone()));
        assert_eq!(*seen.borrow(), Some(expected.clone()));
        assert_eq!(subscriber.events().len(), 2);
        assert_eq!(subscriber.events()[0].name, "livefilterfetched");
        assert_eq!(subscriber.events()[0].data, expected);

        let request = &transport.requests()[0];
        assert_eq!(request.url, "/search?q=socks");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("X-Requested-With"), Some("XMLHttpRequest"));
        assert!(request.include_credentials);
    }

    #[tokio::test]
    async fn test_text_accept_yields_text_payload() {
        let transport = Rc::new(FakeTransport::new());
        transport.respond("/search?q=socks", 200, "<li>socks</li>");
        let pipeline = FetchPipeline::new(
            "/search".to_string(),
            &BTreeMap::from([("Accept".to_string(), "text/html".to_string())]),
            transport,
            Rc::new(Hooks::new()),
        );

        assert_eq!(
            pipeline.run("q=socks").await,
            FetchOutcome::Delivered(Payload::Text("<li>socks</li>".into()))
        );
    }

    #[tokio::test]
    async fn test_before_fetch_can_cancel() {
        let transport = Rc::new(FakeTransport::new());
        let pipeline = pipeline(transport.clone(), Hooks::new().with_before_fetch(|| false));

        assert_eq!(pipeline.run("q=socks").await, FetchOutcome::Cancelled);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let transport = Rc::new(FakeTransport::new());
        transport.fail("/search?q=net");
        transport.respond("/search?q=bad", 200, "not json");
        transport.respond("/search?q=missing", 404, "{}");
        let delivered = Rc::new(Cell::new(0));
        let hooks = {
            let delivered = delivered.clone();
            Hooks::new().with_after_fetch(move |_| delivered.set(delivered.get() + 1))
        };
        let pipeline = pipeline(transport.clone(), hooks);
        let subscriber = Rc::new(RecordingSubscriber::default());
        pipeline.set_subscribers(vec![subscriber.clone()]);

        assert_eq!(pipeline.run("q=net").await, FetchOutcome::Failed);
        assert_eq!(pipeline.run("q=bad").await, FetchOutcome::Failed);
        assert_eq!(pipeline.run("q=missing").await, FetchOutcome::Failed);
        assert_eq!(delivered.get(), 0);
        assert!(subscriber.events().is_empty());
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let transport = Rc::new(FakeTransport::new());
        let pipeline = pipeline(transport, Hooks::new());
        let subscriber = Rc::new(RecordingSubscriber::default());
        pipeline.set_subscribers(vec![subscriber.clone()]);

        let older = pipeline.run("q=s");
        let newer = pipeline.run("q=socks");

        assert!(matches!(newer.await, FetchOutcome::Delivered(_)));
        assert_eq!(older.await, FetchOutcome::Stale);
        assert_eq!(subscriber.events().len(), 1);
    }
}
