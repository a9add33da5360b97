//! Scripted transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tradepost_domain::request::AUTHORIZATION_HEADER;
use tradepost_domain::{ApiRequest, ApiResponse, HttpMethod};

use crate::ports::{HttpClientError, HttpTransport};

type Reply = Result<ApiResponse, HttpClientError>;
type Handler = Box<dyn Fn(&ApiRequest) -> Reply + Send + Sync>;

enum Route {
    /// Replies in order; the last one repeats.
    Queue(VecDeque<Reply>),
    Handler(Handler),
}

/// In-process transport answering from per-route scripts.
///
/// Every call yields to the scheduler before answering, so requests joined
/// on one task interleave the way real network calls do. Unscripted routes
/// answer `404`.
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), Route>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues a JSON reply for `method path`.
    pub fn reply(
        &self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: serde_json::Value,
    ) -> &Self {
        self.push(method, path, Ok(ApiResponse::json(status, &body)))
    }

    /// Queues a transport failure for `method path`.
    pub fn fail(&self, method: HttpMethod, path: &str, error: HttpClientError) -> &Self {
        self.push(method, path, Err(error))
    }

    /// Answers `method path` with a function of the request.
    pub fn respond_with(
        &self,
        method: HttpMethod,
        path: &str,
        handler: impl Fn(&ApiRequest) -> Reply + Send + Sync + 'static,
    ) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Route::Handler(Box::new(handler)));
        self
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) -> &Self {
        let mut routes = self.routes.lock().unwrap();
        let route = routes
            .entry((method, path.to_string()))
            .or_insert_with(|| Route::Queue(VecDeque::new()));
        if let Route::Queue(queue) = route {
            queue.push_back(reply);
        }
        self
    }

    /// All requests seen so far, as sent.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests sent to `path`.
    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// `Authorization` values sent to `path`, in order.
    pub fn authorizations_to(&self, path: &str) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.header(AUTHORIZATION_HEADER).map(String::from))
            .collect()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Reply {
        tokio::task::yield_now().await;

        self.calls.lock().unwrap().push(request.clone());
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(request.method, request.path.clone())) {
            Some(Route::Handler(handler)) => handler(request),
            Some(Route::Queue(queue)) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(Route::Queue(queue)) => queue.front().cloned().unwrap(),
            None => Ok(ApiResponse::json(404, &serde_json::json!({"detail": "Not found."}))),
        }
    }
}

/// Answers `401` unless the request carries `Bearer {token}`.
pub fn require_bearer(
    token: &'static str,
    body: serde_json::Value,
) -> impl Fn(&ApiRequest) -> Reply + Send + Sync + 'static {
    move |request| {
        let expected = format!("Bearer {token}");
        if request.header(AUTHORIZATION_HEADER) == Some(expected.as_str()) {
            Ok(ApiResponse::json(200, &body))
        } else {
            Ok(ApiResponse::json(
                401,
                &serde_json::json!({"detail": "Given token not valid for any token type"}),
            ))
        }
    }
}
