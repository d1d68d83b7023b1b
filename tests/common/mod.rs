#![allow(dead_code, missing_docs, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine as _;
use bytes::Bytes;
use gitea_api::{
    ClientConfig, GiteaClient, HttpClient, HttpClientError, HttpRequest, HttpResponse,
};
use http::{HeaderMap, Method, StatusCode};
use serde_json::{Value, json};
use tokio::sync::Semaphore;

/// Base URL all mock clients are configured with.
pub const BASE_URL: &str = "https://gitea.test/api/v1";

/// A canned reply for one request to a mocked route.
#[derive(Clone, Debug)]
pub enum Reply {
    /// Respond with this status and body.
    Status(StatusCode, String),
    /// Fail the request as a client-side timeout.
    Timeout,
    /// Fail the request as a connection error.
    Refused,
}

/// One request the mock actually served, recorded for assertions.
#[derive(Clone, Debug)]
pub struct Served {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub body: String,
    pub timeout: Option<Duration>,
}

/// Two-phase gate for holding a request open until the test releases it.
struct Gate {
    entered: Arc<Semaphore>,
    release: Arc<Semaphore>,
}

/// Test handle returned by [`MockHttpClient::gate`].
pub struct GateHandle {
    entered: Arc<Semaphore>,
    release: Arc<Semaphore>,
}

impl GateHandle {
    /// Waits until a request has entered the gated route.
    pub async fn entered(&self) {
        let permit = self.entered.acquire().await.unwrap();
        permit.forget();
    }

    /// Lets one gated request proceed.
    pub fn release(&self) {
        self.release.add_permits(1);
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    served: Mutex<Vec<Served>>,
    gates: Mutex<HashMap<String, Gate>>,
}

/// In-memory [`HttpClient`] backed by a canned route table.
///
/// Routes are keyed by method and path (with the `/api/v1` prefix
/// stripped). Queuing more than one reply on a route serves them in
/// order, with the last reply repeating; an unmatched route returns 404.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Arc<MockState>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a `GiteaClient` talking to this mock.
    pub fn client(&self) -> GiteaClient<MockHttpClient> {
        GiteaClient::with_http_client(
            self.clone(),
            ClientConfig {
                base_url: BASE_URL.to_owned(),
                token: None,
                timeout: Duration::from_secs(10),
                markdown_timeout: Duration::from_secs(5),
            },
        )
    }

    /// Queues a reply for `method` `path` (path is relative to the API root).
    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(reply);
    }

    /// Queues a 200 JSON reply for a GET route.
    pub fn on_json(&self, path: &str, body: Value) {
        self.on(
            Method::GET,
            path,
            Reply::Status(StatusCode::OK, body.to_string()),
        );
    }

    /// Queues a 200 plain-text reply for a GET route.
    pub fn on_text(&self, path: &str, body: &str) {
        self.on(
            Method::GET,
            path,
            Reply::Status(StatusCode::OK, body.to_owned()),
        );
    }

    /// Queues an error status with a body for a GET route.
    pub fn on_status(&self, path: &str, status: StatusCode, body: &str) {
        self.on(Method::GET, path, Reply::Status(status, body.to_owned()));
    }

    /// Gates `path` so requests to it block until [`GateHandle::release`].
    pub fn gate(&self, path: &str) -> GateHandle {
        let entered = Arc::new(Semaphore::new(0));
        let release = Arc::new(Semaphore::new(0));
        self.state.gates.lock().unwrap().insert(
            path.to_owned(),
            Gate {
                entered: entered.clone(),
                release: release.clone(),
            },
        );
        GateHandle { entered, release }
    }

    /// All requests served so far, in order.
    pub fn served(&self) -> Vec<Served> {
        self.state.served.lock().unwrap().clone()
    }

    /// Number of requests served for `method` `path`.
    pub fn hits(&self, method: Method, path: &str) -> usize {
        self.state
            .served
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.method == method && s.path == path)
            .count()
    }

    /// The single request served for `path`, panicking if there were
    /// zero or several.
    pub fn the_request(&self, path: &str) -> Served {
        let served = self.state.served.lock().unwrap();
        let mut matches = served.iter().filter(|s| s.path == path);
        let first = matches
            .next()
            .unwrap_or_else(|| panic!("no request served for {path}"))
            .clone();
        assert!(
            matches.next().is_none(),
            "more than one request served for {path}"
        );
        first
    }

    fn reply_for(&self, method: &Method, path: &str) -> Reply {
        let mut routes = self.state.routes.lock().unwrap();
        match routes.get_mut(&(method.clone(), path.to_owned())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| no_route(method, path)),
            None => no_route(method, path),
        }
    }
}

fn no_route(method: &Method, path: &str) -> Reply {
    Reply::Status(
        StatusCode::NOT_FOUND,
        format!("mock has no route for {method} {path}"),
    )
}

impl HttpClient for MockHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let url = url::Url::parse(&request.url)
            .map_err(|e| HttpClientError::Other(format!("bad mock url: {e}").into()))?;
        let path = url
            .path()
            .strip_prefix("/api/v1")
            .unwrap_or(url.path())
            .to_owned();

        self.state.served.lock().unwrap().push(Served {
            method: request.method.clone(),
            path: path.clone(),
            query: url.query().unwrap_or("").to_owned(),
            body: String::from_utf8_lossy(request.body.as_deref().unwrap_or(&[])).into_owned(),
            timeout: request.timeout,
        });

        let gate = {
            let gates = self.state.gates.lock().unwrap();
            gates
                .get(&path)
                .map(|g| (g.entered.clone(), g.release.clone()))
        };
        if let Some((entered, release)) = gate {
            entered.add_permits(1);
            let permit = release.acquire().await.unwrap();
            permit.forget();
        }

        match self.reply_for(&request.method, &path) {
            Reply::Status(status, body) => Ok(HttpResponse {
                status,
                headers: HeaderMap::new(),
                body: Bytes::from(body),
            }),
            Reply::Timeout => Err(HttpClientError::Timeout),
            Reply::Refused => Err(HttpClientError::Connection("connection refused".to_owned())),
        }
    }
}

/// Repository payload shaped like the repos API response.
pub fn repo_json(owner: &str, name: &str, default_branch: &str) -> Value {
    json!({
        "id": 1,
        "owner": {"id": 1, "login": owner, "avatar_url": ""},
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "description": "A test repository",
        "private": false,
        "fork": false,
        "html_url": format!("https://gitea.test/{owner}/{name}"),
        "default_branch": default_branch,
        "stars_count": 4,
        "forks_count": 2,
        "watchers_count": 3,
        "open_issues_count": 1,
        "language": "Rust",
    })
}

/// Directory entry payload for a contents listing.
pub fn dir_json(name: &str, path: &str) -> Value {
    json!({
        "name": name,
        "path": path,
        "type": "dir",
        "size": 0,
        "sha": "dddddddddddddddddddddddddddddddddddddddd",
    })
}

/// File entry payload for a contents listing.
pub fn file_json(name: &str, path: &str, size: u64) -> Value {
    json!({
        "name": name,
        "path": path,
        "type": "file",
        "size": size,
        "sha": "ffffffffffffffffffffffffffffffffffffffff",
    })
}

/// Single-file contents payload with base64-encoded `content`.
pub fn file_content_json(name: &str, path: &str, content: &str) -> Value {
    let encoded = base64::engine::general_purpose::STANDARD.encode(content);
    json!({
        "name": name,
        "path": path,
        "type": "file",
        "size": content.len(),
        "sha": "ffffffffffffffffffffffffffffffffffffffff",
        "encoding": "base64",
        "content": encoded,
        "html_url": format!("https://gitea.test/o/r/src/branch/main/{path}"),
        "download_url": format!("https://gitea.test/o/r/raw/branch/main/{path}"),
    })
}

/// Commit payload; `login` of `None` leaves the API-level author null.
pub fn commit_json(sha: &str, login: Option<&str>, git_name: &str, message: &str) -> Value {
    let author = match login {
        Some(login) => json!({"id": 7, "login": login, "avatar_url": ""}),
        None => Value::Null,
    };
    json!({
        "sha": sha,
        "html_url": format!("https://gitea.test/o/r/commit/{sha}"),
        "author": author,
        "commit": {
            "message": message,
            "author": {
                "name": git_name,
                "email": "dev@gitea.test",
                "date": "2024-06-01T12:00:00Z",
            },
            "committer": {
                "name": git_name,
                "email": "dev@gitea.test",
                "date": "2024-06-01T12:00:00Z",
            },
        },
    })
}

/// Branch payload.
pub fn branch_json(name: &str, sha: &str) -> Value {
    json!({
        "name": name,
        "commit": {"id": sha, "message": "tip", "timestamp": "2024-06-01T12:00:00Z"},
        "protected": name == "main",
    })
}
