use notedesk::domain::{Note, Tag, User, UserId};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Response, Uri};
use axum::Router;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// The two notes used throughout the scenarios
#[allow(dead_code)]
pub fn sample_notes() -> Vec<Note> {
    vec![
        Note::new("1", "Groceries", "milk,eggs").with_tags(vec![Tag::new("t1", "home")]),
        Note::new("2", "Work plan", "roadmap"),
    ]
}

#[allow(dead_code)]
pub fn sample_tags() -> Vec<Tag> {
    vec![Tag::new("t1", "home"), Tag::new("t2", "work")]
}

#[allow(dead_code)]
pub fn sample_user() -> User {
    User {
        id: UserId("u1".to_string()),
        email: "me@example.com".to_string(),
    }
}

#[allow(dead_code)]
pub fn ids(notes: &[&Note]) -> Vec<String> {
    notes.iter().map(|n| n.id.to_string()).collect()
}

/// A request as seen by [`StubServer`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

#[allow(dead_code)]
impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![],
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[allow(dead_code)]
#[derive(Clone)]
struct StubState {
    routes: Arc<Vec<(String, String, StubResponse)>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server answering canned responses by method and path.
///
/// Runs an axum router on its own tokio runtime so the blocking client under
/// test can call it from the test thread. Unknown routes get a JSON 404.
#[allow(dead_code)]
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl StubServer {
    pub fn start(routes: Vec<(&str, &str, StubResponse)>) -> Self {
        let state = StubState {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(m, p, r)| (m.to_string(), p.to_string(), r))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = Arc::clone(&state.requests);

        let (addr_tx, addr_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub server");
                addr_tx
                    .send(listener.local_addr().expect("local addr"))
                    .expect("report stub address");
                let app = Router::new().fallback(respond).with_state(state);
                axum::serve(listener, app).await.expect("serve stub");
            });
        });
        let addr = addr_rx.recv().expect("stub server address");

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

// Recorded before answering, so a client holding its response already sees
// its request in `requests()`.
#[allow(dead_code)]
async fn respond(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> axum::response::Response {
    let method = method.to_string();
    let path = uri.path().to_string();
    state.requests.lock().expect("requests lock").push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect(),
        body,
    });

    let stub = state
        .routes
        .iter()
        .find(|(m, p, _)| m == &method && p == &path)
        .map(|(_, _, r)| r.clone())
        .unwrap_or_else(|| StubResponse::json(404, r#"{"detail":"Not found"}"#));

    let mut response = Response::builder()
        .status(stub.status)
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in &stub.headers {
        response = response.header(name.as_str(), value.as_str());
    }
    response.body(Body::from(stub.body)).expect("stub response")
}
