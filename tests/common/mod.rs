// Mock drive service for integration tests.
//
// An axum app served by `axum_server` on a background tokio runtime. Every
// request is collected into a `RecordedRequest` and answered with whatever
// the test's handler returns, so the blocking client under test talks real
// HTTP to a server it fully controls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    extract::Query,
    http::{header::SET_COOKIE, HeaderMap, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use tokio::runtime::Runtime;

use thunderdrive_cli::{DriveConfig, DriveSession};

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: StatusCode,
    pub cookies: Vec<String>,
    pub body: String,
}

impl MockResponse {
    pub fn json(value: serde_json::Value) -> Self {
        MockResponse {
            status: StatusCode::OK,
            cookies: Vec::new(),
            body: value.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        MockResponse {
            status: StatusCode::from_u16(status).expect("valid status code"),
            cookies: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.cookies.push(cookie.to_string());
        self
    }

    fn into_response(self) -> Response {
        let mut builder = Response::builder()
            .status(self.status)
            .header("Content-Type", "application/json");
        for cookie in &self.cookies {
            builder = builder.header(SET_COOKIE, cookie);
        }
        builder
            .body(Body::from(self.body))
            .expect("Failed to build response")
    }
}

type Handler = dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync;

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    // Keeps the server task alive for as long as the test holds the mock.
    _runtime: Runtime,
}

impl MockServer {
    pub fn start<H>(handler: H) -> Self
    where
        H: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        listener
            .set_nonblocking(true)
            .expect("Failed to set listener to non-blocking mode");
        let addr = listener.local_addr().unwrap();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);
        let recorded = Arc::clone(&requests);
        let app = Router::new().fallback(move |req: Request<Body>| {
            let handler = Arc::clone(&handler);
            let recorded = Arc::clone(&recorded);
            async move { respond(req, handler.as_ref(), &recorded).await }
        });

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("Failed to build mock server runtime");
        runtime.spawn(async move {
            if let Err(e) = axum_server::from_tcp(listener)
                .serve(app.into_make_service())
                .await
            {
                eprintln!("Mock server error: {}", e);
            }
        });

        MockServer {
            base_url: format!("http://{}", addr),
            requests,
            _runtime: runtime,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn config(&self) -> DriveConfig {
        DriveConfig::default().with_base_url(self.base_url.clone())
    }

    pub fn session(&self) -> DriveSession {
        DriveSession::new(self.config()).expect("session for mock server")
    }
}

/// Record the request before answering, so a test that has seen the
/// response also sees the request.
async fn respond(
    req: Request<Body>,
    handler: &Handler,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Response {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .expect("Failed to read request body")
        .to_bytes();
    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(q)| q)
        .unwrap_or_default();

    let request = RecordedRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query,
        headers: parts.headers,
        body,
    };
    let response = handler(&request);
    recorded.lock().unwrap().push(request);
    response.into_response()
}

/// Login response the service sends for `user_id`, with the session cookies
/// it hands out alongside.
pub fn login_success(user_id: u64, xsrf: &str) -> MockResponse {
    use base64::{engine::general_purpose, Engine as _};
    let payload = serde_json::json!({ "user": { "id": user_id } }).to_string();
    MockResponse::json(serde_json::json!({
        "status": "success",
        "data": general_purpose::STANDARD.encode(payload),
    }))
    .with_cookie(&format!("XSRF-TOKEN={}; Path=/", xsrf))
    .with_cookie("laravel_session=sess; Path=/; HttpOnly")
}

/// One listing page holding entries `ids`.
pub fn entries_page(ids: &[u64], to: u64, total: u64, next: bool) -> serde_json::Value {
    let data: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "id": id, "name": format!("entry-{}", id), "type": "file" }))
        .collect();
    serde_json::json!({
        "current_page": 1,
        "data": data,
        "next_page_url": if next { serde_json::json!("/secure/drive/entries?page=next") } else { serde_json::Value::Null },
        "prev_page_url": null,
        "to": to,
        "total": total,
    })
}
