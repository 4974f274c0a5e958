//! In-process document backend and a served frontend wired to it.

use axum::{
    extract::{Multipart, Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use review_frontend::config::Settings;
use review_frontend::startup::build_router;
use review_frontend::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "secret";
pub const SUBMITTER: &str = "sam@example.com";
pub const REVIEWER: &str = "rita@example.com";

#[derive(Default)]
pub struct StubBackend {
    pub documents: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn list_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.starts_with("GET /document?"))
            .collect()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

pub fn stub_document(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Document {}", id),
        "status": status,
        "creator": {
            "id": "u-1",
            "email": SUBMITTER,
            "fullName": "Sam Submitter",
            "role": "USER"
        },
        "createdAt": "2025-01-10T10:00:00Z",
        "updatedAt": "2025-01-11T10:00:00Z"
    })
}

fn token_for(email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": email, "email": email, "exp": 4102444800i64 }).to_string(),
    );
    format!("{}.{}.sig", header, payload)
}

fn email_from(headers: &HeaderMap) -> Option<String> {
    let token = headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let payload = token.split('.').nth(1)?;
    let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
    claims["sub"].as_str().map(str::to_string)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Document not found" }))).into_response()
}

async fn login(State(stub): State<Arc<StubBackend>>, Json(body): Json<Value>) -> Response {
    stub.record("POST /auth/login".to_string());
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }
    Json(json!({ "access_token": token_for(email) })).into_response()
}

async fn current_user(State(stub): State<Arc<StubBackend>>, headers: HeaderMap) -> Response {
    stub.record("GET /user".to_string());
    let Some(email) = email_from(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let (id, role) = if email == REVIEWER {
        ("u-2", "REVIEWER")
    } else {
        ("u-1", "USER")
    };
    Json(json!({ "id": id, "email": email, "fullName": "Test User", "role": role }))
        .into_response()
}

async fn list_documents(
    State(stub): State<Arc<StubBackend>>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    stub.record(format!("GET /document?{}", raw.unwrap_or_default()));
    let results: Vec<Value> = stub
        .documents
        .lock()
        .unwrap()
        .iter()
        .filter(|d| params.get("status").map_or(true, |s| d["status"] == *s))
        .cloned()
        .collect();
    Json(json!({ "count": results.len(), "results": results }))
}

async fn create_document(
    State(stub): State<Arc<StubBackend>>,
    mut multipart: Multipart,
) -> Json<Value> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let value = match file_name {
            Some(file_name) => file_name,
            None => field.text().await.unwrap(),
        };
        fields.insert(name, value);
    }
    stub.record(format!(
        "POST /document name={} status={} file={}",
        fields["name"], fields["status"], fields["file"]
    ));

    let mut document = stub_document("new", &fields["status"]);
    document["name"] = json!(fields["name"]);
    stub.documents.lock().unwrap().push(document.clone());
    Json(document)
}

async fn get_document(State(stub): State<Arc<StubBackend>>, Path(id): Path<String>) -> Response {
    stub.record(format!("GET /document/{}", id));
    let documents = stub.documents.lock().unwrap();
    match documents.iter().find(|d| d["id"] == id) {
        Some(document) => Json(document.clone()).into_response(),
        None => not_found(),
    }
}

async fn rename_document(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    stub.record(format!("PATCH /document/{} {}", id, body["name"]));
    let mut documents = stub.documents.lock().unwrap();
    match documents.iter_mut().find(|d| d["id"] == id) {
        Some(document) => {
            document["name"] = body["name"].clone();
            StatusCode::OK.into_response()
        }
        None => not_found(),
    }
}

async fn delete_document(State(stub): State<Arc<StubBackend>>, Path(id): Path<String>) -> Response {
    stub.record(format!("DELETE /document/{}", id));
    let mut documents = stub.documents.lock().unwrap();
    let before = documents.len();
    documents.retain(|d| d["id"] != id);
    if documents.len() == before {
        return not_found();
    }
    StatusCode::OK.into_response()
}

async fn change_status(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    stub.record(format!("POST /document/{}/change-status {}", id, body["status"]));
    let mut documents = stub.documents.lock().unwrap();
    match documents.iter_mut().find(|d| d["id"] == id) {
        Some(document) => {
            document["status"] = body["status"].clone();
            StatusCode::OK.into_response()
        }
        None => not_found(),
    }
}

async fn revoke(State(stub): State<Arc<StubBackend>>, Path(id): Path<String>) -> Response {
    stub.record(format!("POST /document/{}/revoke-review", id));
    let mut documents = stub.documents.lock().unwrap();
    match documents.iter_mut().find(|d| d["id"] == id) {
        Some(document) => {
            document["status"] = json!("REVOKE");
            StatusCode::OK.into_response()
        }
        None => not_found(),
    }
}

async fn spawn_backend(documents: Vec<Value>) -> (String, Arc<StubBackend>) {
    let stub = Arc::new(StubBackend {
        documents: Mutex::new(documents),
        requests: Mutex::new(Vec::new()),
    });

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/user", get(current_user))
        .route("/document", get(list_documents).post(create_document))
        .route(
            "/document/:id",
            get(get_document)
                .patch(rename_document)
                .delete(delete_document),
        )
        .route("/document/:id/change-status", post(change_status))
        .route("/document/:id/revoke-review", post(revoke))
        .with_state(stub.clone());
    let app = Router::new().nest("/api", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}/api", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (address, stub)
}

pub struct TestApp {
    pub address: String,
    pub backend: Arc<StubBackend>,
    pub client: reqwest::Client,
}

pub async fn spawn_app(documents: Vec<Value>) -> TestApp {
    let (backend_url, backend) = spawn_backend(documents).await;

    let mut settings = Settings::default();
    settings.backend.url = backend_url;
    let state = AppState::new(settings).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, build_router(state)).await.unwrap() });

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        backend,
        client,
    }
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .unwrap()
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/login", self.address))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .unwrap()
    }

    /// Long-poll for the next open dialog.
    pub async fn open_dialog(&self) -> Value {
        let response = self.get("/dialog?wait=true").await;
        assert_eq!(response.status().as_u16(), 200, "no dialog opened");
        response.json().await.unwrap()
    }

    /// Wait until the backend has seen `count` list requests.
    pub async fn wait_for_lists(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let lists = self.backend.list_requests();
            if lists.len() >= count {
                return lists;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("backend saw {:?}", self.backend.requests());
    }
}

pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
