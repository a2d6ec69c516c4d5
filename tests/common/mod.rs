//! 結合テスト用のスタブAPIサーバー
//!
//! 登録したルート（メソッド + パス・クエリの完全一致）に固定レスポンスを返し、
//! 受信したリクエストを記録する。
#![allow(dead_code)]

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use medpark_lib::shared::api_client::{ApiClient, ApiClientConfig};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// スタブのルート定義
#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: String,
    pub status: u16,
    pub body: String,
    /// 応答前の待ち時間
    pub delay: Option<Duration>,
}

impl Route {
    pub fn new(method: &'static str, path: &str, status: u16, body: serde_json::Value) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    /// 応答を遅らせる
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn ok(method: &'static str, path: &str, body: serde_json::Value) -> Self {
        Self::new(method, path, 200, body)
    }
}

/// 受信したリクエスト
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("リクエストボディがJSONではありません")
    }
}

struct StubState {
    routes: Vec<Route>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// スタブAPIサーバー
pub struct StubServer {
    base_url: String,
    state: Arc<StubState>,
}

impl StubServer {
    /// ルートを登録してサーバーを起動する
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("スタブサーバーのバインドに失敗しました");
        let addr = listener.local_addr().expect("アドレス取得に失敗しました");

        let state = Arc::new(StubState {
            routes,
            requests: Mutex::new(Vec::new()),
        });

        let server_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&server_state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req| handle_request(req, Arc::clone(&state)));
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn url(&self) -> String {
        self.base_url.clone()
    }

    /// リトライなし・短いタイムアウトのAPIクライアントを作成する
    pub fn client(&self) -> ApiClient {
        self.client_with(5, 0)
    }

    /// タイムアウトとリトライ回数を指定してAPIクライアントを作成する
    pub fn client_with(&self, timeout_seconds: u64, max_retries: u32) -> ApiClient {
        ApiClient::new_with_config(ApiClientConfig {
            base_url: self.url(),
            timeout_seconds,
            max_retries,
        })
        .expect("APIクライアントの作成に失敗しました")
    }

    /// 受信したリクエスト（受信順）
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn handle_request(
    req: Request<Incoming>,
    state: Arc<StubState>,
) -> Result<Response<String>, Infallible> {
    let method = req.method().to_string();
    let path = req
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header("authorization");
    let content_type = header("content-type");
    let request_id = header("x-request-id");

    let body = req
        .into_body()
        .collect()
        .await
        .map(|collected| String::from_utf8_lossy(&collected.to_bytes()).into_owned())
        .unwrap_or_default();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization,
        content_type,
        request_id,
        body,
    });

    let (status, body, delay) = state
        .routes
        .iter()
        .find(|route| route.method == method && route.path == path)
        .map(|route| (route.status, route.body.clone(), route.delay))
        .unwrap_or_else(|| (404, r#"{"detail": "Not Found"}"#.to_string(), None));

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body)
        .unwrap())
}
