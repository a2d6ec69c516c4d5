//! 汎用APIクライアント
//!
//! 駐車場バックエンド（REST API）との通信を行う汎用的なクライアント。
//! 入出庫、月極契約、プラン、申込、支払い、レポートの各エンドポイントで使用する。
use crate::shared::config::environment::ApiConfig;
use crate::shared::errors::{AppError, AppResult};
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// APIクライアント設定
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(api_config: &ApiConfig) -> Self {
        Self {
            base_url: api_config.base_url.clone(),
            timeout_seconds: api_config.timeout_seconds,
            max_retries: api_config.max_retries,
        }
    }
}

impl ApiClientConfig {
    /// 環境設定からAPIクライアント設定を作成
    pub fn from_env() -> Self {
        Self::from(&ApiConfig::from_env())
    }

    /// ベースURLを指定して設定を作成（その他はデフォルト値）
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// APIサーバーからのエラーレスポンス
///
/// バックエンドは `{"detail": "..."}` 形式、またはフィールド単位の検証エラー配列を返す
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: serde_json::Value,
}

impl ErrorResponse {
    /// 表示用のメッセージを取り出す
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(message) => message.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        }
    }
}

/// 汎用APIクライアント
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// 環境変数の設定で新しいAPIクライアントを作成
    pub fn new() -> AppResult<Self> {
        Self::new_with_config(ApiClientConfig::from_env())
    }

    /// 設定を指定してAPIクライアントを作成
    pub fn new_with_config(config: ApiClientConfig) -> AppResult<Self> {
        if config.base_url.is_empty() {
            return Err(AppError::configuration(
                "APIサーバーのベースURLが設定されていません",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTPクライアント初期化失敗: {e}")))?;

        Ok(Self { client, config })
    }

    /// 設定を取得
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// APIサーバーがlocalhostかどうかを判定
    pub fn is_localhost(&self) -> bool {
        self.config.base_url.contains("localhost") || self.config.base_url.contains("127.0.0.1")
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.config.base_url)
    }

    fn with_auth(request: RequestBuilder, auth_token: Option<&str>) -> RequestBuilder {
        let request = request.header("x-request-id", uuid::Uuid::new_v4().to_string());
        match auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GETリクエストを送信
    pub async fn get<T>(&self, endpoint: &str, auth_token: Option<&str>) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        info!("GETリクエスト送信: endpoint={endpoint}");
        let request = Self::with_auth(self.client.get(self.url(endpoint)), auth_token);
        self.send_json(request, "GET", endpoint).await
    }

    /// POSTリクエストを送信
    pub async fn post<B, T>(&self, endpoint: &str, body: &B, auth_token: Option<&str>) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        info!("POSTリクエスト送信: endpoint={endpoint}");
        let request = Self::with_auth(self.client.post(self.url(endpoint)).json(body), auth_token);
        self.send_json(request, "POST", endpoint).await
    }

    /// PUTリクエストを送信
    pub async fn put<B, T>(&self, endpoint: &str, body: &B, auth_token: Option<&str>) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        info!("PUTリクエスト送信: endpoint={endpoint}");
        let request = Self::with_auth(self.client.put(self.url(endpoint)).json(body), auth_token);
        self.send_json(request, "PUT", endpoint).await
    }

    /// PATCHリクエストを送信
    pub async fn patch<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        auth_token: Option<&str>,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        info!("PATCHリクエスト送信: endpoint={endpoint}");
        let request = Self::with_auth(self.client.patch(self.url(endpoint)).json(body), auth_token);
        self.send_json(request, "PATCH", endpoint).await
    }

    /// DELETEリクエストを送信
    ///
    /// DELETEは通常レスポンスボディがないため、成功ステータスのみチェックする
    pub async fn delete(&self, endpoint: &str, auth_token: Option<&str>) -> AppResult<()> {
        info!("DELETEリクエスト送信: endpoint={endpoint}");
        let request = Self::with_auth(self.client.delete(self.url(endpoint)), auth_token);
        self.send_with_retry(request, "DELETE", endpoint).await?;
        Ok(())
    }

    /// フォーム形式のPOSTリクエストを絶対URLへ送信（トークン発行用）
    pub async fn post_form_to<F, T>(&self, url: &str, form: &F) -> AppResult<T>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        info!("フォームPOSTリクエスト送信: url={url}");
        let request = self.client.post(url).form(form);
        self.send_json(request, "POST", url).await
    }

    /// リクエストを送信してJSONレスポンスを解析
    async fn send_json<T>(&self, request: RequestBuilder, method: &str, endpoint: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send_with_retry(request, method, endpoint).await?;
        let result = response
            .json::<T>()
            .await
            .map_err(|e| AppError::ExternalService(format!("レスポンス解析エラー: {e}")))?;
        info!("{method}リクエスト成功: endpoint={endpoint}");
        Ok(result)
    }

    /// リトライ機能付きでリクエストを送信
    ///
    /// 送信エラーのみ指数バックオフで再試行する。POST・PATCHは接続確立に
    /// 失敗した場合に限る。HTTPエラーステータスは再試行せずにエラーへ変換する。
    async fn send_with_retry(
        &self,
        request: RequestBuilder,
        method: &str,
        endpoint: &str,
    ) -> AppResult<Response> {
        let mut attempts = 0;
        loop {
            let cloned_request = request.try_clone().ok_or_else(|| {
                AppError::ExternalService("リクエストのクローンに失敗しました".to_string())
            })?;

            match cloned_request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => return Err(self.handle_error_response(response).await),
                Err(e) => {
                    if attempts < self.config.max_retries && is_retryable(method, &e) {
                        attempts += 1;
                        let delay = retry_delay(attempts);
                        warn!(
                            "{method}リクエスト失敗、リトライします: endpoint={endpoint}, attempt={attempts}/{}, delay={delay:?}",
                            self.config.max_retries
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(AppError::ExternalService(format!(
                        "APIサーバーへの接続に失敗しました: {e}"
                    )));
                }
            }
        }
    }

    /// エラーレスポンスをAppErrorへ変換
    async fn handle_error_response(&self, response: Response) -> AppError {
        let status = response.status();

        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let response_text = response
            .text()
            .await
            .unwrap_or_else(|_| "レスポンス読み取り失敗".to_string());

        let message = match serde_json::from_str::<ErrorResponse>(&response_text) {
            Ok(error_response) => {
                debug!(
                    "APIサーバーから構造化エラーレスポンスを受信: status={}, request_id={request_id}, detail={}",
                    status.as_u16(),
                    error_response.detail
                );
                error_response.message()
            }
            Err(_) => {
                warn!(
                    "APIサーバーから非構造化エラーレスポンス: status={}, request_id={request_id}, body={response_text}",
                    status.as_u16()
                );
                default_status_message(status).to_string()
            }
        };

        status_to_error(status, message)
    }
}

/// バックオフの上限（秒）
const MAX_RETRY_DELAY_SECS: u64 = 60;

/// 送信エラーを再試行してよいかどうか
///
/// POST・PATCHは接続確立前の失敗のみ再試行の対象とする。
fn is_retryable(method: &str, error: &reqwest::Error) -> bool {
    match method {
        "GET" | "PUT" | "DELETE" => true,
        _ => error.is_connect(),
    }
}

/// n回目の再試行までの待ち時間（2^n秒、上限あり）
fn retry_delay(attempt: u32) -> Duration {
    Duration::from_secs(2_u64.saturating_pow(attempt).min(MAX_RETRY_DELAY_SECS))
}

/// HTTPステータスに対応するデフォルトメッセージ
fn default_status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "リクエストの形式が正しくありません",
        401 => "認証に失敗しました。再度ログインしてください",
        403 => "この操作を実行する権限がありません",
        404 => "指定されたリソースが見つかりません",
        409 => "リソースの状態が競合しています",
        422 => "入力内容に誤りがあります",
        429 => "リクエストが多すぎます。しばらく待ってから再試行してください",
        500 => "サーバー内部エラーが発生しました",
        502 => "APIサーバーとの通信でエラーが発生しました",
        503 => "APIサーバーが一時的に利用できません",
        504 => "APIサーバーからの応答がタイムアウトしました",
        _ => "不明なエラーが発生しました",
    }
}

/// HTTPステータスとメッセージからAppErrorを作成
fn status_to_error(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Authentication(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        _ => AppError::ExternalService(format!("APIサーバーエラー: {} - {message}", status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_message_string() {
        let json = r#"{"detail": "Veículo já está no pátio"}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message(), "Veículo já está no pátio");
    }

    #[test]
    fn test_error_response_message_validation_list() {
        let json = r#"{"detail": [
            {"loc": ["body", "placa"], "msg": "field required"},
            {"loc": ["body", "plano_id"], "msg": "value is not a valid integer"}
        ]}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.message(),
            "field required, value is not a valid integer"
        );
    }

    #[test]
    fn test_status_to_error_mapping() {
        assert!(matches!(
            status_to_error(StatusCode::UNAUTHORIZED, "x".to_string()),
            AppError::Authentication(_)
        ));
        assert!(matches!(
            status_to_error(StatusCode::NOT_FOUND, "x".to_string()),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            status_to_error(StatusCode::UNPROCESSABLE_ENTITY, "x".to_string()),
            AppError::Validation(_)
        ));
        assert!(matches!(
            status_to_error(StatusCode::SERVICE_UNAVAILABLE, "x".to_string()),
            AppError::ExternalService(_)
        ));
    }

    #[test]
    fn test_retry_delay_is_capped() {
        assert_eq!(retry_delay(1), Duration::from_secs(2));
        assert_eq!(retry_delay(3), Duration::from_secs(8));
        assert_eq!(retry_delay(64), Duration::from_secs(MAX_RETRY_DELAY_SECS));
        assert_eq!(retry_delay(u32::MAX), Duration::from_secs(MAX_RETRY_DELAY_SECS));
    }

    #[tokio::test]
    async fn test_connect_error_is_retryable_for_every_method() {
        // 閉じたポートへの接続は接続エラーになる
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = Client::new()
            .post(format!("http://{addr}/"))
            .send()
            .await
            .unwrap_err();
        assert!(error.is_connect());
        assert!(is_retryable("POST", &error));
        assert!(is_retryable("PATCH", &error));
        assert!(is_retryable("GET", &error));
    }

    #[test]
    fn test_config_with_base_url_trims_slash() {
        let config = ApiClientConfig::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_new_with_empty_base_url_fails() {
        let config = ApiClientConfig {
            base_url: String::new(),
            timeout_seconds: 5,
            max_retries: 0,
        };
        assert!(matches!(
            ApiClient::new_with_config(config),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_is_localhost() {
        let client =
            ApiClient::new_with_config(ApiClientConfig::with_base_url("http://localhost:8000"))
                .unwrap();
        assert!(client.is_localhost());
    }
}
