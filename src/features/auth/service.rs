//! パスワードグラントによるログイン
//!
//! 認証サーバーからアクセストークンを取得して呼び出し元に返す。
//! トークンの保存は行わない。
use super::models::{LoginCredentials, PasswordGrantForm, TokenResponse};
use crate::shared::api_client::ApiClient;
use crate::shared::config::ApiConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{validate_email, validate_required_field};
use log::{info, warn};

/// 認証サービス
#[derive(Debug, Clone)]
pub struct AuthService {
    api_client: ApiClient,
    auth_url: String,
}

impl AuthService {
    /// 認証サービスを作成する
    ///
    /// # 引数
    /// * `api_client` - APIクライアント（タイムアウト・リトライ設定を共有）
    /// * `auth_url` - 認証サーバーのベースURL
    pub fn new<S: Into<String>>(api_client: ApiClient, auth_url: S) -> Self {
        let auth_url: String = auth_url.into();
        Self {
            api_client,
            auth_url: auth_url.trim_end_matches('/').to_string(),
        }
    }

    /// 設定から認証サービスを作成する
    pub fn from_config(api_client: ApiClient, config: &ApiConfig) -> Self {
        Self::new(api_client, config.auth_url.clone())
    }

    /// トークン発行エンドポイントのURL
    pub fn token_url(&self) -> String {
        format!("{}/auth/token", self.auth_url)
    }

    /// メールアドレスとパスワードでログインする
    ///
    /// # エラー
    /// * 入力不備は `Validation`
    /// * 資格情報の誤りは `Authentication`
    pub async fn login(&self, credentials: &LoginCredentials) -> AppResult<TokenResponse> {
        validate_email(&credentials.email)?;
        validate_required_field(&credentials.password, "パスワード")?;

        let email = credentials.email.trim();
        let form = PasswordGrantForm {
            grant_type: "password",
            username: email,
            password: &credentials.password,
        };

        let result: AppResult<TokenResponse> =
            self.api_client.post_form_to(&self.token_url(), &form).await;

        match result {
            Ok(token) if token.access_token.trim().is_empty() => Err(AppError::authentication(
                "認証サーバーが空のトークンを返しました",
            )),
            Ok(token) => {
                info!("ログイン成功: email={email}");
                Ok(token)
            }
            // トークン発行エンドポイントは資格情報の誤りを400で返す
            Err(AppError::Validation(message)) => {
                warn!("ログイン失敗: email={email}");
                Err(AppError::Authentication(message))
            }
            Err(e) => {
                warn!("ログイン失敗: email={email}, error={e}");
                Err(e)
            }
        }
    }
}
