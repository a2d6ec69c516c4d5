use serde::{Deserialize, Serialize};

/// ログイン資格情報
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    /// メールアドレス（フォームの `username` として送信）
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    // パスワードはログに出さない
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// トークン発行エンドポイントへ送るフォーム
#[derive(Debug, Serialize)]
pub(crate) struct PasswordGrantForm<'a> {
    pub grant_type: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// トークン発行レスポンス
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// 有効期間（秒）
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl TokenResponse {
    /// API呼び出しに渡すトークン
    pub fn bearer(&self) -> Option<&str> {
        Some(self.access_token.as_str())
    }
}
