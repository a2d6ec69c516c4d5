/// 認証機能モジュール
///
/// 管理画面へのログイン（パスワードグラント）を提供します。
/// 取得したトークンは各APIコマンドの `session_token` として渡してください。
pub mod models;
pub mod service;

// 公開インターフェース
pub use models::{LoginCredentials, TokenResponse};
pub use service::AuthService;
