use std::collections::HashMap;
use url::Url;

/// APIサーバーのデフォルトURL
pub const DEFAULT_API_SERVER_URL: &str = "http://localhost:8000";

/// 認証サーバーのデフォルトURL
pub const DEFAULT_API_AUTH_URL: &str = "http://localhost:8001";

/// APIリクエストの最大リトライ回数の上限
pub const MAX_API_RETRIES: u32 = 10;

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境変数取得エラー
#[derive(Debug, Clone)]
pub struct EnvVarError {
    /// 変数名
    pub var_name: String,
    /// エラーメッセージ
    pub message: String,
}

impl std::fmt::Display for EnvVarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "環境変数 {} が見つかりません: {}",
            self.var_name, self.message
        )
    }
}

impl std::error::Error for EnvVarError {}

/// 環境変数を取得する（優先順位: 起動時 > コンパイル時 > エラー）
///
/// # 取得順序
/// 1. 起動時の環境変数（`std::env::var`）
/// 2. コンパイル時の環境変数（`option_env!`マクロ、build.rsで埋め込み）
/// 3. どちらも見つからない場合はエラー
#[macro_export]
macro_rules! get_env_var {
    ($var_name:expr) => {{
        if let Ok(value) = std::env::var($var_name) {
            log::debug!("環境変数 {} を起動時の環境変数から取得しました", $var_name);
            Ok(value)
        } else if let Some(value) = option_env!($var_name) {
            log::debug!("環境変数 {} をコンパイル時の環境変数から取得しました", $var_name);
            Ok(value.to_string())
        } else {
            Err($crate::shared::config::environment::EnvVarError {
                var_name: $var_name.to_string(),
                message: format!(
                    "起動時の環境変数 {} もコンパイル時の環境変数も見つかりませんでした",
                    $var_name
                ),
            })
        }
    }};
}

/// 環境変数を取得する（オプション版）
#[macro_export]
macro_rules! get_env_var_optional {
    ($var_name:expr) => {{
        $crate::get_env_var!($var_name).ok()
    }};
}

/// 環境変数を取得する（デフォルト値付き）
#[macro_export]
macro_rules! get_env_var_or_default {
    ($var_name:expr, $default_value:expr) => {{
        $crate::get_env_var!($var_name).unwrap_or_else(|_| {
            log::debug!(
                "環境変数 {} が見つからないため、デフォルト値を使用します: {}",
                $var_name,
                $default_value
            );
            $default_value.to_string()
        })
    }};
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// デバッグモードの有効/無効
    pub debug_mode: bool,
    /// ログレベル
    pub log_level: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = crate::get_env_var_optional!("LOG_LEVEL").unwrap_or_else(|| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
        }
    }

    /// プロダクション環境かどうかを判定
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 開発環境かどうかを判定
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. 環境変数 ENVIRONMENT を確認（起動時 > コンパイル時）
/// 2. デバッグビルドの場合は Development
/// 3. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Some(env_var) = crate::get_env_var_optional!("ENVIRONMENT") {
        let env = parse_environment(&env_var);
        log::debug!("環境判定: 環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    // フォールバック: ビルド設定に基づく判定
    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

fn parse_environment(value: &str) -> Environment {
    match value.trim().to_lowercase().as_str() {
        "production" => Environment::Production,
        _ => Environment::Development,
    }
}

/// 環境変数を読み込む
///
/// 開発環境（デバッグビルド）の場合のみ.envファイルを読み込む。
/// 本番環境では環境変数は実行時に設定されることを前提とする。
pub fn load_environment_variables() {
    if cfg!(debug_assertions) {
        match dotenv::dotenv() {
            Ok(path) => {
                log::debug!("環境ファイルを読み込みました: {}", path.display());
            }
            Err(e) => {
                log::debug!("環境ファイルの読み込みをスキップしました: {e}");
            }
        }
    }

    if std::env::var("ENVIRONMENT").is_err() {
        log::debug!("ENVIRONMENT環境変数が設定されていません（デフォルト値を使用）");
    }
}

/// ログレベル文字列を変換する
fn parse_log_level(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    }
}

/// ログシステムを初期化する
///
/// # 処理内容
/// 1. 環境設定を取得
/// 2. ログレベルを設定
/// 3. env_loggerを初期化（初期化済みの場合は何もしない）
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();
    let log_level = parse_log_level(&env_config.log_level);

    let result = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    if result.is_ok() {
        log::info!(
            "ログシステムを初期化しました: level={}, environment={}",
            env_config.log_level,
            env_config.environment
        );
    }
}

/// API設定を管理する構造体
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// APIサーバーのベースURL
    pub base_url: String,
    /// 認証サーバーのベースURL
    pub auth_url: String,
    /// APIリクエストのタイムアウト（秒）
    pub timeout_seconds: u64,
    /// APIリクエストの最大リトライ回数
    pub max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_SERVER_URL.to_string(),
            auth_url: DEFAULT_API_AUTH_URL.to_string(),
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

impl ApiConfig {
    /// 環境変数からAPI設定を読み込む
    ///
    /// 未設定・パース不能な値はデフォルト値で補完する
    pub fn from_env() -> Self {
        let base_url = crate::get_env_var_or_default!("API_SERVER_URL", DEFAULT_API_SERVER_URL);
        let auth_url = crate::get_env_var_or_default!("API_AUTH_URL", DEFAULT_API_AUTH_URL);

        let timeout_seconds = crate::get_env_var_or_default!("API_TIMEOUT_SECONDS", "30")
            .parse()
            .unwrap_or_else(|_| {
                log::warn!(
                    "API_TIMEOUT_SECONDSのパースに失敗しました。デフォルト値30秒を使用します"
                );
                30
            });

        let max_retries = crate::get_env_var_or_default!("API_MAX_RETRIES", "3")
            .parse()
            .unwrap_or_else(|_| {
                log::warn!("API_MAX_RETRIESのパースに失敗しました。デフォルト値3回を使用します");
                3
            });

        log::info!(
            "API設定: base_url={base_url}, auth_url={auth_url}, timeout={timeout_seconds}s, max_retries={max_retries}"
        );

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_url: auth_url.trim_end_matches('/').to_string(),
            timeout_seconds,
            max_retries,
        }
    }

    /// 設定を検証する
    ///
    /// # 戻り値
    /// 設定が有効な場合はOk(())、無効な場合はエラーメッセージ
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("APIサーバーのベースURLが設定されていません".to_string());
        }

        for (name, value) in [("APIサーバー", &self.base_url), ("認証サーバー", &self.auth_url)] {
            let parsed =
                Url::parse(value).map_err(|e| format!("{name}のURLが不正です: {value} ({e})"))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(format!("{name}のURLはHTTP(S)である必要があります: {value}"));
            }
        }

        if self.timeout_seconds == 0 {
            return Err("APIタイムアウトは0より大きい値である必要があります".to_string());
        }

        if self.max_retries > MAX_API_RETRIES {
            return Err(format!(
                "APIの最大リトライ回数は{MAX_API_RETRIES}回以下である必要があります: {}",
                self.max_retries
            ));
        }

        Ok(())
    }

    /// APIサーバーがlocalhostかどうかを判定
    pub fn is_localhost(&self) -> bool {
        self.base_url.contains("localhost") || self.base_url.contains("127.0.0.1")
    }

    /// デバッグ情報を取得
    pub fn get_debug_info(&self) -> HashMap<String, String> {
        let mut info = HashMap::new();
        info.insert("base_url".to_string(), self.base_url.clone());
        info.insert("auth_url".to_string(), self.auth_url.clone());
        info.insert(
            "timeout_seconds".to_string(),
            self.timeout_seconds.to_string(),
        );
        info.insert("max_retries".to_string(), self.max_retries.to_string());
        info.insert("is_localhost".to_string(), self.is_localhost().to_string());
        info
    }
}
