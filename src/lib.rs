pub mod features;
pub mod shared;

use features::auth::AuthService;
use features::parking::FeePolicy;
use log::{error, info};
use shared::api_client::{ApiClient, ApiClientConfig};
use shared::config::{
    initialize_logging_system, load_environment_variables, ApiConfig, EnvironmentConfig,
};
use shared::errors::{AppError, AppResult};

/// コンソールの実行コンテキスト
///
/// APIクライアント・認証サービス・料金ポリシーをまとめたもの。
/// 各APIコマンドにはここから取り出した参照を渡す。
#[derive(Debug, Clone)]
pub struct ConsoleContext {
    pub environment: EnvironmentConfig,
    pub api_config: ApiConfig,
    pub api_client: ApiClient,
    pub auth: AuthService,
    pub fee_policy: FeePolicy,
}

impl ConsoleContext {
    /// 設定からコンテキストを作成する
    pub fn from_config(
        environment: EnvironmentConfig,
        api_config: ApiConfig,
        fee_policy: FeePolicy,
    ) -> AppResult<Self> {
        api_config.validate().map_err(AppError::Configuration)?;
        fee_policy.validate()?;

        let api_client = ApiClient::new_with_config(ApiClientConfig::from(&api_config))?;
        let auth = AuthService::from_config(api_client.clone(), &api_config);

        Ok(Self {
            environment,
            api_config,
            api_client,
            auth,
            fee_policy,
        })
    }
}

/// コンソールを初期化する
///
/// # 処理内容
/// 1. 環境変数を読み込み（開発環境では.envファイル）
/// 2. ログシステムを初期化
/// 3. API設定と料金ポリシーを読み込んで検証
pub fn initialize() -> AppResult<ConsoleContext> {
    load_environment_variables();
    initialize_logging_system();

    info!("コンソール初期化を開始します...");

    let environment = EnvironmentConfig::from_env();
    let api_config = ApiConfig::from_env();
    let fee_policy = FeePolicy::from_env()?;

    match ConsoleContext::from_config(environment, api_config, fee_policy) {
        Ok(context) => {
            info!(
                "コンソール初期化が完了しました: environment={}, api={:?}",
                context.environment.environment,
                context.api_config.get_debug_info()
            );
            Ok(context)
        }
        Err(e) => {
            error!("コンソール初期化に失敗しました: {e}");
            Err(e)
        }
    }
}
