use std::env;

fn main() {
    // ビルド時に環境変数を設定
    // 環境変数は外部（CIスクリプトや .env ファイル）から提供されることを前提とする
    // 実行時の環境変数が優先され、ここで埋め込んだ値はフォールバックとしてのみ使用される
    let _ = dotenv::dotenv();

    // 未設定の場合は埋め込まず、実行時にビルド設定から判定する
    if let Ok(environment) = env::var("ENVIRONMENT") {
        println!("cargo:rustc-env=ENVIRONMENT={environment}");
    }

    // API設定
    let api_server_url =
        env::var("API_SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let api_auth_url =
        env::var("API_AUTH_URL").unwrap_or_else(|_| "http://localhost:8001".to_string());
    let api_timeout = env::var("API_TIMEOUT_SECONDS").unwrap_or_else(|_| "30".to_string());
    let api_max_retries = env::var("API_MAX_RETRIES").unwrap_or_else(|_| "3".to_string());

    println!("cargo:rustc-env=API_SERVER_URL={api_server_url}");
    println!("cargo:rustc-env=API_AUTH_URL={api_auth_url}");
    println!("cargo:rustc-env=API_TIMEOUT_SECONDS={api_timeout}");
    println!("cargo:rustc-env=API_MAX_RETRIES={api_max_retries}");

    // 料金ポリシー（未設定の場合は最低料金なし）
    if let Ok(minimum_fee) = env::var("PARKING_MINIMUM_FEE") {
        println!("cargo:rustc-env=PARKING_MINIMUM_FEE={minimum_fee}");
    }

    // ログレベル（未設定の場合は実行環境に応じたデフォルト）
    if let Ok(log_level) = env::var("LOG_LEVEL") {
        println!("cargo:rustc-env=LOG_LEVEL={log_level}");
    }

    println!("cargo:rerun-if-env-changed=ENVIRONMENT");
    println!("cargo:rerun-if-env-changed=API_SERVER_URL");
    println!("cargo:rerun-if-env-changed=API_AUTH_URL");
    println!("cargo:rerun-if-env-changed=PARKING_MINIMUM_FEE");
    println!("cargo:rerun-if-env-changed=LOG_LEVEL");
}
