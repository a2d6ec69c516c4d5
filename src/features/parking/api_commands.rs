//! API Server経由での駐車場（パティオ）操作
//!
//! 入庫登録、在庫車両の取得、出庫時の料金見積もりと出庫登録を行う。
use super::fee::{quote_session, FeePolicy, FeeQuote};
use super::models::{ParkingSession, RateTable, RegisterEntryDto, RegisterExitDto};
use crate::features::formatters::validate_license_plate;
use crate::features::payments::PaymentMethod;
use crate::shared::api_client::ApiClient;
use crate::shared::errors::AppResult;
use crate::shared::utils::format_local_datetime;
use chrono::{DateTime, Utc};
use log::info;

/// 在庫中（未出庫）の駐車記録一覧を取得する
///
/// # 引数
/// * `api_client` - APIクライアント
/// * `session_token` - セッショントークン
///
/// # 戻り値
/// 入庫時刻の古い順に並んだ駐車記録
pub async fn list_active_sessions(
    api_client: &ApiClient,
    session_token: Option<&str>,
) -> AppResult<Vec<ParkingSession>> {
    let mut sessions: Vec<ParkingSession> = api_client
        .get("/estacionamento/ativos", session_token)
        .await?;
    sessions.sort_by_key(|s| s.entry_time);

    info!("在庫車両取得成功: count={}", sessions.len());
    Ok(sessions)
}

/// ナンバープレートから在庫中の駐車記録を取得する
///
/// # エラー
/// 該当車両がない場合はバックエンドの404が `NotFound` として返る
pub async fn find_active_session(
    api_client: &ApiClient,
    license_plate: &str,
    session_token: Option<&str>,
) -> AppResult<ParkingSession> {
    let plate = validate_license_plate(license_plate)?;
    let endpoint = format!("/estacionamento/ativos/{}", urlencoding::encode(&plate));

    let session: ParkingSession = api_client.get(&endpoint, session_token).await?;
    session.validate()?;
    Ok(session)
}

/// 入庫を登録する
///
/// ナンバープレートは送信前に正規化・検証する。
pub async fn register_entry(
    api_client: &ApiClient,
    mut dto: RegisterEntryDto,
    session_token: Option<&str>,
) -> AppResult<ParkingSession> {
    dto.license_plate = validate_license_plate(&dto.license_plate)?;

    let session: ParkingSession = api_client
        .post("/estacionamento/entrada", &dto, session_token)
        .await?;

    info!(
        "入庫登録成功: session_id={}, plate={}, vehicle_type={}, entry={}",
        session.id,
        session.license_plate,
        session.vehicle_type,
        format_local_datetime(&session.entry_time)
    );
    Ok(session)
}

/// 出庫前の料金を見積もる
///
/// 在庫中の駐車記録を取得し、`now` を出庫時刻として料金を計算する。
pub async fn quote_exit(
    api_client: &ApiClient,
    license_plate: &str,
    rates: &RateTable,
    policy: &FeePolicy,
    now: DateTime<Utc>,
    session_token: Option<&str>,
) -> AppResult<FeeQuote> {
    let session = find_active_session(api_client, license_plate, session_token).await?;
    quote_session(&session, rates, policy, now)
}

/// 出庫を登録する
pub async fn register_exit(
    api_client: &ApiClient,
    session_id: i64,
    dto: &RegisterExitDto,
    session_token: Option<&str>,
) -> AppResult<ParkingSession> {
    let endpoint = format!("/estacionamento/saida/{session_id}");
    let session: ParkingSession = api_client.post(&endpoint, dto, session_token).await?;
    session.validate()?;

    info!(
        "出庫登録成功: session_id={}, amount_paid={}",
        session.id, dto.amount_paid
    );
    Ok(session)
}

/// 見積もりどおりの金額で出庫を登録する
///
/// # 戻り値
/// 出庫済みの駐車記録と、請求した料金見積もり
pub async fn checkout(
    api_client: &ApiClient,
    quote: FeeQuote,
    payment_method: PaymentMethod,
    session_token: Option<&str>,
) -> AppResult<(ParkingSession, FeeQuote)> {
    let dto = RegisterExitDto {
        exit_time: quote.exit_time,
        amount_paid: quote.amount,
        payment_method,
    };
    let session = register_exit(api_client, quote.session.id, &dto, session_token).await?;
    Ok((session, quote))
}
