//! API Server経由での支払い操作
use super::models::{CreatePaymentDto, Payment};
use crate::features::formatters::validate_license_plate;
use crate::shared::api_client::ApiClient;
use crate::shared::errors::AppResult;
use crate::shared::utils::validate_non_negative_amount;
use log::info;

/// 支払いを登録する（API Server経由）
///
/// # 引数
/// * `api_client` - APIクライアント
/// * `dto` - 支払い登録用DTO
/// * `session_token` - セッショントークン
///
/// # 戻り値
/// 登録された支払い、または失敗時はエラー
pub async fn record_payment(
    api_client: &ApiClient,
    mut dto: CreatePaymentDto,
    session_token: Option<&str>,
) -> AppResult<Payment> {
    dto.license_plate = validate_license_plate(&dto.license_plate)?;
    validate_non_negative_amount(dto.amount, "支払金額")?;

    let payment: Payment = api_client
        .post("/pagamentos/", &dto, session_token)
        .await?;

    info!(
        "支払い登録成功: payment_id={}, plate={}, amount={}",
        payment.id, payment.license_plate, payment.amount
    );
    Ok(payment)
}

/// 支払い履歴を取得する（API Server経由、新しい順）
///
/// # 引数
/// * `api_client` - APIクライアント
/// * `license_plate` - ナンバープレート
/// * `session_token` - セッショントークン
pub async fn fetch_payment_history(
    api_client: &ApiClient,
    license_plate: &str,
    session_token: Option<&str>,
) -> AppResult<Vec<Payment>> {
    let plate = validate_license_plate(license_plate)?;
    let endpoint = format!("/pagamentos/?placa={}", urlencoding::encode(&plate));

    let mut payments: Vec<Payment> = api_client.get(&endpoint, session_token).await?;
    payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));

    info!("支払い履歴取得成功: plate={plate}, count={}", payments.len());
    Ok(payments)
}
