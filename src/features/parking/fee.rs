//! 駐車料金計算
//!
//! 入庫・出庫時刻と時間料金から支払金額を算出する。
//! 経過時間は実時間（ミリ秒）から小数の時間数に換算し、最終金額のみを小数点以下2桁に丸める。
use super::models::{ParkingSession, RateTable};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{round_currency, validate_non_negative_amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// 料金ポリシー
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeePolicy {
    /// 最低料金（駐車時間が0より大きい場合のみ適用）
    pub minimum_fee: Option<f64>,
}

impl FeePolicy {
    /// 環境変数 `PARKING_MINIMUM_FEE` からポリシーを読み込む
    ///
    /// 未設定の場合は最低料金なし。不正な値は設定エラー。
    pub fn from_env() -> AppResult<Self> {
        let minimum_fee = match crate::get_env_var_optional!("PARKING_MINIMUM_FEE") {
            Some(raw) if !raw.trim().is_empty() => {
                let value: f64 = raw.trim().parse().map_err(|_| {
                    AppError::configuration(format!("PARKING_MINIMUM_FEEが数値ではありません: {raw}"))
                })?;
                Some(value)
            }
            _ => None,
        };

        let policy = Self { minimum_fee };
        policy
            .validate()
            .map_err(|e| AppError::configuration(e.details()))?;
        Ok(policy)
    }

    /// ポリシーを検証
    pub fn validate(&self) -> AppResult<()> {
        if let Some(minimum_fee) = self.minimum_fee {
            validate_non_negative_amount(minimum_fee, "最低料金")?;
        }
        Ok(())
    }
}

/// 出庫時の料金見積もり
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub session: ParkingSession,
    pub exit_time: DateTime<Utc>,
    pub duration_seconds: i64,
    pub hourly_rate: f64,
    pub amount: f64,
}

impl FeeQuote {
    /// 表示用の駐車時間（例: "2h 15m"）
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

/// 入庫から出庫までの経過ミリ秒を取得
///
/// # エラー
/// 出庫時刻が入庫時刻より前の場合は `InvalidDuration`
pub fn elapsed_millis(entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> AppResult<i64> {
    if exit_time < entry_time {
        return Err(AppError::InvalidDuration {
            entry: entry_time,
            exit: exit_time,
        });
    }
    Ok((exit_time - entry_time).num_milliseconds())
}

/// 駐車料金を計算する
///
/// # 引数
/// * `entry_time` - 入庫時刻
/// * `exit_time` - 出庫時刻
/// * `hourly_rate` - 時間料金（0以上）
///
/// # 戻り値
/// 小数点以下2桁に丸めた支払金額
pub fn compute_fee(
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    hourly_rate: f64,
) -> AppResult<f64> {
    compute_fee_with_policy(entry_time, exit_time, hourly_rate, &FeePolicy::default())
}

/// 料金ポリシーを適用して駐車料金を計算する
///
/// 駐車時間が0、または時間料金が0の場合は最低料金に関わらず0円。
pub fn compute_fee_with_policy(
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    hourly_rate: f64,
    policy: &FeePolicy,
) -> AppResult<f64> {
    validate_non_negative_amount(hourly_rate, "時間料金")?;
    policy.validate()?;

    let millis = elapsed_millis(entry_time, exit_time)?;
    if millis == 0 || hourly_rate == 0.0 {
        return Ok(0.0);
    }

    let hours = millis as f64 / MILLIS_PER_HOUR;
    let amount = round_currency(hours * hourly_rate);

    Ok(match policy.minimum_fee {
        Some(minimum_fee) => amount.max(round_currency(minimum_fee)),
        None => amount,
    })
}

/// 現在時刻を出庫時刻として駐車料金を計算する
pub fn compute_fee_until_now(entry_time: DateTime<Utc>, hourly_rate: f64) -> AppResult<f64> {
    compute_fee(entry_time, Utc::now(), hourly_rate)
}

/// 駐車記録の料金を見積もる
///
/// 出庫時刻が記録されていない場合は `now` を出庫時刻とする
pub fn quote_session(
    session: &ParkingSession,
    rates: &RateTable,
    policy: &FeePolicy,
    now: DateTime<Utc>,
) -> AppResult<FeeQuote> {
    let exit_time = session.exit_time.unwrap_or(now);
    let hourly_rate = rates.rate_for(session.vehicle_type)?;
    let amount = compute_fee_with_policy(session.entry_time, exit_time, hourly_rate, policy)?;
    let duration_seconds = elapsed_millis(session.entry_time, exit_time)? / 1000;

    log::debug!(
        "料金見積もり: plate={}, duration={}s, rate={hourly_rate}, amount={amount}",
        session.license_plate,
        duration_seconds
    );

    Ok(FeeQuote {
        session: session.clone(),
        exit_time,
        duration_seconds,
        hourly_rate,
        amount,
    })
}

/// 駐車時間を表示用に整形する（例: "2h 15m"、"45m"）
pub fn format_duration(seconds: i64) -> String {
    let minutes_total = seconds.max(0) / 60;
    let hours = minutes_total / 60;
    let minutes = minutes_total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
