use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::validate_non_negative_amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 車種
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[serde(alias = "moto", alias = "motocicleta")]
    Motorcycle,
    #[serde(alias = "carro")]
    Car,
    #[serde(alias = "caminhonete")]
    Suv,
}

impl VehicleType {
    /// すべての車種
    pub const ALL: [VehicleType; 3] = [VehicleType::Motorcycle, VehicleType::Car, VehicleType::Suv];

    /// APIで使用する識別子
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Motorcycle => "motorcycle",
            VehicleType::Car => "car",
            VehicleType::Suv => "suv",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = AppError;

    /// バックエンドのポルトガル語表記も受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "motorcycle" | "moto" | "motocicleta" => Ok(VehicleType::Motorcycle),
            "car" | "carro" => Ok(VehicleType::Car),
            "suv" | "caminhonete" => Ok(VehicleType::Suv),
            other => Err(AppError::validation(format!("不明な車種です: {other}"))),
        }
    }
}

/// 駐車記録（入庫から出庫まで）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSession {
    pub id: i64,
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "tipo_veiculo", default = "default_vehicle_type")]
    pub vehicle_type: VehicleType,
    #[serde(rename = "hora_entrada")]
    pub entry_time: DateTime<Utc>,
    #[serde(rename = "hora_saida", default)]
    pub exit_time: Option<DateTime<Utc>>,
}

fn default_vehicle_type() -> VehicleType {
    VehicleType::Car
}

impl ParkingSession {
    /// 出庫時刻が入庫時刻以降であることを検証
    pub fn validate(&self) -> AppResult<()> {
        match self.exit_time {
            Some(exit) if exit < self.entry_time => Err(AppError::InvalidDuration {
                entry: self.entry_time,
                exit,
            }),
            _ => Ok(()),
        }
    }

    /// 出庫済みかどうか
    pub fn is_closed(&self) -> bool {
        self.exit_time.is_some()
    }
}

/// 入庫登録用DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEntryDto {
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "tipo_veiculo")]
    pub vehicle_type: VehicleType,
}

/// 出庫登録用DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterExitDto {
    #[serde(rename = "hora_saida")]
    pub exit_time: DateTime<Utc>,
    #[serde(rename = "valor_pago")]
    pub amount_paid: f64,
    #[serde(rename = "forma_pagamento")]
    pub payment_method: crate::features::payments::PaymentMethod,
}

/// 車種ごとの時間料金表
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<VehicleType, f64>,
}

impl Default for RateTable {
    /// 標準料金（バイク 8.00、乗用車 12.00、SUV 18.00）
    fn default() -> Self {
        let rates = BTreeMap::from([
            (VehicleType::Motorcycle, 8.0),
            (VehicleType::Car, 12.0),
            (VehicleType::Suv, 18.0),
        ]);
        Self { rates }
    }
}

impl RateTable {
    /// 料金表を作成する
    ///
    /// # エラー
    /// 負の料金・非有限値が含まれる場合はバリデーションエラー
    pub fn new<I>(rates: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (VehicleType, f64)>,
    {
        let rates: BTreeMap<VehicleType, f64> = rates.into_iter().collect();
        for (vehicle_type, rate) in &rates {
            validate_non_negative_amount(*rate, &format!("{vehicle_type}の時間料金"))?;
        }
        Ok(Self { rates })
    }

    /// 車種の時間料金を取得
    pub fn rate_for(&self, vehicle_type: VehicleType) -> AppResult<f64> {
        self.rates
            .get(&vehicle_type)
            .copied()
            .ok_or_else(|| AppError::not_found(format!("{vehicle_type}の時間料金")))
    }

    /// 料金表の内容を走査
    pub fn iter(&self) -> impl Iterator<Item = (VehicleType, f64)> + '_ {
        self.rates.iter().map(|(k, v)| (*k, *v))
    }
}
