use crate::features::parking::{RateTable, VehicleType};
use crate::features::subscriptions::PlanId;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{
    normalize_string, validate_amount, validate_non_negative_amount, validate_required_field,
    validate_text_length,
};
use serde::{Deserialize, Serialize};

/// 月極プランデータモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    #[serde(rename = "nome")]
    pub name: String, // 100文字以内
    #[serde(rename = "preco")]
    pub price: f64, // 月額、正の数値
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
}

/// プラン作成・更新用DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDto {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PlanDto {
    /// 入力値を検証し、送信用に正規化したDTOを返す
    pub fn normalized(self) -> AppResult<Self> {
        validate_required_field(&self.name, "プラン名")?;
        validate_text_length(self.name.trim(), 100, "プラン名")?;
        validate_amount(self.price)?;
        if let Some(description) = &self.description {
            validate_text_length(description, 500, "説明")?;
        }

        Ok(Self {
            name: normalize_string(&self.name),
            price: self.price,
            description: self
                .description
                .map(|d| normalize_string(&d))
                .filter(|d| !d.is_empty()),
        })
    }
}

/// 時間料金（バックエンドの料金表形式）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyTariffs {
    #[serde(rename = "moto")]
    pub motorcycle: f64,
    #[serde(rename = "carro")]
    pub car: f64,
    #[serde(rename = "caminhonete")]
    pub suv: f64,
}

impl HourlyTariffs {
    /// すべての料金が0以上であることを検証
    pub fn validate(&self) -> AppResult<()> {
        validate_non_negative_amount(self.motorcycle, "バイクの時間料金")?;
        validate_non_negative_amount(self.car, "乗用車の時間料金")?;
        validate_non_negative_amount(self.suv, "SUVの時間料金")?;
        Ok(())
    }
}

impl TryFrom<HourlyTariffs> for RateTable {
    type Error = AppError;

    fn try_from(tariffs: HourlyTariffs) -> Result<Self, Self::Error> {
        RateTable::new([
            (VehicleType::Motorcycle, tariffs.motorcycle),
            (VehicleType::Car, tariffs.car),
            (VehicleType::Suv, tariffs.suv),
        ])
    }
}

impl TryFrom<&RateTable> for HourlyTariffs {
    type Error = AppError;

    fn try_from(table: &RateTable) -> Result<Self, Self::Error> {
        Ok(Self {
            motorcycle: table.rate_for(VehicleType::Motorcycle)?,
            car: table.rate_for(VehicleType::Car)?,
            suv: table.rate_for(VehicleType::Suv)?,
        })
    }
}
