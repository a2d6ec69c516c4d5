use crate::features::formatters::{validate_cpf, validate_license_plate};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{normalize_string, validate_email, validate_required_field, validate_text_length};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 正規化済みのプランID
///
/// バックエンドは数値と文字列のどちらでもプランIDを返すため、
/// 前後の空白を除去し、数字のみのIDは先頭のゼロを取り除いた文字列として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanId(String);

impl PlanId {
    /// 文字列からプランIDを作成する
    ///
    /// # エラー
    /// 空文字列、または空白を含むIDは `Normalization`
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::normalization("プランIDが空です"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::normalization(format!(
                "プランIDに空白が含まれています: {trimmed}"
            )));
        }

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            let without_zeros = trimmed.trim_start_matches('0');
            let normalized = if without_zeros.is_empty() { "0" } else { without_zeros };
            return Ok(Self(normalized.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 数値IDの場合はその値
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for PlanId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl std::str::FromStr for PlanId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PlanId {
    // 数値IDは数値として送信する
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(number) => serializer.serialize_u64(number),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for PlanId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPlanId {
            Number(u64),
            Text(String),
        }

        match RawPlanId::deserialize(deserializer)? {
            RawPlanId::Number(number) => Ok(PlanId::from(number)),
            RawPlanId::Text(text) => PlanId::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}

/// サブスクリプション（契約）の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[serde(alias = "ativo", alias = "ativa", alias = "ACTIVE")]
    Active,
    #[serde(alias = "inativo", alias = "inativa", alias = "INACTIVE")]
    Inactive,
    #[serde(alias = "cancelado", alias = "cancelada", alias = "CANCELLED")]
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_status() -> SubscriptionStatus {
    SubscriptionStatus::Active
}

/// サブスクリプションデータモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    #[serde(rename = "mensalista_id")]
    pub subscriber_id: i64,
    #[serde(rename = "plano_id")]
    pub plan_id: PlanId,
    #[serde(rename = "data_inicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "data_fim", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: SubscriptionStatus,
}

impl Subscription {
    /// 解約済みでないかどうか
    pub fn is_current(&self) -> bool {
        self.status != SubscriptionStatus::Cancelled
    }
}

/// 月極契約者データモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    pub cpf: String,
    #[serde(default)]
    pub rg: Option<String>,
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "modelo_veiculo", default)]
    pub vehicle_model: Option<String>,
    #[serde(rename = "cor_veiculo", default)]
    pub vehicle_color: Option<String>,
    #[serde(rename = "plano_id", default)]
    pub plan_id: Option<PlanId>,
    #[serde(default = "default_status")]
    pub status: SubscriptionStatus,
}

/// 月極契約者の登録・更新用DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberDto {
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub cpf: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rg: Option<String>,
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "modelo_veiculo", skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(rename = "cor_veiculo", skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(rename = "plano_id", skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<PlanId>,
    pub status: SubscriptionStatus,
}

impl SubscriberDto {
    /// 入力値を検証し、送信用に正規化したDTOを返す
    ///
    /// CPFは数字11桁、ナンバープレートは大文字に正規化される。
    pub fn normalized(self) -> AppResult<Self> {
        validate_required_field(&self.full_name, "氏名")?;
        validate_text_length(self.full_name.trim(), 100, "氏名")?;
        validate_email(&self.email)?;

        Ok(Self {
            full_name: normalize_string(&self.full_name),
            email: normalize_string(&self.email),
            cpf: validate_cpf(&self.cpf)?,
            license_plate: validate_license_plate(&self.license_plate)?,
            phone: self.phone.map(|p| normalize_string(&p)).filter(|p| !p.is_empty()),
            rg: self.rg.map(|r| normalize_string(&r)).filter(|r| !r.is_empty()),
            ..self
        })
    }
}

/// サブスクリプション作成用DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubscriptionDto {
    #[serde(rename = "mensalista_id")]
    pub subscriber_id: i64,
    #[serde(rename = "plano_id")]
    pub plan_id: PlanId,
    #[serde(rename = "data_inicio")]
    pub start_date: NaiveDate,
}

/// サブスクリプション解約用DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelSubscriptionDto {
    #[serde(rename = "data_fim")]
    pub end_date: NaiveDate,
}

/// サブスクリプション状態更新用DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusDto {
    pub status: SubscriptionStatus,
}

/// プラン変更リクエスト
///
/// 画面で選択されたプラン・状態と、契約者の現在のサブスクリプションをまとめたもの。
#[derive(Debug, Clone, PartialEq)]
pub struct PlanChangeRequest {
    pub subscriber_id: i64,
    pub current_subscription: Option<Subscription>,
    pub requested_plan_id: Option<String>,
    pub requested_status: Option<SubscriptionStatus>,
}
