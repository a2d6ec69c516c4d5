use crate::features::formatters::{validate_cpf, validate_license_plate};
use crate::features::subscriptions::PlanId;
use crate::shared::errors::AppResult;
use crate::shared::utils::{
    normalize_string, validate_email, validate_required_field, validate_text_length,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 月極契約申請の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "pendente", alias = "pending")]
    Pending,
    #[serde(rename = "aprovada", alias = "aprovado", alias = "approved")]
    Approved,
    #[serde(rename = "recusada", alias = "recusado", alias = "declined")]
    Declined,
}

impl ApplicationStatus {
    /// クエリパラメータで使用する値
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pendente",
            ApplicationStatus::Approved => "aprovada",
            ApplicationStatus::Declined => "recusada",
        }
    }
}

/// 月極契約申請データモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    pub email: String,
    pub cpf: String,
    #[serde(default)]
    pub rg: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "plano_id")]
    pub plan_id: PlanId,
    #[serde(rename = "tipo_veiculo_id", default)]
    pub vehicle_type_id: Option<i64>,
    #[serde(rename = "documento_pessoal_path", default)]
    pub personal_document_path: Option<String>,
    #[serde(rename = "comprovante_vinculo_path", default)]
    pub employment_proof_path: Option<String>,
    pub status: ApplicationStatus,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

/// 月極契約申請の送信用DTO
///
/// 書類はアップロード済みのパスのみを扱う。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitApplicationDto {
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    pub email: String,
    pub cpf: String,
    pub rg: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "plano_id")]
    pub plan_id: PlanId,
    #[serde(rename = "tipo_veiculo_id", skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<i64>,
    #[serde(rename = "documento_pessoal_path")]
    pub personal_document_path: String,
    #[serde(rename = "comprovante_vinculo_path")]
    pub employment_proof_path: String,
}

impl SubmitApplicationDto {
    /// 入力値を検証し、送信用に正規化したDTOを返す
    pub fn normalized(self) -> AppResult<Self> {
        validate_required_field(&self.full_name, "氏名")?;
        validate_text_length(self.full_name.trim(), 100, "氏名")?;
        validate_email(&self.email)?;
        validate_required_field(&self.rg, "RG")?;
        validate_required_field(&self.personal_document_path, "本人確認書類")?;
        validate_required_field(&self.employment_proof_path, "在職証明書")?;

        Ok(Self {
            full_name: normalize_string(&self.full_name),
            email: normalize_string(&self.email),
            cpf: validate_cpf(&self.cpf)?,
            rg: normalize_string(&self.rg),
            license_plate: validate_license_plate(&self.license_plate)?,
            phone: self.phone.map(|p| normalize_string(&p)).filter(|p| !p.is_empty()),
            ..self
        })
    }
}

/// 申請却下用DTO
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclineApplicationDto {
    #[serde(rename = "motivo", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
