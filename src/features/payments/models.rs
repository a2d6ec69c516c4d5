use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 支払い方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// 現金
    #[serde(alias = "dinheiro")]
    Cash,
    /// クレジットカード
    #[serde(alias = "cartao", alias = "credito")]
    Credit,
    /// Pix（即時送金）
    Pix,
}

/// 利用者区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// 時間貸し利用者
    #[serde(alias = "avulso")]
    Casual,
    /// 月極契約者
    #[serde(alias = "mensalista")]
    Monthly,
}

/// 支払い状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[serde(alias = "pago")]
    Paid,
    #[serde(alias = "pendente")]
    Pending,
}

/// 支払いデータモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "forma_pagamento")]
    pub method: PaymentMethod,
    #[serde(rename = "tipo_usuario")]
    pub user_type: UserType,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "pago_em")]
    pub paid_at: DateTime<Utc>,
    pub status: PaymentStatus,
}

/// 支払い登録用DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentDto {
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "forma_pagamento")]
    pub method: PaymentMethod,
    #[serde(rename = "tipo_usuario")]
    pub user_type: UserType,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_deserialization_with_portuguese_aliases() {
        let json = r#"{
            "id": 1,
            "placa": "ABC-1234",
            "valor": 150.0,
            "forma_pagamento": "dinheiro",
            "tipo_usuario": "mensalista",
            "descricao": "Mensalidade - Setembro 2025",
            "pago_em": "2025-09-05T13:00:00Z",
            "status": "pago"
        }"#;

        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.method, PaymentMethod::Cash);
        assert_eq!(payment.user_type, UserType::Monthly);
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.amount, 150.0);
    }

    #[test]
    fn test_create_payment_dto_serialization() {
        let dto = CreatePaymentDto {
            license_plate: "XYZ-5678".to_string(),
            amount: 18.5,
            method: PaymentMethod::Pix,
            user_type: UserType::Casual,
            description: None,
        };

        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains("\"forma_pagamento\":\"pix\""));
        assert!(json.contains("\"tipo_usuario\":\"casual\""));
        assert!(!json.contains("descricao"));
    }
}
