use crate::features::payments::{PaymentMethod, UserType};
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// 取引（支払い実績）データモデル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "data_hora")]
    pub datetime: DateTime<Utc>,
    #[serde(rename = "placa")]
    pub license_plate: String,
    #[serde(rename = "tipo_usuario")]
    pub user_type: UserType,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "forma_pagamento", default)]
    pub method: Option<PaymentMethod>,
}

/// ダッシュボードの集計値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// 在庫中の車両数
    pub vehicles_parked: usize,
    /// 月極契約者数
    pub monthly_parkers: usize,
}

/// 月別の売上（利用者区分別）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub casual: f64,
    pub monthly: f64,
}

impl MonthlyRevenue {
    pub fn total(&self) -> f64 {
        crate::shared::utils::round_currency(self.casual + self.monthly)
    }

    /// 表示用の年月（例: "2025-09"）
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// 期間全体の売上サマリー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub casual_revenue: f64,
    pub monthly_revenue: f64,
    pub transaction_count: usize,
    /// 有料取引（金額0を除く）の平均単価
    pub average_ticket: Option<f64>,
    /// 取引件数が最も多い曜日（現地時間）
    pub busiest_weekday: Option<Weekday>,
}
