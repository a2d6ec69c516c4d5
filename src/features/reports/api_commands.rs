//! API Server経由でのレポート取得
use super::aggregation::{revenue_by_month, summarize_revenue};
use super::models::{DashboardSummary, MonthlyRevenue, RevenueSummary, Transaction};
use crate::features::parking::list_active_sessions;
use crate::features::subscriptions::list_subscribers;
use crate::shared::api_client::ApiClient;
use crate::shared::errors::AppResult;
use crate::shared::utils::{validate_date, validate_date_range};
use chrono::NaiveDate;
use log::info;

/// ダッシュボードの集計値を取得する
///
/// 在庫車両と月極契約者の一覧を並行して取得し、件数を返す。
pub async fn fetch_dashboard_summary(
    api_client: &ApiClient,
    session_token: Option<&str>,
) -> AppResult<DashboardSummary> {
    let (sessions, subscribers) = tokio::try_join!(
        list_active_sessions(api_client, session_token),
        list_subscribers(api_client, session_token)
    )?;

    let summary = DashboardSummary {
        vehicles_parked: sessions.len(),
        monthly_parkers: subscribers.len(),
    };
    info!(
        "ダッシュボード集計取得成功: vehicles_parked={}, monthly_parkers={}",
        summary.vehicles_parked, summary.monthly_parkers
    );
    Ok(summary)
}

/// 画面入力（YYYY-MM-DD）からレポート期間を作成する
pub fn parse_report_period(start: &str, end: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = validate_date(start.trim())?;
    let end = validate_date(end.trim())?;
    validate_date_range(start, end)?;
    Ok((start, end))
}

/// 期間内の取引一覧を取得する（新しい順）
///
/// # 引数
/// * `start` - 開始日（含む）
/// * `end` - 終了日（含む）
pub async fn fetch_transactions(
    api_client: &ApiClient,
    start: NaiveDate,
    end: NaiveDate,
    session_token: Option<&str>,
) -> AppResult<Vec<Transaction>> {
    validate_date_range(start, end)?;
    let endpoint = format!(
        "/relatorios/transacoes?inicio={}&fim={}",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    );

    let mut transactions: Vec<Transaction> = api_client.get(&endpoint, session_token).await?;
    transactions.sort_by(|a, b| b.datetime.cmp(&a.datetime));

    info!(
        "取引一覧取得成功: start={start}, end={end}, count={}",
        transactions.len()
    );
    Ok(transactions)
}

/// 売上レポート
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueReport {
    pub months: Vec<MonthlyRevenue>,
    pub summary: RevenueSummary,
    pub transactions: Vec<Transaction>,
}

/// 期間内の売上レポートを作成する
pub async fn fetch_revenue_report(
    api_client: &ApiClient,
    start: NaiveDate,
    end: NaiveDate,
    session_token: Option<&str>,
) -> AppResult<RevenueReport> {
    let transactions = fetch_transactions(api_client, start, end, session_token).await?;
    Ok(RevenueReport {
        months: revenue_by_month(&transactions),
        summary: summarize_revenue(&transactions),
        transactions,
    })
}

/// 期間内の取引一覧をCSVファイルに出力する
///
/// # 戻り値
/// 出力した取引件数
pub async fn export_transactions_csv(
    api_client: &ApiClient,
    start: NaiveDate,
    end: NaiveDate,
    path: &std::path::Path,
    session_token: Option<&str>,
) -> AppResult<usize> {
    let transactions = fetch_transactions(api_client, start, end, session_token).await?;
    let csv = super::export::transactions_to_csv(&transactions);
    tokio::fs::write(path, csv).await?;

    info!(
        "取引CSVを出力しました: path={}, rows={}",
        path.display(),
        transactions.len()
    );
    Ok(transactions.len())
}
