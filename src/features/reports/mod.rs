/// レポート機能モジュール
///
/// このモジュールは、管理画面のダッシュボードとレポートに関連する機能を提供します：
/// - 在庫車両数・月極契約者数の集計
/// - 月別・利用者区分別の売上集計
/// - 取引一覧のCSV出力
pub mod aggregation;
pub mod api_commands;
pub mod export;
pub mod models;

// 公開インターフェース
pub use aggregation::{revenue_by_month, summarize_revenue};
pub use api_commands::{
    export_transactions_csv, fetch_dashboard_summary, fetch_revenue_report, fetch_transactions,
    parse_report_period, RevenueReport,
};
pub use export::{transactions_to_csv, write_transactions_csv};
pub use models::{DashboardSummary, MonthlyRevenue, RevenueSummary, Transaction};
