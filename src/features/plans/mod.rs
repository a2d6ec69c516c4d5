/// プラン・時間料金機能モジュール
///
/// - 月極プランの一覧、作成、更新、削除
/// - 車種ごとの時間料金の取得と更新
pub mod api_commands;
pub mod models;

// 公開インターフェース
pub use api_commands::{
    create_plan, delete_plan, fetch_rate_table, get_tariffs, list_plans, update_plan,
    update_tariffs,
};
pub use models::{HourlyTariffs, Plan, PlanDto};
