/// 駐車場（パティオ）機能モジュール
///
/// このモジュールは、駐車場の入出庫に関連する機能を提供します：
/// - 車種ごとの時間料金表
/// - 駐車料金の計算と出庫時の見積もり
/// - APIサーバー経由での入庫・出庫登録
pub mod api_commands;
pub mod fee;
pub mod models;

// 公開インターフェース
pub use api_commands::{
    checkout, find_active_session, list_active_sessions, quote_exit, register_entry, register_exit,
};

pub use fee::{
    compute_fee, compute_fee_until_now, compute_fee_with_policy, format_duration, quote_session,
    FeePolicy, FeeQuote,
};

pub use models::{ParkingSession, RateTable, RegisterEntryDto, RegisterExitDto, VehicleType};
