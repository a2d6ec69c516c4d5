/// 月極契約申請機能モジュール
///
/// - 公開ポータルからの申請送信
/// - 審査待ち申請の一覧、承認、却下
pub mod api_commands;
pub mod models;

// 公開インターフェース
pub use api_commands::{
    approve_application, decline_application, list_pending_applications, submit_application,
};
pub use models::{Application, ApplicationStatus, DeclineApplicationDto, SubmitApplicationDto};
