/// 機能別モジュール
///
/// このモジュールは、駐車場管理コンソールの機能を機能別に整理したモジュール群を提供します。
/// 各機能モジュールは、その機能に関連するコード（モデル、計算ロジック、APIコマンド）
/// を含む自己完結型のユニットです。
// 機能モジュールの宣言
pub mod applications;
pub mod auth;
pub mod formatters;
pub mod parking;
pub mod payments;
pub mod plans;
pub mod reports;
pub mod subscriptions;
