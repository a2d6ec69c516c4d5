/// 支払い機能モジュール
///
/// - 支払いの登録（現金・クレジットカード・Pix）
/// - ナンバープレート単位の支払い履歴
pub mod api_commands;
pub mod models;

// 公開インターフェース
pub use api_commands::{fetch_payment_history, record_payment};
pub use models::{CreatePaymentDto, Payment, PaymentMethod, PaymentStatus, UserType};
