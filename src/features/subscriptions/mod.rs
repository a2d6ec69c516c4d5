/// サブスクリプション（月極契約）機能モジュール
///
/// このモジュールは、月極契約に関連するすべての機能を提供します：
/// - 月極契約者の登録、取得、更新
/// - プラン変更・状態変更に必要な操作の決定
/// - APIサーバー経由でのサブスクリプション操作
pub mod api_commands;
pub mod models;
pub mod transition;

// 公開インターフェース
pub use api_commands::{
    apply_transition, cancel_subscription, change_subscription, create_subscriber,
    create_subscription, filter_subscribers, find_current_subscription, get_subscriber,
    list_subscribers, list_subscriptions, list_subscriptions_for_all, update_subscriber,
    update_subscription_status,
};

pub use models::{
    CancelSubscriptionDto, CreateSubscriptionDto, PlanChangeRequest, PlanId, Subscriber,
    SubscriberDto, Subscription, SubscriptionStatus, UpdateStatusDto,
};

pub use transition::{resolve_transition, resolve_transition_today, TransitionAction};
