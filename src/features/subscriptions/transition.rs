//! サブスクリプション遷移の決定
//!
//! 契約者の現在のサブスクリプションと、画面で選択されたプラン・状態から、
//! バックエンドに送るべき操作の列を決める。副作用はない。
use super::models::{PlanChangeRequest, PlanId, Subscription, SubscriptionStatus};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::today_local;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// バックエンドへ送る操作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TransitionAction {
    /// 現在のサブスクリプションを解約する
    CancelSubscription {
        subscription_id: i64,
        effective_date: NaiveDate,
    },
    /// 新しいサブスクリプションを作成する
    CreateSubscription { plan_id: PlanId, start_date: NaiveDate },
    /// プランを変えずに状態のみ更新する
    UpdateStatus {
        subscription_id: i64,
        new_status: SubscriptionStatus,
    },
}

/// 遷移操作の列を決定する
///
/// | 現在の契約 | プラン変更 | 操作 |
/// |---|---|---|
/// | なし | - | 作成 |
/// | あり | あり | 解約 → 作成 |
/// | あり | なし | 状態が異なれば状態更新、同じなら何もしない |
///
/// 解約済みのサブスクリプションは現在の契約として扱わない。
/// 現在の契約がある場合、`requested_plan_id` が `None` ならプランは維持される。
///
/// # エラー
/// * 現在の契約がなくプランも指定されていない場合は `MissingPlan`
/// * プランIDを正規化できない場合は `Normalization`
pub fn resolve_transition(
    current: Option<&Subscription>,
    requested_plan_id: Option<&str>,
    requested_status: Option<SubscriptionStatus>,
    today: NaiveDate,
) -> AppResult<Vec<TransitionAction>> {
    let requested_plan = requested_plan_id.map(PlanId::parse).transpose()?;

    let Some(current) = current.filter(|s| s.is_current()) else {
        let plan_id = requested_plan.ok_or(AppError::MissingPlan)?;
        return Ok(vec![TransitionAction::CreateSubscription {
            plan_id,
            start_date: today,
        }]);
    };

    match requested_plan {
        Some(plan_id) if plan_id != current.plan_id => Ok(vec![
            TransitionAction::CancelSubscription {
                subscription_id: current.id,
                effective_date: today,
            },
            TransitionAction::CreateSubscription {
                plan_id,
                start_date: today,
            },
        ]),
        _ => match requested_status {
            Some(new_status) if new_status != current.status => {
                Ok(vec![TransitionAction::UpdateStatus {
                    subscription_id: current.id,
                    new_status,
                }])
            }
            _ => Ok(Vec::new()),
        },
    }
}

/// 現地時間の今日を基準に遷移操作の列を決定する
pub fn resolve_transition_today(
    current: Option<&Subscription>,
    requested_plan_id: Option<&str>,
    requested_status: Option<SubscriptionStatus>,
) -> AppResult<Vec<TransitionAction>> {
    resolve_transition(current, requested_plan_id, requested_status, today_local())
}

impl PlanChangeRequest {
    /// リクエストから遷移操作の列を決定する
    pub fn resolve(&self, today: NaiveDate) -> AppResult<Vec<TransitionAction>> {
        resolve_transition(
            self.current_subscription.as_ref(),
            self.requested_plan_id.as_deref(),
            self.requested_status,
            today,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    fn subscription(id: i64, plan: &str, status: SubscriptionStatus) -> Subscription {
        Subscription {
            id,
            subscriber_id: 12,
            plan_id: PlanId::parse(plan).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            status,
        }
    }

    fn plan(raw: &str) -> PlanId {
        PlanId::parse(raw).unwrap()
    }

    #[test]
    fn test_no_current_subscription_creates() {
        let actions = resolve_transition(None, Some("P1"), None, today()).unwrap();
        assert_eq!(
            actions,
            vec![TransitionAction::CreateSubscription {
                plan_id: plan("P1"),
                start_date: today(),
            }]
        );
    }

    #[test]
    fn test_no_current_subscription_without_plan_is_missing_plan() {
        let result = resolve_transition(None, None, Some(SubscriptionStatus::Active), today());
        assert!(matches!(result, Err(AppError::MissingPlan)));
    }

    #[test]
    fn test_same_plan_same_status_is_noop() {
        let current = subscription(5, "P1", SubscriptionStatus::Active);
        let actions = resolve_transition(
            Some(&current),
            Some("P1"),
            Some(SubscriptionStatus::Active),
            today(),
        )
        .unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_same_plan_different_status_updates_status() {
        let current = subscription(5, "P1", SubscriptionStatus::Active);
        let actions = resolve_transition(
            Some(&current),
            Some("P1"),
            Some(SubscriptionStatus::Inactive),
            today(),
        )
        .unwrap();
        assert_eq!(
            actions,
            vec![TransitionAction::UpdateStatus {
                subscription_id: 5,
                new_status: SubscriptionStatus::Inactive,
            }]
        );
    }

    #[test]
    fn test_plan_change_cancels_then_creates() {
        let current = subscription(5, "P1", SubscriptionStatus::Active);
        let actions = resolve_transition(Some(&current), Some("P2"), None, today()).unwrap();
        assert_eq!(
            actions,
            vec![
                TransitionAction::CancelSubscription {
                    subscription_id: 5,
                    effective_date: today(),
                },
                TransitionAction::CreateSubscription {
                    plan_id: plan("P2"),
                    start_date: today(),
                },
            ]
        );
    }

    #[test]
    fn test_numeric_plan_ids_compare_normalized() {
        let current = subscription(8, "7", SubscriptionStatus::Active);
        let actions = resolve_transition(Some(&current), Some(" 007 "), None, today()).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_missing_requested_plan_keeps_current_plan() {
        let current = subscription(5, "P1", SubscriptionStatus::Inactive);
        let actions =
            resolve_transition(Some(&current), None, Some(SubscriptionStatus::Active), today())
                .unwrap();
        assert_eq!(
            actions,
            vec![TransitionAction::UpdateStatus {
                subscription_id: 5,
                new_status: SubscriptionStatus::Active,
            }]
        );

        let actions = resolve_transition(Some(&current), None, None, today()).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_cancelled_subscription_is_not_current() {
        let cancelled = subscription(3, "P1", SubscriptionStatus::Cancelled);
        let actions = resolve_transition(Some(&cancelled), Some("P1"), None, today()).unwrap();
        assert_eq!(
            actions,
            vec![TransitionAction::CreateSubscription {
                plan_id: plan("P1"),
                start_date: today(),
            }]
        );

        let result = resolve_transition(Some(&cancelled), None, None, today());
        assert!(matches!(result, Err(AppError::MissingPlan)));
    }

    #[test]
    fn test_invalid_plan_id_is_normalization_error() {
        let current = subscription(5, "P1", SubscriptionStatus::Active);
        let result = resolve_transition(Some(&current), Some("   "), None, today());
        assert!(matches!(result, Err(AppError::Normalization(_))));
    }

    #[test]
    fn test_plan_change_request_resolve() {
        let request = PlanChangeRequest {
            subscriber_id: 12,
            current_subscription: Some(subscription(5, "1", SubscriptionStatus::Active)),
            requested_plan_id: Some("2".to_string()),
            requested_status: Some(SubscriptionStatus::Active),
        };
        let actions = request.resolve(today()).unwrap();
        assert_eq!(actions.len(), 2);
        assert!(matches!(
            actions[0],
            TransitionAction::CancelSubscription { subscription_id: 5, .. }
        ));
    }

    #[test]
    fn test_resolve_transition_today_uses_local_date() {
        let current = subscription(5, "P1", SubscriptionStatus::Active);
        let actions = resolve_transition_today(Some(&current), Some("P2"), None).unwrap();
        let expected = resolve_transition(Some(&current), Some("P2"), None, today_local()).unwrap();
        assert_eq!(actions, expected);
        assert!(matches!(
            actions[1],
            TransitionAction::CreateSubscription { start_date, .. } if start_date == today_local()
        ));
    }

    #[test]
    fn test_action_serialization() {
        let action = TransitionAction::UpdateStatus {
            subscription_id: 5,
            new_status: SubscriptionStatus::Inactive,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "update_status");
        assert_eq!(json["new_status"], "inactive");
    }
}
