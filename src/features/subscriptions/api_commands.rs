//! API Server経由での月極契約者・サブスクリプション操作
//!
//! 月極契約者の登録・更新、サブスクリプションの取得と、
//! 遷移操作の列をバックエンドへ順に適用する処理を提供します。
use super::models::{
    CancelSubscriptionDto, CreateSubscriptionDto, PlanChangeRequest, Subscriber, SubscriberDto,
    Subscription, UpdateStatusDto,
};
use super::transition::TransitionAction;
use crate::shared::api_client::ApiClient;
use crate::shared::errors::AppResult;
use chrono::NaiveDate;
use futures::future::try_join_all;
use log::{debug, info};

/// 月極契約者一覧を取得する
pub async fn list_subscribers(
    api_client: &ApiClient,
    session_token: Option<&str>,
) -> AppResult<Vec<Subscriber>> {
    let subscribers: Vec<Subscriber> = api_client.get("/mensalistas/", session_token).await?;
    info!("月極契約者一覧取得成功: count={}", subscribers.len());
    Ok(subscribers)
}

/// 月極契約者を取得する
pub async fn get_subscriber(
    api_client: &ApiClient,
    subscriber_id: i64,
    session_token: Option<&str>,
) -> AppResult<Subscriber> {
    api_client
        .get(&format!("/mensalistas/{subscriber_id}"), session_token)
        .await
}

/// 月極契約者を登録する
///
/// # 引数
/// * `api_client` - APIクライアント
/// * `dto` - 登録用DTO（送信前に検証・正規化される）
/// * `session_token` - セッショントークン
pub async fn create_subscriber(
    api_client: &ApiClient,
    dto: SubscriberDto,
    session_token: Option<&str>,
) -> AppResult<Subscriber> {
    let dto = dto.normalized()?;
    let subscriber: Subscriber = api_client.post("/mensalistas/", &dto, session_token).await?;

    info!("月極契約者登録成功: subscriber_id={}", subscriber.id);
    Ok(subscriber)
}

/// 月極契約者を更新する
pub async fn update_subscriber(
    api_client: &ApiClient,
    subscriber_id: i64,
    dto: SubscriberDto,
    session_token: Option<&str>,
) -> AppResult<Subscriber> {
    let dto = dto.normalized()?;
    let subscriber: Subscriber = api_client
        .put(&format!("/mensalistas/{subscriber_id}"), &dto, session_token)
        .await?;

    info!("月極契約者更新成功: subscriber_id={}", subscriber.id);
    Ok(subscriber)
}

/// 月極契約者のサブスクリプション一覧を取得する（開始日の新しい順）
pub async fn list_subscriptions(
    api_client: &ApiClient,
    subscriber_id: i64,
    session_token: Option<&str>,
) -> AppResult<Vec<Subscription>> {
    let mut subscriptions: Vec<Subscription> = api_client
        .get(
            &format!("/mensalistas/{subscriber_id}/assinaturas"),
            session_token,
        )
        .await?;
    subscriptions.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    Ok(subscriptions)
}

/// 複数の月極契約者のサブスクリプションを並行して取得する
///
/// いずれか1件でも失敗した場合はエラーを返す。
pub async fn list_subscriptions_for_all(
    api_client: &ApiClient,
    subscriber_ids: &[i64],
    session_token: Option<&str>,
) -> AppResult<Vec<(i64, Vec<Subscription>)>> {
    let requests = subscriber_ids.iter().map(|&id| async move {
        let subscriptions = list_subscriptions(api_client, id, session_token).await?;
        Ok::<_, crate::shared::errors::AppError>((id, subscriptions))
    });
    try_join_all(requests).await
}

/// 現在のサブスクリプション（解約済み以外で最新のもの）を取得する
pub async fn find_current_subscription(
    api_client: &ApiClient,
    subscriber_id: i64,
    session_token: Option<&str>,
) -> AppResult<Option<Subscription>> {
    let subscriptions = list_subscriptions(api_client, subscriber_id, session_token).await?;
    Ok(subscriptions.into_iter().find(Subscription::is_current))
}

/// サブスクリプションを作成する
pub async fn create_subscription(
    api_client: &ApiClient,
    dto: &CreateSubscriptionDto,
    session_token: Option<&str>,
) -> AppResult<Subscription> {
    let subscription: Subscription = api_client.post("/assinaturas/", dto, session_token).await?;
    info!(
        "サブスクリプション作成成功: subscription_id={}, plan_id={}",
        subscription.id, subscription.plan_id
    );
    Ok(subscription)
}

/// サブスクリプションを解約する
pub async fn cancel_subscription(
    api_client: &ApiClient,
    subscription_id: i64,
    effective_date: NaiveDate,
    session_token: Option<&str>,
) -> AppResult<Subscription> {
    let dto = CancelSubscriptionDto {
        end_date: effective_date,
    };
    let subscription: Subscription = api_client
        .post(
            &format!("/assinaturas/{subscription_id}/cancelar"),
            &dto,
            session_token,
        )
        .await?;
    info!("サブスクリプション解約成功: subscription_id={subscription_id}");
    Ok(subscription)
}

/// サブスクリプションの状態を更新する
pub async fn update_subscription_status(
    api_client: &ApiClient,
    subscription_id: i64,
    dto: &UpdateStatusDto,
    session_token: Option<&str>,
) -> AppResult<Subscription> {
    let subscription: Subscription = api_client
        .patch(
            &format!("/assinaturas/{subscription_id}/status"),
            dto,
            session_token,
        )
        .await?;
    info!(
        "サブスクリプション状態更新成功: subscription_id={subscription_id}, status={}",
        subscription.status
    );
    Ok(subscription)
}

/// 遷移操作の列をバックエンドへ順に適用する
///
/// 最初に失敗した操作で中断し、そのエラーを返す。
/// それまでに適用された操作は取り消さない。
///
/// # 戻り値
/// 各操作に対してバックエンドが返したサブスクリプション（操作と同じ順）
pub async fn apply_transition(
    api_client: &ApiClient,
    subscriber_id: i64,
    actions: &[TransitionAction],
    session_token: Option<&str>,
) -> AppResult<Vec<Subscription>> {
    let mut results = Vec::with_capacity(actions.len());

    for action in actions {
        debug!("遷移操作を適用: subscriber_id={subscriber_id}, action={action:?}");
        let subscription = match action {
            TransitionAction::CancelSubscription {
                subscription_id,
                effective_date,
            } => {
                cancel_subscription(api_client, *subscription_id, *effective_date, session_token)
                    .await?
            }
            TransitionAction::CreateSubscription {
                plan_id,
                start_date,
            } => {
                let dto = CreateSubscriptionDto {
                    subscriber_id,
                    plan_id: plan_id.clone(),
                    start_date: *start_date,
                };
                create_subscription(api_client, &dto, session_token).await?
            }
            TransitionAction::UpdateStatus {
                subscription_id,
                new_status,
            } => {
                let dto = UpdateStatusDto {
                    status: *new_status,
                };
                update_subscription_status(api_client, *subscription_id, &dto, session_token)
                    .await?
            }
        };
        results.push(subscription);
    }

    info!(
        "遷移操作の適用完了: subscriber_id={subscriber_id}, actions={}",
        actions.len()
    );
    Ok(results)
}

/// プラン変更リクエストを解決し、バックエンドへ適用する
///
/// リクエストに有効な現在のサブスクリプションが含まれていない場合
/// （未指定または解約済み）はバックエンドから取得する。
pub async fn change_subscription(
    api_client: &ApiClient,
    mut request: PlanChangeRequest,
    today: NaiveDate,
    session_token: Option<&str>,
) -> AppResult<Vec<Subscription>> {
    let has_current = request
        .current_subscription
        .as_ref()
        .is_some_and(Subscription::is_current);
    if !has_current {
        request.current_subscription =
            find_current_subscription(api_client, request.subscriber_id, session_token).await?;
    }

    let actions = request.resolve(today)?;
    if actions.is_empty() {
        info!(
            "サブスクリプションに変更はありません: subscriber_id={}",
            request.subscriber_id
        );
        return Ok(Vec::new());
    }

    apply_transition(api_client, request.subscriber_id, &actions, session_token).await
}

/// 氏名・ナンバープレート・CPFで月極契約者を絞り込む
///
/// 大文字小文字と記号の違いは無視する。空のクエリは全件を返す。
pub fn filter_subscribers<'a>(subscribers: &'a [Subscriber], query: &str) -> Vec<&'a Subscriber> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return subscribers.iter().collect();
    }
    let query_digits = crate::features::formatters::digits_only(&query);
    let query_compact: String = query.chars().filter(|c| c.is_alphanumeric()).collect();

    subscribers
        .iter()
        .filter(|s| {
            let plate: String = s
                .license_plate
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect();
            s.full_name.to_lowercase().contains(&query)
                || (!query_compact.is_empty() && plate.contains(&query_compact))
                || (!query_digits.is_empty()
                    && query_digits.len() == query_compact.len()
                    && crate::features::formatters::digits_only(&s.cpf).contains(&query_digits))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subscriptions::models::{PlanId, SubscriptionStatus};

    fn subscriber(id: i64, name: &str, plate: &str, cpf: &str) -> Subscriber {
        Subscriber {
            id,
            full_name: name.to_string(),
            email: format!("user{id}@example.com"),
            phone: None,
            cpf: cpf.to_string(),
            rg: None,
            license_plate: plate.to_string(),
            vehicle_model: None,
            vehicle_color: None,
            plan_id: Some(PlanId::from(1)),
            status: SubscriptionStatus::Active,
        }
    }

    #[test]
    fn test_filter_subscribers() {
        let subscribers = vec![
            subscriber(1, "Maria Silva", "ABC-1234", "12345678900"),
            subscriber(2, "João Souza", "XYZ1D23", "98765432100"),
        ];

        assert_eq!(filter_subscribers(&subscribers, "").len(), 2);
        assert_eq!(filter_subscribers(&subscribers, "maria")[0].id, 1);
        assert_eq!(filter_subscribers(&subscribers, "abc1234")[0].id, 1);
        assert_eq!(filter_subscribers(&subscribers, "xyz-1d23")[0].id, 2);
        assert_eq!(filter_subscribers(&subscribers, "987.654")[0].id, 2);
        assert!(filter_subscribers(&subscribers, "pedro").is_empty());
    }
}
