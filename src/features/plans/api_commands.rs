//! API Server経由でのプラン・時間料金操作
use super::models::{HourlyTariffs, Plan, PlanDto};
use crate::features::parking::RateTable;
use crate::features::subscriptions::PlanId;
use crate::shared::api_client::ApiClient;
use crate::shared::errors::AppResult;
use log::info;

/// プラン一覧を取得する（料金の安い順）
pub async fn list_plans(api_client: &ApiClient, session_token: Option<&str>) -> AppResult<Vec<Plan>> {
    let mut plans: Vec<Plan> = api_client.get("/planos/", session_token).await?;
    plans.sort_by(|a, b| a.price.total_cmp(&b.price));

    info!("プラン一覧取得成功: count={}", plans.len());
    Ok(plans)
}

/// プランを作成する
pub async fn create_plan(
    api_client: &ApiClient,
    dto: PlanDto,
    session_token: Option<&str>,
) -> AppResult<Plan> {
    let dto = dto.normalized()?;
    let plan: Plan = api_client.post("/planos/", &dto, session_token).await?;

    info!("プラン作成成功: plan_id={}", plan.id);
    Ok(plan)
}

/// プランを更新する
pub async fn update_plan(
    api_client: &ApiClient,
    plan_id: &PlanId,
    dto: PlanDto,
    session_token: Option<&str>,
) -> AppResult<Plan> {
    let dto = dto.normalized()?;
    let endpoint = format!("/planos/{}", urlencoding::encode(plan_id.as_str()));
    let plan: Plan = api_client.put(&endpoint, &dto, session_token).await?;

    info!("プラン更新成功: plan_id={}", plan.id);
    Ok(plan)
}

/// プランを削除する
pub async fn delete_plan(
    api_client: &ApiClient,
    plan_id: &PlanId,
    session_token: Option<&str>,
) -> AppResult<()> {
    let endpoint = format!("/planos/{}", urlencoding::encode(plan_id.as_str()));
    api_client.delete(&endpoint, session_token).await?;

    info!("プラン削除成功: plan_id={plan_id}");
    Ok(())
}

/// 時間料金を取得する
pub async fn get_tariffs(
    api_client: &ApiClient,
    session_token: Option<&str>,
) -> AppResult<HourlyTariffs> {
    let tariffs: HourlyTariffs = api_client.get("/tarifas/", session_token).await?;
    tariffs.validate()?;
    Ok(tariffs)
}

/// 時間料金を更新する
pub async fn update_tariffs(
    api_client: &ApiClient,
    tariffs: &HourlyTariffs,
    session_token: Option<&str>,
) -> AppResult<HourlyTariffs> {
    tariffs.validate()?;
    let updated: HourlyTariffs = api_client.put("/tarifas/", tariffs, session_token).await?;

    info!(
        "時間料金更新成功: motorcycle={}, car={}, suv={}",
        updated.motorcycle, updated.car, updated.suv
    );
    Ok(updated)
}

/// バックエンドの時間料金から料金表を作成する
pub async fn fetch_rate_table(
    api_client: &ApiClient,
    session_token: Option<&str>,
) -> AppResult<RateTable> {
    RateTable::try_from(get_tariffs(api_client, session_token).await?)
}
