//! API Server経由での月極契約申請操作
//!
//! 公開ポータルからの申請送信と、管理画面での審査（承認・却下）を行う。
use super::models::{Application, ApplicationStatus, DeclineApplicationDto, SubmitApplicationDto};
use crate::shared::api_client::ApiClient;
use crate::shared::errors::{AppError, AppResult};
use log::{info, warn};

/// 月極契約申請を送信する
///
/// 公開ポータルから呼ばれるため、セッショントークンは不要。
pub async fn submit_application(
    api_client: &ApiClient,
    dto: SubmitApplicationDto,
) -> AppResult<Application> {
    let dto = dto.normalized()?;
    let application: Application = api_client.post("/solicitacoes/", &dto, None).await?;

    info!("月極契約申請送信成功: application_id={}", application.id);
    Ok(application)
}

/// 審査待ちの申請一覧を取得する（申請日時の古い順）
pub async fn list_pending_applications(
    api_client: &ApiClient,
    session_token: Option<&str>,
) -> AppResult<Vec<Application>> {
    let endpoint = format!(
        "/solicitacoes/?status={}",
        ApplicationStatus::Pending.as_query_value()
    );
    let mut applications: Vec<Application> = api_client.get(&endpoint, session_token).await?;

    let before = applications.len();
    applications.retain(|a| a.status == ApplicationStatus::Pending);
    if applications.len() != before {
        warn!(
            "審査待ち以外の申請が含まれていたため除外しました: count={}",
            before - applications.len()
        );
    }
    applications.sort_by_key(|a| a.created_at);

    info!("審査待ち申請取得成功: count={}", applications.len());
    Ok(applications)
}

/// 申請を承認する
pub async fn approve_application(
    api_client: &ApiClient,
    application_id: i64,
    session_token: Option<&str>,
) -> AppResult<Application> {
    let endpoint = format!("/solicitacoes/{application_id}/aprovar");
    let application: Application = api_client
        .post(&endpoint, &serde_json::json!({}), session_token)
        .await?;
    expect_status(&application, ApplicationStatus::Approved)?;

    info!("申請承認成功: application_id={application_id}");
    Ok(application)
}

/// 申請を却下する
pub async fn decline_application(
    api_client: &ApiClient,
    application_id: i64,
    dto: &DeclineApplicationDto,
    session_token: Option<&str>,
) -> AppResult<Application> {
    let endpoint = format!("/solicitacoes/{application_id}/recusar");
    let application: Application = api_client.post(&endpoint, dto, session_token).await?;
    expect_status(&application, ApplicationStatus::Declined)?;

    info!("申請却下成功: application_id={application_id}");
    Ok(application)
}

fn expect_status(application: &Application, expected: ApplicationStatus) -> AppResult<()> {
    if application.status != expected {
        return Err(AppError::ExternalService(format!(
            "申請の状態が更新されていません: application_id={}, status={:?}",
            application.id, application.status
        )));
    }
    Ok(())
}
