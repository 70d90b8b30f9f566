//! Report endpoints

use axum::{
    extract::State,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::user::RequestContext, AppState};

use super::{parse_optional_date, stats::PeriodQuery, AppQuery};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdown {
    pub service_id: i32,
    pub service_name: String,
    pub appointment_count: i64,
    pub revenue: Decimal,
}

/// Revenue report for a period
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub report_start_date: NaiveDate,
    pub report_end_date: NaiveDate,
    pub total_appointments: i64,
    pub total_revenue: Decimal,
    pub service_breakdown: Vec<ServiceBreakdown>,
}

/// Appointment and revenue report, broken down by service
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Report", body = ReportResponse),
        (status = 400, description = "Invalid period", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> AppResult<Json<ReportResponse>> {
    let start = parse_optional_date(query.start_date.as_deref(), "startDate")?;
    let end = parse_optional_date(query.end_date.as_deref(), "endDate")?;
    Ok(Json(state.services.reports.generate(&ctx, start, end).await?))
}
