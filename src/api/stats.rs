//! Statistics endpoints

use axum::{
    extract::State,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{appointment::Appointment, enums::DayOfWeek, user::RequestContext},
    AppState,
};

use super::{parse_optional_date, AppQuery};

/// Count compared with the previous period
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountMetric {
    pub current: i64,
    pub previous: i64,
    /// Null when the previous value is 0 and the current one is not
    pub percentage_change: Option<f64>,
    pub is_growth_good: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueMetric {
    pub current: Decimal,
    pub previous: Decimal,
    pub percentage_change: Option<f64>,
    pub is_growth_good: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateMetric {
    /// Percentage, null without appointments
    pub current: Option<f64>,
    pub previous: Option<f64>,
    pub percentage_change: Option<f64>,
    /// Display hint: false means a rising value is bad
    pub is_growth_good: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotals {
    pub count: i64,
    pub revenue: Decimal,
}

/// Detailed statistics for a period
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStatsResponse {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub days_in_period: i64,
    pub previous_period_start: NaiveDate,
    pub previous_period_end: NaiveDate,
    pub appointments: CountMetric,
    pub revenue: RevenueMetric,
    pub unique_customers: CountMetric,
    /// Minutes
    pub average_appointment_duration: Option<f64>,
    pub cancellation_rate: RateMetric,
    /// Percent of the period's customers who registered in the period
    pub new_customer_share: Option<f64>,
    pub avg_booking_lead_time_days: Option<i64>,
    pub projected_revenue_next30_days: Decimal,
    pub today: BucketTotals,
    pub this_week: BucketTotals,
    pub this_month: BucketTotals,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayOfWeekCount {
    pub day_of_week: DayOfWeek,
    /// Localized day name
    pub day_name: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayOfWeekStatsResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// Monday first
    pub days: Vec<DayOfWeekCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceShare {
    pub service_id: i32,
    pub service_name: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatsResponse {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_appointments: i64,
    pub services: Vec<ServiceShare>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    pub hour: u32,
    /// "HH:00"
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourlyStatsResponse {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub hours: Vec<HourCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayUtilization {
    pub date: NaiveDate,
    pub available_minutes: i64,
    pub booked_minutes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available_minutes: i64,
    pub booked_minutes: i64,
    /// 0 when no minutes are available
    pub utilization_percentage: f64,
    pub days: Vec<DayUtilization>,
}

/// Period query (YYYY-MM-DD, inclusive)
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DateQuery {
    /// Reference date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ServiceStatsQuery {
    /// Reference date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Number of services to return
    pub top_n: Option<usize>,
}

/// Detailed counts and period-over-period changes
#[utoipa::path(
    get,
    path = "/statistics/detailed-counts",
    tag = "statistics",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Detailed statistics", body = DetailedStatsResponse),
        (status = 400, description = "Invalid period", body = crate::error::ErrorResponse)
    )
)]
pub async fn detailed_counts(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> AppResult<Json<DetailedStatsResponse>> {
    let start = parse_optional_date(query.start_date.as_deref(), "startDate")?;
    let end = parse_optional_date(query.end_date.as_deref(), "endDate")?;
    Ok(Json(state.services.stats.detailed_counts(&ctx, start, end).await?))
}

/// Appointments per weekday of the week containing `date`
#[utoipa::path(
    get,
    path = "/statistics/by-day-of-week",
    tag = "statistics",
    security(("bearer_auth" = [])),
    params(DateQuery),
    responses(
        (status = 200, description = "Weekday counts", body = DayOfWeekStatsResponse)
    )
)]
pub async fn by_day_of_week(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppQuery(query): AppQuery<DateQuery>,
) -> AppResult<Json<DayOfWeekStatsResponse>> {
    let date = parse_optional_date(query.date.as_deref(), "date")?;
    Ok(Json(state.services.stats.by_day_of_week(&ctx, date).await?))
}

/// Most booked services of the month containing `date`
#[utoipa::path(
    get,
    path = "/statistics/by-service",
    tag = "statistics",
    security(("bearer_auth" = [])),
    params(ServiceStatsQuery),
    responses(
        (status = 200, description = "Service shares", body = ServiceStatsResponse)
    )
)]
pub async fn by_service(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppQuery(query): AppQuery<ServiceStatsQuery>,
) -> AppResult<Json<ServiceStatsResponse>> {
    let date = parse_optional_date(query.date.as_deref(), "date")?;
    Ok(Json(state.services.stats.by_service(&ctx, date, query.top_n).await?))
}

/// Appointments per starting hour
#[utoipa::path(
    get,
    path = "/statistics/by-hour",
    tag = "statistics",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Hourly histogram", body = HourlyStatsResponse)
    )
)]
pub async fn by_hour(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> AppResult<Json<HourlyStatsResponse>> {
    let start = parse_optional_date(query.start_date.as_deref(), "startDate")?;
    let end = parse_optional_date(query.end_date.as_deref(), "endDate")?;
    Ok(Json(state.services.stats.by_hour(&ctx, start, end).await?))
}

/// Available vs booked minutes
#[utoipa::path(
    get,
    path = "/statistics/utilization",
    tag = "statistics",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Utilization", body = UtilizationResponse),
        (status = 400, description = "Invalid period", body = crate::error::ErrorResponse)
    )
)]
pub async fn utilization(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> AppResult<Json<UtilizationResponse>> {
    let today = chrono::Local::now().date_naive();
    let start = parse_optional_date(query.start_date.as_deref(), "startDate")?.unwrap_or(today);
    let end = parse_optional_date(query.end_date.as_deref(), "endDate")?.unwrap_or(start);
    Ok(Json(state.services.capacity.utilization(&ctx, start, end).await?))
}

/// Remaining appointments of today
#[utoipa::path(
    get,
    path = "/statistics/today-upcoming-appointments",
    tag = "statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upcoming appointments", body = Vec<Appointment>)
    )
)]
pub async fn today_upcoming(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(state.services.stats.today_upcoming(&ctx).await?))
}
