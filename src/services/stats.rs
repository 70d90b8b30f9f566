//! Statistics service

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::{
    api::stats::{
        BucketTotals, CountMetric, DayOfWeekCount, DayOfWeekStatsResponse, DetailedStatsResponse,
        HourCount, HourlyStatsResponse, RateMetric, RevenueMetric, ServiceShare,
        ServiceStatsResponse,
    },
    config::{RevenueMode, StatisticsConfig},
    error::AppResult,
    models::{appointment::Appointment, user::RequestContext},
    repository::Repository,
};

use super::metrics::{self, calculate_percentage_change, PeriodTotals, StatsPeriod};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    config: StatisticsConfig,
}

impl StatsService {
    pub fn new(repository: Repository, config: StatisticsConfig) -> Self {
        Self { repository, config }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// All appointments (any status) starting within `period`
    async fn load(&self, period: &StatsPeriod) -> AppResult<Vec<Appointment>> {
        self.repository
            .appointments
            .list_starting_between(period.start_time(), period.end_exclusive()?)
            .await
    }

    /// Counts, revenue and derived metrics for a period, compared with the
    /// period of equal length right before it. Defaults to the current month.
    pub async fn detailed_counts(
        &self,
        ctx: &RequestContext,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<DetailedStatsResponse> {
        ctx.require_admin()?;

        let today = Self::today();
        let this_month = StatsPeriod::month(today)?;
        let period = StatsPeriod::new(
            start.unwrap_or(this_month.start),
            end.unwrap_or(this_month.end),
        )?;
        let previous = period.previous()?;
        let this_week = StatsPeriod::iso_week(today)?;

        let compared = self.load(&previous.union(&period)).await?;
        let rolling = self.load(&this_week.union(&this_month)).await?;

        detailed_stats(&compared, &rolling, &period, today, self.config.revenue_mode)
    }

    /// Weekday counts for the ISO week containing `date` (default today)
    pub async fn by_day_of_week(
        &self,
        ctx: &RequestContext,
        date: Option<NaiveDate>,
    ) -> AppResult<DayOfWeekStatsResponse> {
        ctx.require_admin()?;
        let week = StatsPeriod::iso_week(date.unwrap_or_else(Self::today))?;
        let appointments = self.load(&week).await?;

        let days = metrics::day_of_week_counts(&appointments, &week)
            .into_iter()
            .map(|(day, count)| DayOfWeekCount {
                day_of_week: day,
                day_name: day.display_name(self.config.locale).to_string(),
                count,
            })
            .collect();

        Ok(DayOfWeekStatsResponse {
            week_start: week.start,
            week_end: week.end,
            days,
        })
    }

    /// Most booked services in the month containing `date` (default today)
    pub async fn by_service(
        &self,
        ctx: &RequestContext,
        date: Option<NaiveDate>,
        top_n: Option<usize>,
    ) -> AppResult<ServiceStatsResponse> {
        ctx.require_admin()?;
        let month = StatsPeriod::month(date.unwrap_or_else(Self::today))?;
        let top_n = top_n.unwrap_or(self.config.default_top_n);
        let appointments = self.load(&month).await?;

        let (total, rows) = metrics::service_counts(&appointments, &month, top_n);
        let services = rows
            .into_iter()
            .map(|r| ServiceShare {
                service_id: r.service_id,
                service_name: r.service_name,
                count: r.count,
                percentage: r.percentage,
            })
            .collect();

        Ok(ServiceStatsResponse {
            period_start: month.start,
            period_end: month.end,
            total_appointments: total,
            services,
        })
    }

    /// Appointments per starting hour, bounded by the opening hours
    pub async fn by_hour(
        &self,
        ctx: &RequestContext,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<HourlyStatsResponse> {
        ctx.require_admin()?;
        let this_month = StatsPeriod::month(Self::today())?;
        let period = StatsPeriod::new(
            start.unwrap_or(this_month.start),
            end.unwrap_or(this_month.end),
        )?;

        let week = self.repository.working_hours.list().await?;
        let appointments = self.load(&period).await?;

        let hours = metrics::hourly_counts(&appointments, &period, &week)
            .into_iter()
            .map(|(hour, count)| HourCount {
                hour,
                label: format!("{:02}:00", hour),
                count,
            })
            .collect();

        Ok(HourlyStatsResponse {
            period_start: period.start,
            period_end: period.end,
            hours,
        })
    }

    /// Remaining non-cancelled appointments of today
    pub async fn today_upcoming(&self, ctx: &RequestContext) -> AppResult<Vec<Appointment>> {
        ctx.require_admin()?;
        let now: NaiveDateTime = Local::now().naive_local();
        let end_of_day = StatsPeriod::day(now.date()).end_exclusive()?;

        let appointments = self
            .repository
            .appointments
            .list_starting_between(now, end_of_day)
            .await?;
        Ok(appointments
            .into_iter()
            .filter(|a| a.status.is_active())
            .collect())
    }
}

/// Assemble the detailed statistics of `period`.
///
/// `compared` must hold every appointment of `period` and of the period
/// before it; `rolling` those of the week and month containing `today`.
pub fn detailed_stats(
    compared: &[Appointment],
    rolling: &[Appointment],
    period: &StatsPeriod,
    today: NaiveDate,
    mode: RevenueMode,
) -> AppResult<DetailedStatsResponse> {
    let previous = period.previous()?;
    let this_week = StatsPeriod::iso_week(today)?;
    let this_month = StatsPeriod::month(today)?;

    let current_totals = metrics::totals(compared, period, mode);
    let previous_totals = metrics::totals(compared, &previous, mode);

    let bucket = |p: &StatsPeriod| {
        let t = metrics::totals(rolling, p, mode);
        BucketTotals {
            count: t.count,
            revenue: t.revenue,
        }
    };

    Ok(DetailedStatsResponse {
        period_start: period.start,
        period_end: period.end,
        days_in_period: period.days(),
        previous_period_start: previous.start,
        previous_period_end: previous.end,
        appointments: count_metric(current_totals.count, previous_totals.count),
        revenue: revenue_metric(&current_totals, &previous_totals),
        unique_customers: count_metric(
            current_totals.unique_customers,
            previous_totals.unique_customers,
        ),
        average_appointment_duration: current_totals.average_duration(),
        cancellation_rate: rate_metric(
            current_totals.cancellation_rate(),
            previous_totals.cancellation_rate(),
        ),
        new_customer_share: metrics::new_customer_share(compared, period),
        avg_booking_lead_time_days: metrics::average_lead_time_days(compared, period),
        projected_revenue_next30_days: metrics::projected_revenue_30_days(
            current_totals.revenue,
            period.days(),
        ),
        today: bucket(&StatsPeriod::day(today)),
        this_week: bucket(&this_week),
        this_month: bucket(&this_month),
    })
}

fn count_metric(current: i64, previous: i64) -> CountMetric {
    CountMetric {
        current,
        previous,
        percentage_change: calculate_percentage_change(current as f64, previous as f64),
        is_growth_good: true,
    }
}

fn revenue_metric(current: &PeriodTotals, previous: &PeriodTotals) -> RevenueMetric {
    use rust_decimal::prelude::ToPrimitive;

    RevenueMetric {
        current: current.revenue,
        previous: previous.revenue,
        percentage_change: calculate_percentage_change(
            current.revenue.to_f64().unwrap_or(0.0),
            previous.revenue.to_f64().unwrap_or(0.0),
        ),
        is_growth_good: true,
    }
}

/// A rising cancellation rate is bad news
fn rate_metric(current: Option<f64>, previous: Option<f64>) -> RateMetric {
    RateMetric {
        current,
        previous,
        percentage_change: calculate_percentage_change(current.unwrap_or(0.0), previous.unwrap_or(0.0)),
        is_growth_good: false,
    }
}
