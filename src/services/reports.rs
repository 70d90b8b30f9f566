//! Revenue report per service

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    api::reports::{ReportResponse, ServiceBreakdown},
    config::RevenueMode,
    error::AppResult,
    models::user::RequestContext,
    repository::{appointments::ServiceRevenueRow, Repository},
};

use super::metrics::StatsPeriod;

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    revenue_mode: RevenueMode,
}

impl ReportsService {
    pub fn new(repository: Repository, revenue_mode: RevenueMode) -> Self {
        Self {
            repository,
            revenue_mode,
        }
    }

    /// Totals and per-service breakdown of non-cancelled appointments in
    /// `[start, end]`. Defaults to the current month.
    pub async fn generate(
        &self,
        ctx: &RequestContext,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<ReportResponse> {
        ctx.require_admin()?;
        let month = StatsPeriod::month(Local::now().date_naive())?;
        let period = StatsPeriod::new(start.unwrap_or(month.start), end.unwrap_or(month.end))?;

        let rows = self
            .repository
            .appointments
            .service_breakdown(period.start_time(), period.end_exclusive()?, self.revenue_mode)
            .await?;

        Ok(build_report(&period, rows))
    }
}

fn build_report(period: &StatsPeriod, rows: Vec<ServiceRevenueRow>) -> ReportResponse {
    let total_appointments = rows.iter().map(|r| r.appointment_count).sum();
    let total_revenue = rows.iter().map(|r| r.revenue).sum::<Decimal>();

    ReportResponse {
        report_start_date: period.start,
        report_end_date: period.end,
        total_appointments,
        total_revenue,
        service_breakdown: rows
            .into_iter()
            .map(|r| ServiceBreakdown {
                service_id: r.service_id,
                service_name: r.service_name,
                appointment_count: r.appointment_count,
                revenue: r.revenue,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::date;

    #[test]
    fn test_totals_sum_breakdown() {
        let period = StatsPeriod::new(date("2024-05-01"), date("2024-05-31")).unwrap();
        let rows = vec![
            ServiceRevenueRow {
                service_id: 1,
                service_name: "Cut".into(),
                appointment_count: 4,
                revenue: Decimal::new(10000, 2),
            },
            ServiceRevenueRow {
                service_id: 2,
                service_name: "Color".into(),
                appointment_count: 1,
                revenue: Decimal::new(8550, 2),
            },
        ];
        let report = build_report(&period, rows);
        assert_eq!(report.total_appointments, 5);
        assert_eq!(report.total_revenue, Decimal::new(18550, 2));
        assert_eq!(report.service_breakdown[0].service_name, "Cut");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reportStartDate"], "2024-05-01");
        assert!(json["serviceBreakdown"][0]["appointmentCount"].is_number());
    }

    #[test]
    fn test_empty_report() {
        let period = StatsPeriod::day(date("2024-05-01"));
        let report = build_report(&period, vec![]);
        assert_eq!(report.total_appointments, 0);
        assert_eq!(report.total_revenue, Decimal::ZERO);
    }
}
