//! Conflict detection between a proposed booking and existing appointments

use chrono::{Duration, NaiveDateTime};
use sqlx::PgConnection;

use crate::{
    config::ConflictPolicy,
    error::{AppError, AppResult},
    models::{appointment::Appointment, service::MAX_SERVICE_MINUTES},
    repository::Repository,
};

/// Appointments whose occupied interval overlaps `[start, end)`.
///
/// Cancelled appointments never conflict; `exclude_id` leaves out the
/// appointment being edited.
pub fn find_conflicts(
    candidates: impl IntoIterator<Item = Appointment>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    exclude_id: Option<i32>,
) -> Vec<Appointment> {
    candidates
        .into_iter()
        .filter(|a| a.status.is_active())
        .filter(|a| Some(a.id) != exclude_id)
        .filter(|a| a.overlaps(start, end))
        .collect()
}

/// Earliest start of an appointment that can still reach `start`
pub fn lookback_start(start: NaiveDateTime) -> NaiveDateTime {
    start
        .checked_sub_signed(Duration::minutes(MAX_SERVICE_MINUTES as i64))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Apply the configured policy to detected conflicts
pub fn enforce_policy(
    policy: ConflictPolicy,
    start: NaiveDateTime,
    end: NaiveDateTime,
    conflicts: &[Appointment],
) -> AppResult<()> {
    if conflicts.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = conflicts.iter().map(|a| a.id.to_string()).collect();
    match policy {
        ConflictPolicy::Legacy => {
            tracing::warn!(
                "Booking {} - {} overlaps appointment(s) {}; accepted (legacy policy)",
                start,
                end,
                ids.join(", ")
            );
            Ok(())
        }
        ConflictPolicy::Strict => Err(AppError::SlotConflict(format!(
            "{} - {} overlaps appointment(s) {}",
            start,
            end,
            ids.join(", ")
        ))),
    }
}

#[derive(Clone)]
pub struct ConflictDetector {
    repository: Repository,
}

impl ConflictDetector {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Load candidates and keep the overlapping ones.
    ///
    /// No service lasts longer than [`MAX_SERVICE_MINUTES`], so an appointment
    /// starting earlier than that before `start` cannot reach into the window.
    pub async fn find_conflicts(
        &self,
        conn: &mut PgConnection,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude_id: Option<i32>,
    ) -> AppResult<Vec<Appointment>> {
        let lookback = lookback_start(start);
        let candidates = self
            .repository
            .appointments
            .list_active_starting_between(conn, lookback, end)
            .await?;
        Ok(find_conflicts(candidates, start, end, exclude_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use crate::services::fixtures::{appointment, at};

    #[test]
    fn test_overlapping_appointments_find_each_other() {
        // [10:00, 11:00) and [10:30, 11:15)
        let a = appointment(1, "2024-05-15 10:00", 60, AppointmentStatus::Active, 1);
        let b = appointment(2, "2024-05-15 10:30", 45, AppointmentStatus::Confirmed, 2);

        let for_a = find_conflicts(vec![b.clone()], a.start_time, a.end_time, Some(a.id));
        let for_b = find_conflicts(vec![a.clone()], b.start_time, b.end_time, Some(b.id));
        assert_eq!(for_a.iter().map(|x| x.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(for_b.iter().map(|x| x.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_lookback_covers_longest_service() {
        assert_eq!(lookback_start(at("2024-05-15 10:00")), at("2024-05-14 10:00"));
        let near_min = NaiveDateTime::MIN + Duration::minutes(5);
        assert_eq!(lookback_start(near_min), NaiveDateTime::MIN);
    }

    #[test]
    fn test_adjacent_appointments_do_not_conflict() {
        let a = appointment(1, "2024-05-15 10:00", 60, AppointmentStatus::Active, 1);
        let found = find_conflicts(vec![a], at("2024-05-15 11:00"), at("2024-05-15 11:30"), None);
        assert!(found.is_empty());
    }

    #[test]
    fn test_long_appointment_covering_window() {
        let a = appointment(1, "2024-05-15 09:00", 240, AppointmentStatus::Pending, 1);
        let found = find_conflicts(vec![a], at("2024-05-15 11:00"), at("2024-05-15 11:30"), None);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_cancelled_and_excluded_are_ignored() {
        let cancelled = appointment(1, "2024-05-15 10:00", 60, AppointmentStatus::Cancelled, 1);
        let edited = appointment(2, "2024-05-15 10:00", 60, AppointmentStatus::Active, 2);
        let found = find_conflicts(
            vec![cancelled, edited],
            at("2024-05-15 10:15"),
            at("2024-05-15 10:45"),
            Some(2),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_policy() {
        let a = appointment(7, "2024-05-15 10:00", 60, AppointmentStatus::Active, 1);
        let (s, e) = (at("2024-05-15 10:30"), at("2024-05-15 11:00"));
        assert!(enforce_policy(ConflictPolicy::Legacy, s, e, &[a.clone()]).is_ok());
        assert!(matches!(
            enforce_policy(ConflictPolicy::Strict, s, e, &[a]),
            Err(AppError::SlotConflict(_))
        ));
        assert!(enforce_policy(ConflictPolicy::Strict, s, e, &[]).is_ok());
    }
}
