//! Schedules service (working hours, blocked time slots)

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        blocked_slot::{BlockedTimeSlot, BlockedTimeSlotRequest},
        user::RequestContext,
        working_hours::{UpsertWorkingHours, WorkingHours},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SchedulesService {
    repository: Repository,
}

impl SchedulesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // ---- Working hours ----
    pub async fn list_working_hours(&self) -> AppResult<Vec<WorkingHours>> {
        self.repository.working_hours.list().await
    }

    pub async fn upsert_working_hours(
        &self,
        ctx: &RequestContext,
        data: UpsertWorkingHours,
    ) -> AppResult<WorkingHours> {
        ctx.require_admin()?;
        let values = data.into_values()?;
        let hours = self.repository.working_hours.upsert(&values).await?;
        tracing::info!("Working hours for {} set by {:?}", hours.day_of_week, ctx.user_id);
        Ok(hours)
    }

    // ---- Blocked time slots ----
    pub async fn list_blocked_slots(&self, ctx: &RequestContext) -> AppResult<Vec<BlockedTimeSlot>> {
        ctx.require_admin()?;
        self.repository.blocked_slots.list().await
    }

    /// Blocks applying on `date` (public)
    pub async fn blocked_slots_for_date(&self, date: NaiveDate) -> AppResult<Vec<BlockedTimeSlot>> {
        self.repository.blocked_slots.list_for_date(date).await
    }

    pub async fn create_blocked_slot(
        &self,
        ctx: &RequestContext,
        data: BlockedTimeSlotRequest,
    ) -> AppResult<BlockedTimeSlot> {
        ctx.require_admin()?;
        let values = data.into_values()?;
        let slot = self.repository.blocked_slots.create(&values).await?;
        tracing::info!("Blocked time slot {} created by {:?}", slot.id, ctx.user_id);
        Ok(slot)
    }

    pub async fn update_blocked_slot(
        &self,
        ctx: &RequestContext,
        id: i32,
        data: BlockedTimeSlotRequest,
    ) -> AppResult<BlockedTimeSlot> {
        ctx.require_admin()?;
        let values = data.into_values()?;
        let slot = self.repository.blocked_slots.update(id, &values).await?;
        tracing::info!("Blocked time slot {} updated by {:?}", id, ctx.user_id);
        Ok(slot)
    }

    pub async fn delete_blocked_slot(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        self.repository.blocked_slots.delete(id).await?;
        tracing::info!("Blocked time slot {} deleted by {:?}", id, ctx.user_id);
        Ok(())
    }
}
