//! Appointment lifecycle: booking, rescheduling, cancellation and deletion

use chrono::{Local, NaiveDateTime};
use sqlx::PgConnection;
use validator::Validate;

use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{
        appointment::{
            Appointment, AppointmentStatus, CreateAppointment, NewAppointment, UpdateAppointment,
        },
        customer::{Customer, CustomerInput},
        user::RequestContext,
    },
    repository::Repository,
};

use super::{
    availability::AvailabilityService,
    conflicts::{enforce_policy, ConflictDetector},
    email::EmailService,
};

/// Statuses a public (unauthenticated) booking may carry
const PUBLIC_BOOKING_STATUSES: [AppointmentStatus; 2] = [AppointmentStatus::Active, AppointmentStatus::Pending];

#[derive(Clone)]
pub struct AppointmentsService {
    repository: Repository,
    config: BookingConfig,
    conflicts: ConflictDetector,
    availability: AvailabilityService,
    email: EmailService,
}

impl AppointmentsService {
    pub fn new(repository: Repository, config: BookingConfig, email: EmailService) -> Self {
        Self {
            conflicts: ConflictDetector::new(repository.clone()),
            availability: AvailabilityService::new(repository.clone()),
            repository,
            config,
            email,
        }
    }

    /// Appointments starting within `[start, end]`, any status
    pub async fn list_by_date_range(
        &self,
        ctx: &RequestContext,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<Appointment>> {
        ctx.require_staff()?;
        if end < start {
            return Err(AppError::Validation("end must not be before start".to_string()));
        }
        self.repository.appointments.list_by_date_range(start, end).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: i32) -> AppResult<Appointment> {
        ctx.require_staff()?;
        self.repository.appointments.get_by_id(id).await
    }

    /// Book an appointment, creating or refreshing the customer by e-mail
    pub async fn create(&self, ctx: &RequestContext, data: CreateAppointment) -> AppResult<Appointment> {
        let service_id = data
            .service
            .as_ref()
            .and_then(|s| s.id)
            .ok_or_else(|| AppError::Validation("service.id is required".to_string()))?;
        let customer = data
            .customer
            .ok_or_else(|| AppError::Validation("customer.email is required".to_string()))?;
        let email = customer
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Validation("customer.email is required".to_string()))?
            .to_string();
        customer.validate()?;

        let status = data.status.unwrap_or_default();
        check_initial_status(ctx, status)?;

        let mut tx = self.repository.pool.begin().await?;

        let service = self.repository.catalog.get_by_id_on(&mut tx, service_id).await?;
        let start = data.start_time;
        let end = service.occupied_until(start)?;

        if self.config.enforce_availability {
            self.availability.ensure_bookable(start, end).await?;
        }
        let conflicts = self.conflicts.find_conflicts(&mut tx, start, end, None).await?;
        enforce_policy(self.config.conflict_policy, start, end, &conflicts)?;

        let customer = self.upsert_customer(&mut tx, &customer, &email).await?;

        let id = self
            .repository
            .appointments
            .insert(
                &mut tx,
                &NewAppointment {
                    start_time: start,
                    service_id: service.id,
                    customer_id: customer.id,
                    notes: data.notes,
                    created_at: Local::now().naive_local(),
                    status,
                    booked_price: service.price,
                },
            )
            .await?;

        tx.commit().await?;

        let appointment = self.repository.appointments.get_by_id(id).await?;
        tracing::info!(
            "Appointment {} booked for customer {} ({} at {}) by {:?}",
            appointment.id,
            customer.id,
            service.name,
            start,
            ctx.user_id
        );

        self.email.notify_appointment_created(appointment.clone());
        Ok(appointment)
    }

    /// Reschedule or edit an appointment
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i32,
        data: UpdateAppointment,
    ) -> AppResult<Appointment> {
        ctx.require_staff()?;

        let mut tx = self.repository.pool.begin().await?;
        let mut record = self.repository.appointments.get_record_for_update(&mut tx, id).await?;

        if let Some(service_ref) = &data.service {
            let service_id = service_ref
                .id
                .ok_or_else(|| AppError::Validation("service.id is required".to_string()))?;
            record.service_id = self.repository.catalog.get_by_id_on(&mut tx, service_id).await?.id;
        }
        if let Some(customer_ref) = &data.customer {
            record.customer_id = self
                .repository
                .customers
                .get_by_id_on(&mut tx, customer_ref.id)
                .await?
                .id;
        }
        if let Some(start_time) = data.start_time {
            record.start_time = start_time;
        }
        record.notes = data.notes;
        if let Some(next) = data.status {
            if !record.status.can_transition_to(next) {
                return Err(AppError::Validation(format!(
                    "Cannot change status from {:?} to {:?}",
                    record.status, next
                )));
            }
            record.status = next;
        }

        if record.status.is_active() {
            let service = self.repository.catalog.get_by_id_on(&mut tx, record.service_id).await?;
            let end = service.occupied_until(record.start_time)?;
            if self.config.enforce_availability {
                self.availability.ensure_bookable(record.start_time, end).await?;
            }
            let conflicts = self
                .conflicts
                .find_conflicts(&mut tx, record.start_time, end, Some(id))
                .await?;
            enforce_policy(self.config.conflict_policy, record.start_time, end, &conflicts)?;
        }

        self.repository.appointments.update(&mut tx, &record).await?;
        tx.commit().await?;

        tracing::info!("Appointment {} updated by {:?}", id, ctx.user_id);
        self.repository.appointments.get_by_id(id).await
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_staff()?;
        self.repository.appointments.delete(id).await?;
        tracing::info!("Appointment {} deleted by {:?}", id, ctx.user_id);
        Ok(())
    }

    /// Find the customer by e-mail and merge the submitted contact fields,
    /// or insert a new customer without notes.
    async fn upsert_customer(
        &self,
        conn: &mut PgConnection,
        input: &CustomerInput,
        email: &str,
    ) -> AppResult<Customer> {
        let customers = &self.repository.customers;
        match customers.find_by_email(conn, email).await? {
            Some(existing) => {
                let contact = input.merge_into(&existing);
                customers.update_contact(conn, existing.id, &contact).await
            }
            None => {
                let contact = input.new_contact(email);
                customers
                    .insert_contact(conn, &contact, Local::now().naive_local())
                    .await
            }
        }
    }
}

/// Anonymous callers book as ACTIVE or PENDING; nobody books a cancelled slot
fn check_initial_status(ctx: &RequestContext, status: AppointmentStatus) -> AppResult<()> {
    if status == AppointmentStatus::Cancelled {
        return Err(AppError::Validation("A new appointment cannot be cancelled".to_string()));
    }
    if !ctx.is_staff() && !PUBLIC_BOOKING_STATUSES.contains(&status) {
        return Err(AppError::Validation(format!("Status {:?} is not allowed for a booking", status)));
    }
    Ok(())
}
