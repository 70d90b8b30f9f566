//! Email service for booking confirmations

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::appointment::Appointment,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Queue a confirmation mail without waiting for it. Failures are logged.
    pub fn notify_appointment_created(&self, appointment: Appointment) {
        if !self.config.enabled {
            tracing::debug!("Email disabled, no confirmation for appointment {}", appointment.id);
            return;
        }
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send_appointment_confirmation(&appointment).await {
                tracing::warn!(
                    "Failed to send confirmation for appointment {}: {}",
                    appointment.id,
                    e
                );
            }
        });
    }

    /// Send a booking confirmation to the appointment's customer
    pub async fn send_appointment_confirmation(&self, appointment: &Appointment) -> AppResult<()> {
        let subject = format!("Your appointment on {}", appointment.start_time.format("%d.%m.%Y"));
        let body = confirmation_body(appointment);
        self.send_email(&appointment.customer.email, &subject, &body).await
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let email = self.build_message(to, subject, body)?;
        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::info!("Confirmation sent to {}", to);
        Ok(())
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> AppResult<Message> {
        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("Salon");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;
        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><p>{}</p></body></html>"#,
                                body.trim().replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }

    fn build_transport(&self) -> AppResult<SmtpTransport> {
        let builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let builder = match (&self.config.smtp_username, &self.config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

fn confirmation_body(appointment: &Appointment) -> String {
    format!(
        r#"
Hello {first_name},

your appointment is booked:

  {service}
  {date} at {time} ({minutes} minutes)

If you need to reschedule, please contact us.
"#,
        first_name = appointment.customer.first_name,
        service = appointment.service.name,
        date = appointment.start_time.format("%A, %d.%m.%Y"),
        time = appointment.start_time.format("%H:%M"),
        minutes = appointment.service.duration_minutes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use crate::services::fixtures::appointment;

    #[test]
    fn test_confirmation_body_mentions_booking() {
        let a = appointment(3, "2024-05-15 10:30", 45, AppointmentStatus::Active, 1);
        let body = confirmation_body(&a);
        assert!(body.contains("Wednesday, 15.05.2024 at 10:30"));
        assert!(body.contains("45 minutes"));
        assert!(body.contains(&a.service.name));
    }

    #[test]
    fn test_message_rejects_invalid_recipient() {
        let service = EmailService::new(EmailConfig::default());
        assert!(service.build_message("not an address", "s", "b").is_err());
        assert!(service.build_message("ana@example.com", "s", "b").is_ok());
    }
}
