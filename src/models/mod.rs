//! Data models for the salon booking server

pub mod appointment;
pub mod blocked_slot;
pub mod customer;
pub mod enums;
pub mod service;
pub mod time_format;
pub mod user;
pub mod working_hours;

// Re-export commonly used types
pub use appointment::{Appointment, AppointmentStatus};
pub use blocked_slot::BlockedTimeSlot;
pub use customer::Customer;
pub use enums::{DayOfWeek, Locale};
pub use service::Service;
pub use user::{RequestContext, Role, User, UserClaims};
pub use working_hours::WorkingHours;
