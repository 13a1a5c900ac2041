//! Tank request form and the services it submits to.

pub mod form;
pub mod models;
pub mod service;

pub use form::{FormError, FormPhase, TankRequestForm};
pub use models::{FormField, Purpose, TankRequest};
pub use service::{RequestBackend, SubmitError, TankRequestService};
