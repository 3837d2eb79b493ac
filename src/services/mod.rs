// src/services/mod.rs
//
// Shared services injected into handlers through AppState

pub mod email;

pub use email::{EmailError, Mailer, OutgoingEmail, SmtpMailer};
