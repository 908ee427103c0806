//! Delivery: exports and email hand-off for the generated documents
//!
//! Nothing here talks to the generation service; every function works on
//! documents already in the session.

mod calendar;
mod email;
mod error;
mod pack;
mod smtp;

pub use calendar::{CALENDAR_FILE_NAME, milestones_ics};
pub use email::{DEFAULT_RECIPIENT, DEFAULT_SENDER, DEFAULT_SUBJECT, EmailDraft, subject_from, valid_email};
pub use error::DeliveryError;
pub use pack::{PACK_FILE_NAME, PLAN_FILE_NAME, build_launch_pack, meta_text, write_launch_pack};
pub use smtp::SmtpSender;

/// Default file name for the `.eml` export
pub const EML_FILE_NAME: &str = "launch-email.eml";
