//! Launch email: subject extraction, mailto links and `.eml` files

use std::sync::LazyLock;

use lettre::Message;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use regex::Regex;
use tracing::debug;

use super::DeliveryError;

pub const DEFAULT_SUBJECT: &str = "Launch: Podcast";
pub const DEFAULT_SENDER: &str = "me@example.com";
pub const DEFAULT_RECIPIENT: &str = "you@example.com";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex"));

/// Loose address check: something@something.tld with no whitespace
pub fn valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address)
}

/// Subject from a leading `Subject:` line, or the default
pub fn subject_from(launch_email: &str) -> String {
    launch_email
        .lines()
        .next()
        .and_then(|first| {
            let (label, rest) = first.split_once(':')?;
            label.trim().eq_ignore_ascii_case("subject").then(|| rest.trim().to_string())
        })
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string())
}

/// An email ready to hand over to a mail client or relay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: String,
}

impl EmailDraft {
    /// Draft from the launch email, which is used unmodified as the body
    pub fn from_launch_email(launch_email: &str) -> Self {
        debug!("EmailDraft::from_launch_email: called");
        Self {
            subject: subject_from(launch_email),
            body: launch_email.to_string(),
            from: String::new(),
            to: String::new(),
        }
    }

    /// `mailto:` link with recipient, subject and body percent-encoded
    pub fn mailto_link(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            urlencoding::encode(self.to.trim()),
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }

    /// RFC 5322 text/plain message; blank addresses get placeholders
    pub fn to_eml(&self) -> Result<Vec<u8>, DeliveryError> {
        debug!("EmailDraft::to_eml: called");
        let from = non_blank(&self.from).unwrap_or(DEFAULT_SENDER);
        let to = non_blank(&self.to).unwrap_or(DEFAULT_RECIPIENT);
        Ok(self.build_message(from, to)?.formatted())
    }

    pub(crate) fn build_message(&self, from: &str, to: &str) -> Result<Message, DeliveryError> {
        let message = Message::builder()
            .from(parse_mailbox(from)?)
            .to(parse_mailbox(to)?)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())?;
        Ok(message)
    }
}

pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse::<Mailbox>()
        .map_err(|_| DeliveryError::InvalidAddress(address.to_string()))
}
