//! Outbound email.
//!
//! [`Mailer`] is the seam the bulk invoice action sends through.
//! [`SmtpMailer`] implements it with the blocking `lettre` SMTP
//! transport; tests substitute a recording double.

use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::debug;

use crate::config::MailSettings;

#[derive(Debug, Error)]
pub enum MailError {
    /// The recipient or sender address could not be parsed.
    #[error("invalid email address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("message has no recipients")]
    NoRecipients,

    /// The MIME message could not be assembled.
    #[error("email build error: {0}")]
    Build(String),

    /// SMTP transport-level failure (connection, authentication, rejection).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("mail is not configured (no SMTP host)")]
    NotConfigured,
}

/// A file attached to an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn pdf(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Attachment {
            filename: filename.into(),
            content_type: "application/pdf".to_string(),
            data,
        }
    }
}

/// Everything a transport needs to deliver one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
    pub attachments: Vec<Attachment>,
}

pub trait Mailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Blocking SMTP delivery with STARTTLS.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build a transport from settings. Fails with `NotConfigured` when
    /// no SMTP host is set.
    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        let host = settings
            .smtp_host
            .as_deref()
            .ok_or(MailError::NotConfigured)?;
        let mut builder = SmtpTransport::starttls_relay(host)?.port(settings.smtp_port);
        if let (Some(user), Some(pass)) = (&settings.smtp_user, &settings.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(SmtpMailer {
            transport: builder.build(),
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        self.transport.send(&message)?;
        debug!(to = ?email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// Assemble the MIME message: a plain-text body plus one part per
/// attachment.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    if email.to.is_empty() {
        return Err(MailError::NoRecipients);
    }
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone());
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));
    for attachment in &email.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| MailError::Build(e.to_string()))?;
        parts = parts.singlepart(
            MimeAttachment::new(attachment.filename.clone())
                .body(attachment.data.clone(), content_type),
        );
    }

    builder
        .multipart(parts)
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            subject: "Invoice for Booking #3".to_string(),
            body: "Please find attached your invoice from Skyview Billboards.".to_string(),
            from: "skyview230@gmail.com".to_string(),
            to: vec!["asha@example.com".to_string()],
            attachments: vec![Attachment::pdf("invoice_3.pdf", b"%PDF-1.7".to_vec())],
        }
    }

    #[test]
    fn builds_multipart_with_pdf() {
        let message = build_message(&email()).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(raw.contains("Subject: Invoice for Booking #3"));
        assert!(raw.contains("To: asha@example.com"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("invoice_3.pdf"));
    }

    #[test]
    fn bad_recipient_is_address_error() {
        let mut e = email();
        e.to = vec!["not-an-email".to_string()];
        let err = build_message(&e).unwrap_err();
        assert!(matches!(err, MailError::Address { .. }));
        assert!(err.to_string().contains("not-an-email"));
    }

    #[test]
    fn no_recipients() {
        let mut e = email();
        e.to.clear();
        assert!(matches!(build_message(&e), Err(MailError::NoRecipients)));
    }

    #[test]
    fn unconfigured_smtp() {
        let settings = MailSettings::default();
        assert!(matches!(
            SmtpMailer::from_settings(&settings),
            Err(MailError::NotConfigured)
        ));
    }
}
