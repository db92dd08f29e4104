//! # Settings
//!
//! Runtime configuration, read from a TOML file and then overridden by
//! environment variables. Every field has a default matching the
//! Sky View deployment, so an empty file is valid.
//!
//! ```toml
//! database_path = "skyview.db"
//! media_root = "media"
//! compress = true
//!
//! [issuer]
//! name = "SKY VIEW"
//! gstin = "32AHFPT0757R1ZR"
//!
//! [tax]
//! cgst_bps = 900
//! sgst_bps = 900
//!
//! [mail]
//! from_address = "skyview230@gmail.com"
//! smtp_host = "smtp.example.com"
//! ```
//!
//! | Variable             | Overrides            |
//! |----------------------|----------------------|
//! | `SKYVIEW_DATABASE`   | `database_path`      |
//! | `SKYVIEW_MEDIA_ROOT` | `media_root`         |
//! | `SMTP_HOST`          | `mail.smtp_host`     |
//! | `SMTP_PORT`          | `mail.smtp_port`     |
//! | `SMTP_FROM`          | `mail.from_address`  |
//! | `SMTP_USER`          | `mail.smtp_user`     |
//! | `SMTP_PASSWORD`      | `mail.smtp_password` |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::tax::GstRates;

const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub media_root: PathBuf,
    /// Flate-compress PDF page streams.
    pub compress: bool,
    pub issuer: Issuer,
    pub tax: GstRates,
    pub mail: MailSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_path: PathBuf::from("skyview.db"),
            media_root: PathBuf::from("media"),
            compress: true,
            issuer: Issuer::default(),
            tax: GstRates::default(),
            mail: MailSettings::default(),
        }
    }
}

/// Who the invoices come from. Printed in the invoice header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issuer {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub hsn: String,
    pub gstin: String,
    pub pan: String,
    pub gst_reg: String,
    /// Prefix of the "Your Order/Ref No" field; the booking id follows.
    pub order_prefix: String,
    /// Name used in the payment footer and signature block.
    pub payee: String,
}

impl Default for Issuer {
    fn default() -> Self {
        Issuer {
            name: "SKY VIEW".to_string(),
            address_lines: vec![
                "12/454 ARPOOKARA, VILLOONNI-686008".to_string(),
                "KOTTAYAM, skyview330@gmail.com".to_string(),
            ],
            phone: "Ph; 9447266404, 9495806837".to_string(),
            hsn: "9989".to_string(),
            gstin: "32AHFPT0757R1ZR".to_string(),
            pan: "AHFPT0757R".to_string(),
            gst_reg: "32AHFPT0757R1ZR".to_string(),
            order_prefix: "20-9-25".to_string(),
            payee: "Sky View".to_string(),
        }
    }
}

/// Outbound mail. Without `smtp_host` no mailer is built and the
/// email action reports that mail is not configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub from_address: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        MailSettings {
            from_address: "skyview230@gmail.com".to_string(),
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_user: None,
            smtp_password: None,
        }
    }
}

impl Settings {
    /// Read `path` (when given) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let mut settings = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                debug!(path = %path.display(), "loading settings");
                Settings::from_toml_str(&text)?
            }
            None => Settings::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SKYVIEW_DATABASE") {
            self.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SKYVIEW_MEDIA_ROOT") {
            self.media_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("SMTP_HOST") {
            self.mail.smtp_host = Some(v);
        }
        if let Some(v) = lookup("SMTP_PORT") {
            self.mail.smtp_port = v.parse().map_err(|_| ConfigError::Invalid {
                key: "SMTP_PORT".to_string(),
                reason: format!("not a port number: {:?}", v),
            })?;
        }
        if let Some(v) = lookup("SMTP_FROM") {
            self.mail.from_address = v;
        }
        if let Some(v) = lookup("SMTP_USER") {
            self.mail.smtp_user = Some(v);
        }
        if let Some(v) = lookup("SMTP_PASSWORD") {
            self.mail.smtp_password = Some(v);
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let combined = self.tax.cgst_bps + self.tax.sgst_bps;
        if combined > 10_000 {
            return Err(ConfigError::Invalid {
                key: "tax".to_string(),
                reason: format!("combined rate {} bps exceeds 100%", combined),
            });
        }
        if self.mail.from_address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "mail.from_address".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
