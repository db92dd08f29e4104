pub mod actions;
pub mod assets;
pub mod catalog;
pub mod config;
pub mod emailer;
pub mod error;
pub mod layout;
pub mod mailer;
pub mod models;
pub mod money;
pub mod selector;
pub mod tax;
pub mod words;

pub use actions::{
    ActionError, ActionOutcome, AdminActions, BillboardRow, BookingRow, Notice, NoticeLevel,
    PdfDownload,
};
pub use assets::{AssetError, AssetStore, FsAssetStore, NoAssets};
pub use catalog::{CatalogRepository, SqliteCatalog};
pub use config::{Issuer, MailSettings, Settings};
pub use emailer::{BatchReport, DeliveryFailure};
pub use error::{CatalogError, ConfigError, RenderError};
pub use layout::Renderer;
pub use mailer::{Attachment, MailError, Mailer, OutgoingEmail, SmtpMailer};
pub use models::{Billboard, Booking, BookingDetail, NewBillboard, NewBooking};
pub use money::{Money, MoneyError, SplitAmount};
pub use tax::{GstRates, TaxBreakdown};
