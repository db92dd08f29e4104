//! GST back-calculation from a tax-inclusive total.
//!
//! A booking's total already contains CGST and SGST. The base price is
//! `total / (1 + cgst + sgst)` and each component is charged on that
//! base. With the default 9% + 9% this is `total / 1.18` and
//! `base * 0.09`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::money::{Money, SplitAmount};

const BPS_DENOMINATOR: i64 = 10_000;

/// The two GST components in basis points (900 = 9%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GstRates {
    pub cgst_bps: u32,
    pub sgst_bps: u32,
}

impl Default for GstRates {
    fn default() -> Self {
        GstRates {
            cgst_bps: 900,
            sgst_bps: 900,
        }
    }
}

impl GstRates {
    /// `1 + cgst + sgst`, in basis points (11800 for 18%).
    pub fn inclusive_bps(&self) -> i64 {
        BPS_DENOMINATOR + self.cgst_bps as i64 + self.sgst_bps as i64
    }

    pub fn cgst_label(&self) -> String {
        format!("CGST ({})", percent_label(self.cgst_bps))
    }

    pub fn sgst_label(&self) -> String {
        format!("SGST ({})", percent_label(self.sgst_bps))
    }
}

/// `900` -> `"9%"`, `250` -> `"2.5%"`.
fn percent_label(bps: u32) -> String {
    let whole = bps / 100;
    let frac = bps % 100;
    if frac == 0 {
        format!("{}%", whole)
    } else {
        let frac = format!("{:02}", frac);
        format!("{}.{}%", whole, frac.trim_end_matches('0'))
    }
}

/// Base amount and tax components derived from a grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBreakdown {
    pub base: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub total: Money,
    pub rates: GstRates,
    /// Set when the input was unusable and every figure fell back to zero.
    pub fallback: bool,
}

impl TaxBreakdown {
    /// Split a tax-inclusive total. Negative totals fall back to zero.
    pub fn from_total(total: Money, rates: GstRates) -> TaxBreakdown {
        if total.is_negative() {
            warn!(total = %total, "negative grand total, invoice amounts fall back to zero");
            return TaxBreakdown::zero(rates);
        }
        let t = total.paise() as i128;
        let divisor = rates.inclusive_bps() as i128;
        // Components are taken from the unrounded base, so each one is
        // total * rate / inclusive rather than round(base) * rate.
        let base = div_round(t * BPS_DENOMINATOR as i128, divisor);
        let cgst = div_round(t * rates.cgst_bps as i128, divisor);
        let sgst = div_round(t * rates.sgst_bps as i128, divisor);
        TaxBreakdown {
            base: Money::from_paise(base),
            cgst: Money::from_paise(cgst),
            sgst: Money::from_paise(sgst),
            total,
            rates,
            fallback: false,
        }
    }

    /// Split a raw decimal string. Anything that does not parse as a
    /// non-negative amount yields the zero breakdown.
    pub fn from_raw(raw: &str, rates: GstRates) -> TaxBreakdown {
        match Money::parse(raw) {
            Ok(total) => TaxBreakdown::from_total(total, rates),
            Err(e) => {
                warn!(raw, error = %e, "unreadable grand total, invoice amounts fall back to zero");
                TaxBreakdown::zero(rates)
            }
        }
    }

    pub fn zero(rates: GstRates) -> TaxBreakdown {
        TaxBreakdown {
            base: Money::ZERO,
            cgst: Money::ZERO,
            sgst: Money::ZERO,
            total: Money::ZERO,
            rates,
            fallback: true,
        }
    }

    pub fn base_split(&self) -> SplitAmount {
        self.base.split()
    }

    pub fn cgst_split(&self) -> SplitAmount {
        self.cgst.split()
    }

    pub fn sgst_split(&self) -> SplitAmount {
        self.sgst.split()
    }

    pub fn total_split(&self) -> SplitAmount {
        self.total.split()
    }
}

/// Non-negative division rounded half up.
fn div_round(num: i128, den: i128) -> i64 {
    ((num * 2 + den) / (den * 2)) as i64
}
