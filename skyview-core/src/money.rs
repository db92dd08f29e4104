//! Rupee amounts held as integer paise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount is empty")]
    Empty,
    #[error("not a decimal amount: {0:?}")]
    Invalid(String),
    #[error("amount out of range: {0:?}")]
    Overflow(String),
}

/// A currency amount in paise (1/100 rupee).
///
/// Signed so that malformed negative input can be represented and
/// rejected by the layers that care about it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    pub const fn paise(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse a plain decimal string such as `"118"`, `"118.5"` or
    /// `" 118.00 "`. Digits past the second decimal are rounded half up.
    pub fn parse(raw: &str) -> Result<Money, MoneyError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(MoneyError::Empty);
        }
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(MoneyError::Invalid(raw.to_string()));
        }

        let overflow = || MoneyError::Overflow(raw.to_string());
        let rupees: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac = frac.as_bytes();
        let digit = |i: usize| frac.get(i).map(|b| (b - b'0') as i64).unwrap_or(0);
        let mut paise = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            paise += 1;
        }

        let total = rupees
            .checked_mul(100)
            .and_then(|p| p.checked_add(paise))
            .ok_or_else(overflow)?;
        Ok(Money(if negative { -total } else { total }))
    }

    /// Integer rupees and two-digit paise for column display. Negative
    /// amounts have no display form and come out as ("0", "00").
    pub fn split(&self) -> SplitAmount {
        if self.0 < 0 {
            return SplitAmount::zero();
        }
        SplitAmount {
            rupees: (self.0 / 100).to_string(),
            paise: format!("{:02}", self.0 % 100),
        }
    }
}

impl fmt::Display for Money {
    /// `1234.50`, the way a two-place decimal column prints.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

/// An amount broken into the Rs / Ps columns of the invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAmount {
    pub rupees: String,
    pub paise: String,
}

impl SplitAmount {
    pub fn zero() -> Self {
        SplitAmount {
            rupees: "0".to_string(),
            paise: "00".to_string(),
        }
    }
}
