//! Prices

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    iter::Sum,
    ops::{Add, Deref},
};

use rusty_money::{Formatter as MoneyFormatter, Money, Params, iso};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

/// Whole-Rupiah amount. The shop never deals in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rupiah(u64);

impl Rupiah {
    /// Zero Rupiah
    pub const ZERO: Self = Self(0);

    /// Creates a new amount
    pub const fn new(value: u64) -> Self {
        Rupiah(value)
    }

    /// The amount as IDR money.
    pub fn to_money(self) -> Money<'static, iso::Currency> {
        Money::from_major(i64::try_from(self.0).unwrap_or(i64::MAX), iso::IDR)
    }

    /// Line amount for `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl Deref for Rupiah {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Add for Rupiah {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Rupiah {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Display for Rupiah {
    /// Indonesian grouping without decimals, e.g. `Rp100.000`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let params = Params {
            digit_separator: '.',
            exponent_separator: ',',
            separator_pattern: &[3; 6],
            rounding: Some(0),
            symbol: Some(iso::IDR.symbol),
            code: Some(iso::IDR.iso_alpha_code),
            ..Params::default()
        };

        f.write_str(&MoneyFormatter::money(&self.to_money(), params))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Integer(u64),
    Float(f64),
    Text(String),
    Null,
}

impl<'de> Deserialize<'de> for Rupiah {
    /// The backend sends prices as integers, decimals, or decimal strings
    /// such as `"50000.00"`; the fractional part is dropped. `null` reads as
    /// zero.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Integer(value) => Ok(Self(value)),
            RawAmount::Null => Ok(Self::ZERO),
            RawAmount::Float(value) if value.is_finite() && value >= 0.0 => {
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "non-negative finite amount, fractional Rupiah are discarded"
                )]
                let whole = value.trunc() as u64;

                Ok(Self(whole))
            }
            RawAmount::Float(value) => Err(D::Error::custom(format!("invalid amount: {value}"))),
            RawAmount::Text(text) => {
                let whole = text.trim().split('.').next().unwrap_or_default();

                whole
                    .parse()
                    .map(Self)
                    .map_err(|error| D::Error::custom(format!("invalid amount {text:?}: {error}")))
            }
        }
    }
}
