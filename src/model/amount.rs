use std::{
    fmt::Display,
    ops::{Add, Sub},
    str::FromStr,
};

use bigdecimal::BigDecimal;
use serde::{
    de::{self},
    ser, Serialize,
};

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Number;

// Amounts are limited to |amount| < 10^18 with at most 20 decimal places, so
// formatting and summing them stays cheap whatever exponent a client sends.
const MAX_AMOUNT: i64 = 1_000_000_000_000_000_000;
const MAX_SCALE: i64 = 20;
const MAX_UNSCALED_BITS: u64 = 256;

/// An exact decimal sum of money.
///
/// Amounts are carried as [`BigDecimal`] so that summing many small
/// transactions never drifts the way binary floating point does. On the wire
/// they are plain JSON numbers; `serde_json`'s `arbitrary_precision` feature
/// keeps the literal digits intact in both directions.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct Amount {
    amount: BigDecimal,
}

#[derive(Debug, PartialEq)]
pub struct ParseAmountError;

impl Amount {
    pub fn zero() -> Amount {
        Amount {
            amount: BigDecimal::from(0i64),
        }
    }

    pub fn parse(value: &str) -> Result<Amount, ParseAmountError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ParseAmountError);
        }

        let amount = BigDecimal::from_str(value).map_err(|_| ParseAmountError)?;
        if !Self::within_bounds(&amount) {
            return Err(ParseAmountError);
        }

        Ok(Amount { amount })
    }

    fn within_bounds(amount: &BigDecimal) -> bool {
        let (unscaled, scale) = amount.as_bigint_and_exponent();
        if !(-MAX_SCALE..=MAX_SCALE).contains(&scale) || unscaled.bits() > MAX_UNSCALED_BITS {
            return false;
        }

        let max = BigDecimal::from(MAX_AMOUNT);
        *amount < max && *amount > -max
    }

    pub fn is_negative(&self) -> bool {
        self.amount < BigDecimal::from(0i64)
    }

    pub fn serialize_for_db(&self) -> String {
        self.amount.to_string()
    }

    pub fn deserialize_from_db(amount: &str) -> Result<Amount, ParseAmountError> {
        Amount::parse(amount)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount {
            amount: self.amount + rhs.amount,
        }
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount {
            amount: self.amount - rhs.amount,
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.amount)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number = Number::from_str(&self.to_string())
            .map_err(|e| <S::Error as ser::Error>::custom(e))?;
        Number::serialize(&number, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = Number::deserialize(deserializer)?;

        Amount::parse(&n.to_string()).map_err(|_| de::Error::custom("Failed to parse"))
    }
}
