use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Largest integer a float carries exactly
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Account identifier, normalized to a trimmed string so that `12345`, `12345.0`
/// and `"12345"` all match
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(value: impl AsRef<str>) -> Self {
        return Self(value.as_ref().trim().to_string());
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for AccountNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountNumber {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<u64> for AccountNumber {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

struct AccountNumberVisitor;

impl<'de> Visitor<'de> for AccountNumberVisitor {
    type Value = AccountNumber;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an account number as a string or an integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<AccountNumber, E> {
        Ok(AccountNumber::new(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<AccountNumber, E> {
        Ok(AccountNumber::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<AccountNumber, E> {
        Ok(AccountNumber(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<AccountNumber, E> {
        if value.fract() != 0.0 || value.abs() >= MAX_EXACT_FLOAT {
            Err(E::invalid_value(Unexpected::Float(value), &self))?
        }

        Ok(AccountNumber((value as i64).to_string()))
    }
}

impl<'de> Deserialize<'de> for AccountNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AccountNumberVisitor)
    }
}
