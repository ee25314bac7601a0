//! # CareHub Types
//!
//! Validated value types shared across the CareHub crates.
//!
//! Each type guarantees its invariant once constructed, and the serde implementations route
//! through the same constructors, so a decoded request body can never carry an invalid value
//! into the store.

use std::fmt;

/// Errors that can occur when constructing a validated value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// The identifier was empty or contained only whitespace
    #[error("identifier cannot be empty")]
    EmptyKey,
    /// The identifier contained a path separator and could never be addressed by URL
    #[error("identifier cannot contain '/'")]
    KeyContainsSlash,
    /// The age was outside the accepted range
    #[error("age must be between 0 and {max}, got {0}", max = Age::MAX)]
    AgeOutOfRange(i64),
    /// The amount was negative
    #[error("amount cannot be negative, got {0}")]
    NegativeAmount(f64),
    /// The amount was NaN or infinite
    #[error("amount must be a finite number")]
    NonFiniteAmount,
}

/// Business identifier for a stored record (`PAT1`, `DOC2`, a username, ...).
///
/// The key is used verbatim as a URL path segment, so it must be non-blank and free of `/`.
/// No prefix or digit format is enforced here; the store accepts any key meeting those two
/// rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordKey(String);

impl RecordKey {
    /// Creates a new `RecordKey` from the given input.
    ///
    /// Unlike free text, the input is *not* trimmed: `"PAT1 "` and `"PAT1"` are distinct keys.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyKey`] for blank input and [`ValueError::KeyContainsSlash`]
    /// if the input contains `/`.
    pub fn new(input: impl Into<String>) -> Result<Self, ValueError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(ValueError::EmptyKey);
        }
        if input.contains('/') {
            return Err(ValueError::KeyContainsSlash);
        }
        Ok(Self(input))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordKey {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordKey> for String {
    fn from(key: RecordKey) -> Self {
        key.0
    }
}

impl PartialEq<str> for RecordKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Patient age in whole years, 0 to 150 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Age(u8);

impl Age {
    /// Largest accepted age.
    pub const MAX: u8 = 150;

    /// Creates a new `Age`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::AgeOutOfRange`] if `years` is negative or above [`Age::MAX`].
    pub fn new(years: i64) -> Result<Self, ValueError> {
        if (0..=i64::from(Self::MAX)).contains(&years) {
            // Range checked above, so the narrowing is lossless.
            Ok(Self(years as u8))
        } else {
            Err(ValueError::AgeOutOfRange(years))
        }
    }

    pub fn years(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Age {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Age> for u8 {
    fn from(age: Age) -> Self {
        age.0
    }
}

/// Monetary amount of a bill: finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Creates a new `Amount`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NonFiniteAmount`] for NaN or infinities and
    /// [`ValueError::NegativeAmount`] for values below zero.
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NonFiniteAmount);
        }
        if value < 0.0 {
            return Err(ValueError::NegativeAmount(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
