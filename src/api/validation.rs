//! Form validation primitives.
//!
//! Every form runs its rules in declaration order and collects all
//! violations into one `ValidationErrors` value instead of stopping at the
//! first. Rules that need the store (uniqueness, existence) are part of the
//! same pass; see `Validate`.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::db::{Store, StoreError};

lazy_static! {
    /// Regex for validating email addresses (local part, @, dotted domain)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
    ).unwrap();

    /// Regex for classification names: letters and digits only
    static ref CLASSIFICATION_NAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
}

/// A rule violation tied to the form field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered list of violations from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// `Ok(valid)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, valid: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(valid)
        } else {
            Err(self)
        }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// A submitted form that can be checked against its rule set.
///
/// The outer `Result` carries store failures hit by lookup rules; the inner
/// one is the verdict: sanitized values or every violated rule.
#[async_trait]
pub trait Validate: Send + Sync {
    type Valid: Send;

    async fn validate(&self, store: &Store) -> Result<Result<Self::Valid, ValidationErrors>, StoreError>;
}

/// Character-class requirements for a password.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub min_lowercase: usize,
    pub min_uppercase: usize,
    pub min_digits: usize,
    pub min_symbols: usize,
}

/// Applied when an account is created
pub const REGISTRATION_POLICY: PasswordPolicy = PasswordPolicy {
    min_length: 12,
    min_lowercase: 1,
    min_uppercase: 1,
    min_digits: 1,
    min_symbols: 1,
};

/// Applied when an existing account changes its password
pub const CHANGE_POLICY: PasswordPolicy = PasswordPolicy {
    min_length: 8,
    min_lowercase: 1,
    min_uppercase: 1,
    min_digits: 1,
    min_symbols: 0,
};

impl PasswordPolicy {
    pub fn accepts(&self, password: &str) -> bool {
        let mut lower = 0;
        let mut upper = 0;
        let mut digits = 0;
        let mut symbols = 0;
        for c in password.chars() {
            if c.is_lowercase() {
                lower += 1;
            } else if c.is_uppercase() {
                upper += 1;
            } else if c.is_ascii_digit() {
                digits += 1;
            } else if !c.is_alphanumeric() {
                symbols += 1;
            }
        }

        password.chars().count() >= self.min_length
            && lower >= self.min_lowercase
            && upper >= self.min_uppercase
            && digits >= self.min_digits
            && symbols >= self.min_symbols
    }
}

/// Non-empty after trimming
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL_REGEX.is_match(value)
}

/// Canonical form used for storage and comparison
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn is_classification_name(value: &str) -> bool {
    CLASSIFICATION_NAME_REGEX.is_match(value)
}

/// Integer field with a lower bound; None when blank, malformed or too small.
pub fn parse_integer_at_least(value: &str, min: i64) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|n| *n >= min)
}

/// Decimal field within `min..=max`; None when blank, malformed, non-finite
/// or out of range.
pub fn parse_number_in_range(value: &str, min: f64, max: f64) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && (min..=max).contains(n))
}

/// Positive row id from a select or hidden field
pub fn parse_id(value: &str) -> Option<i64> {
    parse_integer_at_least(value, 1)
}
