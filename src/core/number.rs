//! Invoice number generation
//!
//! Numbers are display identifiers of the form `INV` + the last six digits of
//! the current epoch milliseconds + three random digits, e.g. `INV912345042`.
//! Collisions are possible; the repository retries until it finds a number
//! not already present in its collection.

use chrono::Utc;
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// Default number prefix
pub const DEFAULT_PREFIX: &str = "INV";

/// Source of candidate invoice numbers
pub trait NumberGenerator: Send + Sync {
    /// Produce a candidate number. Uniqueness is checked by the caller.
    fn next_number(&self) -> String;
}

/// Timestamp + random generator used in production
#[derive(Debug, Clone)]
pub struct TimestampNumberGenerator {
    prefix: String,
}

impl TimestampNumberGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Compose a number from explicit parts
    pub fn compose(&self, epoch_millis: i64, random: u16) -> String {
        format!(
            "{}{:06}{:03}",
            self.prefix,
            epoch_millis.rem_euclid(1_000_000),
            random % 1000
        )
    }
}

impl Default for TimestampNumberGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl NumberGenerator for TimestampNumberGenerator {
    fn next_number(&self) -> String {
        let random = rand::rng().random_range(0..1000);
        self.compose(Utc::now().timestamp_millis(), random)
    }
}

/// True if `number` looks like a generated number with the default prefix
pub fn is_well_formed(number: &str) -> bool {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NUMBER_REGEX.get_or_init(|| {
        // 6 timestamp digits followed by 3 random digits
        Regex::new(r"^INV\d{9}$").unwrap()
    });
    regex.is_match(number)
}
