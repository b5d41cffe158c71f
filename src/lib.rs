//! Payment card input validation and formatting.
//!
//! A static, ordered table of card network rules drives classification,
//! number/expiry/CVC validation and display formatting. Every card operation
//! is a pure function of its input (and, for expiry checks, the clock).

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::batch::{BatchChecker, BatchSettings, BatchSummary};
pub use crate::core::classifier::{classify, classify_by_network_id};
pub use crate::core::engine::CardEngine;
pub use crate::core::formatter::{format_expiry, format_number};
pub use crate::core::luhn::luhn_valid;
pub use crate::core::validator::{card_network_of, validate_cvc, validate_number};
pub use config::{toml_config::TomlConfig, OutputFormat};
pub use domain::model::{CardCheck, CardRule, ExpiryDate, GroupingPattern};
pub use domain::ports::{Clock, FixedClock, SystemClock};
pub use utils::error::{CardError, Result};

/// Validates an expiry against the system clock. See
/// [`crate::core::validator::validate_expiry`] for the accepted forms.
pub fn validate_expiry(month_or_combined: &str, year: Option<&str>) -> bool {
    crate::core::validator::validate_expiry(month_or_combined, year, &SystemClock)
}
