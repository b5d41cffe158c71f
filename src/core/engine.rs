use crate::core::{formatter, validator};
use crate::domain::model::{CardCheck, ExpiryDate};
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::text::{digits_only, last_four, replace_full_width_digits};

/// Entry point for callers that want every card operation behind one value,
/// with a swappable clock for expiry checks.
#[derive(Debug, Clone, Default)]
pub struct CardEngine<C: Clock = SystemClock> {
    clock: C,
}

impl CardEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> CardEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn card_network_of(&self, raw: &str) -> Option<&'static str> {
        let network = validator::card_network_of(raw);
        tracing::trace!(?network, "classified card number");
        network
    }

    pub fn validate_number(&self, raw: &str) -> bool {
        let valid = validator::validate_number(raw);
        tracing::debug!(valid, "validated card number");
        valid
    }

    pub fn validate_expiry(&self, month_or_combined: &str, year: Option<&str>) -> bool {
        let valid = validator::validate_expiry(month_or_combined, year, &self.clock);
        tracing::debug!(valid, combined = year.is_none(), "validated expiry");
        valid
    }

    pub fn validate_expiry_date(&self, date: ExpiryDate) -> bool {
        validator::validate_expiry_date(date, &self.clock)
    }

    pub fn parse_expiry(&self, combined: &str) -> Option<ExpiryDate> {
        validator::parse_expiry(combined, &self.clock)
    }

    pub fn validate_cvc(&self, cvc: &str, network_id: Option<&str>) -> bool {
        let valid = validator::validate_cvc(cvc, network_id);
        tracing::debug!(valid, ?network_id, "validated cvc");
        valid
    }

    pub fn format_number(&self, raw: &str) -> String {
        formatter::format_number(raw)
    }

    pub fn format_expiry(&self, raw: &str) -> String {
        formatter::format_expiry(raw)
    }

    /// Like [`format_number`](Self::format_number) but folds full-width
    /// digits first, for pasted input.
    pub fn reformat_number(&self, raw: &str) -> String {
        formatter::format_number(&replace_full_width_digits(raw))
    }

    pub fn reformat_expiry(&self, raw: &str) -> String {
        formatter::format_expiry(&replace_full_width_digits(raw))
    }

    /// Runs every check that applies to the supplied fields. The CVC is
    /// checked against the detected network.
    pub fn check(&self, number: &str, expiry: Option<&str>, cvc: Option<&str>) -> CardCheck {
        let number = replace_full_width_digits(number);
        let network = self.card_network_of(&number);
        let expiry = expiry
            .map(replace_full_width_digits)
            .filter(|e| !e.trim().is_empty());
        let cvc = cvc.filter(|c| !c.trim().is_empty());

        let check = CardCheck {
            network: network.map(str::to_string),
            last_four: last_four(&digits_only(&number)),
            formatted_number: self.format_number(&number),
            number_valid: self.validate_number(&number),
            formatted_expiry: expiry.as_deref().map(|e| self.format_expiry(e)),
            expiry_valid: expiry.as_deref().map(|e| self.validate_expiry(e, None)),
            cvc_valid: cvc.map(|c| self.validate_cvc(c, network)),
        };

        tracing::debug!(
            network = check.network.as_deref().unwrap_or("unknown"),
            valid = check.is_valid(),
            "checked card"
        );
        check
    }
}
