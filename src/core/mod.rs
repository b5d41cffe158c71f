pub mod batch;
pub mod cards;
pub mod classifier;
pub mod engine;
pub mod formatter;
pub mod keystroke;
pub mod luhn;
pub mod validator;

pub use crate::domain::model::{CardCheck, CardRule, ExpiryDate, GroupingPattern};
pub use crate::domain::ports::{Clock, FixedClock, SystemClock};
pub use crate::utils::error::Result;
