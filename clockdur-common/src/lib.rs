pub mod converter;
pub mod error;
pub mod field;
pub mod unit;

pub use converter::DurationConverter;
pub use error::{ClockdurError, ConfigError, ErrorReporting, InputError, Result};
pub use field::Field;
pub use unit::StoreAs;
