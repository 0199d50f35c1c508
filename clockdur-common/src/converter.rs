use crate::error::{InputError, Result};
use crate::field::{parse_normalized, parse_piece, Field};
use crate::unit::StoreAs;

/// Converts between a stored duration integer and its `HH:MM[:SS]` form.
///
/// Holds nothing but its two options, so a single instance can be shared
/// freely between threads. Build it through `clockdur_config` to get the
/// option combination checked; [`DurationConverter::new`] takes the options
/// as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationConverter {
    display_seconds: bool,
    store_as: StoreAs,
}

impl DurationConverter {
    pub fn new(display_seconds: bool, store_as: StoreAs) -> Self {
        Self {
            display_seconds,
            store_as,
        }
    }

    pub fn display_seconds(&self) -> bool {
        self.display_seconds
    }

    pub fn store_as(&self) -> StoreAs {
        self.store_as
    }

    /// Stored value to display string. `None` stays `None`.
    ///
    /// Takes a signed value as hosts hand it over. Stored values above
    /// `i64::MAX`, which [`to_normalized`](Self::to_normalized) can produce,
    /// are displayed through [`format`](Self::format).
    pub fn to_display(&self, value: Option<i64>) -> Result<Option<String>> {
        let Some(value) = value else {
            return Ok(None);
        };

        let norm = u64::try_from(value).map_err(|_| InputError::Negative { value })?;
        Ok(Some(self.format(norm)))
    }

    /// Same as [`to_display`](Self::to_display) for a stored value that
    /// arrives as text.
    pub fn to_display_text(&self, value: Option<&str>) -> Result<Option<String>> {
        let Some(text) = value else {
            return Ok(None);
        };

        let norm = parse_normalized(text)?;
        Ok(Some(self.format(norm)))
    }

    /// Formats a stored value. Seconds are appended when requested, or
    /// whenever they are non-zero so no information is dropped.
    pub fn format(&self, norm: u64) -> String {
        let (minutes, seconds) = match self.store_as {
            StoreAs::Minutes => (norm, 0),
            StoreAs::Seconds => (norm / 60, norm % 60),
        };

        let hours = minutes / 60;
        let minutes = minutes % 60;

        let mut display = format!("{:02}:{:02}", hours, minutes);
        if self.display_seconds || seconds > 0 {
            display.push_str(&format!(":{:02}", seconds));
        }

        log::debug!("Formatted {} {} as {}", norm, self.store_as, display);
        display
    }

    /// Display string to stored value. `None` and `""` both mean no value.
    pub fn to_normalized(&self, value: Option<&str>) -> Result<Option<u64>> {
        match value {
            None | Some("") => Ok(None),
            Some(view) => self.parse(view).map(Some),
        }
    }

    /// Parses a non-empty display string.
    ///
    /// A seconds piece is always range-checked, even under minutes storage
    /// where it does not contribute to the result.
    pub fn parse(&self, view: &str) -> Result<u64> {
        let pieces: Vec<&str> = view.split(':').collect();
        if pieces.len() != 2 && pieces.len() != 3 {
            return Err(InputError::PieceCount { count: pieces.len() }.into());
        }

        let mut values = [0u64; 3];
        for ((piece, field), slot) in pieces.iter().zip(Field::ORDER).zip(values.iter_mut()) {
            *slot = parse_piece(piece, field)?;
        }
        let [hours, minutes, parsed_seconds] = values;

        let total_minutes = hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .ok_or(InputError::Overflow)?;

        let norm = match self.store_as {
            StoreAs::Minutes => total_minutes,
            StoreAs::Seconds => {
                // Absent pieces are zero, so this covers both the forced and
                // the non-zero case
                let seconds = if self.display_seconds || parsed_seconds > 0 {
                    parsed_seconds
                } else {
                    0
                };
                total_minutes
                    .checked_mul(60)
                    .and_then(|s| s.checked_add(seconds))
                    .ok_or(InputError::Overflow)?
            }
        };

        log::debug!("Parsed {:?} as {} {}", view, norm, self.store_as);
        Ok(norm)
    }
}
