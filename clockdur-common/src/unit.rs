use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// Unit of the normalized integer handed to and from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreAs {
    Seconds,
    #[default]
    Minutes,
}

impl StoreAs {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreAs::Seconds => "seconds",
            StoreAs::Minutes => "minutes",
        }
    }
}

impl std::fmt::Display for StoreAs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreAs {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seconds" => Ok(StoreAs::Seconds),
            "minutes" => Ok(StoreAs::Minutes),
            other => Err(ConfigError::InvalidValue {
                field: "store_as".to_string(),
                value: other.to_string(),
            }),
        }
    }
}
