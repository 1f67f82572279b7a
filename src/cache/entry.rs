use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::constants::{SENTINEL_CHANNEL_NOT_FOUND, SENTINEL_ERROR, SENTINEL_ERROR_STATUS_PREFIX};

/// Outcome of a subscriber lookup.
///
/// Stored and written to CSV as the legacy strings: a plain number,
/// `"Channel Not Found"`, `"Error"` or `"Error: <status>"`.
///
/// Rows always carry the cached string. A permanent HTTP failure therefore
/// reads `"Error: <status>"` on first contact too, where older exports wrote a
/// bare `"Error"` and kept the status only in the cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriberCount {
    Count(u64),
    NotFound,
    /// Every attempt hit quota or rate limiting.
    TransientErrorExhausted,
    /// Non-retryable failure. `None` when no HTTP status was involved.
    PermanentError(Option<u16>),
}

impl SubscriberCount {
    pub fn count(&self) -> Option<u64> {
        match self {
            SubscriberCount::Count(n) => Some(*n),
            _ => None,
        }
    }

    /// Decode a stored value. Unrecognised text is kept as an error entry.
    pub fn from_stored(s: &str) -> Self {
        let trimmed = s.trim();

        if let Ok(n) = trimmed.parse::<u64>() {
            return SubscriberCount::Count(n);
        }
        if trimmed == SENTINEL_CHANNEL_NOT_FOUND {
            return SubscriberCount::NotFound;
        }
        if trimmed == SENTINEL_ERROR {
            return SubscriberCount::TransientErrorExhausted;
        }
        if let Some(status) = trimmed.strip_prefix(SENTINEL_ERROR_STATUS_PREFIX) {
            return SubscriberCount::PermanentError(status.trim().parse().ok());
        }

        SubscriberCount::PermanentError(None)
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SubscriberCount::TransientErrorExhausted | SubscriberCount::PermanentError(_)
        )
    }
}

impl fmt::Display for SubscriberCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriberCount::Count(n) => write!(f, "{}", n),
            SubscriberCount::NotFound => f.write_str(SENTINEL_CHANNEL_NOT_FOUND),
            SubscriberCount::TransientErrorExhausted | SubscriberCount::PermanentError(None) => {
                f.write_str(SENTINEL_ERROR)
            }
            SubscriberCount::PermanentError(Some(status)) => {
                write!(f, "{}{}", SENTINEL_ERROR_STATUS_PREFIX, status)
            }
        }
    }
}

impl FromStr for SubscriberCount {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_stored(s))
    }
}

impl Serialize for SubscriberCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SubscriberCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SubscriberCount::from_stored(&raw))
    }
}
