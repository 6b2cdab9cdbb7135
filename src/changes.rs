//! Recent-change detection over a connections document.
//!
//! LinkedIn gives no change feed, so a connection counts as "changed" when its
//! self-reported `last_updated` falls inside the trailing window.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::error::Error;

/// How far back a `last_updated` timestamp may lie and still count.
pub const CHANGE_WINDOW: Duration = Duration::days(7);

const LAST_UPDATED_FIELD: &str = "last_updated";
const FIRST_NAME_POINTER: &str = "/firstName/localized/en_US";
const LAST_NAME_POINTER: &str = "/lastName/localized/en_US";

/// A connection whose profile was updated within [`CHANGE_WINDOW`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionChange {
    pub name: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub updated_at: String,
}

/// Select the connections in `connections.elements` updated since `now - 7 days`.
///
/// Elements without a timestamp are ignored. Elements with an unparseable
/// timestamp or without an `en_US` localized name are skipped with a warning.
#[must_use]
pub fn recent_changes(connections: &JsonValue, now: OffsetDateTime) -> Vec<ConnectionChange> {
    let Some(elements) = connections.get("elements").and_then(JsonValue::as_array) else {
        return Vec::new();
    };

    let cutoff = now - CHANGE_WINDOW;
    elements
        .iter()
        .enumerate()
        .filter_map(|(index, connection)| change_since(connection, cutoff, index))
        .collect()
}

fn change_since(
    connection: &JsonValue,
    cutoff: OffsetDateTime,
    index: usize,
) -> Option<ConnectionChange> {
    let raw = connection
        .get(LAST_UPDATED_FIELD)
        .filter(|v| !v.is_null())?;

    let updated = match parse_timestamp(raw) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(index, error = %e, "Skipping connection with malformed last_updated");
            return None;
        }
    };

    if updated < cutoff {
        return None;
    }

    let Some(name) = localized_name(connection) else {
        tracing::warn!(index, "Skipping connection without an en_US localized name");
        return None;
    };

    let updated_at = match updated
        .to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
    {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(index, error = %e, "Skipping connection with unformattable last_updated");
            return None;
        }
    };

    Some(ConnectionChange { name, updated_at })
}

/// Parse `last_updated`: integer Unix epoch milliseconds or an RFC 3339 string.
///
/// # Errors
///
/// Returns [`Error::Timestamp`] for any other shape or an out-of-range value.
pub fn parse_timestamp(value: &JsonValue) -> Result<OffsetDateTime, Error> {
    match value {
        JsonValue::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| Error::Timestamp(format!("not an integer: {n}")))?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                .map_err(|e| Error::Timestamp(e.to_string()))
        }
        JsonValue::String(s) => {
            OffsetDateTime::parse(s, &Rfc3339).map_err(|e| Error::Timestamp(format!("{s}: {e}")))
        }
        other => Err(Error::Timestamp(format!("unsupported value: {other}"))),
    }
}

fn localized_name(connection: &JsonValue) -> Option<String> {
    let first = connection.pointer(FIRST_NAME_POINTER)?.as_str()?;
    let last = connection.pointer(LAST_NAME_POINTER)?.as_str()?;
    Some(format!("{first} {last}"))
}
