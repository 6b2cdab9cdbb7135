use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::changes::ConnectionChange;

/// Everything the callback collected, stored per browser session.
///
/// Field order is the JSON order served by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// LinkedIn profile document, or `{}` if the profile request failed.
    pub profile: JsonValue,
    /// LinkedIn connections document, or `{"elements": []}` if that request failed.
    pub connections: JsonValue,
    pub connection_changes: Vec<ConnectionChange>,
}

/// What the callback answers with once the session is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// 302 to the dashboard route.
    #[default]
    Redirect,
    /// 200 with the [`SessionRecord`] as the body.
    Json,
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(Self::Redirect),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown response mode '{other}' (expected redirect or json)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn record_serializes_in_declared_order() {
        let record = SessionRecord {
            profile: json!({ "id": "u1" }),
            connections: json!({ "elements": [] }),
            connection_changes: Vec::new(),
        };

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"profile":{"id":"u1"},"connections":{"elements":[]},"connection_changes":[]}"#
        );
    }

    #[test]
    fn response_mode_parses_case_insensitively() {
        assert_eq!("redirect".parse::<ResponseMode>(), Ok(ResponseMode::Redirect));
        assert_eq!(" JSON ".parse::<ResponseMode>(), Ok(ResponseMode::Json));
        assert!("html".parse::<ResponseMode>().is_err());
    }
}
