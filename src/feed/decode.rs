use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::action::Action;

/// Raw response body shape. Both halves are optional and a response can
/// legitimately carry both at once.
#[derive(Debug, Deserialize)]
struct FeedDocument {
    #[serde(default)]
    data: Vec<RawAction>,
    #[serde(default)]
    errors: Vec<RawError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    id: String,
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    due_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    detail: String,
}

/// What one fetch cycle produced: the new action generation plus the
/// display errors, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedOutcome {
    pub actions: Vec<Action>,
    pub error_messages: Vec<String>,
}

impl FeedOutcome {
    /// The single outcome used for any transport-level failure.
    pub fn transport_failure() -> Self {
        Self {
            actions: Vec::new(),
            error_messages: vec!["An error occurred".to_string()],
        }
    }
}

/// Decode a response body. Fails only if the body is not a recognizable
/// document at all; the caller treats that as a transport failure.
pub fn decode_document(body: &str) -> Result<FeedOutcome, serde_json::Error> {
    let document: FeedDocument = serde_json::from_str(body)?;
    let mut outcome = FeedOutcome::default();

    for raw in document.data {
        // A malformed due date drops only that record.
        match parse_due_by(raw.due_by.as_deref()) {
            Ok(due_by) => outcome.actions.push(Action {
                id: raw.id,
                name: raw.name,
                url: raw.url,
                image_url: raw.image_url,
                project_name: raw.project_name,
                due_by,
            }),
            Err(e) => {
                log::warn!("Dropping action {}: bad due date ({})", raw.id, e);
                outcome.error_messages.push(format!(
                    "An error occurred: action {} has an unparseable due date",
                    raw.id
                ));
            }
        }
    }

    for error in document.errors {
        outcome
            .error_messages
            .push(format!("An error occurred: {}", error.detail));
    }

    Ok(outcome)
}

fn parse_due_by(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    match raw {
        Some(s) => DateTime::parse_from_rfc3339(s).map(|dt| Some(dt.with_timezone(&Utc))),
        None => Ok(None),
    }
}
