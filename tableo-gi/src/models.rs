//! Data models for the guest import pipeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Loosely-typed guest tuple, pre-normalization
///
/// Produced by both parser paths. Values may be JSON strings or numbers;
/// the normalizer resolves them into the canonical guest shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestCandidate {
    pub guest_name: Option<Value>,
    pub table_number: Option<Value>,
    pub seat_number: Option<Value>,
}

impl GuestCandidate {
    /// Candidate from already-split text fields (local parser path)
    pub fn from_fields(name: &str, table: &str, seat: Option<&str>) -> Self {
        Self {
            guest_name: Some(Value::String(name.to_string())),
            table_number: Some(Value::String(table.to_string())),
            seat_number: seat.map(|s| Value::String(s.to_string())),
        }
    }

    /// Candidate from a loose JSON object (extraction path)
    ///
    /// Field names vary by response: `guest_name`/`name`,
    /// `table_number`/`table`, `seat_number`/`seat`. The canonical name is
    /// preferred, the short form is the fallback.
    pub fn from_value(value: &Value) -> Self {
        let pick = |primary: &str, fallback: &str| -> Option<Value> {
            value
                .get(primary)
                .or_else(|| value.get(fallback))
                .filter(|v| !v.is_null())
                .cloned()
        };

        Self {
            guest_name: pick("guest_name", "name"),
            table_number: pick("table_number", "table"),
            seat_number: pick("seat_number", "seat"),
        }
    }
}

/// Canonical guest shape after normalization
///
/// `table_number` preserves arbitrary text so named tables ("Table des
/// mariés") survive import. `seat_number` is the leading digit run when one
/// exists, otherwise the verbatim seat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedGuest {
    pub guest_name: String,
    pub table_number: String,
    pub seat_number: Option<String>,
}

/// Persisted guest row
#[derive(Debug, Clone, Serialize)]
pub struct GuestRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub guest_name: String,
    pub table_number: String,
    pub seat_number: Option<String>,
}

/// Event row
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub event_date: NaiveDate,
}

/// Days after `event_date` during which guest-list mutation stays permitted
pub const EVENT_GRACE_DAYS: i64 = 5;

impl Event {
    /// Whether the event is inside its accessibility window
    /// (event date plus a trailing grace period)
    pub fn is_accessible(&self, now: DateTime<Utc>) -> bool {
        let closes = self.event_date + chrono::Duration::days(EVENT_GRACE_DAYS);
        now.date_naive() <= closes
    }
}
