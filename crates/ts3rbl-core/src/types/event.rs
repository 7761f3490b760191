use std::collections::BTreeMap;

/// One decoded ServerQuery row: unescaped `key=value` pairs.
///
/// Flags sent without a value (`-away`, bare `key`) map to an empty string.
pub type Properties = BTreeMap<String, String>;

/// Notification pushed by the server outside of any command response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Notification name, e.g. `notifycliententerview`
    pub kind: String,

    /// Payload rows; server notifications normally carry exactly one
    pub rows: Vec<Properties>,
}

impl Event {
    /// Create an event from its kind and payload rows
    #[must_use]
    pub fn new(kind: impl Into<String>, rows: Vec<Properties>) -> Self {
        Self {
            kind: kind.into(),
            rows,
        }
    }

    /// Look up a payload value on the first row
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows.first()?.get(key).map(String::as_str)
    }

    /// True for the notification sent when a client appears on the server
    #[must_use]
    pub fn is_client_enter(&self) -> bool {
        self.kind == "notifycliententerview"
    }
}
