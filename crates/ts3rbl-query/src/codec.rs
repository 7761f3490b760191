//! ServerQuery line encoding.
//!
//! Commands are a name followed by space separated `key=value` pairs.
//! Responses use the same pair syntax, with `|` separating
//! rows. Values are escaped so they never contain spaces, pipes or control
//! characters.

use ts3rbl_core::{Event, Properties};

use crate::error::{QueryError, QueryResult};

const ESCAPES: [(char, char); 11] = [
    ('\\', '\\'),
    ('/', '/'),
    (' ', 's'),
    ('|', 'p'),
    ('\x07', 'a'),
    ('\x08', 'b'),
    ('\x0c', 'f'),
    ('\n', 'n'),
    ('\r', 'r'),
    ('\t', 't'),
    ('\x0b', 'v'),
];

/// Escape a value for use in a command
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match ESCAPES.iter().find(|(plain, _)| *plain == c) {
            Some((_, code)) => {
                out.push('\\');
                out.push(*code);
            }
            None => out.push(c),
        }
    }
    out
}

/// Undo [`escape`]; unknown escape sequences are kept verbatim
#[must_use]
pub fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(code) => match ESCAPES.iter().find(|(_, e)| *e == code) {
                Some((plain, _)) => out.push(*plain),
                None => {
                    out.push('\\');
                    out.push(code);
                }
            },
            None => out.push('\\'),
        }
    }
    out
}

/// A command ready to be written to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<(String, String)>,
}

impl Command {
    /// Start a command with no arguments
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Add a `key=value` argument; the value is escaped on encode
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.args.push((key.into(), value.to_string()));
        self
    }

    /// Command name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encode into a single newline terminated line
    #[must_use]
    pub fn encode(&self) -> String {
        let mut line = self.name.clone();
        for (key, value) in &self.args {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(&escape(value));
        }
        line.push('\n');
        line
    }
}

/// Decode one row of `key=value` pairs
#[must_use]
pub fn parse_row(row: &str) -> Properties {
    row.split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) => (key.to_string(), unescape(value)),
            None => (token.to_string(), String::new()),
        })
        .collect()
}

/// Decode a data line into its `|` separated rows
#[must_use]
pub fn parse_rows(line: &str) -> Vec<Properties> {
    line.split('|').map(parse_row).collect()
}

/// Decode a `notify…` line into an [`Event`]
pub fn parse_event(line: &str) -> QueryResult<Event> {
    if !line.starts_with("notify") {
        return Err(QueryError::Malformed(format!("not a notification: {line:?}")));
    }
    let (kind, payload) = line.split_once(' ').unwrap_or((line, ""));
    let rows = if payload.trim().is_empty() {
        Vec::new()
    } else {
        parse_rows(payload)
    };
    Ok(Event::new(kind, rows))
}

/// Status carried by the `error id=… msg=…` line closing every response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Error id, 0 on success
    pub id: u32,
    /// Unescaped message, with `extra_msg` appended when present
    pub message: String,
}

/// Decode the remainder of an `error` line (everything after `error `)
pub fn parse_status(rest: &str) -> QueryResult<Status> {
    let props = parse_row(rest);
    let id = props
        .get("id")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| QueryError::Malformed(format!("status line without id: {rest:?}")))?;
    let mut message = props.get("msg").cloned().unwrap_or_default();
    if let Some(extra) = props.get("extra_msg") {
        message.push_str(" (");
        message.push_str(extra);
        message.push(')');
    }
    Ok(Status { id, message })
}

impl Status {
    /// Turn a non-zero status into an error
    pub fn into_result(self) -> QueryResult<()> {
        if self.id == 0 {
            Ok(())
        } else {
            Err(QueryError::Server {
                id: self.id,
                message: self.message,
            })
        }
    }
}
