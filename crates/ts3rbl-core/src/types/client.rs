use crate::error::{BotError, Result};
use crate::types::Properties;

/// Current metadata for a connected client, as reported by `clientinfo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Client id on the virtual server
    pub clid: u32,

    /// Display nickname
    pub nickname: String,

    /// Address the client connected from
    pub address: String,

    /// Server groups the client belongs to
    pub server_groups: Vec<u32>,
}

impl ClientInfo {
    /// Decode a `clientinfo` row for the given client id.
    ///
    /// The row itself does not repeat the client id, so the caller supplies it.
    pub fn from_properties(clid: u32, row: &Properties) -> Result<Self> {
        Ok(Self {
            clid,
            nickname: required(row, "client_nickname")?.to_string(),
            address: required(row, "connection_client_ip")?.to_string(),
            server_groups: row
                .get("client_servergroups")
                .map(|groups| parse_id_list(groups))
                .unwrap_or_default(),
        })
    }
}

/// The bot's own identity, as reported by `whoami`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoAmI {
    /// The bot's client id
    pub client_id: u32,

    /// The bot's current nickname
    pub client_nickname: String,

    /// Selected virtual server, if any
    pub virtualserver_id: Option<u32>,

    /// Channel the bot is currently in
    pub channel_id: Option<u32>,
}

impl WhoAmI {
    /// Decode a `whoami` row
    pub fn from_properties(row: &Properties) -> Result<Self> {
        Ok(Self {
            client_id: parse_id(row, "client_id")?,
            client_nickname: required(row, "client_nickname")?.to_string(),
            virtualserver_id: row.get("virtualserver_id").and_then(|v| v.parse().ok()),
            channel_id: row.get("client_channel_id").and_then(|v| v.parse().ok()),
        })
    }
}

/// Read a required key from a row
pub fn required<'a>(row: &'a Properties, key: &str) -> Result<&'a str> {
    row.get(key)
        .map(String::as_str)
        .ok_or_else(|| BotError::Protocol(format!("missing `{key}` in response")))
}

/// Read a required numeric id from a row
pub fn parse_id(row: &Properties, key: &str) -> Result<u32> {
    let raw = required(row, key)?;
    raw.parse()
        .map_err(|_| BotError::Protocol(format!("`{key}` is not an id: {raw:?}")))
}

/// Parse a comma separated id list such as `client_servergroups=6,8`
#[must_use]
pub fn parse_id_list(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn client_info_from_row() {
        let info = ClientInfo::from_properties(
            42,
            &row(&[
                ("client_nickname", "some one"),
                ("connection_client_ip", "203.0.113.9"),
                ("client_servergroups", "8,12"),
            ]),
        )
        .unwrap();

        assert_eq!(info.clid, 42);
        assert_eq!(info.nickname, "some one");
        assert_eq!(info.address, "203.0.113.9");
        assert_eq!(info.server_groups, vec![8, 12]);
    }

    #[test]
    fn client_info_requires_address() {
        let err = ClientInfo::from_properties(7, &row(&[("client_nickname", "x")])).unwrap_err();
        assert!(matches!(err, BotError::Protocol(msg) if msg.contains("connection_client_ip")));
    }

    #[test]
    fn whoami_from_row() {
        let me = WhoAmI::from_properties(&row(&[
            ("client_id", "3"),
            ("client_nickname", "RBLBot"),
            ("virtualserver_id", "1"),
            ("client_channel_id", "5"),
        ]))
        .unwrap();

        assert_eq!(me.client_id, 3);
        assert_eq!(me.client_nickname, "RBLBot");
        assert_eq!(me.virtualserver_id, Some(1));
        assert_eq!(me.channel_id, Some(5));
    }

    #[test]
    fn non_numeric_id_is_protocol_error() {
        let err = parse_id(&row(&[("clid", "abc")]), "clid").unwrap_err();
        assert!(matches!(err, BotError::Protocol(_)));
    }

    #[test]
    fn id_list_skips_garbage() {
        assert_eq!(parse_id_list("6, 8,,x,10"), vec![6, 8, 10]);
        assert!(parse_id_list("").is_empty());
    }
}
