//! Scripted collaborators for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use ts3rbl_core::{
    BlacklistLookup, BotError, Event, OnMatch, Properties, QuerySession, RblEntry, RblListing,
    Result, WhoAmI, SEARCH_HOST,
};

use crate::config::{ActionParams, BotConfig};

/// Kind of failure a scripted call produces
#[derive(Debug, Clone, Copy)]
pub enum Fail {
    Query,
    Connection,
    Protocol,
}

impl Fail {
    fn error(self) -> BotError {
        match self {
            Self::Query => BotError::Query {
                id: 512,
                message: "invalid clientID".into(),
            },
            Self::Connection => BotError::Connection("connection reset".into()),
            Self::Protocol => BotError::Protocol("garbage".into()),
        }
    }
}

/// One scripted result of `wait_for_event`
#[derive(Debug, Clone)]
pub enum Scripted {
    Event(Event),
    Timeout,
    Error(Fail),
}

/// In-memory session recording every call as a short line
#[derive(Default)]
pub struct MockSession {
    pub calls: Vec<String>,
    failures: HashMap<&'static str, Fail>,
    stalls: Vec<&'static str>,
    clients: Vec<(u32, Properties)>,
    events: VecDeque<Scripted>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call whose line starts with `command` fail
    pub fn failing(mut self, command: &'static str, fail: Fail) -> Self {
        self.failures.insert(command, fail);
        self
    }

    /// Make calls to `command` never complete
    pub fn stalling(mut self, command: &'static str) -> Self {
        self.stalls.push(command);
        self
    }

    pub fn with_client(mut self, clid: u32, nickname: &str, address: &str, groups: &str) -> Self {
        let row = props(&[
            ("client_nickname", nickname),
            ("connection_client_ip", address),
            ("client_servergroups", groups),
        ]);
        self.clients.push((clid, row));
        self
    }

    /// Queue results for `wait_for_event`; once drained it never returns
    pub fn script(mut self, events: impl IntoIterator<Item = Scripted>) -> Self {
        self.events.extend(events);
        self
    }

    /// Number of recorded calls for `command`
    pub fn count(&self, command: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| call.split(' ').next() == Some(command))
            .count()
    }

    async fn record(&mut self, call: String) -> Result<()> {
        let command = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.push(call);
        if self.stalls.iter().any(|stalled| *stalled == command) {
            std::future::pending::<()>().await;
        }
        match self.failures.get(command.as_str()) {
            Some(fail) => Err(fail.error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QuerySession for MockSession {
    async fn login(&mut self, username: &str, _password: &str) -> Result<()> {
        self.record(format!("login {username}")).await
    }

    async fn use_server(&mut self, server_id: u32) -> Result<()> {
        self.record(format!("use {server_id}")).await
    }

    async fn set_nickname(&mut self, nickname: &str) -> Result<()> {
        self.record(format!("clientupdate {nickname}")).await
    }

    async fn whoami(&mut self) -> Result<WhoAmI> {
        self.record("whoami".into()).await?;
        Ok(WhoAmI {
            client_id: 1,
            client_nickname: "RBLBot".into(),
            virtualserver_id: Some(1),
            channel_id: Some(1),
        })
    }

    async fn client_move(&mut self, clid: u32, cid: u32) -> Result<()> {
        self.record(format!("clientmove {clid} {cid}")).await
    }

    async fn client_list(&mut self) -> Result<Vec<Properties>> {
        self.record("clientlist".into()).await?;
        Ok(self
            .clients
            .iter()
            .map(|(clid, row)| {
                let mut row = row.clone();
                row.insert("clid".into(), clid.to_string());
                row
            })
            .collect())
    }

    async fn client_info(&mut self, clid: u32) -> Result<Vec<Properties>> {
        self.record(format!("clientinfo {clid}")).await?;
        self.clients
            .iter()
            .find(|(id, _)| *id == clid)
            .map(|(_, row)| vec![row.clone()])
            .ok_or_else(|| Fail::Query.error())
    }

    async fn client_kick(&mut self, clid: u32, reason_id: u32, reason: &str) -> Result<()> {
        self.record(format!("clientkick {clid} {reason_id} {reason}")).await
    }

    async fn ban_client(&mut self, clid: u32, seconds: u64, reason: &str) -> Result<Vec<Properties>> {
        self.record(format!("banclient {clid} {seconds} {reason}")).await?;
        Ok(vec![props(&[("banid", "17")])])
    }

    async fn server_notify_register(&mut self, event: &str) -> Result<()> {
        self.record(format!("servernotifyregister {event}")).await
    }

    async fn send_keepalive(&mut self) -> Result<()> {
        self.record("keepalive".into()).await
    }

    async fn wait_for_event(&mut self, timeout: Duration) -> Result<Event> {
        self.record("wait".into()).await?;
        match self.events.pop_front() {
            Some(Scripted::Event(event)) => Ok(event),
            Some(Scripted::Timeout) => Err(BotError::Timeout(timeout)),
            Some(Scripted::Error(fail)) => Err(fail.error()),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.record("close".into()).await
    }
}

/// Lookup answering from a fixed table; unknown addresses are clean
#[derive(Default)]
pub struct StaticLookup {
    listings: HashMap<String, RblListing>,
    fail: bool,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, address: &str, listing: RblListing) -> Self {
        self.listings.insert(address.into(), listing);
        self
    }
}

#[async_trait]
impl BlacklistLookup for StaticLookup {
    async fn lookup(&self, address: &str) -> Result<RblListing> {
        if self.fail {
            return Err(BotError::Lookup("every blacklist query failed".into()));
        }
        Ok(self.listings.get(address).cloned().unwrap_or_default())
    }
}

/// Listing over `total` zones where the first `listed` report the address
pub fn listing(listed: usize, total: usize) -> RblListing {
    let mut listing: RblListing = (0..total)
        .map(|i| {
            let zone = format!("bl{i}.example.org");
            let entry = if i < listed {
                RblEntry::listed(zone.clone(), vec![std::net::Ipv4Addr::new(127, 0, 0, 2)])
            } else {
                RblEntry::clean(zone.clone())
            };
            (zone, entry)
        })
        .collect();
    listing.insert(SEARCH_HOST.into(), RblEntry::default());
    listing
}

pub fn actions(on_match: OnMatch, threshold: usize) -> ActionParams {
    ActionParams {
        ban_time: 3600,
        reason: "Listed on spam blacklists".into(),
        rbl_listed_number: threshold,
        on_match,
        repeat_window: 540,
    }
}

pub fn bot_config(on_match: OnMatch) -> BotConfig {
    let yaml = format!(
        "
TS3Server:
  serverIP: 127.0.0.1
  serverID: 1
  serverUsername: serveradmin
  serverPassword: secret
  botNick: RBLBot
  defaultChannel: 3
Logging:
  logLevel: debug
Actions:
  banTime: 3600
  reason: Listed on spam blacklists
  rblListedNumber: 2
  onMatch: {on_match}
"
    );
    BotConfig::from_yaml(&yaml).unwrap()
}

/// `notifycliententerview` for `clid`, with an optional group field
pub fn enter_event(clid: u32, groups: Option<&str>) -> Event {
    let clid = clid.to_string();
    let mut pairs = vec![("clid", clid.as_str()), ("client_nickname", "guest")];
    if let Some(groups) = groups {
        pairs.push(("client_servergroups", groups));
    }
    Event::new("notifycliententerview", vec![props(&pairs)])
}

fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
