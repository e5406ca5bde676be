//! Read-only derivations over a list of sessions: display buckets and
//! text search. Pure functions; nothing here is cached or mutated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use lectern_core::entities::Session;
use lectern_core::enums::LifecycleState;

/// Display grouping of sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Today,
    Upcoming,
    Completed,
    All,
}

impl Bucket {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "upcoming" => Ok(Self::Upcoming),
            "completed" => Ok(Self::Completed),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown bucket '{other}' (expected today, upcoming, completed or all)"
            )),
        }
    }
}

/// Sessions partitioned into buckets. A session may sit in more than one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets<'a> {
    pub today: Vec<&'a Session>,
    pub upcoming: Vec<&'a Session>,
    pub completed: Vec<&'a Session>,
    pub all: Vec<&'a Session>,
}

impl<'a> Buckets<'a> {
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> &[&'a Session] {
        match bucket {
            Bucket::Today => &self.today,
            Bucket::Upcoming => &self.upcoming,
            Bucket::Completed => &self.completed,
            Bucket::All => &self.all,
        }
    }
}

/// Partition `sessions` relative to `now`.
///
/// - today: not cancelled, starting on `now`'s calendar date (in `now`'s
///   timezone), earliest first
/// - upcoming: scheduled and starting at or after `now`, earliest first
/// - completed: completed, most recent first
/// - all: every session, input order
#[must_use]
pub fn bucket<'a, Tz: TimeZone>(sessions: &'a [Session], now: &DateTime<Tz>) -> Buckets<'a> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut buckets = Buckets {
        all: sessions.iter().collect(),
        ..Buckets::default()
    };
    for session in sessions {
        let state = session.lifecycle_state;
        if state != LifecycleState::Cancelled
            && session.scheduled_start.with_timezone(&tz).date_naive() == today
        {
            buckets.today.push(session);
        }
        if state == LifecycleState::Scheduled && session.scheduled_start >= *now {
            buckets.upcoming.push(session);
        }
        if state == LifecycleState::Completed {
            buckets.completed.push(session);
        }
    }
    buckets.today.sort_by_key(|s| s.scheduled_start);
    buckets.upcoming.sort_by_key(|s| s.scheduled_start);
    buckets
        .completed
        .sort_by(|a, b| b.scheduled_start.cmp(&a.scheduled_start));
    buckets
}

/// Case-insensitive substring search over title, subject, description and
/// educator name. A blank term returns every session in input order.
#[must_use]
pub fn search<'a>(sessions: &'a [Session], term: &str) -> Vec<&'a Session> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return sessions.iter().collect();
    }
    sessions
        .iter()
        .filter(|session| {
            [
                Some(session.title.as_str()),
                session.subject.as_deref(),
                Some(session.description.as_str()),
                session.educator_name.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
