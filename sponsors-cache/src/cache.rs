//! Session-scoped sponsor cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use sponsors_core::error::{Result, SponsorsError};
use sponsors_core::types::{SponsorInfo, UserId};

/// Slot for one connected user.
#[derive(Clone)]
struct Session {
    ticket: u64,
    sponsor: Option<SponsorInfo>,
}

/// Proof that a session was opened, handed to the fetch that fills it.
///
/// A ticket only matches the session it was issued for. Once that session is
/// closed, inserts carrying the ticket are dropped even if the same user has
/// reconnected in the meantime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTicket {
    user_id: UserId,
    id: u64,
}

impl SessionTicket {
    /// Returns the user this ticket belongs to.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Result of [`SponsorCache::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Record stored.
    Inserted,
    /// Record had no tier; nothing stored.
    NotSponsor,
    /// Session closed (or replaced) before the record arrived; nothing stored.
    Stale,
    /// Session already holds a record; the existing one is kept.
    Duplicate,
}

/// In-memory cache of sponsor records keyed by user.
///
/// Thread-safe. Lookups take a read lock; session changes and inserts take
/// the write lock for a single map operation.
pub struct SponsorCache {
    sessions: RwLock<HashMap<UserId, Session>>,
    next_ticket: AtomicU64,
}

impl SponsorCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Opens a session slot for a connecting user.
    ///
    /// A repeat connect for a session without a record gets a fresh ticket,
    /// which turns any fetch still holding the old one stale. Fails with
    /// [`SponsorsError::DuplicateSession`] if the session already holds a
    /// record; that record is kept.
    pub fn open_session(&self, user_id: UserId) -> Result<SessionTicket> {
        let mut sessions = self.sessions.write();
        if sessions.get(&user_id).is_some_and(|s| s.sponsor.is_some()) {
            return Err(SponsorsError::DuplicateSession(user_id));
        }

        let id = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        sessions.insert(user_id, Session { ticket: id, sponsor: None });
        Ok(SessionTicket { user_id, id })
    }

    /// Stores a fetched record for the session the ticket was issued for.
    pub fn insert(&self, ticket: SessionTicket, info: SponsorInfo) -> InsertOutcome {
        if !info.is_sponsor() {
            return InsertOutcome::NotSponsor;
        }

        let mut sessions = self.sessions.write();
        match sessions.get_mut(&ticket.user_id) {
            Some(session) if session.ticket == ticket.id => {
                if session.sponsor.is_some() {
                    return InsertOutcome::Duplicate;
                }
                session.sponsor = Some(info);
                InsertOutcome::Inserted
            }
            _ => InsertOutcome::Stale,
        }
    }

    /// Closes the user's session, returning the record it held.
    ///
    /// No-op for users without a session.
    pub fn close_session(&self, user_id: UserId) -> Option<SponsorInfo> {
        self.sessions.write().remove(&user_id).and_then(|s| s.sponsor)
    }

    /// Gets the cached record for a user.
    pub fn get(&self, user_id: UserId) -> Option<SponsorInfo> {
        self.sessions
            .read()
            .get(&user_id)
            .and_then(|s| s.sponsor.clone())
    }

    /// Returns a snapshot of every cached record.
    pub fn sponsors(&self) -> Vec<(UserId, SponsorInfo)> {
        self.sessions
            .read()
            .iter()
            .filter_map(|(id, s)| s.sponsor.clone().map(|info| (*id, info)))
            .collect()
    }

    /// Drops every session and record.
    pub fn clear(&self) {
        self.sessions.write().clear();
    }

    /// Returns the number of cached records.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .values()
            .filter(|s| s.sponsor.is_some())
            .count()
    }

    /// Returns true if no records are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let sessions = self.sessions.read();
        let sponsors = sessions.values().filter(|s| s.sponsor.is_some()).count();
        CacheStats {
            open_sessions: sessions.len(),
            cached_sponsors: sponsors,
        }
    }
}

impl Default for SponsorCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Connected users with a session slot
    pub open_sessions: usize,
    /// Sessions holding a sponsor record
    pub cached_sponsors: usize,
}
