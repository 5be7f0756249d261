//! Sponsors manager: ties connection events, the API, and the cache together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use sponsors_cache::{CacheStats, InsertOutcome, SessionTicket, SponsorCache};
use sponsors_client::SponsorsApiClient;
use sponsors_core::error::{Result, SponsorsError};
use sponsors_core::traits::SponsorSource;
use sponsors_core::types::{SponsorInfo, UserId};

use crate::config::{ApiUrlSetting, SponsorsConfig};
use crate::events::ConnectionEvent;

/// Per-session sponsor metadata, kept in sync with connection events.
///
/// Fetches run concurrently with everything else; connects and disconnects
/// are applied in the order they are delivered. A fetch that completes after
/// its session was closed is discarded.
pub struct SponsorsManager {
    cache: SponsorCache,
    source: Arc<dyn SponsorSource>,
    api_url: watch::Receiver<String>,
    initialized: AtomicBool,
}

impl SponsorsManager {
    /// Creates a manager fetching from `source`, following the given URL setting.
    pub fn new(source: impl SponsorSource + 'static, api_url: &ApiUrlSetting) -> Arc<Self> {
        Arc::new(Self {
            cache: SponsorCache::new(),
            source: Arc::new(source),
            api_url: api_url.subscribe(),
            initialized: AtomicBool::new(false),
        })
    }

    /// Creates a manager backed by the HTTP sponsors API.
    ///
    /// Returns the URL setting seeded from `config`; update it to reconfigure
    /// the manager at runtime.
    pub fn from_config(config: &SponsorsConfig) -> Result<(Arc<Self>, ApiUrlSetting)> {
        let client = SponsorsApiClient::with_config(config.client_config())?;
        let setting = ApiUrlSetting::new(config.api_url.clone());
        Ok((Self::new(client, &setting), setting))
    }

    /// Starts consuming connection events and URL changes.
    ///
    /// Connects spawn a fetch without waiting for it; disconnects are applied
    /// inline. The loop ends when the event sender is dropped.
    pub fn initialize(self: &Arc<Self>, events: mpsc::Receiver<ConnectionEvent>) -> Result<JoinHandle<()>> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(SponsorsError::AlreadyInitialized);
        }

        let mut api_url = self.api_url.clone();
        let enabled = !api_url.borrow_and_update().is_empty();
        info!(enabled, "Sponsors manager started");

        Ok(tokio::spawn(Arc::clone(self).run(events, api_url)))
    }

    async fn run(self: Arc<Self>, mut events: mpsc::Receiver<ConnectionEvent>, mut api_url: watch::Receiver<String>) {
        let mut watching = true;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(ConnectionEvent::Connecting(user_id)) => {
                        tokio::spawn(self.on_connecting(user_id));
                    }
                    Some(ConnectionEvent::Disconnected(user_id)) => self.on_disconnect(user_id),
                    None => break,
                },
                changed = api_url.changed(), if watching => match changed {
                    Ok(()) => {
                        let enabled = !api_url.borrow_and_update().is_empty();
                        info!(enabled, "Sponsors API URL changed");
                    }
                    // setting dropped; the last value stays in effect
                    Err(_) => watching = false,
                },
            }
        }

        debug!("Connection event stream closed");
    }

    /// Handles a connecting user.
    ///
    /// The session is registered before this returns. The returned future
    /// performs the fetch: await it to hold the connection until sponsor data
    /// is known, or spawn it to continue immediately. It never returns an
    /// error; a connect for a user whose record is already cached is logged,
    /// and in debug builds the returned future panics.
    pub fn on_connecting(self: &Arc<Self>, user_id: UserId) -> BoxFuture<'static, ()> {
        let base_url = self.api_url.borrow().clone();
        if base_url.is_empty() {
            debug!(%user_id, "Sponsors API URL not set, skipping fetch");
            return future::ready(()).boxed();
        }

        let ticket = match self.cache.open_session(user_id) {
            Ok(ticket) => ticket,
            Err(err) => {
                return async move {
                    error!(%user_id, error = %err, "Cached data was found on client connect, keeping it");
                    debug_assert!(
                        !matches!(err, SponsorsError::DuplicateSession(_)),
                        "Cached data was found on client connect for {user_id}"
                    );
                }
                .boxed();
            }
        };

        let this = Arc::clone(self);
        async move { this.load(ticket, &base_url).await }.boxed()
    }

    #[instrument(skip(self, ticket), fields(user_id = %ticket.user_id()))]
    async fn load(&self, ticket: SessionTicket, base_url: &str) {
        let user_id = ticket.user_id();

        let info = match self.source.fetch(base_url, user_id).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                debug!("User is not a sponsor");
                return;
            }
            Err(err) => {
                error!(error = %err, "Failed to get player sponsor info from API");
                return;
            }
        };

        match self.cache.insert(ticket, info) {
            InsertOutcome::Inserted => debug!("Cached sponsor info"),
            InsertOutcome::NotSponsor => debug!("Sponsor record has no tier"),
            InsertOutcome::Stale => debug!("Session closed before sponsor info arrived"),
            InsertOutcome::Duplicate => warn!("Sponsor info already cached for this session"),
        }
    }

    /// Handles a disconnected user. No-op if the user has no session.
    pub fn on_disconnect(&self, user_id: UserId) {
        if let Some(info) = self.cache.close_session(user_id) {
            debug!(%user_id, tier = ?info.tier, "Dropped cached sponsor info");
        }
    }

    /// Returns the cached sponsor record for a user, if any.
    pub fn lookup(&self, user_id: UserId) -> Option<SponsorInfo> {
        self.cache.get(user_id)
    }

    /// Returns every cached sponsor record.
    pub fn sponsors(&self) -> Vec<(UserId, SponsorInfo)> {
        self.cache.sponsors()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns the API URL currently in effect.
    pub fn api_url(&self) -> String {
        self.api_url.borrow().clone()
    }
}
