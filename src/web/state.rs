//! Application State
//!
//! Shared state accessible by all handlers: the backend provider and the
//! registry of live browser views.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::interval;
use uuid::Uuid;

use crate::backend::BackendProvider;
use crate::config::Config;
use crate::page::HomePage;
use crate::ui::DEFAULT_TIMESTAMP_FORMAT;

/// Identifier carried by the view cookie
pub type ViewId = Uuid;

/// One browser view and when it last handled an event
pub struct ViewSlot {
    pub page: HomePage,
    pub last_seen: Instant,
}

impl ViewSlot {
    pub fn new(page: HomePage) -> Self {
        Self {
            page,
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// Live views: ViewId → slot. Each slot's mutex serializes that view's events.
pub struct ViewRegistry {
    views: RwLock<HashMap<ViewId, Arc<Mutex<ViewSlot>>>>,
    /// Past this many views the least recently seen one makes room
    max_views: usize,
}

impl ViewRegistry {
    pub fn new(max_views: usize) -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
            max_views: max_views.max(1),
        }
    }

    pub async fn get(&self, id: &ViewId) -> Option<Arc<Mutex<ViewSlot>>> {
        self.views.read().await.get(id).cloned()
    }

    /// Register a view. An existing view under the same id wins.
    ///
    /// When full, the least recently seen idle view is dropped first.
    pub async fn insert(&self, id: ViewId, page: HomePage) -> Arc<Mutex<ViewSlot>> {
        let mut views = self.views.write().await;

        if !views.contains_key(&id) && views.len() >= self.max_views {
            let oldest = views
                .iter()
                .filter_map(|(view_id, slot)| {
                    slot.try_lock().ok().map(|slot| (*view_id, slot.last_seen))
                })
                .min_by_key(|(_, last_seen)| *last_seen)
                .map(|(view_id, _)| view_id);

            match oldest {
                Some(view_id) => {
                    views.remove(&view_id);
                    tracing::debug!(view = %view_id, "View limit reached, dropped oldest view");
                }
                None => tracing::warn!(
                    limit = self.max_views,
                    "View limit reached with every view busy"
                ),
            }
        }

        Arc::clone(
            views
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(ViewSlot::new(page)))),
        )
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.views.read().await.is_empty()
    }

    /// Drop views idle for at least `max_idle`. Busy views are skipped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut views = self.views.write().await;
        let before = views.len();

        views.retain(|_, slot| match slot.try_lock() {
            Ok(slot) => slot.last_seen.elapsed() < max_idle,
            Err(_) => true,
        });

        before - views.len()
    }
}

/// Web server configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// chrono strftime layout for handshake timestamps
    pub timestamp_format: String,
    pub view_idle_timeout: Duration,
    pub sweep_interval: Duration,
    pub max_views: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            view_idle_timeout: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(300),
            max_views: 10_000,
        }
    }
}

impl WebConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            timestamp_format: config.view.timestamp_format.clone(),
            view_idle_timeout: Duration::from_secs(config.server.view_idle_timeout_secs),
            sweep_interval: Duration::from_secs(config.server.sweep_interval_secs.max(1)),
            max_views: config.server.max_views,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared application state for all handlers
pub struct AppState {
    /// Live browser views
    pub views: ViewRegistry,
    /// Hands out a backend connection per new view
    pub provider: Arc<dyn BackendProvider>,
    pub config: Arc<WebConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(provider: Arc<dyn BackendProvider>, config: WebConfig) -> Self {
        Self {
            views: ViewRegistry::new(config.max_views),
            provider,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Periodically drop idle views
pub fn start_view_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    let sweep_interval = state.config.sweep_interval;
    let max_idle = state.config.view_idle_timeout;

    tokio::spawn(async move {
        let mut ticker = interval(sweep_interval);

        loop {
            ticker.tick().await;

            let evicted = state.views.evict_idle(max_idle).await;
            if evicted > 0 {
                let remaining = state.views.len().await;
                tracing::debug!(evicted, remaining, "Dropped idle views");
            }
        }
    })
}
