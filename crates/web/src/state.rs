use std::sync::Arc;

use catalog::CatalogClient;
use storage::{Store, services::recency::RecencyWindow};
use tokio::sync::{Mutex, RwLock};

use crate::middleware::auth::Moderators;
use crate::session::SessionVerifier;

/// Everything a handler can reach, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub catalog: Arc<CatalogClient>,
    pub moderators: Moderators,
    pub recents: Arc<RwLock<RecencyWindow>>,
    /// Held for a whole rebuild so windows are swapped in snapshot order
    pub rebuild_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        sessions: Arc<dyn SessionVerifier>,
        catalog: Arc<CatalogClient>,
        moderators: Moderators,
        recents_size: usize,
        recents_buffer: usize,
    ) -> Self {
        Self {
            store,
            sessions,
            catalog,
            moderators,
            recents: Arc::new(RwLock::new(RecencyWindow::empty(recents_size, recents_buffer))),
            rebuild_guard: Arc::new(Mutex::new(())),
        }
    }
}
