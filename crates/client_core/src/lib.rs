use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{UserId, UserRecord},
    protocol::{ListQuery, ListResult},
};
use storage::UserStore;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

pub mod list_view;
pub mod pagination;
pub mod subscription;

pub use list_view::{ListViewController, ListViewModel, ListViewSettings};
pub use pagination::{PagingChange, PaginationController};
pub use subscription::SubscriptionScope;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Backend seam for the user list. The in-memory store implements it; a network client can too.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list(&self, query: ListQuery) -> Result<ListResult>;
    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserRecord>>;
    async fn remove(&self, id: &UserId) -> Result<()>;
}

#[async_trait]
impl UsersApi for UserStore {
    async fn list(&self, query: ListQuery) -> Result<ListResult> {
        Ok(UserStore::list(self, &query).await)
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<UserRecord>> {
        Ok(UserStore::get_by_id(self, id).await)
    }

    async fn remove(&self, id: &UserId) -> Result<()> {
        UserStore::remove(self, id).await;
        Ok(())
    }
}

/// Last applied list result, the query that produced it, and the loading flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub result: ListResult,
    pub query: ListQuery,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    LoadingChanged(bool),
    FetchStarted {
        request_id: u64,
        query: ListQuery,
    },
    /// Terminal event of an applied fetch, successful or reset after failure.
    StateReplaced {
        request_id: u64,
        state: ListState,
    },
    FetchFailed {
        request_id: u64,
        reason: String,
    },
    /// Terminal event of a fetch that completed after a newer one was applied.
    FetchSuperseded {
        request_id: u64,
    },
    DeleteFailed {
        id: UserId,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("failed to delete user {id}: {source}")]
    Delete { id: UserId, source: anyhow::Error },
}

/// Page to re-fetch after deleting from a page that showed `items_on_page` rows.
pub fn page_after_delete(page_number: u32, items_on_page: usize) -> u32 {
    if items_on_page == 1 && page_number > 1 {
        page_number - 1
    } else {
        page_number
    }
}

struct OrchestratorState {
    list: ListState,
    in_flight: usize,
    next_request_id: u64,
    last_applied_request_id: u64,
    ongoing: Option<(u64, ListQuery)>,
}

pub struct UserListOrchestrator {
    api: Arc<dyn UsersApi>,
    inner: Mutex<OrchestratorState>,
    events: broadcast::Sender<ListEvent>,
}

impl UserListOrchestrator {
    pub fn new(api: Arc<dyn UsersApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            api,
            inner: Mutex::new(OrchestratorState {
                list: ListState::default(),
                in_flight: 0,
                next_request_id: 0,
                last_applied_request_id: 0,
                ongoing: None,
            }),
            events,
        })
    }

    pub fn state(&self) -> ListState {
        self.lock().list.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().list.loading
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub fn subscribe_stream(&self) -> BroadcastStream<ListEvent> {
        BroadcastStream::new(self.events.subscribe())
    }

    /// Fetches one page. Failures reset the state to empty defaults and yield `None`.
    pub async fn fetch(&self, query: ListQuery) -> Option<ListResult> {
        let request_id = {
            let mut inner = self.lock();
            inner.next_request_id += 1;
            let request_id = inner.next_request_id;
            inner.ongoing = Some((request_id, query.clone()));
            request_id
        };
        let guard = self.begin_loading(Some(request_id));
        let _ = self.events.send(ListEvent::FetchStarted {
            request_id,
            query: query.clone(),
        });
        info!(
            request_id,
            page = query.page_number,
            per_page = query.items_per_page.get(),
            search = query.search_text(),
            "fetching users"
        );

        let outcome = self.api.list(query.clone()).await;

        guard.release_with(|inner, events| {
            if inner.last_applied_request_id > request_id {
                debug!(
                    request_id,
                    applied = inner.last_applied_request_id,
                    "dropping superseded user list response"
                );
                let _ = events.send(ListEvent::FetchSuperseded { request_id });
                return outcome.ok();
            }
            inner.last_applied_request_id = request_id;

            match outcome {
                Ok(result) => {
                    info!(
                        request_id,
                        total = result.total_matching_count,
                        returned = result.items.len(),
                        "user list fetched"
                    );
                    inner.list.result = result.clone();
                    inner.list.query = query;
                    let _ = events.send(ListEvent::StateReplaced {
                        request_id,
                        state: inner.list.clone(),
                    });
                    Some(result)
                }
                Err(err) => {
                    warn!(request_id, error = %err, "user list fetch failed; showing empty list");
                    inner.list = ListState {
                        loading: inner.list.loading,
                        ..ListState::default()
                    };
                    let _ = events.send(ListEvent::FetchFailed {
                        request_id,
                        reason: err.to_string(),
                    });
                    let _ = events.send(ListEvent::StateReplaced {
                        request_id,
                        state: inner.list.clone(),
                    });
                    None
                }
            }
        })
    }

    /// Removes a user, then re-fetches the page being viewed, stepping back one page when the
    /// removed row was the only one on a page past the first. A failed removal skips the re-fetch.
    pub async fn delete_user(&self, id: &UserId) -> std::result::Result<(), OrchestratorError> {
        let guard = self.begin_loading(None);
        info!(user_id = %id, "deleting user");

        if let Err(source) = self.api.remove(id).await {
            warn!(user_id = %id, error = %source, "user delete failed; skipping re-fetch");
            guard.release_with(|_, events| {
                let _ = events.send(ListEvent::DeleteFailed {
                    id: id.clone(),
                    reason: source.to_string(),
                });
            });
            return Err(OrchestratorError::Delete {
                id: id.clone(),
                source,
            });
        }

        let query = self.query_after_delete();
        debug!(
            user_id = %id,
            page = query.page_number,
            per_page = query.items_per_page.get(),
            "re-fetching after delete"
        );
        self.fetch(query).await;
        drop(guard);
        Ok(())
    }

    pub async fn get_user(&self, id: &UserId) -> Result<Option<UserRecord>> {
        self.api.get_by_id(id).await
    }

    fn query_after_delete(&self) -> ListQuery {
        let inner = self.lock();
        let source = inner
            .ongoing
            .as_ref()
            .map(|(_, query)| query)
            .unwrap_or(&inner.list.query);
        ListQuery {
            page_number: page_after_delete(source.page_number, inner.list.result.items.len()),
            items_per_page: source.items_per_page,
            search: Some(source.search_text().to_string()),
        }
    }

    fn begin_loading(&self, request_id: Option<u64>) -> LoadingGuard<'_> {
        let mut inner = self.lock();
        inner.in_flight += 1;
        if inner.in_flight == 1 {
            inner.list.loading = true;
            let _ = self.events.send(ListEvent::LoadingChanged(true));
        }
        LoadingGuard {
            owner: self,
            request_id,
            released: false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds one unit of the in-flight count. Dropping it unfinished (a cancelled fetch) still
/// clears `loading` once nothing else is in flight.
struct LoadingGuard<'a> {
    owner: &'a UserListOrchestrator,
    request_id: Option<u64>,
    released: bool,
}

impl LoadingGuard<'_> {
    fn release_with<R>(
        mut self,
        apply: impl FnOnce(&mut OrchestratorState, &broadcast::Sender<ListEvent>) -> R,
    ) -> R {
        self.released = true;
        let mut inner = self.owner.lock();
        let idle = self.release_locked(&mut inner);
        let out = apply(&mut inner, &self.owner.events);
        if idle {
            let _ = self.owner.events.send(ListEvent::LoadingChanged(false));
        }
        out
    }

    fn release_locked(&self, inner: &mut OrchestratorState) -> bool {
        inner.in_flight = inner.in_flight.saturating_sub(1);
        if let Some(request_id) = self.request_id {
            if matches!(inner.ongoing, Some((ongoing, _)) if ongoing == request_id) {
                inner.ongoing = None;
            }
        }
        let idle = inner.in_flight == 0;
        if idle {
            inner.list.loading = false;
        }
        idle
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let mut inner = self.owner.lock();
        if let Some(request_id) = self.request_id {
            debug!(request_id, "user list fetch cancelled");
        }
        if self.release_locked(&mut inner) {
            let _ = self.owner.events.send(ListEvent::LoadingChanged(false));
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
