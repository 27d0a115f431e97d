//! Page-level coordination: search debounce, view mode, paging and delete intents.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use shared::{
    domain::{ItemsPerPage, UserId, UserRecord, ViewKind},
    protocol::ListQuery,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    pagination::{PagingChange, PaginationController},
    subscription::SubscriptionScope,
    ListEvent, OrchestratorError, UserListOrchestrator,
};

const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListViewSettings {
    pub search_debounce: Duration,
}

impl Default for ListViewSettings {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

/// Everything the presentation layer needs to draw the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListViewModel {
    pub users: Vec<UserRecord>,
    pub total: usize,
    pub view_kind: ViewKind,
    pub search_text: String,
    pub pagination: PaginationController,
    pub loading: bool,
}

pub struct ListViewController {
    orchestrator: Arc<UserListOrchestrator>,
    settings: ListViewSettings,
    model: Arc<watch::Sender<ListViewModel>>,
    scope: Arc<SubscriptionScope>,
    pending_search: Mutex<Option<JoinHandle<()>>>,
}

impl ListViewController {
    pub fn new(orchestrator: Arc<UserListOrchestrator>, settings: ListViewSettings) -> Self {
        let (model, _) = watch::channel(ListViewModel::default());
        Self {
            orchestrator,
            settings,
            model: Arc::new(model),
            scope: Arc::new(SubscriptionScope::new()),
            pending_search: Mutex::new(None),
        }
    }

    /// Binds the view to the orchestrator's state stream and loads the first page.
    pub async fn start(&self) {
        let current = self.orchestrator.state();
        self.model.send_modify(|model| apply_state(model, &current));

        let model = Arc::clone(&self.model);
        self.scope
            .listen(self.orchestrator.subscribe(), move |event| match event {
                ListEvent::StateReplaced { state, .. } => {
                    model.send_modify(|model| apply_state(model, &state));
                }
                ListEvent::LoadingChanged(loading) => {
                    model.send_modify(|model| model.loading = loading);
                }
                _ => {}
            });

        self.orchestrator.fetch(ListQuery::default()).await;
    }

    pub fn model(&self) -> ListViewModel {
        self.model.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<ListViewModel> {
        self.model.subscribe()
    }

    /// Records the new search text and restarts the quiet-period timer. Only the trigger is
    /// replaced; a fetch the previous timer already started keeps running.
    pub fn search_changed(&self, text: impl Into<String>) {
        let text = text.into();
        // Held across the text update and the timer swap so both follow the same keystroke.
        let mut pending = self
            .pending_search
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.model
            .send_modify(|model| model.search_text = text.clone());

        let orchestrator = Arc::clone(&self.orchestrator);
        let model = Arc::clone(&self.model);
        let scope = Arc::clone(&self.scope);
        let debounce = self.settings.search_debounce;
        let trigger = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let items_per_page = model.borrow().pagination.items_per_page();
            debug!(search = %text, "search input settled");
            let query = ListQuery::first_page(items_per_page, text);
            scope.spawn(async move {
                orchestrator.fetch(query).await;
            });
        });

        if let Some(previous) = pending.replace(trigger) {
            previous.abort();
        }
    }

    pub fn view_kind_changed(&self, view_kind: ViewKind) {
        debug!(?view_kind, "view kind changed");
        self.model.send_modify(|model| model.view_kind = view_kind);
    }

    pub async fn page_clicked(&self, page_number: u32) {
        let mut change = None;
        self.model
            .send_modify(|model| change = model.pagination.select_page(page_number));
        if let Some(change) = change {
            self.paging_changed(change).await;
        }
    }

    pub async fn items_per_page_selected(&self, items_per_page: ItemsPerPage) {
        let mut change = None;
        self.model.send_modify(|model| {
            change = model.pagination.select_items_per_page(items_per_page);
        });
        if let Some(change) = change {
            self.paging_changed(change).await;
        }
    }

    /// Fetches immediately with the current search text.
    pub async fn paging_changed(&self, change: PagingChange) {
        let search = self.model.borrow().search_text.clone();
        info!(
            page = change.page_number,
            per_page = change.items_per_page.get(),
            "paging changed"
        );
        self.orchestrator
            .fetch(ListQuery {
                page_number: change.page_number,
                items_per_page: change.items_per_page,
                search: Some(search),
            })
            .await;
    }

    pub async fn delete_requested(&self, id: &UserId) -> Result<(), OrchestratorError> {
        self.orchestrator.delete_user(id).await
    }

    pub async fn user_details(&self, id: &UserId) -> anyhow::Result<Option<UserRecord>> {
        self.orchestrator.get_user(id).await
    }

    /// Cancels the pending search trigger and every task the view owns.
    pub fn teardown(&self) {
        if let Some(pending) = self
            .pending_search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pending.abort();
        }
        self.scope.release();
    }

    pub fn is_torn_down(&self) -> bool {
        self.scope.is_released()
    }
}

impl Drop for ListViewController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn apply_state(model: &mut ListViewModel, state: &crate::ListState) {
    model.users = state.result.items.clone();
    model.total = state.result.total_matching_count;
    model.loading = state.loading;
    model
        .pagination
        .sync(&state.query, state.result.total_matching_count);
}

#[cfg(test)]
#[path = "tests/list_view_tests.rs"]
mod tests;
