use std::{sync::Arc, time::Duration};

use shared::{
    domain::{UserId, UserRecord},
    protocol::{ListQuery, ListResult},
};
use tokio::sync::RwLock;
use tracing::debug;

/// Artificial delay applied to each store call to mimic a network round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLatency {
    pub list: Duration,
    pub lookup: Duration,
    pub remove: Duration,
}

impl Default for StoreLatency {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(700),
            lookup: Duration::from_millis(600),
            remove: Duration::from_millis(600),
        }
    }
}

impl StoreLatency {
    pub fn none() -> Self {
        Self {
            list: Duration::ZERO,
            lookup: Duration::ZERO,
            remove: Duration::ZERO,
        }
    }
}

/// In-memory user collection. Clones share the same records.
#[derive(Clone)]
pub struct UserStore {
    records: Arc<RwLock<Vec<UserRecord>>>,
    latency: StoreLatency,
}

impl UserStore {
    pub fn new(records: Vec<UserRecord>, latency: StoreLatency) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            latency,
        }
    }

    pub fn seeded(latency: StoreLatency) -> Self {
        Self::new(seed_users(), latency)
    }

    pub async fn list(&self, query: &ListQuery) -> ListResult {
        let result = {
            let records = self.records.read().await;
            select_page(&records, query)
        };
        debug!(
            page = query.page_number,
            per_page = query.items_per_page.get(),
            search = query.search_text(),
            total = result.total_matching_count,
            returned = result.items.len(),
            "store list"
        );
        delay(self.latency.list).await;
        result
    }

    pub async fn get_by_id(&self, id: &UserId) -> Option<UserRecord> {
        let found = {
            let records = self.records.read().await;
            records.iter().find(|record| &record.id == id).cloned()
        };
        delay(self.latency.lookup).await;
        found
    }

    /// Removes the record with `id`. Returns `false` when nothing matched.
    pub async fn remove(&self, id: &UserId) -> bool {
        let removed = {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|record| &record.id != id);
            records.len() != before
        };
        debug!(user_id = %id, removed, "store remove");
        delay(self.latency.remove).await;
        removed
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Case-insensitive substring filter on display name, then a page slice of the matches.
pub fn select_page(records: &[UserRecord], query: &ListQuery) -> ListResult {
    let needle = query.search_text().to_lowercase();
    let matched: Vec<&UserRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || record.display_name.to_lowercase().contains(&needle))
        .collect();

    let items = matched
        .iter()
        .skip(query.offset())
        .take(query.items_per_page.get() as usize)
        .map(|record| (*record).clone())
        .collect();

    ListResult {
        total_matching_count: matched.len(),
        items,
    }
}

pub fn seed_users() -> Vec<UserRecord> {
    [
        ("u1", "Ivan Z.", true),
        ("u2", "Mikhail X.", true),
        ("u3", "Ivan C.", true),
        ("u4", "Petr V.", true),
        ("u5", "Artyom B.", true),
        ("u6", "Gleb N.", true),
        ("u7", "Anton M.", true),
        ("u8", "Semyon A.", true),
        ("u9", "Arseniy S.", true),
        ("u10", "Nick D.", true),
        ("u11", "Alex F.", true),
        ("u12", "Kirill G.", false),
        ("u13", "Stas H.", true),
        ("u14", "Yuriy J.", true),
        ("u15", "Roman K.", true),
        ("u16", "Ivan L.", true),
        ("u17", "Ivan Q.", true),
    ]
    .into_iter()
    .map(|(id, name, active)| UserRecord::new(id, name, active))
    .collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
