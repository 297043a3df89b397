//! Open screen registry.
//!
//! Each visitor that opens a listing gets a [`Screen`] keyed by a random id.
//! The screen lives until the visitor leaves (`DELETE /screens/{id}`).

use std::sync::Arc;
use std::time::{Duration, Instant};

use campus_engine::{AccessContext, EntityKind, Record, Screen};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A registered screen and the caller that opened it.
#[derive(Debug)]
pub struct ScreenEntry {
    pub id: String,
    pub owner: AccessContext,
    pub screen: Screen,
    last_touched: Instant,
}

impl ScreenEntry {
    /// Time since the owner last interacted with the screen.
    pub fn idle_for(&self) -> Duration {
        self.last_touched.elapsed()
    }
}

/// Tracks open screens.
///
/// Thread-safe and can be shared across handlers via `Arc`.
#[derive(Debug, Default)]
pub struct ScreenManager {
    /// All open screens, keyed by screen ID.
    screens: DashMap<String, ScreenEntry>,
    /// Index of screen IDs by entity for collection refreshes.
    by_entity: DashMap<EntityKind, Vec<String>>,
}

impl ScreenManager {
    /// Create a new screen manager.
    pub fn new() -> Self {
        Self {
            screens: DashMap::new(),
            by_entity: DashMap::new(),
        }
    }

    /// Create a new screen manager wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register an open screen. Returns the screen ID.
    pub fn register(&self, owner: AccessContext, screen: Screen) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let entity = screen.entity();
        let role = owner.role;

        self.screens.insert(
            id.clone(),
            ScreenEntry {
                id: id.clone(),
                owner,
                screen,
                last_touched: Instant::now(),
            },
        );
        self.by_entity.entry(entity).or_default().push(id.clone());

        tracing::info!(screen_id = %id, %entity, %role, "Screen opened");

        id
    }

    /// Discard a screen. Returns whether it existed.
    pub fn unregister(&self, id: &str) -> bool {
        let Some((_, entry)) = self.screens.remove(id) else {
            return false;
        };

        let entity = entry.screen.entity();
        self.forget(entity, id);

        tracing::info!(screen_id = %id, %entity, "Screen closed");
        true
    }

    /// Drop `id` from the entity index.
    fn forget(&self, entity: EntityKind, id: &str) {
        if let Some(mut ids) = self.by_entity.get_mut(&entity) {
            ids.retain(|other| other != id);
        }
        // Checked under the shard lock, so a concurrent register is never lost.
        self.by_entity.remove_if(&entity, |_, ids| ids.is_empty());
    }

    /// Run `f` against a screen and mark it as used. `None` when the screen is not open.
    ///
    /// The entry is locked for the duration of `f`; never await inside it.
    pub fn with_screen<R>(&self, id: &str, f: impl FnOnce(&mut ScreenEntry) -> R) -> Option<R> {
        self.screens.get_mut(id).map(|mut entry| {
            entry.last_touched = Instant::now();
            f(entry.value_mut())
        })
    }

    /// Entity and owner of an open screen.
    pub fn describe(&self, id: &str) -> Option<(EntityKind, AccessContext)> {
        self.screens
            .get(id)
            .map(|entry| (entry.screen.entity(), entry.owner.clone()))
    }

    /// Distinct owners of the open screens for `entity`.
    pub fn owners_for(&self, entity: EntityKind) -> Vec<AccessContext> {
        let mut owners: Vec<AccessContext> = Vec::new();
        for id in self.ids_for(entity) {
            if let Some(entry) = self.screens.get(&id) {
                if !owners.contains(&entry.owner) {
                    owners.push(entry.owner.clone());
                }
            }
        }
        owners
    }

    /// Replace the collection of every open screen for `entity` opened by `owner`.
    ///
    /// Returns the number of screens updated.
    pub fn replace_collection_for(
        &self,
        entity: EntityKind,
        owner: &AccessContext,
        records: &[Record],
    ) -> usize {
        let mut updated = 0;
        for id in self.ids_for(entity) {
            if let Some(mut entry) = self.screens.get_mut(&id) {
                if entry.owner == *owner {
                    entry.screen.replace_collection(records.to_vec());
                    updated += 1;
                }
            }
        }

        tracing::debug!(
            %entity,
            role = %owner.role,
            screens = updated,
            "Refreshed open screens"
        );

        updated
    }

    fn ids_for(&self, entity: EntityKind) -> Vec<String> {
        self.by_entity
            .get(&entity)
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }

    /// Whether any screen for `entity` is open.
    pub fn has_screens_for(&self, entity: EntityKind) -> bool {
        self.by_entity.contains_key(&entity)
    }

    /// Discard screens idle for at least `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let stale: Vec<String> = self
            .screens
            .iter()
            .filter(|entry| entry.idle_for() >= max_idle)
            .map(|entry| entry.key().clone())
            .collect();

        let mut evicted = 0;
        for id in stale {
            // Re-check: the owner may have come back since the scan.
            if let Some((_, entry)) = self
                .screens
                .remove_if(&id, |_, entry| entry.idle_for() >= max_idle)
            {
                self.forget(entry.screen.entity(), &id);
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::info!(evicted, remaining = self.screen_count(), "Evicted idle screens");
        }
        evicted
    }

    /// Periodically evict screens idle for `max_idle`.
    pub fn spawn_idle_sweep(self: &Arc<Self>, max_idle: Duration) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let period = (max_idle / 2).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                manager.evict_idle(max_idle);
            }
        })
    }

    /// Get the number of open screens.
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_engine::Role;
    use serde_json::json;

    fn screen(entity: EntityKind) -> Screen {
        Screen::new(entity, 5).unwrap()
    }

    fn owner(role: Role, token: &str) -> AccessContext {
        AccessContext::new(role, Some(token.to_string()))
    }

    #[test]
    fn test_register_unregister() {
        let manager = ScreenManager::new();
        let admin = owner(Role::Administrator, "a");

        let id = manager.register(admin.clone(), screen(EntityKind::Students));
        assert_eq!(manager.screen_count(), 1);
        assert!(manager.has_screens_for(EntityKind::Students));
        assert_eq!(manager.describe(&id), Some((EntityKind::Students, admin)));

        assert!(manager.unregister(&id));
        assert!(!manager.unregister(&id));
        assert_eq!(manager.screen_count(), 0);
        assert!(!manager.has_screens_for(EntityKind::Students));
    }

    #[test]
    fn test_unregister_keeps_other_screens_indexed() {
        let manager = ScreenManager::new();
        let teacher = owner(Role::Teacher, "t");
        let first = manager.register(teacher.clone(), screen(EntityKind::Students));
        manager.unregister(&first);
        let second = manager.register(teacher.clone(), screen(EntityKind::Students));

        assert!(manager.has_screens_for(EntityKind::Students));
        let records = vec![Record::new(json!({"id": 1}))];
        let updated = manager.replace_collection_for(EntityKind::Students, &teacher, &records);
        assert_eq!(updated, 1);
        assert_eq!(manager.with_screen(&second, |e| e.screen.records().len()), Some(1));
    }

    #[test]
    fn test_with_screen_mutates_in_place() {
        let manager = ScreenManager::new();
        let id = manager.register(owner(Role::Teacher, "t"), screen(EntityKind::Students));

        manager.with_screen(&id, |entry| entry.screen.set_search("ana"));
        let search = manager.with_screen(&id, |entry| entry.screen.state().search.clone());
        assert_eq!(search.as_deref(), Some("ana"));

        assert!(manager.with_screen("missing", |_| ()).is_none());
    }

    #[test]
    fn test_replace_collection_only_touches_owner_and_entity() {
        let manager = ScreenManager::new();
        let admin = owner(Role::Administrator, "a");
        let teacher = owner(Role::Teacher, "t");
        let a = manager.register(admin.clone(), screen(EntityKind::Subjects));
        let b = manager.register(admin.clone(), screen(EntityKind::Subjects));
        let other_owner = manager.register(teacher.clone(), screen(EntityKind::Subjects));
        let other_entity = manager.register(admin.clone(), screen(EntityKind::Students));

        assert_eq!(manager.owners_for(EntityKind::Subjects), vec![admin.clone(), teacher]);

        let records = vec![Record::new(json!({"nrc": "10001"}))];
        assert_eq!(manager.replace_collection_for(EntityKind::Subjects, &admin, &records), 2);

        for id in [&a, &b] {
            let count = manager.with_screen(id, |e| e.screen.records().len());
            assert_eq!(count, Some(1));
        }
        for id in [&other_owner, &other_entity] {
            let count = manager.with_screen(id, |e| e.screen.records().len());
            assert_eq!(count, Some(0));
        }
    }

    #[test]
    fn test_evict_idle_screens() {
        let manager = ScreenManager::new();
        let stale = manager.register(owner(Role::Teacher, "t"), screen(EntityKind::Students));
        let active = manager.register(owner(Role::Teacher, "t"), screen(EntityKind::Students));

        std::thread::sleep(Duration::from_millis(60));
        manager.with_screen(&active, |_| ());

        assert_eq!(manager.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(manager.evict_idle(Duration::from_millis(40)), 1);

        assert!(manager.describe(&stale).is_none());
        assert!(manager.describe(&active).is_some());
        assert!(manager.has_screens_for(EntityKind::Students));

        assert_eq!(manager.evict_idle(Duration::ZERO), 1);
        assert_eq!(manager.screen_count(), 0);
        assert!(!manager.has_screens_for(EntityKind::Students));
    }
}
