//! Per-user favorites with change subscriptions.
//!
//! Every call takes an explicit [`UserContext`]; the store holds no notion of
//! a "current" user. Subscribers register a callback for one user and are
//! notified with the new count whenever that user's set changes.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::catalog::RecordSource;
use crate::deals::{DealId, DealRecord};

/// Identity handed over by the external auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a non-blank identifier. Returns `None` for blank input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used where the full id should not be exposed.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit per-call session context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: UserId,
}

impl UserContext {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Added,
    Removed,
}

/// Notification delivered to a user's subscribers after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesChanged {
    pub user_id: UserId,
    pub count: usize,
}

pub type FavoritesCallback = Arc<dyn Fn(&FavoritesChanged) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait FavoritesStore: Send + Sync {
    fn is_favorited(&self, ctx: &UserContext, id: DealId) -> bool;

    /// Adds `id` if absent, removes it if present.
    fn toggle(&self, ctx: &UserContext, id: DealId) -> ToggleAction;

    /// Removes every listed id; returns how many were actually removed.
    fn remove_many(&self, ctx: &UserContext, ids: &[DealId]) -> usize;

    /// Favorited ids in the order they were added.
    fn list(&self, ctx: &UserContext) -> Vec<DealId>;

    fn count(&self, ctx: &UserContext) -> usize;

    fn subscribe(&self, ctx: &UserContext, callback: FavoritesCallback) -> SubscriptionId;

    /// Returns `false` if the subscription was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

struct Subscriber {
    id: SubscriptionId,
    user_id: UserId,
    callback: FavoritesCallback,
}

#[derive(Default)]
struct Inner {
    by_user: HashMap<UserId, Vec<DealId>>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl Inner {
    fn listeners_for(&self, user_id: &UserId) -> Vec<FavoritesCallback> {
        self.subscribers
            .iter()
            .filter(|s| &s.user_id == user_id)
            .map(|s| Arc::clone(&s.callback))
            .collect()
    }
}

/// Process-local favorites store.
#[derive(Default)]
pub struct InMemoryFavorites {
    inner: RwLock<Inner>,
}

impl std::fmt::Debug for InMemoryFavorites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("InMemoryFavorites")
            .field("users", &inner.by_user.len())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl InMemoryFavorites {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `mutate` to the user's list and notifies that user's
    /// subscribers if it reports a change. Callbacks run after the lock is
    /// released so they may call back into the store.
    fn mutate<T>(
        &self,
        ctx: &UserContext,
        mutate: impl FnOnce(&mut Vec<DealId>) -> (T, bool),
    ) -> T {
        let (result, event, listeners) = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            let list = inner.by_user.entry(ctx.user_id.clone()).or_default();
            let (result, changed) = mutate(list);
            let count = list.len();
            if list.is_empty() {
                inner.by_user.remove(&ctx.user_id);
            }
            if !changed {
                return result;
            }
            let event = FavoritesChanged {
                user_id: ctx.user_id.clone(),
                count,
            };
            (result, event, inner.listeners_for(&ctx.user_id))
        };

        tracing::debug!(
            user_id = %event.user_id,
            count = event.count,
            listeners = listeners.len(),
            "favorites changed"
        );
        for listener in &listeners {
            listener(&event);
        }
        result
    }
}

impl FavoritesStore for InMemoryFavorites {
    fn is_favorited(&self, ctx: &UserContext, id: DealId) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .by_user
            .get(&ctx.user_id)
            .is_some_and(|ids| ids.contains(&id))
    }

    fn toggle(&self, ctx: &UserContext, id: DealId) -> ToggleAction {
        self.mutate(ctx, |ids| {
            if let Some(pos) = ids.iter().position(|&existing| existing == id) {
                ids.remove(pos);
                (ToggleAction::Removed, true)
            } else {
                ids.push(id);
                (ToggleAction::Added, true)
            }
        })
    }

    fn remove_many(&self, ctx: &UserContext, ids: &[DealId]) -> usize {
        self.mutate(ctx, |favorites| {
            let before = favorites.len();
            favorites.retain(|id| !ids.contains(id));
            let removed = before - favorites.len();
            (removed, removed > 0)
        })
    }

    fn list(&self, ctx: &UserContext) -> Vec<DealId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_user.get(&ctx.user_id).cloned().unwrap_or_default()
    }

    fn count(&self, ctx: &UserContext) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_user.get(&ctx.user_id).map_or(0, Vec::len)
    }

    fn subscribe(&self, ctx: &UserContext, callback: FavoritesCallback) -> SubscriptionId {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        inner.subscribers.push(Subscriber {
            id,
            user_id: ctx.user_id.clone(),
            callback,
        });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = inner.subscribers.len();
        inner.subscribers.retain(|s| s.id != id);
        inner.subscribers.len() != before
    }
}

/// Records for the user's favorites, in the order they were favorited.
/// Favorites whose record no longer exists in `source` are skipped.
pub fn favorite_records<F, S>(store: &F, source: &S, ctx: &UserContext) -> Vec<DealRecord>
where
    F: FavoritesStore + ?Sized,
    S: RecordSource + ?Sized,
{
    let ids = store.list(ctx);
    source.by_ids(&ids, ids.len())
}

/// Badge text for a favorites count: nothing for zero, capped at `99+`.
#[must_use]
pub fn badge_label(count: usize) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    fn ctx(id: &str) -> UserContext {
        UserContext::new(UserId::new(id).unwrap())
    }

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("   ").is_none());
        assert_eq!(UserId::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn user_id_short_takes_eight_chars() {
        let id = UserId::new("3f2a9c1e-77b0-4d4e-9a51-0c5d2e8f1b3a").unwrap();
        assert_eq!(id.short(), "3f2a9c1e");
        assert_eq!(UserId::new("abc").unwrap().short(), "abc");
    }

    #[test]
    fn toggle_adds_then_removes() {
        let store = InMemoryFavorites::new();
        let alice = ctx("alice");

        assert_eq!(store.toggle(&alice, DealId(1)), ToggleAction::Added);
        assert!(store.is_favorited(&alice, DealId(1)));
        assert_eq!(store.count(&alice), 1);

        assert_eq!(store.toggle(&alice, DealId(1)), ToggleAction::Removed);
        assert!(!store.is_favorited(&alice, DealId(1)));
        assert_eq!(store.count(&alice), 0);
    }

    #[test]
    fn favorites_are_isolated_per_user() {
        let store = InMemoryFavorites::new();
        store.toggle(&ctx("alice"), DealId(1));
        assert!(!store.is_favorited(&ctx("bob"), DealId(1)));
        assert!(store.list(&ctx("bob")).is_empty());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let store = InMemoryFavorites::new();
        let alice = ctx("alice");
        for id in [5, 2, 9] {
            store.toggle(&alice, DealId(id));
        }
        assert_eq!(store.list(&alice), vec![DealId(5), DealId(2), DealId(9)]);
    }

    #[test]
    fn remove_many_reports_removed_count() {
        let store = InMemoryFavorites::new();
        let alice = ctx("alice");
        for id in [1, 2, 3] {
            store.toggle(&alice, DealId(id));
        }
        assert_eq!(store.remove_many(&alice, &[DealId(1), DealId(3), DealId(42)]), 2);
        assert_eq!(store.list(&alice), vec![DealId(2)]);
    }

    #[test]
    fn subscribers_receive_counts_for_their_user_only() {
        let store = InMemoryFavorites::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(
            &ctx("alice"),
            Arc::new(move |event: &FavoritesChanged| {
                sink.lock().unwrap().push(event.count);
            }),
        );

        store.toggle(&ctx("alice"), DealId(1));
        store.toggle(&ctx("bob"), DealId(1));
        store.toggle(&ctx("alice"), DealId(2));
        store.toggle(&ctx("alice"), DealId(1));

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn no_notification_when_nothing_changes() {
        let store = InMemoryFavorites::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(
            &ctx("alice"),
            Arc::new(move |_: &FavoritesChanged| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(store.remove_many(&ctx("alice"), &[DealId(7)]), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = InMemoryFavorites::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = store.subscribe(
            &ctx("alice"),
            Arc::new(move |_: &FavoritesChanged| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.toggle(&ctx("alice"), DealId(1));
        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.toggle(&ctx("alice"), DealId(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_read_store() {
        let store = Arc::new(InMemoryFavorites::new());
        let observed = Arc::new(AtomicUsize::new(0));
        let (reader, sink) = (Arc::clone(&store), Arc::clone(&observed));
        store.subscribe(
            &ctx("alice"),
            Arc::new(move |event: &FavoritesChanged| {
                let alice = UserContext::new(event.user_id.clone());
                sink.store(reader.count(&alice), Ordering::SeqCst);
            }),
        );

        store.toggle(&ctx("alice"), DealId(3));
        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn badge_label_caps_at_ninety_nine() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(7).as_deref(), Some("7"));
        assert_eq!(badge_label(99).as_deref(), Some("99"));
        assert_eq!(badge_label(100).as_deref(), Some("99+"));
    }
}
