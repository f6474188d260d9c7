//! Per-view session state
//!
//! Everything the page shows between requests lives in one
//! [`InventorySession`]: the snapshot, the loading flag, the form inputs,
//! the selected language and a pending notice. Operations receive a
//! [`SessionHandle`] instead of reaching into globals.
//!
//! Each page visitor gets their own session from the [`SessionRegistry`],
//! keyed by a random id the web layer keeps in a cookie.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::language::Language;
use crate::models::InventorySnapshot;

/// Values currently typed into the page's inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub new_item: String,
    pub order_item_id: String,
    pub order_quantity: i64,
}

/// Message the user has to acknowledge (shown as a blocking alert)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ItemAlreadyExists,
}

impl Notice {
    pub fn message(&self, language: Language) -> &'static str {
        match self {
            Notice::ItemAlreadyExists => language.labels().already_exists,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventorySession {
    pub snapshot: InventorySnapshot,
    pub loading: bool,
    pub language: Language,
    pub form: FormState,
    pub notice: Option<Notice>,
}

impl InventorySession {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Notices are shown once
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

/// Shared handle to a session.
///
/// The lock is only taken inside [`SessionHandle::with`], so it can never be
/// held across a network call. Concurrent operations therefore interleave and
/// the last fetch to complete decides the snapshot.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<Mutex<InventorySession>>);

impl SessionHandle {
    pub fn new(session: InventorySession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut InventorySession) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        self.with(|session| session.snapshot.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.with(|session| session.loading)
    }
}

/// Upper bound on live visitor sessions
pub const MAX_SESSIONS: usize = 1024;

#[derive(Default)]
struct Sessions {
    by_id: HashMap<String, SessionHandle>,
    // Creation order, oldest first
    order: VecDeque<String>,
}

/// Bounded map of visitor sessions.
///
/// When full, creating a session evicts the oldest one. A visitor whose
/// session was evicted simply starts a fresh one.
pub struct SessionRegistry {
    sessions: Mutex<Sessions>,
    capacity: usize,
    language: Language,
}

impl SessionRegistry {
    /// New sessions start in `language`
    pub fn new(language: Language, capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            capacity: capacity.max(1),
            language,
        }
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.by_id.get(id).cloned()
    }

    /// Start a session under a fresh random id
    pub fn create(&self) -> (String, SessionHandle) {
        let id = Uuid::new_v4().to_string();
        let handle = SessionHandle::new(InventorySession::new(self.language));

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        while sessions.by_id.len() >= self.capacity {
            match sessions.order.pop_front() {
                Some(oldest) => {
                    sessions.by_id.remove(&oldest);
                    log::debug!("Evicted session {}", oldest);
                }
                None => break,
            }
        }
        sessions.by_id.insert(id.clone(), handle.clone());
        sessions.order.push_back(id.clone());

        (id, handle)
    }

    pub fn len(&self) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_notice_clears() {
        let mut session = InventorySession::new(Language::Dutch);
        session.notice = Some(Notice::ItemAlreadyExists);

        assert_eq!(session.take_notice(), Some(Notice::ItemAlreadyExists));
        assert_eq!(session.take_notice(), None);
    }

    #[test]
    fn test_notice_message_is_localized() {
        assert_eq!(
            Notice::ItemAlreadyExists.message(Language::English),
            "Item already exists!"
        );
        assert_eq!(
            Notice::ItemAlreadyExists.message(Language::Dutch),
            "Item bestaat al!"
        );
    }

    #[test]
    fn test_handle_clones_share_state() {
        let handle = SessionHandle::new(InventorySession::new(Language::English));
        let other = handle.clone();

        other.with(|session| session.form.new_item = "Cola".to_string());

        assert_eq!(handle.with(|s| s.form.new_item.clone()), "Cola");
    }

    #[test]
    fn test_registry_creates_independent_sessions() {
        let registry = SessionRegistry::new(Language::Spanish, MAX_SESSIONS);
        let (first_id, first) = registry.create();
        let (second_id, second) = registry.create();

        assert_ne!(first_id, second_id);
        first.with(|s| s.form.new_item = "Cola".to_string());

        assert!(second.with(|s| s.form.new_item.is_empty()));
        assert_eq!(second.with(|s| s.language), Language::Spanish);
        let found = registry.get(&first_id).unwrap();
        assert_eq!(found.with(|s| s.form.new_item.clone()), "Cola");
    }

    #[test]
    fn test_registry_unknown_id_is_none() {
        let registry = SessionRegistry::new(Language::English, MAX_SESSIONS);
        registry.create();

        assert!(registry.get("not-a-session").is_none());
    }

    #[test]
    fn test_registry_evicts_oldest_when_full() {
        let registry = SessionRegistry::new(Language::English, 2);
        let (oldest, _) = registry.create();
        let (middle, _) = registry.create();
        let (newest, _) = registry.create();

        assert_eq!(registry.len(), 2);
        assert!(registry.get(&oldest).is_none());
        assert!(registry.get(&middle).is_some());
        assert!(registry.get(&newest).is_some());
    }
}
