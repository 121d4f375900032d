//! In-memory wizard sessions.
//!
//! A session pins the contact snapshot the wizard was opened with, so tag
//! math stays stable while the user works even if the CRM changes
//! underneath. Sessions are ephemeral — dropped on process exit, never
//! persisted.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use super::filter::{FilterType, TagFilter};
use crate::types::Contact;

pub struct WizardSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    contacts: BTreeMap<u64, Contact>,
    filter: TagFilter,
}

/// Serializable snapshot of a session for the wizard UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub selected_tags: Vec<String>,
    pub filter_type: FilterType,
    pub selected_contact_ids: Vec<u64>,
    pub manually_deselected_ids: Vec<u64>,
    /// Raw match count under the current tags and rule.
    pub matched_count: usize,
    /// What the UI shows: matches minus manual overrides.
    pub selected_count: usize,
    pub contact_count: usize,
}

impl WizardSession {
    pub fn new(contacts: Vec<Contact>) -> Self {
        let filter = TagFilter::new(&contacts);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            contacts: contacts.into_iter().map(|c| (c.id, c)).collect(),
            filter,
        }
    }

    pub fn add_tag(&mut self, tag: &str) {
        self.filter.add_tag(tag);
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.filter.remove_tag(tag);
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter.set_filter_type(filter_type);
    }

    /// Toggle one contact. Errors if the id isn't part of the snapshot.
    pub fn toggle_contact(&mut self, id: u64) -> Result<(), UnknownContact> {
        if !self.contacts.contains_key(&id) {
            return Err(UnknownContact(id));
        }
        self.filter.toggle_contact(id);
        Ok(())
    }

    /// The final recipient list, ordered by contact id.
    pub fn recipients(&self) -> Vec<Contact> {
        self.contacts
            .values()
            .filter(|c| self.filter.selected_ids().contains(&c.id))
            .cloned()
            .collect()
    }

    pub fn view(&self) -> WizardView {
        let mut selected: Vec<u64> = self.filter.selected_ids().iter().copied().collect();
        selected.sort_unstable();
        let mut manual: Vec<u64> = self
            .filter
            .manually_deselected_ids()
            .iter()
            .copied()
            .collect();
        manual.sort_unstable();

        WizardView {
            id: self.id,
            created_at: self.created_at,
            selected_tags: self.filter.selected_tags().iter().cloned().collect(),
            filter_type: self.filter.filter_type(),
            selected_contact_ids: selected,
            manually_deselected_ids: manual,
            matched_count: self.filter.matched_ids().len(),
            selected_count: self.filter.displayed_match_count(),
            contact_count: self.contacts.len(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("contact {0} is not part of this wizard session")]
pub struct UnknownContact(pub u64);

/// Concurrent session store keyed by session id.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, WizardSession>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn create(&self, contacts: Vec<Contact>) -> WizardView {
        let session = WizardSession::new(contacts);
        let view = session.view();
        self.sessions.insert(session.id, session);
        view
    }

    /// Run a mutation against a session, returning the updated view.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardSession) -> T,
    ) -> Option<T> {
        self.sessions.get_mut(&id).map(|mut entry| f(&mut *entry))
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: u64, tags: &[&str]) -> Contact {
        Contact {
            id,
            name: format!("Contact {}", id),
            email: Some(format!("c{}@example.com", id)),
            phone: None,
            company: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            last_modified: None,
        }
    }

    #[test]
    fn test_session_view_reflects_filter_state() {
        let mut session = WizardSession::new(vec![
            contact(1, &["VIP"]),
            contact(2, &["Prospect"]),
            contact(3, &[]),
        ]);
        session.add_tag("VIP");
        session.add_tag("Prospect");

        let view = session.view();
        assert_eq!(view.selected_contact_ids, vec![1, 2]);
        assert_eq!(view.matched_count, 2);
        assert_eq!(view.selected_count, 2);
        assert_eq!(view.contact_count, 3);

        session.toggle_contact(1).unwrap();
        let view = session.view();
        assert_eq!(view.selected_count, 1);
        assert_eq!(view.manually_deselected_ids, vec![1]);
    }

    #[test]
    fn test_toggle_unknown_contact_errors() {
        let mut session = WizardSession::new(vec![contact(1, &["VIP"])]);
        assert!(session.toggle_contact(99).is_err());
    }

    #[test]
    fn test_recipients_resolve_contacts() {
        let mut session = WizardSession::new(vec![contact(1, &["VIP"]), contact(2, &[])]);
        session.add_tag("VIP");
        let recipients = session.recipients();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].id, 1);
    }

    #[test]
    fn test_store_create_and_mutate() {
        let store = SessionStore::new();
        let view = store.create(vec![contact(1, &["VIP"])]);
        assert_eq!(store.len(), 1);

        let updated = store
            .with_session(view.id, |s| {
                s.add_tag("VIP");
                s.view()
            })
            .unwrap();
        assert_eq!(updated.selected_contact_ids, vec![1]);

        assert!(store.remove(view.id));
        assert!(store.is_empty());
        assert!(store.with_session(view.id, |s| s.view()).is_none());
    }
}
