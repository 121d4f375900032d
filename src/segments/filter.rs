//! Tag-based recipient filtering.
//!
//! The machine tracks two id sets alongside the tag selection:
//! - `selected`: the current recipient set
//! - `manually_deselected`: explicit user overrides. Sticky — no tag or
//!   filter change may re-add one of these until the user re-toggles it.
//!
//! Selection is derived state: after every tag or rule transition,
//! `selected` is exactly the match set minus the manual overrides. Contacts
//! dropped by a narrowing step (switching to ALL, or adding a tag under ALL)
//! therefore reappear the moment a later step matches them again.
//!
//! "No Tag" is a synthetic tag matching contacts with zero tags.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::copper::NO_TAG;
use crate::types::Contact;

/// How selected tags combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Contact matches if it carries at least one selected tag.
    Any,
    /// Contact matches only if it carries every selected tag.
    All,
}

/// The wizard's recipient-selection state machine.
#[derive(Debug, Clone)]
pub struct TagFilter {
    /// Contact id → its tag set (the snapshot the wizard was opened with).
    contacts: BTreeMap<u64, BTreeSet<String>>,
    selected_tags: BTreeSet<String>,
    filter_type: FilterType,
    selected: HashSet<u64>,
    manually_deselected: HashSet<u64>,
}

impl TagFilter {
    pub fn new(contacts: &[Contact]) -> Self {
        Self {
            contacts: contacts
                .iter()
                .map(|c| (c.id, c.tags.clone()))
                .collect(),
            selected_tags: BTreeSet::new(),
            filter_type: FilterType::Any,
            selected: HashSet::new(),
            manually_deselected: HashSet::new(),
        }
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn selected_ids(&self) -> &HashSet<u64> {
        &self.selected
    }

    pub fn manually_deselected_ids(&self) -> &HashSet<u64> {
        &self.manually_deselected
    }

    /// Does one contact's tag set satisfy the predicate?
    fn tags_match(tags: &BTreeSet<String>, selected_tags: &BTreeSet<String>, filter: FilterType) -> bool {
        if selected_tags.is_empty() {
            return false;
        }
        match filter {
            FilterType::Any => selected_tags
                .iter()
                .any(|t| (t == NO_TAG && tags.is_empty()) || tags.contains(t)),
            FilterType::All => selected_tags
                .iter()
                .all(|t| (t == NO_TAG && tags.is_empty()) || tags.contains(t)),
        }
    }

    /// The raw match set for the current tags and rule.
    pub fn matched_ids(&self) -> HashSet<u64> {
        self.contacts
            .iter()
            .filter(|(_, tags)| Self::tags_match(tags, &self.selected_tags, self.filter_type))
            .map(|(id, _)| *id)
            .collect()
    }

    /// The count shown to the user: raw matches minus manual overrides.
    pub fn displayed_match_count(&self) -> usize {
        let matched = self.matched_ids();
        matched
            .iter()
            .filter(|id| !self.manually_deselected.contains(id))
            .count()
    }

    /// Add a tag to the selection.
    ///
    /// Newly matching contacts join the recipient set unless manually
    /// deselected; contacts no longer matching (the ALL rule narrows as tags
    /// are added) drop out.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.selected_tags.insert(tag.to_string()) {
            return;
        }
        self.resync_to_match_set();
    }

    /// Remove a tag; now-unmatched contacts drop from the recipient set.
    /// Manual overrides stay recorded.
    pub fn remove_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            return;
        }
        self.resync_to_match_set();
    }

    /// Toggle a single contact.
    ///
    /// Deselecting records a manual override; reselecting clears it. A
    /// contact that no longer matches the current filter can have its
    /// override cleared but won't rejoin the recipient set.
    pub fn toggle_contact(&mut self, id: u64) {
        if self.selected.remove(&id) {
            self.manually_deselected.insert(id);
            return;
        }
        self.manually_deselected.remove(&id);
        let matches = self
            .contacts
            .get(&id)
            .map(|tags| Self::tags_match(tags, &self.selected_tags, self.filter_type))
            .unwrap_or(false);
        if matches {
            self.selected.insert(id);
        }
    }

    /// Switch the combination rule.
    ///
    /// Switching to ALL drops ids failing the stricter predicate; switching
    /// back to ANY reselects everything the wider predicate matches. Manual
    /// overrides are never resurrected by a rule switch.
    pub fn set_filter_type(&mut self, filter: FilterType) {
        if filter == self.filter_type {
            return;
        }
        self.filter_type = filter;
        self.resync_to_match_set();
    }

    /// Selection invariant after any tag or rule change: every
    /// non-overridden match is selected, and nothing outside the match set
    /// stays selected.
    fn resync_to_match_set(&mut self) {
        let matched = self.matched_ids();
        self.selected = matched
            .into_iter()
            .filter(|id| !self.manually_deselected.contains(id))
            .collect();
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

    fn sample_contacts() -> Vec<Contact> {
        vec![
            contact(1, &["VIP"]),
            contact(2, &["Prospect"]),
            contact(3, &[]),
        ]
    }

    fn ids(filter: &TagFilter) -> BTreeSet<u64> {
        filter.selected_ids().iter().copied().collect()
    }

    #[test]
    fn test_any_matches_union_of_tags() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.add_tag("Prospect");
        assert_eq!(ids(&filter), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_all_requires_every_tag() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.set_filter_type(FilterType::All);
        filter.add_tag("VIP");
        filter.add_tag("Prospect");
        // No contact carries both tags.
        assert!(ids(&filter).is_empty());
    }

    #[test]
    fn test_no_tag_matches_untagged_contacts() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag(NO_TAG);
        assert_eq!(ids(&filter), BTreeSet::from([3]));

        filter.add_tag("VIP");
        assert_eq!(ids(&filter), BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_no_tag_under_all_excludes_tagged_contacts() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.set_filter_type(FilterType::All);
        filter.add_tag(NO_TAG);
        assert_eq!(ids(&filter), BTreeSet::from([3]));

        // "No Tag" plus a real tag is unsatisfiable under ALL.
        filter.add_tag("VIP");
        assert!(ids(&filter).is_empty());
    }

    #[test]
    fn test_empty_tag_selection_matches_nothing() {
        let contacts = sample_contacts();
        let filter = TagFilter::new(&contacts);
        assert!(filter.matched_ids().is_empty());
    }

    #[test]
    fn test_select_then_deselect_tag_is_idempotent() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        let before = ids(&filter);

        filter.add_tag("Prospect");
        filter.remove_tag("Prospect");
        assert_eq!(ids(&filter), before);
    }

    #[test]
    fn test_manual_deselection_is_sticky_across_tag_changes() {
        let contacts = vec![
            contact(1, &["VIP", "Newsletter"]),
            contact(2, &["Prospect"]),
            contact(3, &[]),
        ];
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        assert_eq!(ids(&filter), BTreeSet::from([1]));

        filter.toggle_contact(1);
        assert!(ids(&filter).is_empty());

        // Contact 1 also carries "Newsletter"; the override must hold.
        filter.add_tag("Newsletter");
        assert!(!filter.selected_ids().contains(&1));

        // Explicit re-toggle clears the override.
        filter.toggle_contact(1);
        assert!(filter.selected_ids().contains(&1));
        assert!(!filter.manually_deselected_ids().contains(&1));
    }

    #[test]
    fn test_all_to_any_reselects_non_manual_matches() {
        let contacts = vec![
            contact(1, &["VIP", "Prospect"]),
            contact(2, &["VIP"]),
            contact(3, &["Prospect"]),
        ];
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.add_tag("Prospect");
        assert_eq!(ids(&filter), BTreeSet::from([1, 2, 3]));

        // Manually drop 3, then tighten to ALL: 2 falls out of the match set.
        filter.toggle_contact(3);
        filter.set_filter_type(FilterType::All);
        assert_eq!(ids(&filter), BTreeSet::from([1]));

        // Back to ANY: 2 returns, the manual override on 3 holds.
        filter.set_filter_type(FilterType::Any);
        assert_eq!(ids(&filter), BTreeSet::from([1, 2]));
        assert!(filter.manually_deselected_ids().contains(&3));
    }

    #[test]
    fn test_tag_added_under_all_reselects_on_switch_to_any() {
        let contacts = vec![contact(1, &["VIP"]), contact(2, &["VIP", "Newsletter"])];
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.set_filter_type(FilterType::All);
        assert_eq!(ids(&filter), BTreeSet::from([1, 2]));

        // Narrowing under ALL drops 1.
        filter.add_tag("Newsletter");
        assert_eq!(ids(&filter), BTreeSet::from([2]));

        // Widening back to ANY reselects it: selection always equals the
        // match set minus manual overrides.
        filter.set_filter_type(FilterType::Any);
        assert_eq!(ids(&filter), BTreeSet::from([1, 2]));
        assert_eq!(
            ids(&filter),
            filter.matched_ids().into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_rule_switch_roundtrip_without_overrides() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.add_tag("Prospect");
        let before = ids(&filter);

        filter.set_filter_type(FilterType::All);
        filter.set_filter_type(FilterType::Any);
        assert_eq!(ids(&filter), before);
    }

    #[test]
    fn test_displayed_count_subtracts_manual_overrides() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.add_tag("Prospect");
        assert_eq!(filter.displayed_match_count(), 2);

        filter.toggle_contact(1);
        assert_eq!(filter.displayed_match_count(), 1);
        // The raw match set is unchanged.
        assert_eq!(filter.matched_ids().len(), 2);
    }

    #[test]
    fn test_removing_tag_drops_unmatched_ids() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.add_tag("Prospect");
        filter.remove_tag("VIP");
        assert_eq!(ids(&filter), BTreeSet::from([2]));
    }

    #[test]
    fn test_toggle_of_unmatched_contact_only_clears_override() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.toggle_contact(1);
        filter.remove_tag("VIP");

        // Contact 1 matches nothing now; re-toggling clears the override
        // without selecting it.
        filter.toggle_contact(1);
        assert!(!filter.manually_deselected_ids().contains(&1));
        assert!(!filter.selected_ids().contains(&1));
    }

    #[test]
    fn test_duplicate_add_and_remove_are_noops() {
        let contacts = sample_contacts();
        let mut filter = TagFilter::new(&contacts);
        filter.add_tag("VIP");
        filter.toggle_contact(1);
        filter.add_tag("VIP");
        // A repeated add must not resurrect the manual override.
        assert!(ids(&filter).is_empty());

        filter.remove_tag("Prospect");
        assert!(ids(&filter).is_empty());
    }
}
