//! Session archive of revealed simulations, grouped by language and
//! conflict category.
//!
//! [`Archive`] is a value: [`Archive::record_reveal`] returns a new archive
//! and leaves the receiver untouched, so holders of an older snapshot never
//! observe a partial update.

use crate::error::ArchiveError;
use crate::simulation::{RecordId, SimulationRecord};
use std::fmt;

/// Composite grouping key of an archive category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey {
    pub language: String,
    pub conflict_category: String,
}

impl CategoryKey {
    pub fn new(language: impl Into<String>, conflict_category: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            conflict_category: conflict_category.into(),
        }
    }

    /// Key of a revealed record, with defaults for omitted metadata.
    pub fn for_record(record: &SimulationRecord) -> Option<Self> {
        let metadata = record.metadata()?;
        Some(Self::new(
            metadata.language_or_default(),
            metadata.conflict_category_or_default(),
        ))
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.language, self.conflict_category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCategory {
    key: CategoryKey,
    records: Vec<SimulationRecord>,
}

impl ArchiveCategory {
    pub fn key(&self) -> &CategoryKey {
        &self.key
    }

    /// Records, most recently revealed first.
    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    categories: Vec<ArchiveCategory>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive a revealed record and return the updated snapshot.
    ///
    /// Any earlier occurrence of the same id is removed first, and a category
    /// left empty by that removal is pruned. The record then goes to the
    /// front of its category, which is created at the end if new.
    pub fn record_reveal(&self, record: &SimulationRecord) -> Result<Self, ArchiveError> {
        let key = CategoryKey::for_record(record).ok_or_else(|| ArchiveError::NotRevealed {
            id: record.id.to_string(),
        })?;

        let mut categories: Vec<ArchiveCategory> = self
            .categories
            .iter()
            .filter_map(|category| {
                let records: Vec<SimulationRecord> = category
                    .records
                    .iter()
                    .filter(|r| r.id != record.id)
                    .cloned()
                    .collect();
                (!records.is_empty()).then(|| ArchiveCategory {
                    key: category.key.clone(),
                    records,
                })
            })
            .collect();

        match categories.iter_mut().find(|c| c.key == key) {
            Some(category) => category.records.insert(0, record.clone()),
            None => categories.push(ArchiveCategory {
                key: key.clone(),
                records: vec![record.clone()],
            }),
        }

        tracing::debug!(id = %record.id, category = %key, "archived revealed record");
        Ok(Self { categories })
    }

    /// Categories in the order they were first created.
    pub fn list_categories(&self) -> &[ArchiveCategory] {
        &self.categories
    }

    pub fn category(&self, key: &CategoryKey) -> Option<&ArchiveCategory> {
        self.categories.iter().find(|c| &c.key == key)
    }

    pub fn find_record(&self, id: &RecordId) -> Option<&SimulationRecord> {
        self.categories
            .iter()
            .flat_map(|c| c.records.iter())
            .find(|r| &r.id == id)
    }

    /// Total number of archived records.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::fixtures::{draft, reveal, revealed_record};

    fn occurrences(archive: &Archive, id: &RecordId) -> usize {
        archive
            .list_categories()
            .iter()
            .flat_map(|c| c.records())
            .filter(|r| &r.id == id)
            .count()
    }

    #[test]
    fn empty_archive_has_no_categories() {
        let archive = Archive::new();
        assert!(archive.is_empty());
        assert_eq!(archive.len(), 0);
        assert!(archive.list_categories().is_empty());
    }

    #[test]
    fn rejects_setup_phase_record() {
        let record = SimulationRecord::from_draft(draft("Unrevealed", 3));
        let err = Archive::new().record_reveal(&record).unwrap_err();
        assert_eq!(
            err,
            ArchiveError::NotRevealed {
                id: record.id.to_string()
            }
        );
    }

    #[test]
    fn same_key_groups_into_one_category() {
        let a = revealed_record("A", "English", "Negotiation");
        let b = revealed_record("B", "English", "Negotiation");
        let archive = Archive::new()
            .record_reveal(&a)
            .unwrap()
            .record_reveal(&b)
            .unwrap();

        assert_eq!(archive.list_categories().len(), 1);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn differing_fields_land_in_distinct_categories() {
        let base = revealed_record("A", "English", "Negotiation");
        let other_language = revealed_record("B", "Bengali", "Negotiation");
        let other_conflict = revealed_record("C", "English", "Leadership");
        let archive = Archive::new()
            .record_reveal(&base)
            .unwrap()
            .record_reveal(&other_language)
            .unwrap()
            .record_reveal(&other_conflict)
            .unwrap();

        let keys: Vec<_> = archive
            .list_categories()
            .iter()
            .map(|c| c.key().clone())
            .collect();
        assert_eq!(
            keys,
            vec![
                CategoryKey::new("English", "Negotiation"),
                CategoryKey::new("Bengali", "Negotiation"),
                CategoryKey::new("English", "Leadership"),
            ]
        );
    }

    #[test]
    fn padded_language_is_keyed_verbatim() {
        let padded = revealed_record("Padded", " English ", "Negotiation");
        let plain = revealed_record("Plain", "English", "Negotiation");
        let archive = Archive::new()
            .record_reveal(&padded)
            .unwrap()
            .record_reveal(&plain)
            .unwrap();

        assert_eq!(archive.list_categories().len(), 2);
        assert!(
            archive
                .category(&CategoryKey::new(" English ", "Negotiation"))
                .is_some()
        );
        assert_eq!(
            CategoryKey::for_record(&padded),
            Some(CategoryKey::new(" English ", "Negotiation"))
        );
    }

    #[test]
    fn most_recent_reveal_is_first() {
        let first = revealed_record("First", "English", "Social");
        let second = revealed_record("Second", "English", "Social");
        let archive = Archive::new()
            .record_reveal(&first)
            .unwrap()
            .record_reveal(&second)
            .unwrap();

        let records = archive.list_categories()[0].records();
        assert_eq!(records[0].id, second.id);
        assert_eq!(records[1].id, first.id);
    }

    #[test]
    fn category_order_follows_creation_not_recency() {
        let social = revealed_record("A", "English", "Social");
        let leadership = revealed_record("B", "English", "Leadership");
        let social_again = revealed_record("C", "English", "Social");
        let archive = Archive::new()
            .record_reveal(&social)
            .unwrap()
            .record_reveal(&leadership)
            .unwrap()
            .record_reveal(&social_again)
            .unwrap();

        let categories = archive.list_categories();
        assert_eq!(categories[0].key().conflict_category, "Social");
        assert_eq!(categories[1].key().conflict_category, "Leadership");
    }

    #[test]
    fn re_reveal_moves_record_and_prunes_empty_category() {
        let setup = SimulationRecord::from_draft(draft("Replay", 3));
        let first = setup.revealed(1, reveal("English", "Negotiation"));
        let archive = Archive::new().record_reveal(&first).unwrap();

        let second = setup.revealed(3, reveal("English", "Power Dynamics"));
        let archive = archive.record_reveal(&second).unwrap();

        assert_eq!(occurrences(&archive, &setup.id), 1);
        assert_eq!(archive.list_categories().len(), 1);
        assert_eq!(
            archive.list_categories()[0].key(),
            &CategoryKey::new("English", "Power Dynamics")
        );
        assert_eq!(
            archive.find_record(&setup.id).and_then(SimulationRecord::selected_choice_id),
            Some(3)
        );
    }

    #[test]
    fn re_reveal_into_same_category_keeps_single_copy_at_front() {
        let setup = SimulationRecord::from_draft(draft("Replay", 3));
        let other = revealed_record("Other", "English", "Social");
        let archive = Archive::new()
            .record_reveal(&setup.revealed(1, reveal("English", "Social")))
            .unwrap()
            .record_reveal(&other)
            .unwrap()
            .record_reveal(&setup.revealed(2, reveal("English", "Social")))
            .unwrap();

        let records = archive.list_categories()[0].records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, setup.id);
        assert_eq!(occurrences(&archive, &setup.id), 1);
    }

    #[test]
    fn re_reveal_keeps_populated_prior_category() {
        let setup = SimulationRecord::from_draft(draft("Replay", 3));
        let neighbour = revealed_record("Neighbour", "English", "Social");
        let archive = Archive::new()
            .record_reveal(&neighbour)
            .unwrap()
            .record_reveal(&setup.revealed(1, reveal("English", "Social")))
            .unwrap()
            .record_reveal(&setup.revealed(1, reveal("English", "Leadership")))
            .unwrap();

        assert_eq!(archive.list_categories().len(), 2);
        let social = archive
            .category(&CategoryKey::new("English", "Social"))
            .unwrap();
        assert_eq!(social.records().len(), 1);
        assert_eq!(social.records()[0].id, neighbour.id);
    }

    #[test]
    fn omitted_metadata_uses_defaults() {
        let record = revealed_record("Blank", "", "");
        let archive = Archive::new().record_reveal(&record).unwrap();
        assert_eq!(
            archive.list_categories()[0].key(),
            &CategoryKey::new("English", "Social")
        );
    }

    #[test]
    fn record_reveal_leaves_previous_snapshot_untouched() {
        let before = Archive::new()
            .record_reveal(&revealed_record("A", "English", "Social"))
            .unwrap();
        let snapshot = before.clone();
        let _after = before
            .record_reveal(&revealed_record("B", "English", "Social"))
            .unwrap();
        assert_eq!(before, snapshot);
    }

    #[test]
    fn find_record_misses_unknown_id() {
        let archive = Archive::new()
            .record_reveal(&revealed_record("A", "English", "Social"))
            .unwrap();
        assert!(archive.find_record(&RecordId::from("missing")).is_none());
    }
}
