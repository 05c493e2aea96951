// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grouping of raw rows into services with branches
//!
//! The export repeats a service once per physical location. Rows sharing the
//! key tuple (name, company id, contract number) within one category collapse
//! into a [`Group`] whose branches keep source order.

use serde::Serialize;
use std::collections::HashMap;

use crate::classify::{Category, Classifier, ClassifierKind};
use crate::dataset::Dataset;
use crate::schema::{Column, Record, RecordId, Schema};
use crate::text::normalize_opt;

/// Columns forming the group key, in key order.
pub const KEY_COLUMNS: [Column; 3] = Column::SUMMARY;

/// Joins key components; a control character that never occurs in cell text.
pub const KEY_SEPARATOR: char = '\u{1F}';

/// Composite key of one logical service.
pub fn group_key(record: &Record) -> String {
    let mut key = String::new();
    for (i, column) in KEY_COLUMNS.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(record.get(*column));
    }
    key
}

/// One logical service and its branch rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    key: String,
    category: Category,
    branches: Vec<RecordId>,
}

impl Group {
    fn new(key: String, category: Category, first: RecordId) -> Self {
        Self {
            key,
            category,
            branches: vec![first],
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key components in [`KEY_COLUMNS`] order.
    pub fn key_parts(&self) -> impl Iterator<Item = &str> {
        self.key.split(KEY_SEPARATOR)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Branch record ids in source order; never empty.
    pub fn branches(&self) -> &[RecordId] {
        &self.branches
    }

    /// First record seen for this key, used for the summary row.
    pub fn representative(&self) -> RecordId {
        self.branches[0]
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }
}

/// Partition `dataset` into groups, in order of first key encounter.
///
/// The legend row is skipped only at position 0. Missing key cells count as
/// empty strings, so rows with all-empty keys in one category share a group.
pub fn build_groups(dataset: &Dataset, classifier: &Classifier) -> Vec<Group> {
    let mut partitions: HashMap<Category, HashMap<String, usize>> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for record in dataset.records() {
        if record.id() == 0 && record.has_legend_marker() {
            continue;
        }

        let category = classifier.classify(record);
        let key = group_key(record);
        let partition = partitions.entry(category).or_default();

        match partition.get(&key).copied() {
            Some(index) => groups[index].branches.push(record.id()),
            None => {
                partition.insert(key.clone(), groups.len());
                groups.push(Group::new(key, category, record.id()));
            }
        }
    }

    groups
}

/// Groups and branch counts of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub groups: usize,
    pub branches: usize,
}

/// A dataset together with everything derived from it.
///
/// Rebuilt wholesale whenever the dataset is reloaded.
#[derive(Debug, Clone)]
pub struct Catalog {
    dataset: Dataset,
    classifier: Classifier,
    groups: Vec<Group>,
    haystacks: Vec<String>,
}

impl Catalog {
    pub fn build(dataset: Dataset, classifier: Classifier) -> Self {
        let groups = build_groups(&dataset, &classifier);
        let haystacks = dataset
            .records()
            .iter()
            .map(|record| haystack(dataset.schema(), record))
            .collect();

        tracing::debug!(
            records = dataset.len(),
            groups = groups.len(),
            classifier = ?classifier.kind(),
            "catalog built"
        );

        Self {
            dataset,
            classifier,
            groups,
            haystacks,
        }
    }

    pub fn empty(kind: ClassifierKind) -> Self {
        Self::build(Dataset::empty(), Classifier::for_kind(kind))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &Schema {
        self.dataset.schema()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Record by id. Ids handed out by groups are always valid.
    pub fn record(&self, id: RecordId) -> &Record {
        &self.dataset.records()[id]
    }

    pub fn representative(&self, group: &Group) -> &Record {
        self.record(group.representative())
    }

    pub fn branches<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Record> + 'a {
        group.branches().iter().map(move |id| self.record(*id))
    }

    /// Normalized values of every known column joined with a space.
    pub fn haystack(&self, id: RecordId) -> &str {
        self.haystacks.get(id).map(String::as_str).unwrap_or("")
    }

    /// Per-category totals, in tab order, for the categories the classifier
    /// can produce.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        self.classifier
            .categories()
            .into_iter()
            .map(|category| {
                let (groups, branches) = self
                    .groups
                    .iter()
                    .filter(|g| g.category() == category)
                    .fold((0, 0), |(g, b), group| (g + 1, b + group.branch_count()));
                CategoryCount {
                    category,
                    groups,
                    branches,
                }
            })
            .collect()
    }
}

fn haystack(schema: &Schema, record: &Record) -> String {
    record
        .cells(schema)
        .map(normalize_opt)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(data: serde_json::Value) -> Catalog {
        Catalog::build(
            Dataset::from_document(&json!({ "data": data })),
            Classifier::detailed(),
        )
    }

    #[test]
    fn identical_keys_become_branches_in_order() {
        let catalog = catalog(json!([
            { "KAM": "1", "Likvidace": "A", "KAPU": "Servis", "Unnamed: 7": "Praha" },
            { "KAM": "2", "Likvidace": "B", "KAPU": "Jiný", "Unnamed: 7": "Brno" },
            { "KAM": "1", "Likvidace": "A", "KAPU": "Servis", "Unnamed: 7": "Kolín" }
        ]));
        let groups = catalog.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].branches(), &[0, 2]);
        assert_eq!(groups[0].representative(), 0);
        assert_eq!(groups[1].branches(), &[1]);
        let cities: Vec<&str> = catalog
            .branches(&groups[0])
            .map(|r| r.get(Column::City))
            .collect();
        assert_eq!(cities, vec!["Praha", "Kolín"]);
    }

    #[test]
    fn same_key_in_different_categories_splits() {
        let catalog = catalog(json!([
            { "KAM": "1", "Likvidace": "A", "KAPU": "X", "Unnamed: 11": "Autorizovaný servis DIRECT" },
            { "KAM": "1", "Likvidace": "A", "KAPU": "X", "Unnamed: 11": "AutoskloDIRECT" },
            { "KAM": "1", "Likvidace": "A", "KAPU": "X", "Unnamed: 11": "" }
        ]));
        let groups = catalog.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category(), Category::Car);
        assert_eq!(groups[0].branches(), &[0, 2]);
        assert_eq!(groups[1].category(), Category::Glass);
    }

    #[test]
    fn legend_is_skipped_only_at_first_position() {
        let mut rows = vec![json!({ "Legenda:": "Stav", "KAM": "Číslo smlouvy", "KAPU": "Název" })];
        for i in 1..5 {
            rows.push(json!({ "Legenda:": "", "KAM": i.to_string(), "KAPU": "S" }));
        }
        rows.push(json!({ "Legenda:": "Stav", "KAM": "5", "KAPU": "S" }));

        let catalog = catalog(serde_json::Value::Array(rows));
        let all: Vec<RecordId> = catalog
            .groups()
            .iter()
            .flat_map(|g| g.branches().iter().copied())
            .collect();
        assert!(!all.contains(&0));
        assert!(all.contains(&5));
        assert_eq!(catalog.groups().len(), 5);
    }

    #[test]
    fn missing_key_cells_collapse_into_one_group() {
        let catalog = catalog(json!([
            { "Unnamed: 7": "Praha" },
            { "KAM": null, "Unnamed: 7": "Brno" }
        ]));
        assert_eq!(catalog.groups().len(), 1);
        assert_eq!(catalog.groups()[0].branch_count(), 2);
        assert_eq!(catalog.groups()[0].key_parts().collect::<Vec<_>>(), vec!["", "", ""]);
    }

    #[test]
    fn single_pdr_record_forms_one_group() {
        let catalog = catalog(json!([
            { "KAM": "1", "Likvidace": "A", "KAPU": "X", "Unnamed: 11": "PDR opravy" }
        ]));
        assert_eq!(catalog.groups().len(), 1);
        let group = &catalog.groups()[0];
        assert_eq!(group.category(), Category::Pdr);
        assert_eq!(group.branch_count(), 1);
        assert_eq!(group.key_parts().collect::<Vec<_>>(), vec!["X", "A", "1"]);
    }

    #[test]
    fn output_order_follows_first_encounter_across_categories() {
        let catalog = catalog(json!([
            { "KAM": "1", "Unnamed: 11": "PDR opravy" },
            { "KAM": "2" },
            { "KAM": "1", "Unnamed: 11": "PDR opravy" },
            { "KAM": "3", "Unnamed: 11": "AutoskloDIRECT" }
        ]));
        let order: Vec<Category> = catalog.groups().iter().map(Group::category).collect();
        assert_eq!(order, vec![Category::Pdr, Category::Car, Category::Glass]);
    }

    #[test]
    fn counts_cover_every_category_of_the_classifier() {
        let catalog = catalog(json!([
            { "KAM": "1" },
            { "KAM": "1" },
            { "KAM": "2", "Unnamed: 11": "PDR opravy" }
        ]));
        let counts = catalog.category_counts();
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0], CategoryCount { category: Category::Car, groups: 1, branches: 2 });
        assert_eq!(counts[4], CategoryCount { category: Category::Pdr, groups: 1, branches: 1 });
        assert_eq!(counts[1].groups, 0);
    }

    #[test]
    fn haystack_joins_all_known_columns() {
        let catalog = catalog(json!([
            { "KAPU": "Autoservis Novák", "Unnamed: 7": "Praha-východ", "KAM": null }
        ]));
        assert_eq!(catalog.haystack(0), "autoservis novak praha-vychod ");
        assert_eq!(catalog.haystack(99), "");
    }

    #[test]
    fn ragged_rows_classify_from_their_own_cells() {
        let catalog = catalog(json!([
            { "KAM": "1", "KAPU": "A" },
            { "KAM": "2", "KAPU": "B", "Unnamed: 11": "PDR opravy" }
        ]));
        let order: Vec<Category> = catalog.groups().iter().map(Group::category).collect();
        assert_eq!(order, vec![Category::Car, Category::Pdr]);
    }

    #[test]
    fn legend_skipped_when_meta_columns_omit_legend_column() {
        let doc = json!({
            "meta": { "columns": ["KAM", "KAPU", "Unnamed: 11"] },
            "data": [
                { "Legenda:": "Stav", "KAM": "Číslo smlouvy", "KAPU": "Název" },
                { "Legenda:": "", "KAM": "1", "KAPU": "S" }
            ]
        });
        let catalog = Catalog::build(Dataset::from_document(&doc), Classifier::detailed());
        let all: Vec<RecordId> = catalog
            .groups()
            .iter()
            .flat_map(|g| g.branches().iter().copied())
            .collect();
        assert_eq!(all, vec![1]);
    }

    #[test]
    fn key_uses_cells_missing_from_meta_columns() {
        let doc = json!({
            "meta": { "columns": ["KAPU", "Unnamed: 7"] },
            "data": [
                { "KAM": "1", "Likvidace": "A", "KAPU": "Servis", "Unnamed: 7": "Praha" },
                { "KAM": "2", "Likvidace": "B", "KAPU": "Servis", "Unnamed: 7": "Brno" }
            ]
        });
        let catalog = Catalog::build(Dataset::from_document(&doc), Classifier::detailed());
        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(
            catalog.groups()[1].key_parts().collect::<Vec<_>>(),
            vec!["Servis", "B", "2"]
        );
        // the haystack still covers only the resolved columns
        assert_eq!(catalog.haystack(0), "servis praha");
    }
}
