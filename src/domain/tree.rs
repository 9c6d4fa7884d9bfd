use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{SpeciesName, TreeId, TreeName, TreeTypeCode};

/// Metric value stored when staff leave the O2/CO2 field blank.
pub const DEFAULT_RELEASE_METRIC: &str = "0 kg";

/// Lifecycle marker of a planted tree.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TreeStatus {
    #[default]
    Active,
    Dead,
}

impl From<&str> for TreeStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dead" => TreeStatus::Dead,
            _ => TreeStatus::Active,
        }
    }
}

/// Single planted tree row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub id: TreeId,
    /// Type code shared by every tree of the same (name, species) pair.
    pub custom_id: Option<TreeTypeCode>,
    pub tree_name: TreeName,
    pub species: SpeciesName,
    pub o2_released: String,
    pub co2_released: String,
    pub status: TreeStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for planting (registering) a new tree.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTree {
    pub tree_name: TreeName,
    pub species: SpeciesName,
    pub o2_released: String,
    pub co2_released: String,
}

impl NewTree {
    /// Blank metrics fall back to [`DEFAULT_RELEASE_METRIC`].
    #[must_use]
    pub fn new(
        tree_name: TreeName,
        species: SpeciesName,
        o2_released: Option<String>,
        co2_released: Option<String>,
    ) -> Self {
        Self {
            tree_name,
            species,
            o2_released: metric_or_default(o2_released),
            co2_released: metric_or_default(co2_released),
        }
    }
}

/// Metric update applied to every tree of one type.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateTreeMetrics {
    pub o2_released: String,
    pub co2_released: String,
}

impl UpdateTreeMetrics {
    #[must_use]
    pub fn new(o2_released: Option<String>, co2_released: Option<String>) -> Self {
        Self {
            o2_released: metric_or_default(o2_released),
            co2_released: metric_or_default(co2_released),
        }
    }
}

fn metric_or_default(value: Option<String>) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_RELEASE_METRIC.to_string())
}

/// Trees grouped by (name, species).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TreeSummary {
    pub id: TreeId,
    pub custom_id: Option<TreeTypeCode>,
    pub tree_name: TreeName,
    pub species: SpeciesName,
    pub total_trees: usize,
    pub active_trees: usize,
    pub dead_trees: usize,
    pub o2_released: String,
    pub co2_released: String,
}

/// Distinct (name, species) pair with its population, as reported by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TreeType {
    pub custom_id: Option<TreeTypeCode>,
    pub tree_name: TreeName,
    pub species: SpeciesName,
    pub tree_count: usize,
}

/// Groups individual rows into summaries when the aggregation procedure is
/// unavailable.
///
/// Groups keep the order in which their first row appears; identifier, code
/// and metrics are taken from that first row.
pub fn summarize_trees(trees: &[Tree]) -> Vec<TreeSummary> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut summaries: Vec<TreeSummary> = Vec::new();

    for tree in trees {
        let key = (tree.tree_name.as_str(), tree.species.as_str());
        let position = *index.entry(key).or_insert_with(|| {
            summaries.push(TreeSummary {
                id: tree.id,
                custom_id: tree.custom_id.clone(),
                tree_name: tree.tree_name.clone(),
                species: tree.species.clone(),
                total_trees: 0,
                active_trees: 0,
                dead_trees: 0,
                o2_released: tree.o2_released.clone(),
                co2_released: tree.co2_released.clone(),
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[position];
        summary.total_trees += 1;
        match tree.status {
            TreeStatus::Active => summary.active_trees += 1,
            TreeStatus::Dead => summary.dead_trees += 1,
        }
    }

    summaries
}

/// Filters applied to the master catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSummaryFilter {
    /// Selected species; empty means every species.
    pub species: Vec<String>,
    pub show_active: bool,
    pub show_dead: bool,
    pub min_trees: usize,
    /// Upper bound on the group size; zero disables the bound.
    pub max_trees: usize,
}

impl Default for TreeSummaryFilter {
    fn default() -> Self {
        Self {
            species: Vec::new(),
            show_active: true,
            show_dead: true,
            min_trees: 0,
            max_trees: 1000,
        }
    }
}

impl TreeSummaryFilter {
    pub fn matches(&self, summary: &TreeSummary) -> bool {
        if !self.species.is_empty() && !self.species.iter().any(|s| s == summary.species.as_str())
        {
            return false;
        }
        if !self.show_active && summary.active_trees > 0 {
            return false;
        }
        if !self.show_dead && summary.dead_trees > 0 {
            return false;
        }
        if summary.total_trees < self.min_trees {
            return false;
        }
        if self.max_trees > 0 && summary.total_trees > self.max_trees {
            return false;
        }
        true
    }
}

/// Selectable values for tree forms, derived from existing rows.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct TreeOptions {
    /// Unique (name, species) pairs in first-seen order.
    pub pairs: Vec<(String, String)>,
    /// Sorted unique names.
    pub names: Vec<String>,
    pub species: Vec<String>,
}

impl TreeOptions {
    /// Builds options from `(tree_name, species)` projections, skipping blanks.
    pub fn from_pairs<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut options = TreeOptions::default();
        for (name, species) in rows {
            let (name, species) = (name.trim().to_string(), species.trim().to_string());
            if !name.is_empty() && !options.names.contains(&name) {
                options.names.push(name.clone());
            }
            if !species.is_empty() && !options.species.contains(&species) {
                options.species.push(species.clone());
            }
            if name.is_empty() || species.is_empty() {
                continue;
            }
            let pair = (name, species);
            if !options.pairs.contains(&pair) {
                options.pairs.push(pair);
            }
        }
        options.names.sort();
        options.species.sort();
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tree(name: &str, species: &str, status: TreeStatus) -> Tree {
        Tree {
            id: TreeId::new(Uuid::new_v4()),
            custom_id: None,
            tree_name: TreeName::new(name).unwrap(),
            species: SpeciesName::new(species).unwrap(),
            o2_released: "10 kg".to_string(),
            co2_released: "4 kg".to_string(),
            status,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn new_tree_defaults_blank_metrics() {
        let new_tree = NewTree::new(
            TreeName::new("Neem").unwrap(),
            SpeciesName::new("Azadirachta indica").unwrap(),
            Some("  ".to_string()),
            None,
        );
        assert_eq!(new_tree.o2_released, DEFAULT_RELEASE_METRIC);
        assert_eq!(new_tree.co2_released, DEFAULT_RELEASE_METRIC);
    }

    #[test]
    fn summarize_groups_by_name_and_species_in_first_seen_order() {
        let rows = vec![
            tree("Neem", "Azadirachta indica", TreeStatus::Active),
            tree("Mango", "Mangifera indica", TreeStatus::Active),
            tree("Neem", "Azadirachta indica", TreeStatus::Dead),
            tree("Neem", "Other", TreeStatus::Active),
        ];

        let summaries = summarize_trees(&rows);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].tree_name.as_str(), "Neem");
        assert_eq!(summaries[0].id, rows[0].id);
        assert_eq!(summaries[0].total_trees, 2);
        assert_eq!(summaries[0].active_trees, 1);
        assert_eq!(summaries[0].dead_trees, 1);
        assert_eq!(summaries[1].tree_name.as_str(), "Mango");
        assert_eq!(summaries[2].species.as_str(), "Other");
    }

    #[test]
    fn filter_hides_groups_by_liveness_and_range() {
        let rows = vec![
            tree("Neem", "Azadirachta indica", TreeStatus::Active),
            tree("Neem", "Azadirachta indica", TreeStatus::Dead),
            tree("Mango", "Mangifera indica", TreeStatus::Active),
        ];
        let summaries = summarize_trees(&rows);

        let no_dead = TreeSummaryFilter {
            show_dead: false,
            ..TreeSummaryFilter::default()
        };
        let kept: Vec<_> = summaries.iter().filter(|s| no_dead.matches(s)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].tree_name.as_str(), "Mango");

        let at_least_two = TreeSummaryFilter {
            min_trees: 2,
            ..TreeSummaryFilter::default()
        };
        assert_eq!(
            summaries.iter().filter(|s| at_least_two.matches(s)).count(),
            1
        );

        let unbounded = TreeSummaryFilter {
            max_trees: 0,
            species: vec!["Mangifera indica".to_string()],
            ..TreeSummaryFilter::default()
        };
        assert_eq!(summaries.iter().filter(|s| unbounded.matches(s)).count(), 1);
    }

    #[test]
    fn options_deduplicate_and_skip_blanks() {
        let options = TreeOptions::from_pairs(vec![
            ("Mango".to_string(), "Mangifera indica".to_string()),
            ("Mango".to_string(), "Mangifera indica".to_string()),
            ("Neem".to_string(), "".to_string()),
            ("Neem".to_string(), "Azadirachta indica".to_string()),
        ]);
        assert_eq!(options.names, vec!["Mango", "Neem"]);
        assert_eq!(options.species, vec!["Azadirachta indica", "Mangifera indica"]);
        assert_eq!(options.pairs.len(), 2);
    }
}
