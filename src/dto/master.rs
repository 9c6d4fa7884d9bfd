use serde::{Deserialize, Serialize};

use crate::domain::tree::{TreeOptions, TreeSummary, TreeSummaryFilter};
use crate::listing::{MultiSelect, Paginated};

/// Query string of the master catalog. Checkbox toggles arrive as
/// `active=false` / `dead=false` when unticked.
#[derive(Debug, Default, Deserialize)]
pub struct MasterQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub species: Vec<String>,
    pub active: Option<bool>,
    pub dead: Option<bool>,
    pub min_trees: Option<usize>,
    pub max_trees: Option<usize>,
    pub page: Option<usize>,
}

impl MasterQuery {
    pub fn filter(&self) -> TreeSummaryFilter {
        let defaults = TreeSummaryFilter::default();
        TreeSummaryFilter {
            species: MultiSelect::new(self.species.iter().map(String::as_str)).into_values(),
            show_active: self.active.unwrap_or(defaults.show_active),
            show_dead: self.dead.unwrap_or(defaults.show_dead),
            min_trees: self.min_trees.unwrap_or(defaults.min_trees),
            max_trees: self.max_trees.unwrap_or(defaults.max_trees),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MasterPageData {
    pub summaries: Paginated<TreeSummary>,
    pub search_query: Option<String>,
    pub filter: FilterView,
    pub options: TreeOptions,
}

/// Filter state echoed back to the template.
#[derive(Debug, Serialize)]
pub struct FilterView {
    pub species: MultiSelect,
    pub show_active: bool,
    pub show_dead: bool,
    pub min_trees: usize,
    pub max_trees: usize,
}

impl From<&TreeSummaryFilter> for FilterView {
    fn from(filter: &TreeSummaryFilter) -> Self {
        Self {
            species: MultiSelect::new(filter.species.iter().map(String::as_str)),
            show_active: filter.show_active,
            show_dead: filter.show_dead,
            min_trees: filter.min_trees,
            max_trees: filter.max_trees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_use_default_filter() {
        let query: MasterQuery = serde_html_form::from_str("q=neem").unwrap();
        assert_eq!(query.filter(), TreeSummaryFilter::default());

        let query: MasterQuery =
            serde_html_form::from_str("species=A&species=B&dead=false&max_trees=0").unwrap();
        let filter = query.filter();
        assert_eq!(filter.species, vec!["A", "B"]);
        assert!(!filter.show_dead);
        assert!(filter.show_active);
        assert_eq!(filter.max_trees, 0);
    }
}
