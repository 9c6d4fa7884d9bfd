use serde::{Deserialize, Serialize};

use crate::domain::tree::Tree;
use crate::listing::{MultiSelect, Paginated};

/// Query string of the trees page.
#[derive(Debug, Default, Deserialize)]
pub struct TreesQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub species: Vec<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TreesPageData {
    pub trees: Paginated<Tree>,
    pub search_query: Option<String>,
    /// Species available in the filter dropdown.
    pub species_options: Vec<String>,
    pub selected_species: MultiSelect,
}
