use serde::{Deserialize, Serialize};

use crate::domain::inspection::{Inspection, InspectionStats};
use crate::listing::{MultiSelect, Paginated};

/// Query string of the inspections page.
#[derive(Debug, Default, Deserialize)]
pub struct InspectionsQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub area: Vec<String>,
    #[serde(default)]
    pub volunteer: Vec<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct InspectionsPageData {
    pub inspections: Paginated<Inspection>,
    /// Computed over the filtered list, before pagination.
    pub stats: InspectionStats,
    pub search_query: Option<String>,
    pub selected_statuses: MultiSelect,
    pub selected_areas: MultiSelect,
    pub selected_volunteers: MultiSelect,
    pub area_options: Vec<String>,
    pub volunteer_options: Vec<String>,
}
