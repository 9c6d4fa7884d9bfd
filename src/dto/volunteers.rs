use serde::{Deserialize, Serialize};

use crate::domain::inspection::InspectionCycle;
use crate::domain::volunteer::Volunteer;
use crate::listing::{MultiSelect, Paginated};

/// Query string of the volunteers page. `type` and `location` repeat once
/// per selected value.
#[derive(Debug, Default, Deserialize)]
pub struct VolunteersQuery {
    pub q: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Vec<String>,
    #[serde(default)]
    pub location: Vec<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct VolunteersPageData {
    pub volunteers: Paginated<Volunteer>,
    pub search_query: Option<String>,
    pub selected_types: MultiSelect,
    pub selected_locations: MultiSelect,
    /// Locations present in the unfiltered list.
    pub location_options: Vec<String>,
}

/// Data of the volunteer view, including the assignment form options.
#[derive(Debug, Serialize)]
pub struct VolunteerPageData {
    pub volunteer: Volunteer,
    pub species_options: Vec<String>,
    pub cycles: Vec<&'static str>,
}

impl VolunteerPageData {
    pub fn new(volunteer: Volunteer, species_options: Vec<String>) -> Self {
        Self {
            volunteer,
            species_options,
            cycles: InspectionCycle::ALL.iter().map(|c| c.as_str()).collect(),
        }
    }
}
