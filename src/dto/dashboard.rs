use serde::Serialize;

use crate::domain::inspection::InspectionStats;

/// Counters rendered on the dashboard.
#[derive(Debug, Default, Serialize)]
pub struct DashboardPageData {
    pub total_trees: usize,
    pub tree_types: usize,
    pub total_volunteers: usize,
    /// Volunteers whose verification is not completed yet.
    pub pending_verifications: usize,
    pub inspections: InspectionStats,
}
