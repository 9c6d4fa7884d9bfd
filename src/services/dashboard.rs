use chrono::NaiveDate;

use crate::domain::inspection::InspectionStats;
use crate::domain::volunteer::VerificationStatus;
use crate::dto::dashboard::DashboardPageData;
use crate::repository::errors::RepositoryError;
use crate::repository::{InspectionReader, TreeReader, VolunteerReader};
use crate::services::ServiceResult;

/// Gathers the dashboard counters. Inspection counters use the same overdue
/// reclassification as the inspections page.
pub async fn load_dashboard<R>(repo: &R, today: NaiveDate) -> ServiceResult<DashboardPageData>
where
    R: TreeReader + VolunteerReader + InspectionReader + ?Sized,
{
    let log_error = |err: RepositoryError| {
        log::error!("Failed to load dashboard data: {err}");
        err
    };

    let total_trees = repo.count_trees().await.map_err(log_error)?;
    let tree_types = repo.list_tree_types().await.map_err(log_error)?.len();
    let volunteers = repo.list_volunteers().await.map_err(log_error)?;
    let mut inspections = repo.list_inspections().await.map_err(log_error)?;
    for inspection in &mut inspections {
        inspection.reclassify_overdue(today);
    }

    Ok(DashboardPageData {
        total_trees,
        tree_types,
        total_volunteers: volunteers.len(),
        pending_verifications: volunteers
            .iter()
            .filter(|v| v.verification_status != VerificationStatus::Completed)
            .count(),
        inspections: InspectionStats::from_inspections(&inspections),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inspection::InspectionStatus;
    use crate::domain::tree::TreeStatus;
    use crate::repository::memory::InMemoryRepository;
    use crate::services::ServiceError;
    use crate::services::fixtures::{date, inspection, tree, volunteer};

    #[actix_web::test]
    async fn counts_every_collection() {
        let mut verified = volunteer("VT2", "Ravi", "ravi@example.com", "Tuticorin");
        verified.verification_status = VerificationStatus::Completed;
        let pending = volunteer("VT1", "Asha", "asha@example.com", "Madurai");
        let repo = InMemoryRepository::new()
            .with_trees(vec![
                tree("Neem", "Azadirachta indica", 101, TreeStatus::Active),
                tree("Neem", "Azadirachta indica", 101, TreeStatus::Dead),
                tree("Mango", "Mangifera indica", 102, TreeStatus::Active),
            ])
            .with_inspections(vec![
                inspection("IN001", &pending, "Ward 1", "2024-01-01", InspectionStatus::Pending),
                inspection("IN002", &pending, "Ward 2", "2099-01-01", InspectionStatus::Pending),
            ])
            .with_volunteers(vec![verified, pending]);

        let data = load_dashboard(&repo, date("2025-01-01")).await.unwrap();

        assert_eq!(data.total_trees, 3);
        assert_eq!(data.tree_types, 2);
        assert_eq!(data.total_volunteers, 2);
        assert_eq!(data.pending_verifications, 1);
        assert_eq!(data.inspections.total, 2);
        assert_eq!(data.inspections.overdue, 1);
    }

    #[actix_web::test]
    async fn backend_failure_is_reported() {
        let repo = InMemoryRepository::new().failing_reads();
        let result = load_dashboard(&repo, date("2025-01-01")).await;
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }
}
