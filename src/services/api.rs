//! Services behind the JSON endpoints.

use crate::domain::tree::TreeType;
use crate::domain::types::{SpeciesName, TreeName, TreeTypeCode};
use crate::dto::api::TreeTypeIdQuery;
use crate::repository::TreeReader;
use crate::services::{ServiceError, ServiceResult};

pub async fn list_tree_types<R>(repo: &R) -> ServiceResult<Vec<TreeType>>
where
    R: TreeReader + ?Sized,
{
    repo.list_tree_types().await.map_err(|err| {
        log::error!("Failed to list tree types: {err}");
        ServiceError::from(err)
    })
}

/// Code of the type `(tree_name, species)`.
///
/// When the lookup fails or finds nothing, a random `T100`..`T999` code is
/// handed out instead.
pub async fn resolve_tree_type_id<R>(repo: &R, query: TreeTypeIdQuery) -> ServiceResult<String>
where
    R: TreeReader + ?Sized,
{
    let (tree_name, species) =
        match (TreeName::new(query.tree_name), SpeciesName::new(query.species)) {
            (Ok(name), Ok(species)) => (name, species),
            _ => {
                return Err(ServiceError::Form(
                    "Tree name and scientific name are required".to_string(),
                ));
            }
        };

    let code = match repo.resolve_tree_type_id(&tree_name, &species).await {
        Ok(Some(code)) => code,
        Ok(None) => random_type_code(),
        Err(err) => {
            log::warn!("Failed to resolve type of {tree_name} ({species}): {err}");
            random_type_code()
        }
    };
    Ok(code.into_inner())
}

fn random_type_code() -> TreeTypeCode {
    TreeTypeCode::from_number(rand::random_range(100..1000))
}

/// Number of tree rows, proving the backend answers.
pub async fn health<R>(repo: &R) -> ServiceResult<usize>
where
    R: TreeReader + ?Sized,
{
    repo.count_trees().await.map_err(|err| {
        log::error!("Backend health check failed: {err}");
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::TreeStatus;
    use crate::repository::memory::InMemoryRepository;
    use crate::services::fixtures::tree;

    fn query(name: &str, species: &str) -> TreeTypeIdQuery {
        TreeTypeIdQuery {
            tree_name: name.to_string(),
            species: species.to_string(),
        }
    }

    fn fallback_code(code: &str) -> bool {
        code.strip_prefix('T')
            .and_then(|n| n.parse::<u32>().ok())
            .is_some_and(|n| (100..1000).contains(&n))
    }

    #[actix_web::test]
    async fn known_type_resolves_to_its_code() {
        let repo = InMemoryRepository::new().with_trees(vec![tree(
            "Neem",
            "Azadirachta indica",
            731,
            TreeStatus::Active,
        )]);

        let code = resolve_tree_type_id(&repo, query("Neem", "Azadirachta indica"))
            .await
            .unwrap();

        assert_eq!(code, "T731");
    }

    #[actix_web::test]
    async fn unknown_or_failing_lookup_falls_back_to_random_code() {
        let unknown = resolve_tree_type_id(&InMemoryRepository::new(), query("Neem", "X"))
            .await
            .unwrap();
        assert!(fallback_code(&unknown), "{unknown}");

        let failing = resolve_tree_type_id(
            &InMemoryRepository::new().failing_reads(),
            query("Neem", "X"),
        )
        .await
        .unwrap();
        assert!(fallback_code(&failing), "{failing}");
    }

    #[actix_web::test]
    async fn blank_names_are_rejected() {
        let result = resolve_tree_type_id(&InMemoryRepository::new(), query(" ", "X")).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn health_counts_trees() {
        let repo = InMemoryRepository::new().with_trees(vec![tree(
            "Neem",
            "Azadirachta indica",
            101,
            TreeStatus::Active,
        )]);
        assert_eq!(health(&repo).await.unwrap(), 1);
        assert!(health(&InMemoryRepository::new().failing_reads()).await.is_err());
    }
}
