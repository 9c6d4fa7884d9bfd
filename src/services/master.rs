//! Master catalog of tree types.
//!
//! A tree type is the `(tree_name, species)` pair shared by a group of tree
//! rows. Editing a type rewrites every row of the group.

use crate::domain::tree::{NewTree, TreeOptions, TreeSummary, summarize_trees};
use crate::domain::types::TreeName;
use crate::dto::master::{FilterView, MasterPageData, MasterQuery};
use crate::forms::master::{
    AddTreeForm, DeleteTreeForm, UpdateTreeForm, UpdateTreePayload, UploadTreesForm,
};
use crate::listing::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{TreeListQuery, TreeReader, TreeSummaryQuery, TreeWriter};
use crate::services::ServiceResult;

fn log_read_error(err: RepositoryError) -> RepositoryError {
    log::error!("Failed to fetch tree data: {err}");
    err
}

/// Loads one page of type summaries.
///
/// The page comes from the `get_tree_summary` procedure. When the procedure
/// fails, the rows are summarized in process instead.
pub async fn load_master_page<R>(repo: &R, query: MasterQuery) -> ServiceResult<MasterPageData>
where
    R: TreeReader + ?Sized,
{
    let filter = query.filter();
    let page = query.page.unwrap_or(1);
    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let search = search_query.clone().unwrap_or_default();

    let summary_query = TreeSummaryQuery::new(DEFAULT_ITEMS_PER_PAGE)
        .page(page)
        .search(search.clone());

    let summaries = match repo.get_tree_summary(&summary_query).await {
        Ok(rows) => {
            let total_types = repo.list_tree_types().await.map_err(log_read_error)?.len();
            let items: Vec<TreeSummary> = rows.into_iter().filter(|s| filter.matches(s)).collect();
            Paginated::new(items, page, total_types, DEFAULT_ITEMS_PER_PAGE)
        }
        Err(err) => {
            log::warn!("Tree summary procedure failed, summarizing rows instead: {err}");
            let trees = repo
                .list_trees(&TreeListQuery::new().search(search))
                .await
                .map_err(log_read_error)?;
            let all: Vec<TreeSummary> = summarize_trees(&trees)
                .into_iter()
                .filter(|s| filter.matches(s))
                .collect();
            Paginated::from_slice(&all, page, DEFAULT_ITEMS_PER_PAGE)
        }
    };

    let pairs = repo.list_tree_pairs().await.map_err(log_read_error)?;

    Ok(MasterPageData {
        summaries,
        search_query,
        filter: FilterView::from(&filter),
        options: TreeOptions::from_pairs(pairs),
    })
}

/// Adds a single tree and returns its name.
pub async fn add_tree<R>(repo: &R, form: AddTreeForm) -> ServiceResult<TreeName>
where
    R: TreeWriter + ?Sized,
{
    let new_tree = NewTree::try_from(form)?;
    repo.create_trees(std::slice::from_ref(&new_tree))
        .await
        .map_err(|err| {
            log::error!("Failed to add tree {}: {err}", new_tree.tree_name);
            err
        })?;
    Ok(new_tree.tree_name)
}

/// Applies an edit to every tree of a type and returns the resulting name.
///
/// A rename replaces the rows: the old rows are deleted and as many rows are
/// inserted under the new name. Failing to drop the old `tree_types` entry is
/// only logged.
pub async fn update_tree_type<R>(repo: &R, form: UpdateTreeForm) -> ServiceResult<TreeName>
where
    R: TreeReader + TreeWriter + ?Sized,
{
    let payload = UpdateTreePayload::try_from(form)?;
    let (name, species) = (&payload.original_tree_name, &payload.original_species);
    let log_error = |err: RepositoryError| {
        log::error!("Failed to update {name} ({species}) trees: {err}");
        err
    };

    if payload.is_rename() {
        let count = repo
            .count_trees_of_type(name, species)
            .await
            .map_err(log_error)?;

        if let Err(err) = repo.delete_tree_type(name, species).await {
            log::warn!("Failed to remove tree type {name} ({species}): {err}");
        }

        repo.delete_trees_of_type(name, species)
            .await
            .map_err(log_error)?;

        let replacements: Vec<NewTree> = vec![payload.replacement(); count];
        if !replacements.is_empty() {
            repo.create_trees(&replacements).await.map_err(log_error)?;
        }
    } else {
        repo.update_tree_metrics(name, species, &payload.metrics)
            .await
            .map_err(log_error)?;
    }

    Ok(payload.tree_name)
}

/// Deletes every tree of a type and its `tree_types` entry.
pub async fn delete_tree_type<R>(repo: &R, form: DeleteTreeForm) -> ServiceResult<TreeName>
where
    R: TreeWriter + ?Sized,
{
    let (name, species) = form.into_names()?;
    let log_error = |err: RepositoryError| {
        log::error!("Failed to delete {name} ({species}) trees: {err}");
        err
    };

    repo.delete_trees_of_type(&name, &species)
        .await
        .map_err(log_error)?;
    repo.delete_tree_type(&name, &species)
        .await
        .map_err(log_error)?;

    Ok(name)
}

/// Imports the uploaded CSV and returns the number of trees created.
pub async fn upload_trees<R>(repo: &R, form: &UploadTreesForm) -> ServiceResult<usize>
where
    R: TreeWriter + ?Sized,
{
    let trees = form.parse().map_err(|err| {
        log::error!("Failed to parse trees: {err}");
        err
    })?;
    let created = repo.create_trees(&trees).await.map_err(|err| {
        log::error!("Failed to import trees: {err}");
        err
    })?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::TreeStatus;
    use crate::repository::memory::InMemoryRepository;
    use crate::services::ServiceError;
    use crate::services::fixtures::tree;

    fn repo() -> InMemoryRepository {
        InMemoryRepository::new().with_trees(vec![
            tree("Neem", "Azadirachta indica", 101, TreeStatus::Active),
            tree("Neem", "Azadirachta indica", 101, TreeStatus::Active),
            tree("Neem", "Azadirachta indica", 101, TreeStatus::Dead),
            tree("Mango", "Mangifera indica", 102, TreeStatus::Active),
        ])
    }

    fn update_form(tree_name: &str, o2: &str) -> UpdateTreeForm {
        UpdateTreeForm {
            original_tree_name: "Neem".to_string(),
            original_species: "Azadirachta indica".to_string(),
            tree_name: tree_name.to_string(),
            species: "Azadirachta indica".to_string(),
            o2_released: Some(o2.to_string()),
            co2_released: None,
        }
    }

    #[actix_web::test]
    async fn summary_procedure_and_fallback_agree() {
        let with_procedure = load_master_page(&repo(), MasterQuery::default())
            .await
            .unwrap();
        let fallback = load_master_page(
            &repo().without_summary_procedure(),
            MasterQuery::default(),
        )
        .await
        .unwrap();

        assert_eq!(with_procedure.summaries.items, fallback.summaries.items);
        assert_eq!(fallback.summaries.total_items, 2);
        assert_eq!(fallback.summaries.items[0].total_trees, 3);
        assert_eq!(fallback.summaries.items[0].dead_trees, 1);
        assert_eq!(fallback.options.names, vec!["Mango", "Neem"]);
    }

    #[actix_web::test]
    async fn fallback_applies_filters() {
        let query = MasterQuery {
            dead: Some(false),
            ..MasterQuery::default()
        };
        let data = load_master_page(&repo().without_summary_procedure(), query)
            .await
            .unwrap();

        assert_eq!(data.summaries.total_items, 1);
        assert_eq!(data.summaries.items[0].tree_name.as_str(), "Mango");
        assert!(!data.filter.show_dead);
    }

    #[actix_web::test]
    async fn read_failure_surfaces() {
        let result = load_master_page(&repo().failing_reads(), MasterQuery::default()).await;
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }

    #[actix_web::test]
    async fn add_tree_defaults_metrics() {
        let repo = InMemoryRepository::new();
        let name = add_tree(
            &repo,
            AddTreeForm {
                tree_name: "Peepal".to_string(),
                species: "Ficus religiosa".to_string(),
                o2_released: None,
                co2_released: Some("".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(name.as_str(), "Peepal");
        let trees = repo.trees();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].o2_released, "0 kg");
    }

    #[actix_web::test]
    async fn add_tree_requires_names() {
        let repo = InMemoryRepository::new();
        let result = add_tree(
            &repo,
            AddTreeForm {
                tree_name: "".to_string(),
                species: "Ficus religiosa".to_string(),
                o2_released: None,
                co2_released: None,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(ServiceError::Form(m)) if m == "Tree name and scientific name are required"
        ));
        assert_eq!(repo.writes(), 0);
    }

    #[actix_web::test]
    async fn metric_update_touches_every_tree_of_type() {
        let repo = repo();
        update_tree_type(&repo, update_form("Neem", "15 kg"))
            .await
            .unwrap();

        let trees = repo.trees();
        assert_eq!(trees.iter().filter(|t| t.o2_released == "15 kg").count(), 3);
        assert_eq!(trees.len(), 4);
    }

    #[actix_web::test]
    async fn rename_replaces_rows_with_same_count() {
        let repo = repo();
        let name = update_tree_type(&repo, update_form("Indian Lilac", "12 kg"))
            .await
            .unwrap();

        assert_eq!(name.as_str(), "Indian Lilac");
        let trees = repo.trees();
        assert_eq!(trees.len(), 4);
        assert_eq!(
            trees.iter().filter(|t| t.tree_name.as_str() == "Indian Lilac").count(),
            3
        );
        assert!(trees.iter().all(|t| t.tree_name.as_str() != "Neem"));
        assert!(
            !repo
                .tree_types()
                .contains(&("Neem".to_string(), "Azadirachta indica".to_string()))
        );
    }

    #[actix_web::test]
    async fn rename_survives_tree_type_delete_failure() {
        let repo = repo().failing_tree_type_delete();
        update_tree_type(&repo, update_form("Indian Lilac", "12 kg"))
            .await
            .unwrap();

        assert_eq!(repo.trees().len(), 4);
        assert!(
            repo.tree_types()
                .contains(&("Neem".to_string(), "Azadirachta indica".to_string()))
        );
    }

    #[actix_web::test]
    async fn delete_removes_rows_and_type() {
        let repo = repo();
        let name = delete_tree_type(
            &repo,
            DeleteTreeForm {
                tree_name: "Neem".to_string(),
                species: "Azadirachta indica".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(name.as_str(), "Neem");
        assert_eq!(repo.trees().len(), 1);
        assert_eq!(
            repo.tree_types(),
            vec![("Mango".to_string(), "Mangifera indica".to_string())]
        );
    }
}
