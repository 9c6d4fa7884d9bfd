use crate::domain::tree::{Tree, TreeOptions};
use crate::dto::trees::{TreesPageData, TreesQuery};
use crate::listing::{DEFAULT_ITEMS_PER_PAGE, MultiSelect, Paginated};
use crate::repository::{TreeListQuery, TreeReader};
use crate::services::ServiceResult;

/// Loads tree rows matching the search term, narrowed to the selected species.
pub async fn load_trees_page<R>(repo: &R, query: TreesQuery) -> ServiceResult<TreesPageData>
where
    R: TreeReader + ?Sized,
{
    let search_query = query
        .q
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut list_query = TreeListQuery::new();
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let trees = repo.list_trees(&list_query).await.map_err(|err| {
        log::error!("Failed to list trees: {err}");
        err
    })?;
    let pairs = repo.list_tree_pairs().await.map_err(|err| {
        log::error!("Failed to list tree species: {err}");
        err
    })?;

    let selected_species = MultiSelect::new(query.species);
    let filtered: Vec<Tree> = trees
        .into_iter()
        .filter(|tree| selected_species.matches(tree.species.as_str()))
        .collect();

    Ok(TreesPageData {
        trees: Paginated::from_slice(&filtered, query.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE),
        search_query,
        species_options: TreeOptions::from_pairs(pairs).species,
        selected_species,
    })
}
