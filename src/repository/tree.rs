//! Tree rows, type registry and aggregation procedures.

use serde::Serialize;

use crate::backend::TableQuery;
use crate::domain::tree::{NewTree, Tree, TreeSummary, TreeType, UpdateTreeMetrics};
use crate::domain::types::{SpeciesName, TreeName, TreeTypeCode};
use crate::models::tree::{
    NewTree as DbNewTree, TREE_TYPES_TABLE, TREES_TABLE, Tree as DbTree, TreeMetricsPatch,
    TreePair as DbTreePair, TreeSummary as DbTreeSummary, TreeSummaryArgs,
    TreeType as DbTreeType, TreeTypeIdArgs,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    BackendRepository, TreeListQuery, TreeReader, TreeSummaryQuery, TreeWriter,
};

const TREE_SEARCH_COLUMNS: [&str; 3] = ["tree_name", "species", "custom_id"];

#[derive(Serialize)]
struct NoArgs {}

fn of_type(tree_name: &TreeName, species: &SpeciesName) -> TableQuery {
    TableQuery::new()
        .eq("tree_name", tree_name)
        .eq("species", species)
}

impl TreeReader for BackendRepository {
    async fn list_trees(&self, query: &TreeListQuery) -> RepositoryResult<Vec<Tree>> {
        let mut table_query = TableQuery::new().select("*").order_desc("created_at");
        if let Some(term) = &query.search {
            table_query = table_query.ilike_any(&TREE_SEARCH_COLUMNS, term);
        }

        let rows: Vec<DbTree> = self.client.select(TREES_TABLE, &table_query).await?;
        rows.into_iter()
            .map(|row| Tree::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    async fn get_tree_summary(
        &self,
        query: &TreeSummaryQuery,
    ) -> RepositoryResult<Vec<TreeSummary>> {
        let args = TreeSummaryArgs {
            search_query: query.search.as_deref(),
            limit_count: query.limit,
            offset_count: query.offset,
        };
        let rows: Vec<DbTreeSummary> = self.client.rpc("get_tree_summary", &args).await?;
        rows.into_iter()
            .map(|row| TreeSummary::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    async fn list_tree_types(&self) -> RepositoryResult<Vec<TreeType>> {
        let rows: Vec<DbTreeType> = self.client.rpc("get_tree_types", &NoArgs {}).await?;
        rows.into_iter()
            .map(|row| TreeType::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    async fn resolve_tree_type_id(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<Option<TreeTypeCode>> {
        let args = TreeTypeIdArgs {
            p_tree_name: tree_name.as_str(),
            p_species: species.as_str(),
        };
        let code: Option<String> = self.client.rpc("get_tree_type_id", &args).await?;
        code.map(|code| TreeTypeCode::new(code).map_err(RepositoryError::from))
            .transpose()
    }

    async fn count_trees(&self) -> RepositoryResult<usize> {
        self.client.count(TREES_TABLE, &TableQuery::new()).await
    }

    async fn list_tree_pairs(&self) -> RepositoryResult<Vec<(String, String)>> {
        let query = TableQuery::new()
            .select("tree_name,species")
            .order_asc("tree_name");
        let rows: Vec<DbTreePair> = self.client.select(TREES_TABLE, &query).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_trees_of_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<usize> {
        self.client
            .count(TREES_TABLE, &of_type(tree_name, species))
            .await
    }
}

impl TreeWriter for BackendRepository {
    async fn create_trees(&self, new_trees: &[NewTree]) -> RepositoryResult<usize> {
        if new_trees.is_empty() {
            return Ok(0);
        }
        let payload: Vec<DbNewTree> = new_trees.iter().map(Into::into).collect();
        let rows: Vec<serde_json::Value> = self.client.insert(TREES_TABLE, &payload, "id").await?;
        Ok(rows.len())
    }

    async fn update_tree_metrics(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
        metrics: &UpdateTreeMetrics,
    ) -> RepositoryResult<usize> {
        let patch = TreeMetricsPatch::from(metrics);
        let query = of_type(tree_name, species).select("id");
        let rows: Vec<serde_json::Value> = self.client.update(TREES_TABLE, &query, &patch).await?;
        Ok(rows.len())
    }

    async fn delete_trees_of_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<()> {
        self.client
            .delete(TREES_TABLE, &of_type(tree_name, species))
            .await
    }

    async fn delete_tree_type(
        &self,
        tree_name: &TreeName,
        species: &SpeciesName,
    ) -> RepositoryResult<()> {
        self.client
            .delete(TREE_TYPES_TABLE, &of_type(tree_name, species))
            .await
    }
}
