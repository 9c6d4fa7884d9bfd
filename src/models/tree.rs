//! Backend row shapes for the `trees` table and tree procedures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::tree::{
    NewTree as DomainNewTree, Tree as DomainTree, TreeStatus, TreeSummary as DomainTreeSummary,
    TreeType as DomainTreeType, UpdateTreeMetrics as DomainUpdateTreeMetrics,
};
use crate::domain::types::{SpeciesName, TreeId, TreeName, TreeTypeCode, TypeConstraintError};

pub const TREES_TABLE: &str = "trees";
pub const TREE_TYPES_TABLE: &str = "tree_types";

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Row of the `trees` table.
pub struct Tree {
    pub id: Uuid,
    pub custom_id: Option<String>,
    pub tree_name: String,
    pub species: String,
    pub o2_released: Option<String>,
    pub co2_released: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
/// `tree_name, species` projection used to build form options.
pub struct TreePair {
    pub tree_name: Option<String>,
    pub species: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
/// Row returned by the `get_tree_summary` procedure.
pub struct TreeSummary {
    pub id: Uuid,
    pub custom_id: Option<String>,
    pub tree_name: String,
    pub species: String,
    pub total_trees: usize,
    pub active_trees: usize,
    pub dead_trees: usize,
    pub o2_released: Option<String>,
    pub co2_released: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
/// Row returned by the `get_tree_types` procedure.
pub struct TreeType {
    pub custom_id: Option<String>,
    pub tree_name: String,
    pub species: String,
    pub tree_count: usize,
}

#[derive(Debug, Serialize)]
/// Insert payload for the `trees` table. The type code is assigned by a
/// backend trigger.
pub struct NewTree<'a> {
    pub tree_name: &'a str,
    pub species: &'a str,
    pub o2_released: &'a str,
    pub co2_released: &'a str,
}

#[derive(Debug, Serialize)]
/// Patch payload updating the release metrics of a tree type.
pub struct TreeMetricsPatch<'a> {
    pub o2_released: &'a str,
    pub co2_released: &'a str,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
/// Arguments of the `get_tree_summary` procedure.
pub struct TreeSummaryArgs<'a> {
    pub search_query: Option<&'a str>,
    pub limit_count: usize,
    pub offset_count: usize,
}

#[derive(Debug, Serialize)]
/// Arguments of the `get_tree_type_id` procedure.
pub struct TreeTypeIdArgs<'a> {
    pub p_tree_name: &'a str,
    pub p_species: &'a str,
}

fn type_code(value: Option<String>) -> Option<TreeTypeCode> {
    value.and_then(|code| TreeTypeCode::new(code).ok())
}

fn metric(value: Option<String>) -> String {
    value.unwrap_or_default()
}

impl TryFrom<Tree> for DomainTree {
    type Error = TypeConstraintError;

    fn try_from(row: Tree) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TreeId::new(row.id),
            custom_id: type_code(row.custom_id),
            tree_name: TreeName::new(row.tree_name)?,
            species: SpeciesName::new(row.species)?,
            o2_released: metric(row.o2_released),
            co2_released: metric(row.co2_released),
            status: row
                .status
                .as_deref()
                .map(TreeStatus::from)
                .unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<TreeSummary> for DomainTreeSummary {
    type Error = TypeConstraintError;

    fn try_from(row: TreeSummary) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TreeId::new(row.id),
            custom_id: type_code(row.custom_id),
            tree_name: TreeName::new(row.tree_name)?,
            species: SpeciesName::new(row.species)?,
            total_trees: row.total_trees,
            active_trees: row.active_trees,
            dead_trees: row.dead_trees,
            o2_released: metric(row.o2_released),
            co2_released: metric(row.co2_released),
        })
    }
}

impl TryFrom<TreeType> for DomainTreeType {
    type Error = TypeConstraintError;

    fn try_from(row: TreeType) -> Result<Self, Self::Error> {
        Ok(Self {
            custom_id: type_code(row.custom_id),
            tree_name: TreeName::new(row.tree_name)?,
            species: SpeciesName::new(row.species)?,
            tree_count: row.tree_count,
        })
    }
}

impl From<TreePair> for (String, String) {
    fn from(row: TreePair) -> Self {
        (
            row.tree_name.unwrap_or_default(),
            row.species.unwrap_or_default(),
        )
    }
}

impl<'a> From<&'a DomainNewTree> for NewTree<'a> {
    fn from(tree: &'a DomainNewTree) -> Self {
        Self {
            tree_name: tree.tree_name.as_str(),
            species: tree.species.as_str(),
            o2_released: tree.o2_released.as_str(),
            co2_released: tree.co2_released.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateTreeMetrics> for TreeMetricsPatch<'a> {
    fn from(metrics: &'a DomainUpdateTreeMetrics) -> Self {
        Self {
            o2_released: metrics.o2_released.as_str(),
            co2_released: metrics.co2_released.as_str(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_backend_row_to_domain() {
        let row: Tree = serde_json::from_value(json!({
            "id": "6f1c1a5e-8e0f-4c1e-9d8a-0f7c2b1d3e4f",
            "custom_id": "T101",
            "tree_name": "Neem",
            "species": "Azadirachta indica",
            "o2_released": "100 kg",
            "co2_released": null,
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": null
        }))
        .unwrap();

        let tree = DomainTree::try_from(row).unwrap();

        assert_eq!(tree.custom_id.unwrap().as_str(), "T101");
        assert_eq!(tree.status, TreeStatus::Active);
        assert_eq!(tree.co2_released, "");
        assert!(tree.created_at.is_some());
    }

    #[test]
    fn rejects_rows_without_a_name() {
        let row = Tree {
            id: Uuid::new_v4(),
            custom_id: None,
            tree_name: " ".to_string(),
            species: "Ficus".to_string(),
            o2_released: None,
            co2_released: None,
            status: Some("dead".to_string()),
            created_at: None,
            updated_at: None,
        };

        assert_eq!(
            DomainTree::try_from(row),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn insert_payload_omits_type_code() {
        let new_tree = DomainNewTree::new(
            TreeName::new("Neem").unwrap(),
            SpeciesName::new("Azadirachta indica").unwrap(),
            None,
            Some("5 kg".to_string()),
        );
        let payload = serde_json::to_value(NewTree::from(&new_tree)).unwrap();
        assert_eq!(
            payload,
            json!({
                "tree_name": "Neem",
                "species": "Azadirachta indica",
                "o2_released": "0 kg",
                "co2_released": "5 kg"
            })
        );
    }
}
