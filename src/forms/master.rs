use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

use crate::domain::tree::{NewTree, UpdateTreeMetrics};
use crate::domain::types::{SpeciesName, TreeName};
use crate::forms::{FormError, non_blank};

/// Names of a tree type, both required.
fn tree_type(name: &str, species: &str) -> Result<(TreeName, SpeciesName), FormError> {
    match (non_blank(Some(name)), non_blank(Some(species))) {
        (Some(name), Some(species)) => Ok((TreeName::new(name)?, SpeciesName::new(species)?)),
        _ => Err(FormError::MissingTreeFields),
    }
}

#[derive(Deserialize)]
/// Adds a single tree to the catalog.
pub struct AddTreeForm {
    #[serde(default)]
    pub tree_name: String,
    #[serde(default)]
    pub species: String,
    pub o2_released: Option<String>,
    pub co2_released: Option<String>,
}

impl TryFrom<AddTreeForm> for NewTree {
    type Error = FormError;

    fn try_from(form: AddTreeForm) -> Result<Self, Self::Error> {
        let (tree_name, species) = tree_type(&form.tree_name, &form.species)?;
        Ok(NewTree::new(
            tree_name,
            species,
            form.o2_released,
            form.co2_released,
        ))
    }
}

#[derive(Deserialize)]
/// Edits a tree type. The original names identify the rows to change.
pub struct UpdateTreeForm {
    pub original_tree_name: String,
    pub original_species: String,
    #[serde(default)]
    pub tree_name: String,
    #[serde(default)]
    pub species: String,
    pub o2_released: Option<String>,
    pub co2_released: Option<String>,
}

#[derive(Debug)]
pub struct UpdateTreePayload {
    pub original_tree_name: TreeName,
    pub original_species: SpeciesName,
    pub tree_name: TreeName,
    pub species: SpeciesName,
    pub metrics: UpdateTreeMetrics,
}

impl UpdateTreePayload {
    /// Whether the name or species of the type changes.
    pub fn is_rename(&self) -> bool {
        self.tree_name != self.original_tree_name || self.species != self.original_species
    }

    /// Replacement row used when renaming, one per existing tree.
    pub fn replacement(&self) -> NewTree {
        NewTree {
            tree_name: self.tree_name.clone(),
            species: self.species.clone(),
            o2_released: self.metrics.o2_released.clone(),
            co2_released: self.metrics.co2_released.clone(),
        }
    }
}

impl TryFrom<UpdateTreeForm> for UpdateTreePayload {
    type Error = FormError;

    fn try_from(form: UpdateTreeForm) -> Result<Self, Self::Error> {
        let (original_tree_name, original_species) =
            tree_type(&form.original_tree_name, &form.original_species)?;
        let (tree_name, species) = tree_type(&form.tree_name, &form.species)?;
        Ok(Self {
            original_tree_name,
            original_species,
            tree_name,
            species,
            metrics: UpdateTreeMetrics::new(form.o2_released, form.co2_released),
        })
    }
}

#[derive(Deserialize)]
pub struct DeleteTreeForm {
    pub tree_name: String,
    pub species: String,
}

impl DeleteTreeForm {
    pub fn into_names(self) -> Result<(TreeName, SpeciesName), FormError> {
        tree_type(&self.tree_name, &self.species)
    }
}

#[derive(MultipartForm)]
/// Bulk import of trees from a CSV file with a header row.
pub struct UploadTreesForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

#[derive(Deserialize)]
struct TreeCsvRecord {
    tree_name: String,
    species: String,
    #[serde(default)]
    o2_released: Option<String>,
    #[serde(default)]
    co2_released: Option<String>,
}

impl UploadTreesForm {
    pub fn parse(&self) -> Result<Vec<NewTree>, FormError> {
        let file = std::fs::File::open(self.csv.file.path())
            .map_err(|e| FormError::Csv(e.to_string()))?;
        parse_trees_csv(file)
    }
}

/// Reads `tree_name,species,o2_released,co2_released` rows.
///
/// Metric columns may be missing or blank. The line number of the first bad
/// row is reported.
pub fn parse_trees_csv<R: Read>(reader: R) -> Result<Vec<NewTree>, FormError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut trees = Vec::new();
    for (index, result) in rdr.deserialize::<TreeCsvRecord>().enumerate() {
        let line = index + 2;
        let record = result.map_err(|e| FormError::Csv(format!("line {line}: {e}")))?;
        let (tree_name, species) = tree_type(&record.tree_name, &record.species)
            .map_err(|e| FormError::Csv(format!("line {line}: {e}")))?;
        trees.push(NewTree::new(
            tree_name,
            species,
            record.o2_released,
            record.co2_released,
        ));
    }

    if trees.is_empty() {
        return Err(FormError::Csv("no trees found".to_string()));
    }
    Ok(trees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::DEFAULT_RELEASE_METRIC;

    #[test]
    fn add_form_requires_both_names() {
        let form = AddTreeForm {
            tree_name: "Neem".to_string(),
            species: "  ".to_string(),
            o2_released: None,
            co2_released: None,
        };
        assert!(matches!(
            NewTree::try_from(form),
            Err(FormError::MissingTreeFields)
        ));
    }

    #[test]
    fn update_detects_rename() {
        let form = UpdateTreeForm {
            original_tree_name: "Neem".to_string(),
            original_species: "Azadirachta indica".to_string(),
            tree_name: "Neem".to_string(),
            species: "Azadirachta indica".to_string(),
            o2_released: Some("12 kg".to_string()),
            co2_released: None,
        };
        let payload = UpdateTreePayload::try_from(form).unwrap();
        assert!(!payload.is_rename());
        assert_eq!(payload.metrics.o2_released, "12 kg");
        assert_eq!(payload.metrics.co2_released, DEFAULT_RELEASE_METRIC);

        let renamed = UpdateTreeForm {
            original_tree_name: "Neem".to_string(),
            original_species: "Azadirachta indica".to_string(),
            tree_name: "Indian Lilac".to_string(),
            species: "Azadirachta indica".to_string(),
            o2_released: None,
            co2_released: None,
        };
        let payload = UpdateTreePayload::try_from(renamed).unwrap();
        assert!(payload.is_rename());
        assert_eq!(payload.replacement().tree_name.as_str(), "Indian Lilac");
    }

    #[test]
    fn csv_rows_fill_default_metrics() {
        let data = "tree_name,species,o2_released,co2_released\n\
                    Neem,Azadirachta indica,10 kg,4 kg\n\
                    Mango , Mangifera indica,,\n";
        let trees = parse_trees_csv(data.as_bytes()).unwrap();

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].o2_released, "10 kg");
        assert_eq!(trees[1].tree_name.as_str(), "Mango");
        assert_eq!(trees[1].co2_released, DEFAULT_RELEASE_METRIC);
    }

    #[test]
    fn csv_reports_line_of_bad_row() {
        let data = "tree_name,species\nNeem,Azadirachta indica\n,Mangifera indica\n";
        match parse_trees_csv(data.as_bytes()) {
            Err(FormError::Csv(message)) => assert!(message.starts_with("line 3")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_csv_is_rejected() {
        assert!(matches!(
            parse_trees_csv("tree_name,species\n".as_bytes()),
            Err(FormError::Csv(_))
        ));
    }
}
