use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::inspection::{
    InspectionCycle, InspectionStatus, NewInspection, UpdateInspection,
};
use crate::domain::types::{AreaName, EmailAddress, FreeText, VolunteerId};
use crate::forms::{FormError, non_blank, parse_optional_date, parse_optional_number};

#[derive(Deserialize, Default)]
/// Assignment form. `tree_species` repeats once per selected species, so the
/// body is parsed with `serde_html_form`.
pub struct AssignInspectionForm {
    #[serde(default)]
    pub scheme_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tree_species: Vec<String>,
    #[serde(default)]
    pub number_of_trees: String,
    #[serde(default)]
    pub inspection_cycle: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

impl AssignInspectionForm {
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|e| {
            log::warn!("Failed to parse the assignment form: {e}");
            FormError::Malformed
        })
    }
}

/// Validated assignment, waiting for the volunteer and the assigning admin.
#[derive(Debug)]
pub struct AssignInspectionPayload {
    pub scheme_name: String,
    pub area: AreaName,
    pub tree_species: Vec<String>,
    pub trees_count: u32,
    pub inspection_cycle: InspectionCycle,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<FreeText>,
}

impl TryFrom<AssignInspectionForm> for AssignInspectionPayload {
    type Error = FormError;

    fn try_from(form: AssignInspectionForm) -> Result<Self, Self::Error> {
        let tree_species: Vec<String> = form
            .tree_species
            .iter()
            .filter_map(|s| non_blank(Some(s.as_str())))
            .collect();
        let scheme_name = non_blank(Some(form.scheme_name.as_str())).ok_or(FormError::MissingRequired)?;
        let location = non_blank(Some(form.location.as_str())).ok_or(FormError::MissingRequired)?;
        if tree_species.is_empty() {
            return Err(FormError::MissingRequired);
        }
        let trees_count = parse_optional_number(Some(form.number_of_trees.as_str()))?
            .filter(|count| *count > 0)
            .ok_or(FormError::MissingRequired)?;
        let start_date =
            parse_optional_date(Some(form.start_date.as_str()))?.ok_or(FormError::MissingRequired)?;

        let inspection_cycle = InspectionCycle::from(form.inspection_cycle.as_str());
        let end_date = parse_optional_date(Some(form.end_date.as_str()))?
            .unwrap_or_else(|| inspection_cycle.end_date_from(start_date));

        Ok(Self {
            scheme_name,
            area: AreaName::new(location)?,
            tree_species,
            trees_count,
            inspection_cycle,
            start_date,
            end_date,
            description: FreeText::optional(form.description),
        })
    }
}

impl AssignInspectionPayload {
    /// New pending inspection due at the end of the first cycle.
    pub fn into_domain(self, volunteer_id: VolunteerId, assigned_by: &EmailAddress) -> NewInspection {
        NewInspection {
            volunteer_id,
            area: self.area,
            trees_count: self.trees_count,
            due_date: self.end_date,
            assigned_by: Some(assigned_by.as_str().to_string()),
            status: InspectionStatus::Pending,
            scheme_name: self.scheme_name,
            tree_species: self.tree_species,
            inspection_cycle: self.inspection_cycle,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
        }
    }
}

#[derive(Deserialize, Default)]
/// Partial update of an inspection; blank fields are left untouched.
pub struct UpdateInspectionForm {
    pub status: Option<String>,
    pub trees_inspected: Option<String>,
    pub completed_date: Option<String>,
    pub tree_condition: Option<String>,
    pub inspector_notes: Option<String>,
}

impl TryFrom<UpdateInspectionForm> for UpdateInspection {
    type Error = FormError;

    fn try_from(form: UpdateInspectionForm) -> Result<Self, Self::Error> {
        let status = non_blank(form.status.as_deref())
            .map(|raw| InspectionStatus::try_from(raw.as_str()).map_err(FormError::InvalidStatus))
            .transpose()?;

        Ok(Self {
            status,
            trees_inspected: parse_optional_number(form.trees_inspected.as_deref())?,
            completed_date: parse_optional_date(form.completed_date.as_deref())?,
            tree_condition: non_blank(form.tree_condition.as_deref()),
            inspector_notes: form.inspector_notes.and_then(FreeText::optional),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_repeated_species() {
        let body = b"scheme_name=Green+Ward&location=Ward+4&tree_species=Neem&tree_species=Mango\
&number_of_trees=25&inspection_cycle=Every+Month&start_date=2025-01-31&end_date=";
        let form = AssignInspectionForm::from_bytes(body).unwrap();
        assert_eq!(form.tree_species, vec!["Neem", "Mango"]);

        let payload = AssignInspectionPayload::try_from(form).unwrap();
        assert_eq!(payload.end_date, date("2025-02-28"));
        assert_eq!(payload.trees_count, 25);
        assert!(payload.description.is_none());
    }

    #[test]
    fn explicit_end_date_wins() {
        let form = AssignInspectionForm {
            scheme_name: "Scheme".to_string(),
            location: "Ward 1".to_string(),
            tree_species: vec!["Neem".to_string()],
            number_of_trees: "3".to_string(),
            inspection_cycle: "Every Week".to_string(),
            start_date: "2025-01-01".to_string(),
            end_date: "2025-03-01".to_string(),
            description: "Check saplings".to_string(),
        };
        let admin = EmailAddress::new("staff@city.gov").unwrap();
        let volunteer_id = VolunteerId::new(Uuid::new_v4());

        let inspection = AssignInspectionPayload::try_from(form)
            .unwrap()
            .into_domain(volunteer_id, &admin);

        assert_eq!(inspection.due_date, date("2025-03-01"));
        assert_eq!(inspection.status, InspectionStatus::Pending);
        assert_eq!(inspection.assigned_by.as_deref(), Some("staff@city.gov"));
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut form = AssignInspectionForm {
            scheme_name: "Scheme".to_string(),
            location: "Ward 1".to_string(),
            number_of_trees: "3".to_string(),
            start_date: "2025-01-01".to_string(),
            ..AssignInspectionForm::default()
        };
        form.tree_species = vec!["  ".to_string()];
        assert!(matches!(
            AssignInspectionPayload::try_from(form),
            Err(FormError::MissingRequired)
        ));

        let zero_trees = AssignInspectionForm {
            scheme_name: "Scheme".to_string(),
            location: "Ward 1".to_string(),
            tree_species: vec!["Neem".to_string()],
            number_of_trees: "0".to_string(),
            start_date: "2025-01-01".to_string(),
            ..AssignInspectionForm::default()
        };
        assert!(matches!(
            AssignInspectionPayload::try_from(zero_trees),
            Err(FormError::MissingRequired)
        ));
    }

    #[test]
    fn update_form_ignores_blanks() {
        let form = UpdateInspectionForm {
            status: Some("Completed".to_string()),
            trees_inspected: Some("".to_string()),
            completed_date: Some("2025-02-01".to_string()),
            tree_condition: Some(" ".to_string()),
            inspector_notes: None,
        };
        let update = UpdateInspection::try_from(form).unwrap();
        assert_eq!(update.status, Some(InspectionStatus::Completed));
        assert_eq!(update.trees_inspected, None);
        assert_eq!(update.completed_date, Some(date("2025-02-01")));
        assert_eq!(update.tree_condition, None);

        let bad = UpdateInspectionForm {
            status: Some("Archived".to_string()),
            ..UpdateInspectionForm::default()
        };
        assert!(matches!(
            UpdateInspection::try_from(bad),
            Err(FormError::InvalidStatus(_))
        ));
    }
}
