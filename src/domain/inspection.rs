use std::fmt::Display;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AreaName, FreeText, InspectionId, VolunteerId};
use crate::domain::volunteer::Volunteer;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum InspectionStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Overdue,
}

impl InspectionStatus {
    pub const ALL: [InspectionStatus; 4] = [
        InspectionStatus::Pending,
        InspectionStatus::InProgress,
        InspectionStatus::Completed,
        InspectionStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "Pending",
            InspectionStatus::InProgress => "In Progress",
            InspectionStatus::Completed => "Completed",
            InspectionStatus::Overdue => "Overdue",
        }
    }
}

impl Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InspectionStatus {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        InspectionStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown inspection status: {s}"))
    }
}

/// How often an assigned area is re-inspected.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum InspectionCycle {
    #[default]
    #[serde(rename = "Every Week")]
    EveryWeek,
    #[serde(rename = "Every Month")]
    EveryMonth,
    #[serde(rename = "Every 3 Months")]
    EveryThreeMonths,
}

impl InspectionCycle {
    pub const ALL: [InspectionCycle; 3] = [
        InspectionCycle::EveryWeek,
        InspectionCycle::EveryMonth,
        InspectionCycle::EveryThreeMonths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionCycle::EveryWeek => "Every Week",
            InspectionCycle::EveryMonth => "Every Month",
            InspectionCycle::EveryThreeMonths => "Every 3 Months",
        }
    }

    /// End of the first cycle starting at `start`. Month steps clamp to the
    /// last day of the target month.
    pub fn end_date_from(&self, start: NaiveDate) -> NaiveDate {
        let end = match self {
            InspectionCycle::EveryWeek => start.checked_add_days(Days::new(7)),
            InspectionCycle::EveryMonth => start.checked_add_months(Months::new(1)),
            InspectionCycle::EveryThreeMonths => start.checked_add_months(Months::new(3)),
        };
        end.unwrap_or(start)
    }
}

impl Display for InspectionCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for InspectionCycle {
    fn from(s: &str) -> Self {
        InspectionCycle::ALL
            .into_iter()
            .find(|cycle| cycle.as_str() == s.trim())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Inspection {
    pub id: InspectionId,
    /// Human-facing code assigned by the backend.
    pub inspection_id: String,
    pub volunteer_id: VolunteerId,
    pub area: AreaName,
    pub trees_count: u32,
    pub due_date: NaiveDate,
    pub status: InspectionStatus,
    pub trees_inspected: u32,
    pub completed_date: Option<NaiveDate>,
    pub tree_condition: Option<String>,
    pub inspector_notes: Option<String>,
    pub inspection_images: Vec<String>,
    pub assigned_by: Option<String>,
    pub scheme_name: Option<String>,
    pub tree_species: Option<String>,
    pub inspection_cycle: Option<InspectionCycle>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Owning volunteer when the read joined it.
    pub volunteer: Option<Volunteer>,
}

impl Inspection {
    /// Pending inspections whose due date has passed are shown as overdue.
    ///
    /// The change is presentation only and never written back.
    pub fn reclassify_overdue(&mut self, today: NaiveDate) {
        if self.status == InspectionStatus::Pending && self.due_date < today {
            self.status = InspectionStatus::Overdue;
        }
    }

    pub fn volunteer_name(&self) -> Option<&str> {
        self.volunteer.as_ref().map(|v| v.name.as_str())
    }

    pub fn volunteer_email(&self) -> Option<&str> {
        self.volunteer.as_ref().map(|v| v.email.as_str())
    }
}

/// Assignment of an inspection to a volunteer.
#[derive(Clone, Debug, PartialEq)]
pub struct NewInspection {
    pub volunteer_id: VolunteerId,
    pub area: AreaName,
    pub trees_count: u32,
    pub due_date: NaiveDate,
    pub assigned_by: Option<String>,
    pub status: InspectionStatus,
    pub scheme_name: String,
    pub tree_species: Vec<String>,
    pub inspection_cycle: InspectionCycle,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<FreeText>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateInspection {
    pub status: Option<InspectionStatus>,
    pub trees_inspected: Option<u32>,
    pub completed_date: Option<NaiveDate>,
    pub tree_condition: Option<String>,
    pub inspector_notes: Option<FreeText>,
}

impl UpdateInspection {
    pub fn is_empty(&self) -> bool {
        self == &UpdateInspection::default()
    }
}

/// Counters shown above the inspection table.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct InspectionStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub overdue: usize,
}

impl InspectionStats {
    pub fn from_inspections<'a, I>(inspections: I) -> Self
    where
        I: IntoIterator<Item = &'a Inspection>,
    {
        inspections
            .into_iter()
            .fold(InspectionStats::default(), |mut stats, inspection| {
                stats.total += 1;
                match inspection.status {
                    InspectionStatus::Completed => stats.completed += 1,
                    InspectionStatus::InProgress => stats.in_progress += 1,
                    InspectionStatus::Overdue => stats.overdue += 1,
                    InspectionStatus::Pending => {}
                }
                stats
            })
    }
}
