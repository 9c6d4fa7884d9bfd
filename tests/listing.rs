use chrono::NaiveDate;
use uuid::Uuid;

use treetracker_admin::domain::inspection::{Inspection, InspectionStats, InspectionStatus};
use treetracker_admin::domain::types::{
    AreaName, EmailAddress, InspectionId, PersonName, PhoneNumber, VolunteerId,
};
use treetracker_admin::domain::volunteer::{VerificationStatus, Volunteer, VolunteerType};
use treetracker_admin::listing::{MultiSelect, Paginated, distinct_values, matches_search};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn inspection(code: &str, area: &str, due: &str, status: InspectionStatus) -> Inspection {
    Inspection {
        id: InspectionId::new(Uuid::new_v4()),
        inspection_id: code.to_string(),
        volunteer_id: VolunteerId::new(Uuid::new_v4()),
        area: AreaName::new(area).unwrap(),
        trees_count: 10,
        due_date: date(due),
        status,
        trees_inspected: 0,
        completed_date: None,
        tree_condition: None,
        inspector_notes: None,
        inspection_images: Vec::new(),
        assigned_by: None,
        scheme_name: None,
        tree_species: None,
        inspection_cycle: None,
        start_date: None,
        end_date: None,
        description: None,
        created_at: None,
        updated_at: None,
        volunteer: None,
    }
}

fn volunteer(name: &str, address: &str) -> Volunteer {
    Volunteer {
        id: VolunteerId::new(Uuid::new_v4()),
        volunteer_id: String::new(),
        salutation: None,
        name: PersonName::new(name).unwrap(),
        kind: VolunteerType::Individual,
        email: EmailAddress::new("volunteer@example.com").unwrap(),
        gender: None,
        phone: PhoneNumber::new("12345").unwrap(),
        organization_name: None,
        no_of_volunteers: None,
        aadhaar_number: None,
        address: Some(address.to_string()),
        document_url: None,
        trees_planted: 0,
        last_activity: None,
        verification_status: VerificationStatus::default(),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn every_item_lands_on_exactly_one_page() {
    let items: Vec<usize> = (0..47).collect();
    let first = Paginated::from_slice(&items, 1, 10);
    assert_eq!(first.total_pages, 5);
    assert_eq!(first.total_items, 47);

    let mut seen = Vec::new();
    for page in 1..=first.total_pages {
        let paginated = Paginated::from_slice(&items, page, 10);
        assert!(paginated.items.len() <= 10);
        seen.extend(paginated.items);
    }
    assert_eq!(seen, items);
}

#[test]
fn page_past_the_end_is_empty() {
    let items = vec!["a", "b", "c"];
    let paginated = Paginated::from_slice(&items, 9, 10);
    assert!(paginated.items.is_empty());
    assert_eq!(paginated.total_pages, 1);
}

#[test]
fn page_zero_is_treated_as_first() {
    let items: Vec<u32> = (1..=15).collect();
    let paginated = Paginated::from_slice(&items, 0, 10);
    assert_eq!(paginated.page, 1);
    assert_eq!(paginated.items.first(), Some(&1));
}

#[test]
fn filters_combine_search_and_selection() {
    let volunteers = [
        volunteer("Asha Rao", "Ward 4, Pune"),
        volunteer("Ravi Kumar", "MG Road, Mumbai"),
        volunteer("Green Earth Trust", "Ward 9,  Pune "),
    ];
    let locations = MultiSelect::new(["Pune"]);

    let matched: Vec<&str> = volunteers
        .iter()
        .filter(|v| matches_search("a", [v.name.as_str()]))
        .filter(|v| v.location().is_some_and(|location| locations.matches(location)))
        .map(|v| v.name.as_str())
        .collect();

    assert_eq!(matched, vec!["Asha Rao", "Green Earth Trust"]);
    assert_eq!(
        distinct_values(volunteers.iter().filter_map(Volunteer::location)),
        vec!["Pune", "Mumbai"]
    );
}

#[test]
fn overdue_inspections_are_counted_after_reclassification() {
    let today = date("2025-06-15");
    let mut inspections = vec![
        inspection("IN001", "Ward 1", "2025-06-01", InspectionStatus::Pending),
        inspection("IN002", "Ward 1", "2025-07-01", InspectionStatus::Pending),
        inspection("IN003", "Ward 2", "2025-05-01", InspectionStatus::Completed),
        inspection("IN004", "Ward 2", "2025-05-01", InspectionStatus::InProgress),
    ];
    for inspection in &mut inspections {
        inspection.reclassify_overdue(today);
    }

    assert_eq!(inspections[0].status, InspectionStatus::Overdue);
    assert_eq!(inspections[1].status, InspectionStatus::Pending);
    assert_eq!(inspections[3].status, InspectionStatus::InProgress);

    let stats = InspectionStats::from_inspections(&inspections);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.in_progress, 1);
}

#[test]
fn due_today_is_not_overdue() {
    let mut due_today = inspection("IN005", "Ward 3", "2025-06-15", InspectionStatus::Pending);
    due_today.reclassify_overdue(date("2025-06-15"));
    assert_eq!(due_today.status, InspectionStatus::Pending);
}
