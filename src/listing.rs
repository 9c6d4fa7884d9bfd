//! In-process search, multi-select filters and pagination of fetched
//! collections.

use serde::Serialize;

/// Rows shown per page on every listing.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Case-insensitive substring match over `fields`. A blank term matches
/// everything.
pub fn matches_search<'a, I>(term: &str, fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Unique non-empty values in first-seen order.
pub fn distinct_values<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !distinct.iter().any(|v| v == value) {
            distinct.push(value.to_string());
        }
    }
    distinct
}

/// Selected values of a multi-select filter. Nothing selected means the
/// filter is inactive.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MultiSelect(Vec<String>);

impl MultiSelect {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected = MultiSelect::default();
        for value in values {
            let value = value.into();
            let value = value.trim();
            if !value.is_empty() && !selected.contains(value) {
                selected.0.push(value.to_string());
            }
        }
        selected
    }

    pub fn is_active(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    pub fn matches(&self, value: &str) -> bool {
        !self.is_active() || self.contains(value)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[derive(Debug, Serialize)]
/// One page of a collection plus the page links to render around it.
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Page numbers to link, `None` marks a gap.
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Paginated<T> {
    /// Wraps an already sliced page.
    pub fn new(items: Vec<T>, current_page: usize, total_items: usize, per_page: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let total_pages = total_items.div_ceil(per_page.max(1));

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
            total_items,
        }
    }
}

impl<T: Clone> Paginated<T> {
    /// Slices `[(page - 1) * per_page, page * per_page)` out of `all`.
    pub fn from_slice(all: &[T], page: usize, per_page: usize) -> Self {
        let page = if page == 0 { 1 } else { page };
        let per_page = per_page.max(1);
        let start = (page - 1).saturating_mul(per_page).min(all.len());
        let end = start.saturating_add(per_page).min(all.len());

        Self::new(all[start..end].to_vec(), page, all.len(), per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_links_collapse_long_ranges() {
        assert_eq!(
            get_pages(20, 10, 2, 2, 4, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
        assert_eq!(get_pages(3, 1, 2, 2, 4, 2), vec![Some(1), Some(2), Some(3)]);
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_blank_matches_all() {
        assert!(matches_search("NEEM", ["Neem tree", "x"]));
        assert!(matches_search("  ", ["anything"]));
        assert!(!matches_search("oak", ["Neem", "Mango"]));
    }

    #[test]
    fn multiselect_matches_selected_values() {
        let selected = MultiSelect::new(["Pending", "", "Pending"]);
        assert_eq!(selected.values(), ["Pending"]);
        assert!(selected.matches("Pending"));
        assert!(!selected.matches("Overdue"));

        let empty = MultiSelect::new(Vec::<String>::new());
        assert!(!empty.is_active());
        assert!(empty.matches("Completed"));
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        assert_eq!(
            distinct_values(["Chennai", " ", "Madurai", "Chennai"]),
            vec!["Chennai", "Madurai"]
        );
    }

    #[test]
    fn from_slice_bounds() {
        let all: Vec<u32> = (1..=23).collect();

        let first = Paginated::from_slice(&all, 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);

        let last = Paginated::from_slice(&all, 3, 10);
        assert_eq!(last.items, vec![21, 22, 23]);

        let beyond = Paginated::from_slice(&all, 9, 10);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_items, 23);
    }
}
