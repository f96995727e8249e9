//! Read models derived from the inventory mirror.
//!
//! Every function here is pure: the current date is passed in, never read,
//! so all pages deriving from the same snapshot agree with each other.

use crate::models::InventoryItem;
use chrono::NaiveDate;
use std::cmp::Ordering;
use strum::{AsRefStr, Display, EnumIter};

/// Quantity below which the inventory table flags an item.
pub(crate) const TABLE_LOW_STOCK_BELOW: i64 = 5;
/// Quantity below which dashboards and reports count an item as low stock.
pub(crate) const REPORT_LOW_STOCK_BELOW: i64 = 10;
pub(crate) const EXPIRING_WINDOW_DAYS: i64 = 7;
pub(crate) const UNCATEGORIZED: &str = "Uncategorized";

pub(crate) fn days_until_expiry(item: &InventoryItem, today: NaiveDate) -> Option<i64> {
    item.expiry_date.map(|d| (d - today).num_days())
}

/// An item is expired from its expiry date onwards.
pub(crate) fn is_expired(item: &InventoryItem, today: NaiveDate) -> bool {
    days_until_expiry(item, today).is_some_and(|d| d <= 0)
}

pub(crate) fn is_expiring_soon(item: &InventoryItem, today: NaiveDate) -> bool {
    days_until_expiry(item, today).is_some_and(|d| (1..=EXPIRING_WINDOW_DAYS).contains(&d))
}

pub(crate) fn is_low_stock(item: &InventoryItem, below: i64) -> bool {
    item.quantity < below
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusBadge {
    LowStock,
    Expired,
}

impl StatusBadge {
    pub fn label(self) -> &'static str {
        match self {
            StatusBadge::LowStock => "Low Stock",
            StatusBadge::Expired => "Expired",
        }
    }
}

pub(crate) fn status_badges(item: &InventoryItem, today: NaiveDate) -> Vec<StatusBadge> {
    let mut out = Vec::new();
    if is_low_stock(item, TABLE_LOW_STOCK_BELOW) {
        out.push(StatusBadge::LowStock);
    }
    if is_expired(item, today) {
        out.push(StatusBadge::Expired);
    }
    out
}

pub(crate) fn normalize_category(category: &str) -> String {
    let c = category.trim();
    if c.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        c.to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ItemFilter {
    pub query: String,
    /// `None` shows every category.
    pub category: Option<String>,
}

impl ItemFilter {
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.category.is_some()
    }

    pub fn matches(&self, item: &InventoryItem) -> bool {
        if let Some(cat) = &self.category {
            if normalize_category(&item.category) != *cat {
                return false;
            }
        }

        let q = self.query.trim().to_lowercase();
        q.is_empty()
            || item.name.to_lowercase().contains(&q)
            || item.category.to_lowercase().contains(&q)
    }
}

pub(crate) fn filter_items(items: &[InventoryItem], filter: &ItemFilter) -> Vec<InventoryItem> {
    items.iter().filter(|i| filter.matches(i)).cloned().collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumIter)]
pub(crate) enum SortKey {
    /// Keep mirror order.
    #[default]
    None,
    Name,
    Category,
    Quantity,
    Expiry,
    Created,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn flip(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Missing values compare after present ones regardless of direction.
fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>, dir: SortDir) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match dir {
            SortDir::Asc => a.cmp(&b),
            SortDir::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn sort_items(items: &mut [InventoryItem], key: SortKey, dir: SortDir) {
    let directed = |o: Ordering| match dir {
        SortDir::Asc => o,
        SortDir::Desc => o.reverse(),
    };

    match key {
        SortKey::None => {}
        SortKey::Name => items.sort_by(|a, b| {
            directed(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }),
        SortKey::Category => items.sort_by(|a, b| {
            directed(
                normalize_category(&a.category)
                    .to_lowercase()
                    .cmp(&normalize_category(&b.category).to_lowercase()),
            )
        }),
        SortKey::Quantity => items.sort_by(|a, b| directed(a.quantity.cmp(&b.quantity))),
        SortKey::Expiry => {
            items.sort_by(|a, b| cmp_missing_last(a.expiry_date, b.expiry_date, dir))
        }
        SortKey::Created => items.sort_by(|a, b| cmp_missing_last(a.created_at, b.created_at, dir)),
    }
}

/// Distinct categories for the filter dropdown.
pub(crate) fn categories(items: &[InventoryItem]) -> Vec<String> {
    let mut out: Vec<String> = items
        .iter()
        .map(|i| normalize_category(&i.category))
        .collect();
    out.sort_by_key(|c| c.to_lowercase());
    out.dedup();
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CategoryCount {
    pub name: String,
    pub value: usize,
}

/// Item count per category, in order of first appearance.
pub(crate) fn category_histogram(items: &[InventoryItem]) -> Vec<CategoryCount> {
    let mut out: Vec<CategoryCount> = Vec::new();
    for item in items {
        let name = normalize_category(&item.category);
        match out.iter_mut().find(|c| c.name == name) {
            Some(c) => c.value += 1,
            None => out.push(CategoryCount { name, value: 1 }),
        }
    }
    out
}

pub(crate) fn recent_items(items: &[InventoryItem], limit: usize) -> Vec<InventoryItem> {
    let mut out = items.to_vec();
    sort_items(&mut out, SortKey::Created, SortDir::Desc);
    out.truncate(limit);
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExpiringItem {
    pub item: InventoryItem,
    pub days_left: i64,
}

pub(crate) fn expiring_soon(
    items: &[InventoryItem],
    today: NaiveDate,
    limit: usize,
) -> Vec<ExpiringItem> {
    let mut out: Vec<ExpiringItem> = items
        .iter()
        .filter(|i| is_expiring_soon(i, today))
        .filter_map(|i| {
            days_until_expiry(i, today).map(|days_left| ExpiringItem {
                item: i.clone(),
                days_left,
            })
        })
        .collect();
    out.sort_by_key(|e| e.days_left);
    out.truncate(limit);
    out
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Kpis {
    pub total: usize,
    pub low_stock: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub categories: usize,
}

pub(crate) fn kpis(items: &[InventoryItem], today: NaiveDate) -> Kpis {
    Kpis {
        total: items.len(),
        low_stock: items
            .iter()
            .filter(|i| is_low_stock(i, REPORT_LOW_STOCK_BELOW))
            .count(),
        expired: items.iter().filter(|i| is_expired(i, today)).count(),
        expiring_soon: items.iter().filter(|i| is_expiring_soon(i, today)).count(),
        categories: category_histogram(items).len(),
    }
}

/// Counts behind the inventory page banner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct AlertCounts {
    pub expired: usize,
    pub low_stock: usize,
}

impl AlertCounts {
    pub fn any(&self) -> bool {
        self.expired > 0 || self.low_stock > 0
    }
}

pub(crate) fn alert_counts(items: &[InventoryItem], today: NaiveDate) -> AlertCounts {
    AlertCounts {
        expired: items.iter().filter(|i| is_expired(i, today)).count(),
        low_stock: items
            .iter()
            .filter(|i| is_low_stock(i, TABLE_LOW_STOCK_BELOW))
            .count(),
    }
}

pub(crate) fn stock_levels(items: &[InventoryItem]) -> Vec<(String, i64)> {
    items
        .iter()
        .map(|i| (i.name.clone(), i.quantity.max(0)))
        .collect()
}

/// `DD/MM/YYYY`.
pub(crate) fn format_date_in(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => "Invalid".to_string(),
    }
}

pub(crate) fn format_date_iso(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn item(id: &str, category: &str, qty: i64, expiry_offset: Option<i64>) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            category: category.to_string(),
            quantity: qty,
            expiry_date: expiry_offset.map(|d| today() + chrono::Duration::days(d)),
            created_at: None,
            updated_at: None,
        }
    }

    fn created(mut i: InventoryItem, secs: i64) -> InventoryItem {
        i.created_at = DateTime::<Utc>::from_timestamp(secs, 0);
        i
    }

    #[test]
    fn test_expiry_boundaries() {
        assert!(is_expired(&item("a", "x", 1, Some(-1)), today()));
        assert!(is_expired(&item("a", "x", 1, Some(0)), today()));
        assert!(!is_expired(&item("a", "x", 1, Some(1)), today()));
        assert!(!is_expired(&item("a", "x", 1, None), today()));

        assert!(!is_expiring_soon(&item("a", "x", 1, Some(0)), today()));
        assert!(is_expiring_soon(&item("a", "x", 1, Some(1)), today()));
        assert!(is_expiring_soon(&item("a", "x", 1, Some(7)), today()));
        assert!(!is_expiring_soon(&item("a", "x", 1, Some(8)), today()));
    }

    #[test]
    fn test_status_badges_use_table_threshold() {
        assert_eq!(
            status_badges(&item("a", "x", 4, Some(-2)), today()),
            vec![StatusBadge::LowStock, StatusBadge::Expired]
        );
        assert!(status_badges(&item("a", "x", 5, Some(30)), today()).is_empty());
    }

    #[test]
    fn test_filter_by_query_and_category() {
        let items = vec![
            item("1", "Dairy", 3, None),
            item("2", " Produce ", 10, None),
            item("3", "", 1, None),
        ];

        let f = ItemFilter {
            query: "  DAIRY ".to_string(),
            category: None,
        };
        assert_eq!(filter_items(&items, &f).len(), 1);

        let f = ItemFilter {
            query: String::new(),
            category: Some("Produce".to_string()),
        };
        assert_eq!(filter_items(&items, &f)[0].id, "2");

        let f = ItemFilter {
            query: "item".to_string(),
            category: Some(UNCATEGORIZED.to_string()),
        };
        let out = filter_items(&items, &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");

        assert!(!ItemFilter::default().is_active());
        assert_eq!(filter_items(&items, &ItemFilter::default()).len(), 3);
    }

    #[test]
    fn test_sort_missing_expiry_last_both_directions() {
        let mut items = vec![
            item("none", "x", 1, None),
            item("late", "x", 1, Some(9)),
            item("early", "x", 1, Some(2)),
        ];
        sort_items(&mut items, SortKey::Expiry, SortDir::Asc);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "none"]);

        sort_items(&mut items, SortKey::Expiry, SortDir::Desc);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["late", "early", "none"]);
    }

    #[test]
    fn test_sort_by_quantity_desc_is_stable() {
        let mut items = vec![item("a", "x", 2, None), item("b", "x", 5, None), item("c", "x", 2, None)];
        sort_items(&mut items, SortKey::Quantity, SortDir::Desc);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_category_histogram_first_appearance_order() {
        let items = vec![
            item("1", "Produce", 1, None),
            item("2", "Dairy", 1, None),
            item("3", "Produce", 1, None),
            item("4", "  ", 1, None),
        ];
        let h = category_histogram(&items);
        assert_eq!(
            h,
            vec![
                CategoryCount { name: "Produce".to_string(), value: 2 },
                CategoryCount { name: "Dairy".to_string(), value: 1 },
                CategoryCount { name: UNCATEGORIZED.to_string(), value: 1 },
            ]
        );
        assert_eq!(categories(&items), vec!["Dairy", "Produce", UNCATEGORIZED]);
    }

    #[test]
    fn test_recent_items_newest_first_missing_last() {
        let items = vec![
            created(item("old", "x", 1, None), 100),
            item("unknown", "x", 1, None),
            created(item("new", "x", 1, None), 300),
            created(item("mid", "x", 1, None), 200),
        ];
        let ids: Vec<String> = recent_items(&items, 3).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_expiring_soon_sorted_and_limited() {
        let items: Vec<InventoryItem> = (0..10)
            .map(|d| item(&d.to_string(), "x", 1, Some(7 - d)))
            .collect();
        let out = expiring_soon(&items, today(), 5);
        let days: Vec<i64> = out.iter().map(|e| e.days_left).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_kpis_and_alert_counts_use_different_thresholds() {
        let items = vec![
            item("1", "A", 3, Some(-1)),
            item("2", "B", 7, Some(3)),
            item("3", "A", 50, Some(40)),
            item("4", "C", 9, None),
        ];
        let k = kpis(&items, today());
        assert_eq!(
            k,
            Kpis {
                total: 4,
                low_stock: 3,
                expired: 1,
                expiring_soon: 1,
                categories: 3,
            }
        );
        let a = alert_counts(&items, today());
        assert_eq!(a, AlertCounts { expired: 1, low_stock: 1 });
        assert!(a.any());
        assert!(!alert_counts(&[], today()).any());
    }

    #[test]
    fn test_date_formatting() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 7);
        assert_eq!(format_date_in(d), "07/03/2026");
        assert_eq!(format_date_in(None), "Invalid");
        assert_eq!(format_date_iso(d), "2026-03-07");
        assert_eq!(format_date_iso(None), "");
    }

    #[test]
    fn test_stock_levels_clamp_negative() {
        let items = vec![item("1", "A", -3, None), item("2", "A", 8, None)];
        assert_eq!(
            stock_levels(&items),
            vec![("Item 1".to_string(), 0), ("Item 2".to_string(), 8)]
        );
    }
}
