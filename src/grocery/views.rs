use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::repo_types::GroceryItemDetails;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroceryTotals {
    pub total_count: usize,
    pub purchased_count: usize,
    pub total_cost: f64,
}

pub fn totals(items: &[GroceryItemDetails]) -> GroceryTotals {
    GroceryTotals {
        total_count: items.len(),
        purchased_count: items.iter().filter(|i| i.item.purchased).count(),
        total_cost: items.iter().map(GroceryItemDetails::cost).sum(),
    }
}

/// Items keyed by their food item's category, sorted by category name.
pub fn group_by_category(items: &[GroceryItemDetails]) -> BTreeMap<String, Vec<GroceryItemDetails>> {
    let mut groups: BTreeMap<String, Vec<GroceryItemDetails>> = BTreeMap::new();
    for item in items {
        groups
            .entry(item.food_item.category.clone())
            .or_default()
            .push(item.clone());
    }
    groups
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListFilter {
    /// Case-insensitive name substring and exact category.
    pub fn matches(&self, item: &GroceryItemDetails) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => item
                .food_item
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        let category_ok = match self.category.as_deref() {
            Some(c) if !c.is_empty() && c != "all" => item.food_item.category == c,
            _ => true,
        };
        search_ok && category_ok
    }
}

/// List response: filtered items, their groups and the totals of the whole list.
#[derive(Debug, Clone, Serialize)]
pub struct GroceryList {
    pub items: Vec<GroceryItemDetails>,
    pub groups: BTreeMap<String, Vec<GroceryItemDetails>>,
    pub totals: GroceryTotals,
}

impl GroceryList {
    pub fn build(all: Vec<GroceryItemDetails>, filter: &ListFilter) -> Self {
        let totals = totals(&all);
        let items: Vec<GroceryItemDetails> = all.into_iter().filter(|i| filter.matches(i)).collect();
        let groups = group_by_category(&items);
        Self {
            items,
            groups,
            totals,
        }
    }
}
