//! Meal history queries

use chrono::NaiveDate;

use crate::meal::HistoryItem;

pub fn find_for_date(items: &[HistoryItem], date: NaiveDate) -> Option<&HistoryItem> {
    items.iter().find(|item| item.date == date)
}

/// Newest first by confirmation timestamp. Equal timestamps keep their order.
pub fn feed(items: &[HistoryItem]) -> Vec<HistoryItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

/// Optimistic local insert after a confirmation
pub fn record_local(items: &mut Vec<HistoryItem>, item: HistoryItem) {
    items.retain(|existing| existing.date != item.date);
    items.insert(0, item);
}

/// Distinct meal names from the most recent `days` entries, for prompt context
pub fn recent_meal_names(items: &[HistoryItem], days: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for item in feed(items).iter().take(days) {
        for (_, meal) in item.plan.meals() {
            if !names.contains(&meal.name) {
                names.push(meal.name.clone());
            }
        }
    }
    names
}
