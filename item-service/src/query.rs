//! Filtering, sorting, pagination and statistics over an item snapshot
//!
//! The engine never touches the store. It works on a snapshot handed to it by
//! the caller and applies the stages of a list request in a fixed order:
//! active flag, category, search, sort, paginate.
//!
//! ```rust
//! use item_service::models::QueryOptions;
//! use item_service::query::QueryEngine;
//!
//! let page = QueryEngine::query(&[], &QueryOptions::default());
//! assert!(page.items.is_empty());
//! assert_eq!(page.pagination.pages, 0);
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{serialize_timestamp, Item, QueryOptions, SortBy, SortOrder};

/// Pagination details for a list response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub limit: u32,
    /// Number of items matching the filters
    pub total: usize,
    /// Total number of pages
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationInfo {
    #[must_use]
    pub fn new(page: u32, limit: u32, total: usize) -> Self {
        let limit = limit.max(1);
        let start = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let end = (page as usize).saturating_mul(limit as usize);

        Self {
            page,
            limit,
            total,
            pages: calculate_total_pages(total, limit),
            has_next: end < total,
            has_prev: start > 0,
        }
    }
}

/// Ceiling division of `total` by `limit`
fn calculate_total_pages(total: usize, limit: u32) -> usize {
    let limit = limit as usize;
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// One page of query results
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub items: Vec<Item>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryStats {
    pub total: usize,
    pub distribution: BTreeMap<String, usize>,
}

/// Price aggregates over items with a positive price
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingStats {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub items_with_price: usize,
}

/// Aggregate statistics over the whole collection
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub total_items: usize,
    pub active_items: usize,
    pub inactive_items: usize,
    pub categories: CategoryStats,
    pub pricing: PricingStats,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

/// Stateless query operations over item snapshots
pub struct QueryEngine;

impl QueryEngine {
    /// Filter, sort and paginate `items` according to `options`
    pub fn query(items: &[Item], options: &QueryOptions) -> QueryPage {
        let category = options.category.as_deref().map(str::to_lowercase);
        let search = options.search.as_deref().map(str::to_lowercase);

        let mut matches: Vec<&Item> = items
            .iter()
            .filter(|item| options.is_active.map_or(true, |flag| item.is_active == flag))
            .filter(|item| {
                category
                    .as_deref()
                    .map_or(true, |c| item.category.to_lowercase().contains(c))
            })
            .filter(|item| search.as_deref().map_or(true, |term| matches_search(item, term)))
            .collect();

        // Vec::sort_by is stable, so ties keep snapshot order
        matches.sort_by(|a, b| {
            let ordering = compare(a, b, options.sort_by);
            match options.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matches.len();
        let items = matches
            .into_iter()
            .skip(options.offset())
            .take(options.limit as usize)
            .cloned()
            .collect();

        QueryPage {
            items,
            pagination: PaginationInfo::new(options.page, options.limit, total),
        }
    }

    /// Compute aggregate statistics over `items`
    pub fn stats(items: &[Item]) -> ItemStats {
        let active_items = items.iter().filter(|item| item.is_active).count();

        let mut distribution = BTreeMap::new();
        for item in items {
            *distribution.entry(item.category.clone()).or_insert(0) += 1;
        }

        let prices: Vec<f64> = items
            .iter()
            .filter(|item| item.has_price())
            .map(|item| item.price)
            .collect();

        let pricing = if prices.is_empty() {
            PricingStats {
                average: 0.0,
                minimum: 0.0,
                maximum: 0.0,
                items_with_price: 0,
            }
        } else {
            let sum: f64 = prices.iter().sum();
            PricingStats {
                average: round_cents(sum / prices.len() as f64),
                minimum: prices.iter().copied().fold(f64::INFINITY, f64::min),
                maximum: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                items_with_price: prices.len(),
            }
        };

        ItemStats {
            total_items: items.len(),
            active_items,
            inactive_items: items.len() - active_items,
            categories: CategoryStats {
                total: distribution.len(),
                distribution,
            },
            pricing,
            last_updated: Utc::now(),
        }
    }
}

fn matches_search(item: &Item, term: &str) -> bool {
    item.name.to_lowercase().contains(term)
        || item.description.to_lowercase().contains(term)
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

fn compare(a: &Item, b: &Item, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Name => compare_names(&a.name, &b.name),
        SortBy::Price => a.price.total_cmp(&b.price),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// Case-insensitive order with lowercase ahead of uppercase on a tie.
///
/// Compares by code point, not locale collation, so `é` sorts after `z`.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
