//! Item entity and the normalized inputs that create or modify it

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::ids::ItemId;

/// Category assigned when a create request does not name one
pub const DEFAULT_CATEGORY: &str = "general";

/// A stored item
///
/// Serializes to exactly the wire fields `id, name, description, price,
/// category, tags, isActive, createdAt, updatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub is_active: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Build a new item from validated input, applying entity defaults
    pub(crate) fn new(id: ItemId, input: NewItem, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            id,
            name: input.name,
            description: input.description.unwrap_or_default(),
            price: input.price.unwrap_or(0.0),
            category: input
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags: input.tags.unwrap_or_default(),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields of `patch` and refresh `updated_at`
    ///
    /// `updated_at` always moves strictly forward, even when the clock has not
    /// advanced past the previous millisecond.
    pub(crate) fn apply(&mut self, patch: ItemPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }

        let now = now.trunc_subsecs(3);
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }

    /// Whether the item carries a positive price
    pub fn has_price(&self) -> bool {
        self.price > 0.0
    }
}

/// Validated, normalized input for creating an item
///
/// Absent optional fields take the entity defaults when the item is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Validated, normalized partial update
///
/// Only `Some` fields are written to the stored item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl ItemPatch {
    /// Check if the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.is_active.is_none()
    }
}

/// Default page number for list queries
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for list queries
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a client may request
pub const MAX_LIMIT: u32 = 100;

/// Field a list query is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    Price,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortBy {
    /// Wire names accepted for `sortBy`
    pub const VARIANTS: [&'static str; 4] = ["name", "price", "createdAt", "updatedAt"];

    /// Parse a wire name; matching is exact
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Price => write!(f, "price"),
            Self::CreatedAt => write!(f, "createdAt"),
            Self::UpdatedAt => write!(f, "updatedAt"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire names accepted for `sortOrder`
    pub const VARIANTS: [&'static str; 2] = ["asc", "desc"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Validated options for listing items
///
/// Values are always within bounds; out-of-range input is rejected during
/// validation rather than clamped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            category: None,
            search: None,
            is_active: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Index of the first item on the requested page
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}

/// Format a timestamp the way it appears on the wire
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn serialize_timestamp<S: Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}
