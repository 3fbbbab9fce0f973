//! Schema validation for item payloads and list queries
//!
//! Every validator is exhaustive: all violations in the input are collected
//! into a single [`ValidationError`] instead of stopping at the first one.
//! On success the caller receives a normalized value (trimmed strings,
//! lowercased category, price rounded to cents) and never a partially
//! validated one.
//!
//! ```rust
//! use item_service::validation::validate_create;
//! use serde_json::json;
//!
//! let item = validate_create(&json!({ "name": "  Lamp ", "category": "Lighting" })).unwrap();
//! assert_eq!(item.name, "Lamp");
//! assert_eq!(item.category.as_deref(), Some("lighting"));
//!
//! let err = validate_create(&json!({ "price": -1 })).unwrap_err();
//! assert_eq!(err.error_count(), 2);
//! ```

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{
    ItemPatch, NewItem, QueryOptions, SortBy, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT,
};

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const CATEGORY_MAX_CHARS: usize = 50;
pub const TAG_MAX_CHARS: usize = 30;
pub const MAX_TAGS: usize = 10;

/// Largest price whose cent rounding stays exact (2^53 - 1)
pub const MAX_SAFE_PRICE: f64 = 9_007_199_254_740_991.0;

/// Fields a create or update body may carry
pub const ITEM_FIELDS: [&str; 6] = ["name", "description", "price", "category", "tags", "isActive"];

/// Parameters a list query may carry
pub const QUERY_FIELDS: [&str; 7] = [
    "page",
    "limit",
    "category",
    "search",
    "isActive",
    "sortBy",
    "sortOrder",
];

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name, with an index for list entries (`tags[2]`)
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// The full set of violations found in one input
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed")]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Check if there are any validation errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of field errors
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any error was reported against `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

/// Constraints for one string field of an item body
struct StringRule {
    field: &'static str,
    label: &'static str,
    max_chars: usize,
    allow_empty: bool,
    lowercase: bool,
}

const NAME: StringRule = StringRule {
    field: "name",
    label: "Name",
    max_chars: NAME_MAX_CHARS,
    allow_empty: false,
    lowercase: false,
};

const DESCRIPTION: StringRule = StringRule {
    field: "description",
    label: "Description",
    max_chars: DESCRIPTION_MAX_CHARS,
    allow_empty: true,
    lowercase: false,
};

const CATEGORY: StringRule = StringRule {
    field: "category",
    label: "Category",
    max_chars: CATEGORY_MAX_CHARS,
    allow_empty: false,
    lowercase: true,
};

impl StringRule {
    fn check(&self, value: &Value, errors: &mut ValidationError) -> Option<String> {
        let Some(raw) = value.as_str() else {
            errors.add_field_error(self.field, format!("\"{}\" must be a string", self.field));
            return None;
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() && !self.allow_empty {
            let message = if self.field == NAME.field {
                "Name is required".to_string()
            } else {
                format!("\"{}\" is not allowed to be empty", self.field)
            };
            errors.add_field_error(self.field, message);
            return None;
        }

        if trimmed.chars().count() > self.max_chars {
            errors.add_field_error(
                self.field,
                format!("{} cannot exceed {} characters", self.label, self.max_chars),
            );
            return None;
        }

        Some(if self.lowercase {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        })
    }
}

fn check_price(value: &Value, errors: &mut ValidationError) -> Option<f64> {
    let Some(price) = value.as_f64() else {
        errors.add_field_error("price", "\"price\" must be a number");
        return None;
    };

    if !price.is_finite() || price.abs() > MAX_SAFE_PRICE {
        errors.add_field_error("price", "\"price\" must be a safe number");
        return None;
    }

    let rounded = (price * 100.0).round() / 100.0;
    if rounded <= 0.0 {
        errors.add_field_error("price", "Price must be a positive number");
        return None;
    }

    Some(rounded)
}

fn check_tags(value: &Value, errors: &mut ValidationError) -> Option<Vec<String>> {
    let Some(entries) = value.as_array() else {
        errors.add_field_error("tags", "\"tags\" must be an array");
        return None;
    };

    let before = errors.error_count();
    if entries.len() > MAX_TAGS {
        errors.add_field_error("tags", format!("Cannot have more than {MAX_TAGS} tags"));
    }

    let mut tags = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let field = format!("tags[{index}]");
        let Some(raw) = entry.as_str() else {
            errors.add_field_error(&field, format!("\"{field}\" must be a string"));
            continue;
        };
        let tag = raw.trim();
        if tag.is_empty() {
            errors.add_field_error(&field, format!("\"{field}\" is not allowed to be empty"));
        } else if tag.chars().count() > TAG_MAX_CHARS {
            errors.add_field_error(
                &field,
                format!("Each tag cannot exceed {TAG_MAX_CHARS} characters"),
            );
        } else {
            tags.push(tag.to_string());
        }
    }

    (errors.error_count() == before).then_some(tags)
}

fn check_bool(field: &str, value: &Value, errors: &mut ValidationError) -> Option<bool> {
    let flag = value.as_bool();
    if flag.is_none() {
        errors.add_field_error(field, format!("\"{field}\" must be a boolean"));
    }
    flag
}

fn as_body<'a>(raw: &'a Value, errors: &mut ValidationError) -> Option<&'a Map<String, Value>> {
    let body = raw.as_object();
    if body.is_none() {
        errors.add_field_error("body", "Request body must be a JSON object");
    }
    body
}

fn reject_unknown<'a>(
    keys: impl Iterator<Item = &'a String>,
    allowed: &[&str],
    errors: &mut ValidationError,
) {
    let mut unknown: Vec<&String> = keys.filter(|k| !allowed.contains(&k.as_str())).collect();
    unknown.sort();
    for key in unknown {
        errors.add_field_error(key.as_str(), format!("\"{key}\" is not allowed"));
    }
}

/// Field values shared by the create and update validators
#[derive(Default)]
struct ItemFields {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    is_active: Option<bool>,
}

fn check_item_fields(body: &Map<String, Value>, errors: &mut ValidationError) -> ItemFields {
    ItemFields {
        name: body.get("name").and_then(|v| NAME.check(v, errors)),
        description: body.get("description").and_then(|v| DESCRIPTION.check(v, errors)),
        price: body.get("price").and_then(|v| check_price(v, errors)),
        category: body.get("category").and_then(|v| CATEGORY.check(v, errors)),
        tags: body.get("tags").and_then(|v| check_tags(v, errors)),
        is_active: body.get("isActive").and_then(|v| check_bool("isActive", v, errors)),
    }
}

/// Validate a create payload
pub fn validate_create(raw: &Value) -> Result<NewItem, ValidationError> {
    let mut errors = ValidationError::new();
    let Some(body) = as_body(raw, &mut errors) else {
        return Err(errors);
    };

    if !body.contains_key("name") {
        errors.add_field_error("name", "Name is required");
    }
    let fields = check_item_fields(body, &mut errors);
    reject_unknown(body.keys(), &ITEM_FIELDS, &mut errors);
    errors.into_result()?;

    Ok(NewItem {
        name: fields.name.unwrap_or_default(),
        description: fields.description,
        price: fields.price,
        category: fields.category,
        tags: fields.tags,
        is_active: fields.is_active,
    })
}

/// Validate a partial update payload
///
/// Every field is optional but at least one allow-listed field must be
/// present.
pub fn validate_update(raw: &Value) -> Result<ItemPatch, ValidationError> {
    let mut errors = ValidationError::new();
    let Some(body) = as_body(raw, &mut errors) else {
        return Err(errors);
    };

    if !ITEM_FIELDS.iter().any(|field| body.contains_key(*field)) {
        errors.add_field_error("body", "At least one field must be provided for update");
    }
    let fields = check_item_fields(body, &mut errors);
    reject_unknown(body.keys(), &ITEM_FIELDS, &mut errors);
    errors.into_result()?;

    Ok(ItemPatch {
        name: fields.name,
        description: fields.description,
        price: fields.price,
        category: fields.category,
        tags: fields.tags,
        is_active: fields.is_active,
    })
}

fn parse_bounded(
    field: &str,
    raw: &str,
    min: u32,
    max: u32,
    errors: &mut ValidationError,
) -> Option<u32> {
    let raw = raw.trim();
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            let message = if raw.parse::<f64>().is_ok_and(f64::is_finite) {
                format!("\"{field}\" must be an integer")
            } else {
                format!("\"{field}\" must be a number")
            };
            errors.add_field_error(field, message);
            return None;
        }
    };

    if value < i64::from(min) {
        errors.add_field_error(
            field,
            format!("\"{field}\" must be greater than or equal to {min}"),
        );
        return None;
    }
    if value > i64::from(max) {
        errors.add_field_error(
            field,
            format!("\"{field}\" must be less than or equal to {max}"),
        );
        return None;
    }

    u32::try_from(value).ok()
}

fn parse_filter(field: &str, raw: &str, errors: &mut ValidationError) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add_field_error(field, format!("\"{field}\" is not allowed to be empty"));
        return None;
    }
    Some(trimmed.to_string())
}

fn parse_flag(field: &str, raw: &str, errors: &mut ValidationError) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            errors.add_field_error(field, format!("\"{field}\" must be a boolean"));
            None
        }
    }
}

fn parse_choice<T>(
    field: &str,
    raw: &str,
    variants: &[&str],
    parse: impl Fn(&str) -> Option<T>,
    errors: &mut ValidationError,
) -> Option<T> {
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        errors.add_field_error(
            field,
            format!("\"{field}\" must be one of [{}]", variants.join(", ")),
        );
    }
    parsed
}

/// Validate raw query-string parameters for a list request
pub fn validate_query(raw: &HashMap<String, String>) -> Result<QueryOptions, ValidationError> {
    let mut errors = ValidationError::new();
    let param = |name: &str| raw.get(name).map(String::as_str);

    let page = param("page").and_then(|v| parse_bounded("page", v, 1, u32::MAX, &mut errors));
    let limit = param("limit").and_then(|v| parse_bounded("limit", v, 1, MAX_LIMIT, &mut errors));
    let category = param("category").and_then(|v| parse_filter("category", v, &mut errors));
    let search = param("search").and_then(|v| parse_filter("search", v, &mut errors));
    let is_active = param("isActive").and_then(|v| parse_flag("isActive", v, &mut errors));
    let sort_by = param("sortBy")
        .and_then(|v| parse_choice("sortBy", v, &SortBy::VARIANTS, SortBy::parse, &mut errors));
    let sort_order = param("sortOrder").and_then(|v| {
        parse_choice("sortOrder", v, &SortOrder::VARIANTS, SortOrder::parse, &mut errors)
    });
    reject_unknown(raw.keys(), &QUERY_FIELDS, &mut errors);
    errors.into_result()?;

    Ok(QueryOptions {
        page: page.unwrap_or(DEFAULT_PAGE),
        limit: limit.unwrap_or(DEFAULT_LIMIT),
        category,
        search,
        is_active,
        sort_by: sort_by.unwrap_or_default(),
        sort_order: sort_order.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn messages(err: &ValidationError) -> Vec<&str> {
        err.errors().iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_create_minimal() {
        let item = validate_create(&json!({ "name": "Lamp" })).unwrap();
        assert_eq!(item.name, "Lamp");
        assert_eq!(item.description, None);
        assert_eq!(item.price, None);
        assert_eq!(item.category, None);
        assert_eq!(item.tags, None);
        assert_eq!(item.is_active, None);
    }

    #[test]
    fn test_create_normalizes_values() {
        let item = validate_create(&json!({
            "name": "  Desk Lamp  ",
            "description": "  warm light ",
            "price": 19.999,
            "category": " Lighting ",
            "tags": [" desk ", "led"],
            "isActive": false
        }))
        .unwrap();

        assert_eq!(item.name, "Desk Lamp");
        assert_eq!(item.description.as_deref(), Some("warm light"));
        assert_eq!(item.price, Some(20.0));
        assert_eq!(item.category.as_deref(), Some("lighting"));
        assert_eq!(item.tags, Some(vec!["desk".to_string(), "led".to_string()]));
        assert_eq!(item.is_active, Some(false));
    }

    #[test]
    fn test_create_collects_every_violation() {
        let tags: Vec<String> = (0..11).map(|i| format!("tag{i}")).collect();
        let err = validate_create(&json!({ "tags": tags })).unwrap_err();

        assert_eq!(err.error_count(), 2);
        assert!(err.has_field("name"));
        assert!(err.has_field("tags"));
        assert!(messages(&err).contains(&"Name is required"));
        assert!(messages(&err).contains(&"Cannot have more than 10 tags"));
    }

    #[test]
    fn test_create_rejects_blank_and_long_name() {
        let err = validate_create(&json!({ "name": "   " })).unwrap_err();
        assert_eq!(messages(&err), vec!["Name is required"]);

        let err = validate_create(&json!({ "name": "x".repeat(101) })).unwrap_err();
        assert_eq!(messages(&err), vec!["Name cannot exceed 100 characters"]);

        assert!(validate_create(&json!({ "name": "x".repeat(100) })).is_ok());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let name = "é".repeat(100);
        assert!(validate_create(&json!({ "name": name })).is_ok());
    }

    #[test]
    fn test_create_rejects_bad_price() {
        for price in [json!(0), json!(-5.5)] {
            let err = validate_create(&json!({ "name": "Lamp", "price": price })).unwrap_err();
            assert_eq!(messages(&err), vec!["Price must be a positive number"]);
        }

        let err = validate_create(&json!({ "name": "Lamp", "price": "12" })).unwrap_err();
        assert_eq!(messages(&err), vec!["\"price\" must be a number"]);
    }

    #[test]
    fn test_create_rejects_price_that_rounds_to_zero() {
        for price in [json!(0.004), json!(0.001)] {
            let err = validate_create(&json!({ "name": "Tiny", "price": price })).unwrap_err();
            assert_eq!(messages(&err), vec!["Price must be a positive number"]);
        }

        let item = validate_create(&json!({ "name": "Tiny", "price": 0.005 })).unwrap();
        assert_eq!(item.price, Some(0.01));
    }

    #[test]
    fn test_create_rejects_unsafe_price() {
        for price in [json!(1e307), json!(1e16), json!(f64::MAX)] {
            let err = validate_create(&json!({ "name": "Huge", "price": price })).unwrap_err();
            assert_eq!(messages(&err), vec!["\"price\" must be a safe number"]);
        }

        let item = validate_create(&json!({ "name": "Big", "price": 1_000_000_000.0 })).unwrap();
        assert_eq!(item.price, Some(1_000_000_000.0));
    }

    #[test]
    fn test_description_length_boundary() {
        let item = validate_create(&json!({ "name": "Lamp", "description": "d".repeat(500) }))
            .unwrap();
        assert_eq!(item.description.map(|d| d.chars().count()), Some(500));

        let err = validate_create(&json!({ "name": "Lamp", "description": "d".repeat(501) }))
            .unwrap_err();
        assert_eq!(messages(&err), vec!["Description cannot exceed 500 characters"]);
    }

    #[test]
    fn test_category_length_boundary() {
        assert!(validate_create(&json!({ "name": "Lamp", "category": "c".repeat(50) })).is_ok());

        let err = validate_create(&json!({ "name": "Lamp", "category": "c".repeat(51) }))
            .unwrap_err();
        assert_eq!(messages(&err), vec!["Category cannot exceed 50 characters"]);
    }

    #[test]
    fn test_tag_count_and_length_boundary() {
        let tags: Vec<String> = (0..10).map(|i| format!("{i}{}", "t".repeat(29))).collect();
        let item = validate_create(&json!({ "name": "Lamp", "tags": tags })).unwrap();
        let tags = item.tags.unwrap();
        assert_eq!(tags.len(), 10);
        assert!(tags.iter().all(|t| t.chars().count() == 30));
    }

    #[test]
    fn test_create_rejects_null_as_type_mismatch() {
        let err = validate_create(&json!({ "name": null, "isActive": null })).unwrap_err();
        assert_eq!(err.error_count(), 2);
        assert!(messages(&err).contains(&"\"name\" must be a string"));
        assert!(messages(&err).contains(&"\"isActive\" must be a boolean"));
    }

    #[test]
    fn test_create_allows_empty_description_but_not_category() {
        let item = validate_create(&json!({ "name": "Lamp", "description": "" })).unwrap();
        assert_eq!(item.description.as_deref(), Some(""));

        let err = validate_create(&json!({ "name": "Lamp", "category": " " })).unwrap_err();
        assert_eq!(messages(&err), vec!["\"category\" is not allowed to be empty"]);
    }

    #[test]
    fn test_create_checks_each_tag() {
        let err = validate_create(&json!({
            "name": "Lamp",
            "tags": ["ok", "", 7, "t".repeat(31)]
        }))
        .unwrap_err();

        let fields: Vec<&str> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["tags[1]", "tags[2]", "tags[3]"]);
        assert_eq!(
            err.errors()[2].message,
            "Each tag cannot exceed 30 characters"
        );
    }

    #[test]
    fn test_create_rejects_unknown_keys() {
        let err = validate_create(&json!({ "name": "Lamp", "id": "x", "color": "red" }))
            .unwrap_err();
        assert_eq!(
            messages(&err),
            vec!["\"color\" is not allowed", "\"id\" is not allowed"]
        );
    }

    #[test]
    fn test_create_rejects_non_object_body() {
        let err = validate_create(&json!(["Lamp"])).unwrap_err();
        assert_eq!(err.error_count(), 1);
        assert!(err.has_field("body"));
    }

    #[test]
    fn test_update_partial_fields() {
        let patch = validate_update(&json!({ "price": 5 })).unwrap();
        assert_eq!(patch.price, Some(5.0));
        assert_eq!(patch.name, None);
    }

    #[test]
    fn test_update_requires_a_field() {
        let err = validate_update(&json!({})).unwrap_err();
        assert_eq!(
            messages(&err),
            vec!["At least one field must be provided for update"]
        );
    }

    #[test]
    fn test_update_applies_create_rules() {
        let err = validate_update(&json!({ "name": "", "price": -1, "tags": "x" })).unwrap_err();
        assert_eq!(err.error_count(), 3);
        assert!(err.has_field("name"));
        assert!(err.has_field("price"));
        assert!(err.has_field("tags"));
    }

    #[test]
    fn test_query_defaults() {
        let options = validate_query(&HashMap::new()).unwrap();
        assert_eq!(options, QueryOptions::default());
    }

    #[test]
    fn test_query_parses_all_fields() {
        let options = validate_query(&query(&[
            ("page", "2"),
            ("limit", "50"),
            ("category", " Electronics "),
            ("search", "mouse"),
            ("isActive", "FALSE"),
            ("sortBy", "price"),
            ("sortOrder", "asc"),
        ]))
        .unwrap();

        assert_eq!(options.page, 2);
        assert_eq!(options.limit, 50);
        assert_eq!(options.category.as_deref(), Some("Electronics"));
        assert_eq!(options.search.as_deref(), Some("mouse"));
        assert_eq!(options.is_active, Some(false));
        assert_eq!(options.sort_by, SortBy::Price);
        assert_eq!(options.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_query_rejects_out_of_range_instead_of_clamping() {
        let err = validate_query(&query(&[("page", "0"), ("limit", "101")])).unwrap_err();
        assert_eq!(err.error_count(), 2);
        assert!(messages(&err).contains(&"\"page\" must be greater than or equal to 1"));
        assert!(messages(&err).contains(&"\"limit\" must be less than or equal to 100"));
    }

    #[test]
    fn test_query_rejects_non_numeric_page() {
        let err = validate_query(&query(&[("page", "abc"), ("limit", "2.5")])).unwrap_err();
        assert!(messages(&err).contains(&"\"page\" must be a number"));
        assert!(messages(&err).contains(&"\"limit\" must be an integer"));
    }

    #[test]
    fn test_query_rejects_values_outside_enums() {
        let err = validate_query(&query(&[
            ("sortBy", "color"),
            ("sortOrder", "up"),
            ("isActive", "yes"),
        ]))
        .unwrap_err();

        assert_eq!(err.error_count(), 3);
        assert!(messages(&err)
            .contains(&"\"sortBy\" must be one of [name, price, createdAt, updatedAt]"));
        assert!(messages(&err).contains(&"\"sortOrder\" must be one of [asc, desc]"));
        assert!(messages(&err).contains(&"\"isActive\" must be a boolean"));
    }

    #[test]
    fn test_query_rejects_empty_filters_and_unknown_params() {
        let err = validate_query(&query(&[("search", "  "), ("color", "red")])).unwrap_err();
        assert_eq!(
            messages(&err),
            vec![
                "\"search\" is not allowed to be empty",
                "\"color\" is not allowed"
            ]
        );
    }
}
