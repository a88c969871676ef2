// Shared wire vocabulary: the response envelope, pagination types, and
// the closed enums used across resources.
//
// The backend wraps every response in `{success, data, error}`; list
// endpoints add `total/page/pageSize/totalPages` beside `data`. These
// types absorb that contract defensively -- an absent or null `data` on
// a list endpoint becomes an empty collection, never an Option.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Closed enums ─────────────────────────────────────────────────────

/// Platform role. Closed set -- adding a role is a compile-time change
/// everywhere it is matched (most importantly the access guard).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

/// IELTS skill area.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Skill {
    Listening,
    Reading,
    Writing,
    Speaking,
}

/// Account status for platform users.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

/// Publication state for exercises.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExerciseStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

// ── Envelope ─────────────────────────────────────────────────────────

/// Structured error payload from the backend envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Single-object envelope: `{success, data, error}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// List envelope: `{success, data: [...], total, page, pageSize, totalPages}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

impl<T> PageEnvelope<T> {
    /// Convert into a total [`Page`], coercing null/absent fields.
    pub(crate) fn into_page(self, requested: PageCursor) -> Page<T> {
        let items = self.data.unwrap_or_default();
        let page = self.page.unwrap_or(requested.page).max(1);
        let page_size = self.page_size.unwrap_or(requested.page_size).max(1);
        let total_pages = self.total_pages.unwrap_or_else(|| {
            let per = u64::from(page_size);
            u32::try_from(self.total.div_ceil(per)).unwrap_or(u32::MAX)
        });
        Page {
            items,
            total: self.total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// One page of a resource collection.
///
/// Replaced wholesale on every successful fetch; `items` is always a
/// concrete (possibly empty) sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// An empty first page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 1,
            total_pages: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Last page that actually exists (at least 1, even when empty).
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }
}

// ── Filters ──────────────────────────────────────────────────────────

/// Value meaning "no constraint" for a filter field.
const UNSET: &str = "all";

/// Resource-agnostic filter state: an optional free-text search plus a
/// map of field constraints. Keys are resource-specific (`role`,
/// `status`, `skill`, ...); a value of `"all"` or the empty string
/// clears the field. `BTreeMap` keeps query serialization in stable
/// key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    search: Option<String>,
    fields: BTreeMap<String, String>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field constraint.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set or clear a field constraint. `"all"` and `""` mean unset.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() || value == UNSET {
            self.fields.remove(key);
        } else {
            self.fields.insert(key.to_owned(), value);
        }
    }

    /// Set or clear the free-text search term.
    pub fn set_search(&mut self, term: &str) {
        let term = term.trim();
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_owned())
        };
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Remove every constraint.
    pub fn clear(&mut self) {
        self.search = None;
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.fields.is_empty()
    }
}

// ── Pagination cursor ────────────────────────────────────────────────

/// Current page position. Invariant: `page >= 1`, `page_size >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub page_size: u32,
}

impl PageCursor {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

// ── List query ───────────────────────────────────────────────────────

/// The composite dependency for a list fetch: filters plus cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Filters,
    pub cursor: PageCursor,
}

impl ListQuery {
    pub fn new(filters: Filters, cursor: PageCursor) -> Self {
        Self { filters, cursor }
    }

    /// Serialize into query parameters with deterministic (sorted) key
    /// order, regardless of the order constraints were applied in.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: BTreeMap<String, String> = self.filters.fields.clone();
        if let Some(search) = self.filters.search() {
            params.insert("search".to_owned(), search.to_owned());
        }
        params.insert("page".to_owned(), self.cursor.page.to_string());
        params.insert("pageSize".to_owned(), self.cursor.page_size.to_string());
        params.into_iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn filters_unset_sentinel_clears_field() {
        let mut f = Filters::new();
        f.set("role", "admin");
        assert_eq!(f.get("role"), Some("admin"));

        f.set("role", "all");
        assert_eq!(f.get("role"), None);
        assert!(f.is_empty());
    }

    #[test]
    fn filters_empty_search_is_unset() {
        let mut f = Filters::new();
        f.set_search("   ");
        assert_eq!(f.search(), None);

        f.set_search(" band 7 ");
        assert_eq!(f.search(), Some("band 7"));
    }

    #[test]
    fn query_params_are_sorted_regardless_of_insertion_order() {
        let mut a = Filters::new();
        a.set("status", "active");
        a.set("role", "student");
        a.set_search("ana");

        let mut b = Filters::new();
        b.set_search("ana");
        b.set("role", "student");
        b.set("status", "active");

        let qa = ListQuery::new(a, PageCursor::new(2, 25));
        let qb = ListQuery::new(b, PageCursor::new(2, 25));

        assert_eq!(qa.to_params(), qb.to_params());
        assert_eq!(
            qa.to_params(),
            vec![
                ("page".to_owned(), "2".to_owned()),
                ("pageSize".to_owned(), "25".to_owned()),
                ("role".to_owned(), "student".to_owned()),
                ("search".to_owned(), "ana".to_owned()),
                ("status".to_owned(), "active".to_owned()),
            ]
        );
    }

    #[test]
    fn page_cursor_clamps_to_one() {
        let c = PageCursor::new(0, 0);
        assert_eq!(c.page, 1);
        assert_eq!(c.page_size, 1);
    }

    #[test]
    fn null_data_coerces_to_empty_items() {
        let raw = r#"{"success": true, "data": null, "total": 0, "totalPages": 1}"#;
        let envelope: PageEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        let page = envelope.into_page(PageCursor::default());
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn missing_total_pages_is_derived_from_total() {
        let raw = r#"{"success": true, "data": [], "total": 45}"#;
        let envelope: PageEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        let page = envelope.into_page(PageCursor::new(1, 20));
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn role_round_trips_through_strings() {
        let role: Role = "instructor".parse().unwrap();
        assert_eq!(role, Role::Instructor);
        assert_eq!(role.to_string(), "instructor");
        assert_eq!(
            serde_json::to_string(&Role::Admin).unwrap(),
            "\"admin\"".to_owned()
        );
    }
}
