//! Compiles listing request parameters into a single store query.
//!
//! Malformed input never fails; it degrades to the default query shape.

use tracing::debug;

use super::model::CraftItem;
use crate::auth::gate::ScopedEmail;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// `category` value that switches the listing to distinct category names.
pub const CATEGORY_LISTING: &str = "category";

/// Raw listing parameters, exactly as they appeared in the query string.
#[derive(Debug, Default, Clone)]
pub struct ListingParams {
    pub email: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub limit: Option<String>,
}

impl ListingParams {
    /// First occurrence of a key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "email" => &mut params.email,
                "category" => &mut params.category,
                "search" => &mut params.search,
                "page" => &mut params.page,
                "size" => &mut params.size,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Owner email the caller asked to be scoped to; empty means unscoped.
    pub fn requested_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }

    fn page_requested(&self) -> bool {
        self.page.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Owner equality predicate. Set only from a verified scope.
    pub email: Option<String>,
    /// Case-insensitive substring match on `name`.
    pub name_contains: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            email: None,
            name_contains: None,
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingQuery {
    pub fn matches(&self, item: &CraftItem) -> bool {
        if let Some(email) = &self.email {
            if item.str_field("email") != Some(email.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            let Some(name) = item.str_field("name") else {
                return false;
            };
            if !name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Distinct category values across the whole collection.
    Categories,
    /// Filtered page of items, newest first.
    Items(ListingQuery),
}

/// Builds the listing for `params`. `scope` must come from the credential
/// gate whenever the request named an owner email.
///
/// The feed `limit` only applies when no `page` was requested; it then
/// replaces `size` as the result bound and still composes with the email
/// and search predicates.
pub fn compile(params: &ListingParams, scope: Option<ScopedEmail>) -> Listing {
    if params.category.as_deref() == Some(CATEGORY_LISTING) {
        debug!("category listing");
        return Listing::Categories;
    }

    let page = positive(params.page.as_deref()).unwrap_or(0);
    let size = positive(params.size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);
    let feed_limit = if params.page_requested() {
        None
    } else {
        positive(params.limit.as_deref())
    };

    let query = ListingQuery {
        email: scope.map(ScopedEmail::into_inner),
        name_contains: params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        skip: page.saturating_mul(size),
        limit: feed_limit.unwrap_or(size),
    };
    debug!(?query, "listing query compiled");
    Listing::Items(query)
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_leading_int).filter(|n| *n > 0)
}

/// Reads an optionally signed integer prefix, ignoring leading whitespace and
/// any trailing characters: `" 12px"` is 12, `"abc"` is `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}
