// ABOUTME: Per-API endpoint catalog with a tag index, operation lookup, and keyword search
// ABOUTME: Built once from parsed endpoint records and read-only afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use crate::types::EndpointRecord;

/// Tag assigned to endpoints that declare none
pub const DEFAULT_TAG: &str = "default";

/// Result count used when the caller gives no usable limit
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Upper bound on search results regardless of the requested limit
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Resolve a caller-requested search limit
///
/// Absent, non-integer (already `None` here), and values below 1 fall back to
/// [`DEFAULT_SEARCH_LIMIT`]; everything else is clamped to [`MAX_SEARCH_LIMIT`].
pub fn effective_search_limit(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n >= 1 => usize::try_from(n).map_or(MAX_SEARCH_LIMIT, |n| n.min(MAX_SEARCH_LIMIT)),
        _ => DEFAULT_SEARCH_LIMIT,
    }
}

/// Find an item by name: exact match first, then ASCII case-insensitive
///
/// Returns the first match in iteration order for each pass.
pub(crate) fn match_name<'a, T, F>(items: &'a [T], wanted: &str, name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    items
        .iter()
        .find(|item| name_of(*item) == wanted)
        .or_else(|| {
            items
                .iter()
                .find(|item| name_of(*item).eq_ignore_ascii_case(wanted))
        })
}

/// A tag with the indices of the endpoints carrying it
#[derive(Debug, Clone)]
struct TagGroup {
    name: String,
    members: Vec<usize>,
}

/// Endpoints of one named tag, as returned by [`EndpointCatalog::by_tag`]
#[derive(Debug)]
pub struct TagListing<'a> {
    /// The tag name as stored in the catalog (canonical casing)
    pub name: &'a str,
    /// Endpoints carrying the tag, in catalog order
    pub endpoints: Vec<&'a EndpointRecord>,
}

/// Flat endpoint list plus a tag → endpoints index
///
/// An endpoint with N tags appears under all N groups, so the per-tag counts
/// can sum to more than [`len`](Self::len). Tag groups keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct EndpointCatalog {
    endpoints: Vec<EndpointRecord>,
    tags: Vec<TagGroup>,
}

impl EndpointCatalog {
    /// Build the catalog and its tag index from parsed endpoint records
    pub fn new(endpoints: Vec<EndpointRecord>) -> Self {
        let mut tags: Vec<TagGroup> = Vec::new();

        for (index, endpoint) in endpoints.iter().enumerate() {
            let names: Vec<&str> = if endpoint.tags.is_empty() {
                vec![DEFAULT_TAG]
            } else {
                endpoint.tags.iter().map(String::as_str).collect()
            };

            for name in names {
                match tags.iter_mut().find(|g| g.name == name) {
                    Some(group) => {
                        if !group.members.contains(&index) {
                            group.members.push(index);
                        }
                    }
                    None => tags.push(TagGroup {
                        name: name.to_owned(),
                        members: vec![index],
                    }),
                }
            }
        }

        Self { endpoints, tags }
    }

    /// All endpoints in catalog order
    pub fn endpoints(&self) -> &[EndpointRecord] {
        &self.endpoints
    }

    /// Number of endpoints
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether the catalog has no endpoints
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Number of distinct tags
    pub fn category_count(&self) -> usize {
        self.tags.len()
    }

    /// Tag names with their endpoint counts, in first-seen order
    pub fn categories(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tags.iter().map(|g| (g.name.as_str(), g.members.len()))
    }

    /// Tag names in first-seen order
    pub fn category_names(&self) -> Vec<&str> {
        self.tags.iter().map(|g| g.name.as_str()).collect()
    }

    /// Endpoints of a tag, matched exactly then case-insensitively
    pub fn by_tag(&self, tag: &str) -> Option<TagListing<'_>> {
        let group = match_name(&self.tags, tag, |g| g.name.as_str())?;
        Some(TagListing {
            name: &group.name,
            endpoints: group
                .members
                .iter()
                .filter_map(|&i| self.endpoints.get(i))
                .collect(),
        })
    }

    /// Endpoint by operationId, matched exactly then case-insensitively
    pub fn by_operation_id(&self, operation_id: &str) -> Option<&EndpointRecord> {
        match_name(&self.endpoints, operation_id, |e| e.operation_id.as_str())
    }

    /// Case-insensitive substring search over operationId, path, summary,
    /// description, and tags, returning at most `limit` endpoints in catalog order
    pub fn search(&self, keyword: &str, limit: usize) -> Vec<&EndpointRecord> {
        let needle = keyword.to_lowercase();
        self.endpoints
            .iter()
            .filter(|e| matches_keyword(e, &needle))
            .take(limit)
            .collect()
    }
}

/// Check whether any searchable field contains the lower-cased keyword
fn matches_keyword(endpoint: &EndpointRecord, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    contains(&endpoint.operation_id)
        || contains(&endpoint.path)
        || contains(&endpoint.summary)
        || contains(&endpoint.description)
        || endpoint.tags.iter().any(|t| contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;

    fn sample() -> EndpointCatalog {
        EndpointCatalog::new(vec![
            EndpointRecord::new("getPetById", HttpMethod::Get, "/pet/{petId}")
                .with_summary("Find pet by ID")
                .with_tags(["pet"]),
            EndpointRecord::new("placeOrder", HttpMethod::Post, "/store/order")
                .with_summary("Place an order for a pet")
                .with_tags(["store", "pet"]),
            EndpointRecord::new("health", HttpMethod::Get, "/health"),
            EndpointRecord::new("loginUser", HttpMethod::Get, "/user/login")
                .with_description("Logs user into the system")
                .with_tags(["user"]),
        ])
    }

    #[test]
    fn untagged_endpoints_land_in_default() {
        let catalog = sample();
        let listing = catalog.by_tag("default").expect("default tag");
        assert_eq!(listing.endpoints.len(), 1);
        assert_eq!(listing.endpoints[0].operation_id, "health");
    }

    #[test]
    fn multi_tag_endpoint_appears_in_every_group() {
        let catalog = sample();
        let pet = catalog.by_tag("pet").expect("pet tag");
        let store = catalog.by_tag("store").expect("store tag");
        assert!(pet.endpoints.iter().any(|e| e.operation_id == "placeOrder"));
        assert!(store.endpoints.iter().any(|e| e.operation_id == "placeOrder"));

        let total: usize = catalog.categories().map(|(_, n)| n).sum();
        assert!(total > catalog.len());
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let catalog = sample();
        assert_eq!(catalog.category_names(), vec!["pet", "store", "default", "user"]);
    }

    #[test]
    fn tag_lookup_falls_back_to_case_insensitive() {
        let catalog = sample();
        let listing = catalog.by_tag("PET").expect("case-insensitive match");
        assert_eq!(listing.name, "pet");
        assert!(catalog.by_tag("missing").is_none());
    }

    #[test]
    fn operation_lookup_prefers_exact_then_first_duplicate() {
        let catalog = EndpointCatalog::new(vec![
            EndpointRecord::new("getpet", HttpMethod::Get, "/a"),
            EndpointRecord::new("getPet", HttpMethod::Get, "/b"),
            EndpointRecord::new("getPet", HttpMethod::Get, "/c"),
        ]);
        assert_eq!(catalog.by_operation_id("getPet").map(|e| e.path.as_str()), Some("/b"));
        assert_eq!(catalog.by_operation_id("GETPET").map(|e| e.path.as_str()), Some("/a"));
    }

    #[test]
    fn search_matches_every_field_in_catalog_order() {
        let catalog = sample();
        let hits: Vec<&str> = catalog
            .search("PET", 10)
            .iter()
            .map(|e| e.operation_id.as_str())
            .collect();
        assert_eq!(hits, vec!["getPetById", "placeOrder"]);

        assert_eq!(catalog.search("system", 10).len(), 1);
        assert_eq!(catalog.search("/user", 10).len(), 1);
        assert_eq!(catalog.search("pet", 1).len(), 1);
    }

    #[test]
    fn search_limit_defaults_and_clamps() {
        assert_eq!(effective_search_limit(None), DEFAULT_SEARCH_LIMIT);
        assert_eq!(effective_search_limit(Some(0)), DEFAULT_SEARCH_LIMIT);
        assert_eq!(effective_search_limit(Some(-5)), DEFAULT_SEARCH_LIMIT);
        assert_eq!(effective_search_limit(Some(7)), 7);
        assert_eq!(effective_search_limit(Some(100)), MAX_SEARCH_LIMIT);
        assert_eq!(effective_search_limit(Some(i64::MAX)), MAX_SEARCH_LIMIT);
    }
}
