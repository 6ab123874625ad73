//! Candidate-list response projection for blog posts and learning pathways.
//!
//! Responses for these two entities are built by probing a fixed list of
//! candidate columns per output key instead of echoing the row as-is.

use serde_json::{Map, Value};

/// Output key plus row-column candidates, tried in order.
pub type Projection = &'static [(&'static str, &'static [&'static str])];

pub const POST_PROJECTION: Projection = &[
    ("id", &["id", "pk"]),
    ("title", &["title", "name"]),
    ("content", &["content", "body", "text", "description"]),
    ("author_id", &["author_id", "author", "user_id"]),
    ("created_at", &["created_at", "created", "date_created", "timestamp"]),
];

pub const PATHWAY_PROJECTION: Projection = &[
    ("id", &["id"]),
    ("title", &["title", "name"]),
    ("description", &["description", "summary", "details"]),
    ("slug", &["slug"]),
    ("created_at", &["created_at", "created", "date_created"]),
];

/// Shape a raw row for the API: each key takes the first candidate column
/// holding a non-null value; keys with no such candidate are omitted. `id` is
/// always carried over when the row has one.
pub fn project(row: &Map<String, Value>, projection: Projection) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, candidates) in projection {
        for cand in *candidates {
            if let Some(v) = row.get(*cand) {
                if !v.is_null() {
                    out.insert((*key).to_string(), v.clone());
                    break;
                }
            }
        }
    }
    if !out.contains_key("id") {
        if let Some(v) = row.get("id") {
            out.insert("id".to_string(), v.clone());
        }
    }
    out
}
