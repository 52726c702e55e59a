//! Content post model
//!
//! Educational posts and course material published by administrators:
//! guides on waste sorting, digester operation, clean-cooking curricula.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPost {
    /// Unique identifier
    pub id: i64,
    /// Authoring admin
    pub author_id: i64,
    /// Post title
    pub title: String,
    /// Post body (markdown or HTML, rendered client-side)
    pub body: String,
    /// Category label (e.g. "training", "news", "course")
    pub category: String,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Whether the post is visible to non-admins
    pub published: bool,
    /// Whether the post is pinned to the top of listings
    pub featured: bool,
    /// Number of recorded views
    pub view_count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ContentPost {
    /// Serialize tags for storage as a single column
    pub fn tags_to_column(tags: &[String]) -> String {
        tags.join(",")
    }

    /// Parse the stored tags column back into a list
    pub fn tags_from_column(column: &str) -> Vec<String> {
        column
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Input for creating a content post
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentInput {
    pub title: String,
    pub body: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

fn default_category() -> String {
    "general".to_string()
}

/// Input for updating a content post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
}
