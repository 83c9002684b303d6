use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategorySlug, CategoryTitle};

/// A category grouping posts under a unique slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub description: String,
    pub slug: CategorySlug,
    /// Hidden categories also hide every post filed under them.
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub title: CategoryTitle,
    pub description: String,
    pub slug: CategorySlug,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}
