use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A storefront owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: Option<i32>,
    pub title: String,
    pub description: String,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(title: String, description: String, owner_id: i32) -> Self {
        Self {
            id: None,
            title,
            description,
            owner_id,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(
        id: i32,
        title: String,
        description: String,
        owner_id: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            title,
            description,
            owner_id,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.title.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Store title cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Substring match on title or description, folding ASCII case only.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_ascii_lowercase();
        self.title.to_ascii_lowercase().contains(&query)
            || self.description.to_ascii_lowercase().contains(&query)
    }
}
