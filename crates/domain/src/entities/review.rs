use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's review of a product. At most one per (user, product) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Option<i32>,
    pub comment: String,
    pub product_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(comment: String, product_id: i32, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            comment,
            product_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(
        id: i32,
        comment: String,
        product_id: i32,
        user_id: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            comment,
            product_id,
            user_id,
            created_at,
            updated_at,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.comment.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Review comment cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
