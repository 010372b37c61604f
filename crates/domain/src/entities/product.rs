use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The editable part of a listing: display name, the tracked specification
/// vector, and the source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub name: String,
    pub screen_size: f32,   // inches
    pub price: Decimal,
    pub processor: i32,     // tier, higher is better
    pub graphics_card: i32, // tier, higher is better
    pub ram: i32,           // GB
    pub storage: i32,       // GB
    pub url: String,
}

impl ProductSpec {
    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.name.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Product name cannot be empty".to_string(),
            ));
        }

        if self.price < Decimal::ZERO {
            return Err(crate::DomainError::ValidationError(
                "Price cannot be negative".to_string(),
            ));
        }

        if self.screen_size < 0.0 {
            return Err(crate::DomainError::ValidationError(
                "Screen size cannot be negative".to_string(),
            ));
        }

        for (field, value) in [
            ("Processor", self.processor),
            ("Graphics card", self.graphics_card),
            ("RAM", self.ram),
            ("Storage", self.storage),
        ] {
            if value < 0 {
                return Err(crate::DomainError::ValidationError(format!(
                    "{} cannot be negative",
                    field
                )));
            }
        }

        Ok(())
    }
}

/// A product listing.
///
/// A product may be listed by several stores at once, so ownership is a
/// set of store ids rather than a single foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<i32>, // None before persistence
    #[serde(flatten)]
    pub spec: ProductSpec,
    pub store_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(spec: ProductSpec, store_ids: Vec<i32>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            spec,
            store_ids,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(
        id: i32,
        spec: ProductSpec,
        store_ids: Vec<i32>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            spec,
            store_ids,
            created_at,
            updated_at,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        self.spec.validate()
    }

    pub fn is_listed_in(&self, store_id: i32) -> bool {
        self.store_ids.contains(&store_id)
    }

    /// Replace the editable fields, bumping the update timestamp.
    pub fn apply_spec(&mut self, spec: ProductSpec) {
        self.spec = spec;
        self.updated_at = Utc::now();
    }

    pub fn price(&self) -> Decimal {
        self.spec.price
    }
}
