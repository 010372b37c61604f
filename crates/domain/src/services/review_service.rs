use crate::entities::Review;
use crate::errors::DomainError;
use crate::repositories::{ProductRepository, ReviewRepository};
use crate::services::access::can_modify_review;
use std::sync::Arc;

/// Reviews: any authenticated user may review any product, at most once
/// per product; only the author may change or remove a review.
pub struct ReviewService {
    review_repository: Arc<dyn ReviewRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl ReviewService {
    pub fn new(
        review_repository: Arc<dyn ReviewRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            review_repository,
            product_repository,
        }
    }

    pub async fn create_review(
        &self,
        user_id: i32,
        product_id: i32,
        comment: String,
    ) -> Result<Review, DomainError> {
        self.product_repository
            .find_by_id(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))?;

        if self
            .review_repository
            .find_by_user_and_product(user_id, product_id)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateReview {
                user_id,
                product_id,
            });
        }

        let review = Review::new(comment, product_id, user_id);
        review.validate()?;
        self.review_repository.save(&review).await
    }

    pub async fn list_reviews_for_product(
        &self,
        product_id: i32,
    ) -> Result<Vec<Review>, DomainError> {
        self.product_repository
            .find_by_id(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))?;

        self.review_repository.find_by_product(product_id).await
    }

    /// The acting user's own review of a product, if they wrote one.
    pub async fn get_user_review(
        &self,
        user_id: i32,
        product_id: i32,
    ) -> Result<Option<Review>, DomainError> {
        self.review_repository
            .find_by_user_and_product(user_id, product_id)
            .await
    }

    pub async fn update_review(
        &self,
        acting_user_id: i32,
        review_id: i32,
        comment: String,
    ) -> Result<Review, DomainError> {
        let mut review = self.get_review(review_id).await?;
        if !can_modify_review(acting_user_id, &review) {
            return Err(DomainError::Unauthorized(
                "only the author may update a review".to_string(),
            ));
        }

        review.comment = comment;
        review.updated_at = chrono::Utc::now();
        review.validate()?;
        self.review_repository.update(&review).await
    }

    pub async fn delete_review(
        &self,
        acting_user_id: i32,
        review_id: i32,
    ) -> Result<(), DomainError> {
        let review = self.get_review(review_id).await?;
        if !can_modify_review(acting_user_id, &review) {
            return Err(DomainError::Unauthorized(
                "only the author may delete a review".to_string(),
            ));
        }

        self.review_repository.delete(review_id).await
    }

    async fn get_review(&self, review_id: i32) -> Result<Review, DomainError> {
        self.review_repository
            .find_by_id(review_id)
            .await?
            .ok_or(DomainError::ReviewNotFound(review_id))
    }
}
