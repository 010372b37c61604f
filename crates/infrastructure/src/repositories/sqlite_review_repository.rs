use crate::database::{reviews, SqlitePool};
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use domain::{DomainError, Review, ReviewRepository};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ReviewModel {
    id: i32,
    comment: String,
    product_id: i32,
    user_id: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = reviews)]
struct NewReviewModel {
    comment: String,
    product_id: i32,
    user_id: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<ReviewModel> for Review {
    fn from(model: ReviewModel) -> Self {
        Review::with_id(
            model.id,
            model.comment,
            model.product_id,
            model.user_id,
            Utc.from_utc_datetime(&model.created_at),
            Utc.from_utc_datetime(&model.updated_at),
        )
    }
}

impl From<&Review> for NewReviewModel {
    fn from(review: &Review) -> Self {
        NewReviewModel {
            comment: review.comment.clone(),
            product_id: review.product_id,
            user_id: review.user_id,
            created_at: review.created_at.naive_utc(),
            updated_at: review.updated_at.naive_utc(),
        }
    }
}

pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            reviews::table
                .filter(reviews::id.eq(id))
                .select(ReviewModel::as_select())
                .first::<ReviewModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn find_by_product(&self, product_id: i32) -> Result<Vec<Review>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            reviews::table
                .filter(reviews::product_id.eq(product_id))
                .order(reviews::created_at.desc())
                .select(ReviewModel::as_select())
                .load::<ReviewModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }

    async fn find_by_user_and_product(
        &self,
        user_id: i32,
        product_id: i32,
    ) -> Result<Option<Review>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            reviews::table
                .filter(reviews::user_id.eq(user_id))
                .filter(reviews::product_id.eq(product_id))
                .select(ReviewModel::as_select())
                .first::<ReviewModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn save(&self, review: &Review) -> Result<Review, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_review = NewReviewModel::from(review);

        let result = tokio::task::spawn_blocking(move || {
            // Insert and read-back share one transaction; the max-id lookup
            // must not observe a concurrent writer's row.
            conn.transaction(|conn| {
                diesel::insert_into(reviews::table)
                    .values(&new_review)
                    .execute(conn)?;

                reviews::table
                    .order(reviews::id.desc())
                    .select(ReviewModel::as_select())
                    .first::<ReviewModel>(conn)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, review: &Review) -> Result<Review, DomainError> {
        let review_id = review.id.ok_or_else(|| {
            DomainError::ValidationError("Review ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let comment = review.comment.clone();
        let updated_at = review.updated_at.naive_utc();

        let result = tokio::task::spawn_blocking(move || {
            diesel::update(reviews::table.filter(reviews::id.eq(review_id)))
                .set((
                    reviews::comment.eq(comment),
                    reviews::updated_at.eq(updated_at),
                ))
                .execute(&mut conn)?;

            reviews::table
                .filter(reviews::id.eq(review_id))
                .select(ReviewModel::as_select())
                .first::<ReviewModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            diesel::delete(reviews::table.filter(reviews::id.eq(id))).execute(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }
}
