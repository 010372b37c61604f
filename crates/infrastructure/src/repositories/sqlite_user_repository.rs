use crate::database::{reviews, stores, users, SqlitePool};
use crate::repositories::cascade;
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{DomainError, User, UserRepository};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: i32,
    username: String,
    email: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserModel {
    username: String,
    email: String,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User::with_id(model.id, model.username, model.email)
    }
}

impl From<&User> for NewUserModel {
    fn from(user: &User) -> Self {
        NewUserModel {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::id.eq(id))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let username = username.to_string();
        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::username.eq(username))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_user = NewUserModel::from(user);

        let result = tokio::task::spawn_blocking(move || {
            // Insert and read-back share one transaction; the max-id lookup
            // must not observe a concurrent writer's row.
            conn.transaction(|conn| {
                diesel::insert_into(users::table)
                    .values(&new_user)
                    .execute(conn)?;

                users::table
                    .order(users::id.desc())
                    .select(UserModel::as_select())
                    .first::<UserModel>(conn)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let user_id = user.id.ok_or_else(|| {
            DomainError::ValidationError("User ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let username = user.username.clone();
        let email = user.email.clone();

        let result = tokio::task::spawn_blocking(move || {
            diesel::update(users::table.filter(users::id.eq(user_id)))
                .set((users::username.eq(username), users::email.eq(email)))
                .execute(&mut conn)?;

            users::table
                .filter(users::id.eq(user_id))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
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
            conn.transaction(|conn| {
                let owned: Vec<i32> = stores::table
                    .filter(stores::owner_id.eq(id))
                    .select(stores::id)
                    .load(conn)?;
                cascade::delete_stores(conn, &owned)?;

                diesel::delete(reviews::table.filter(reviews::user_id.eq(id))).execute(conn)?;
                diesel::delete(users::table.filter(users::id.eq(id))).execute(conn)?;
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            users::table
                .select(UserModel::as_select())
                .load::<UserModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }
}
