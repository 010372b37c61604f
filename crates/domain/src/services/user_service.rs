use crate::entities::User;
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use std::sync::Arc;

/// Account lifecycle. Credentials and sessions live outside the domain;
/// this service only manages the catalog-facing account record.
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn register_user(
        &self,
        username: String,
        email: String,
    ) -> Result<User, DomainError> {
        let user = User::new(username, email);
        user.validate()?;

        if self
            .user_repository
            .find_by_username(&user.username)
            .await?
            .is_some()
        {
            return Err(DomainError::UsernameAlreadyExists(user.username));
        }

        self.user_repository.save(&user).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<User, DomainError> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    pub async fn update_user(&self, user: User) -> Result<User, DomainError> {
        let user_id = user.id.ok_or_else(|| {
            DomainError::ValidationError("User ID is required for updates".to_string())
        })?;

        user.validate()?;
        self.get_user_by_id(user_id).await?;

        if let Some(existing) = self.user_repository.find_by_username(&user.username).await? {
            if existing.id != user.id {
                return Err(DomainError::UsernameAlreadyExists(user.username));
            }
        }

        self.user_repository.update(&user).await
    }

    /// Removes the account; the user's stores (and their orphaned products
    /// and reviews) go with it.
    pub async fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        self.get_user_by_id(id).await?;
        self.user_repository.delete(id).await
    }
}
