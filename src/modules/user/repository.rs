use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{model::InsertUser, schema::UserEntity},
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    /// Case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;

    /// Username, email and phone number are unique; a clash surfaces as a conflict naming
    /// the column.
    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;
}
