use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::RedisCache;
use crate::modules::notification::{model::Recipient, repository::DeviceTokenRepository};
use crate::modules::user::model::{
    CreatorResponse, CreatorSignInModel, InsertUser, RegisterCreatorModel,
};
use crate::modules::user::repository::UserRepository;
use crate::utils::{
    hash_password, issue_token_pair, refresh_key, verify_password, Claims, TokenSettings,
    TypeClaims,
};
use crate::ENV;

const PROFILE_CACHE_TTL: u64 = 3600;

pub fn token_settings() -> TokenSettings<'static> {
    TokenSettings {
        secret: ENV.jwt_secret.as_ref(),
        access_expiration: ENV.access_token_expiration,
        refresh_expiration: ENV.refresh_token_expiration,
    }
}

/// Creator accounts: registration, sign-in with push token refresh, token rotation and the
/// cached profile.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    tokens: Arc<dyn DeviceTokenRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        tokens: Arc<dyn DeviceTokenRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, tokens, cache }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CreatorResponse, error::SystemError> {
        let key = format!("creator:{}", id);
        if let Some(cached_user) = self.cache.get::<CreatorResponse>(&key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }
        let entity = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let user = CreatorResponse::from(entity);
        self.cache.set(&key, &user, PROFILE_CACHE_TTL).await?;
        info!("User {} cached", id);
        Ok(user)
    }

    pub async fn sign_up(
        &self,
        user: RegisterCreatorModel,
    ) -> Result<CreatorResponse, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let entity = self
            .repo
            .create(&InsertUser {
                username: user.username.trim().to_string(),
                email: user.email,
                phone_number: user.phone_number,
                hash_password,
                fcm_token: user.fcm_token,
            })
            .await?;

        info!("Creator {} registered", entity.id);
        Ok(CreatorResponse::from(entity))
    }

    pub async fn sign_in(
        &self,
        credentials: CreatorSignInModel,
    ) -> Result<(String, String), error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(&credentials.email)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid credentials"))?;

        if !verify_password(&user_entity.hash_password, &credentials.password)? {
            return Err(error::SystemError::unauthorized("Invalid credentials"));
        }

        if let Some(token) = credentials.fcm_token {
            if user_entity.fcm_token.as_deref() != Some(token.as_str()) {
                self.tokens.save_token(&Recipient::User(user_entity.id), &token).await?;
                info!("Device token refreshed for creator {}", user_entity.id);
            }
        }

        issue_token_pair(&self.cache, token_settings(), &user_entity.id, &user_entity.role).await
    }

    /// Rotates a refresh token. Works for any role, company tokens included.
    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let token =
            refresh_token.ok_or_else(|| error::SystemError::unauthorized("Missing refresh token"))?;

        let claims = Claims::decode(&token, ENV.jwt_secret.as_ref())
            .map_err(|_| error::SystemError::unauthorized("Refresh token invalid or expired"))?;

        let jti = match (&claims._type, claims.jti) {
            (Some(TypeClaims::RefreshToken), Some(jti)) => jti,
            _ => return Err(error::SystemError::unauthorized("Refresh token invalid or expired")),
        };

        let key = refresh_key(&jti);
        let owner = self.cache.get::<Uuid>(&key).await?;
        if owner != Some(claims.sub) {
            return Err(error::SystemError::unauthorized("Refresh token revoked"));
        }
        self.cache.delete(&key).await?;

        issue_token_pair(&self.cache, token_settings(), &claims.sub, &claims.role).await
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        if let Ok(Claims { jti: Some(jti), .. }) = Claims::decode(&token, ENV.jwt_secret.as_ref()) {
            self.cache.delete(&refresh_key(&jti)).await?;
        }
        Ok(())
    }
}
