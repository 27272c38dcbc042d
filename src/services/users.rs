use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::auth::{hash_password, verify_password};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::entities::{admin_user, login_event, AdminUser as AdminUserEntity};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize)]
pub struct CreateAdminInput {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// Context captured from the login request for the audit trail.
#[derive(Debug, Default)]
pub struct LoginContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Admin account management and credential verification.
#[derive(Clone)]
pub struct AdminUserService {
    db: Arc<DbPool>,
}

impl AdminUserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_admin(
        &self,
        input: CreateAdminInput,
    ) -> Result<admin_user::Model, ServiceError> {
        let nombre = input.nombre.trim();
        let email = input.email.trim().to_lowercase();

        if nombre.is_empty() {
            return Err(ServiceError::ValidationError(
                "Name is required".to_string(),
            ));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::ValidationError(
                "A valid email is required".to_string(),
            ));
        }
        if input.password.len() < 4 {
            return Err(ServiceError::ValidationError(
                "Password must be at least 4 characters".to_string(),
            ));
        }

        let existing = AdminUserEntity::find()
            .filter(admin_user::Column::Email.eq(email.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(
                "An account with that email already exists".to_string(),
            ));
        }

        let user = admin_user::ActiveModel {
            nombre: Set(nombre.to_string()),
            email: Set(email),
            password_hash: Set(hash_password(&input.password)?),
            estado: Set(true),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(admin_user_id = user.id, "Admin user created");
        Ok(user)
    }

    /// Verifies credentials and appends a login event on success. A failure
    /// to write the audit row never fails the login itself.
    #[instrument(skip(self, password, context), fields(email = %email))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        context: LoginContext,
    ) -> Result<admin_user::Model, ServiceError> {
        let email = email.trim().to_lowercase();
        let user = AdminUserEntity::find()
            .filter(admin_user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(ServiceError::Unauthorized(
                "Invalid credentials".to_string(),
            ));
        }
        if !user.estado {
            return Err(ServiceError::Forbidden(
                "Account is disabled".to_string(),
            ));
        }

        let event = login_event::ActiveModel {
            admin_user_id: Set(user.id),
            fecha: Set(chrono::Utc::now()),
            ip: Set(context.ip),
            user_agent: Set(context.user_agent),
            ..Default::default()
        };
        if let Err(e) = event.insert(&*self.db).await {
            warn!(admin_user_id = user.id, error = %e, "Failed to record login event");
        }

        info!(admin_user_id = user.id, "Admin authenticated");
        Ok(user)
    }

    /// Ensures the bootstrap admin exists so a fresh deployment is usable.
    /// Does nothing if any account already uses the configured email.
    #[instrument(skip(self, config))]
    pub async fn seed_default_admin(&self, config: &AppConfig) -> Result<(), ServiceError> {
        let existing = AdminUserEntity::find()
            .filter(admin_user::Column::Email.eq(config.seed_admin_email.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        self.create_admin(CreateAdminInput {
            nombre: config.seed_admin_name.clone(),
            email: config.seed_admin_email.clone(),
            password: config.seed_admin_password.clone(),
        })
        .await?;

        info!(email = %config.seed_admin_email, "Seeded default admin account");
        Ok(())
    }
}
