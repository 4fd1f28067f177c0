use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{
        Claims, Role,
        jwt::JwtKeys,
        password::{MIN_PASSWORD_LEN, hash_password, verify_password},
    },
    config::AuthConfig,
    db::{dao::NewUser, entities::user},
    error::AppError,
    services::{
        user_service::{UserService, normalize_email},
        validation::FieldErrors,
        views::{AuthPayload, UserView},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService<'a> {
    users: UserService,
    jwt: &'a JwtKeys,
}

impl<'a> AuthService<'a> {
    pub fn new(users: UserService, jwt: &'a JwtKeys) -> Self {
        Self { users, jwt }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, AppError> {
        let mut errors = FieldErrors::new();
        let email = normalize_email(&request.email);
        if email.is_empty() || !email.contains('@') {
            errors.push("email", "A valid email is required");
        }
        let name = errors.required_text("name", "Name", Some(&request.name));
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        errors.finish()?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::invalid_field("email", "Email already registered"));
        }

        let hash = hash_password(&request.password)?;
        let user = self
            .users
            .create_user(NewUser {
                email,
                password_hash: hash,
                name,
                role: Role::User.as_str().to_string(),
            })
            .await?;
        tracing::info!(user_id = %user.id, "user registered");

        self.issue(user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, AppError> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let now = chrono::Utc::now().fixed_offset();
        let user = self.users.set_last_login(user.id, now).await?;

        self.issue(user)
    }

    /// The user behind a verified token. A token for a deleted user is
    /// rejected as unauthenticated.
    pub async fn me(&self, claims: &Claims) -> Result<UserView, AppError> {
        self.users
            .find_by_id(&claims.user_id())
            .await?
            .map(UserView::from)
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))
    }

    /// Creates the configured administrator unless the email is taken.
    pub async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        let existing = self
            .users
            .find_by_email(&cfg.admin_email)
            .await
            .context("looking up the admin account")?;
        if let Some(existing) = existing {
            tracing::info!(email = %existing.email, "admin account already present");
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password).context("hashing the admin password")?;
        let user = self
            .users
            .create_user(NewUser {
                email: cfg.admin_email.clone(),
                password_hash: hash,
                name: cfg.admin_name.clone(),
                role: Role::Admin.as_str().to_string(),
            })
            .await
            .context("creating the admin account")?;
        tracing::info!(email = %user.email, "seeded admin account");
        Ok(())
    }

    fn issue(&self, user: user::Model) -> Result<AuthPayload, AppError> {
        let role = Role::from_stored(&user.role);
        let token = self.jwt.issue(user.id, role.granted())?;
        Ok(AuthPayload {
            token,
            user: UserView::from(user),
        })
    }
}
