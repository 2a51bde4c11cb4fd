//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{AuthConfig, SeedConfig},
    error::{AppError, AppResult, FieldErrors},
    models::{
        enums::Role,
        user::{CreateUser, UpdateUser, User, UserClaims, UserQuery},
    },
    repository::Repository,
};

use super::revalidation::{RevalidationService, DASHBOARD_USERS};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    revalidation: RevalidationService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, revalidation: RevalidationService) -> Self {
        Self {
            repository,
            config,
            revalidation,
        }
    }

    /// Authenticate user by email and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((token, user))
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn search_users(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.search(query).await
    }

    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()?;
        self.check_assignment(user.role, user.department_id.as_deref()).await?;

        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self.hash_password(&user.password)?;
        let created = self.repository.users.create(&user, &password_hash).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "User created");
        self.revalidation.mark_stale([DASHBOARD_USERS]).await;
        Ok(created)
    }

    /// Partial update; the password is re-hashed when supplied
    pub async fn update_user(&self, id: Uuid, user: UpdateUser) -> AppResult<User> {
        user.validate()?;
        let current = self.repository.users.get_by_id(id).await?;

        let role = user.role.unwrap_or(current.role);
        let department_id = match user.department_id {
            Some(ref d) if d.trim().is_empty() => None,
            Some(ref d) => Some(d.trim()),
            None => current.department_id.as_deref(),
        };
        self.check_assignment(role, department_id).await?;

        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password_hash = match user.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };

        let updated = self.repository.users.update(id, &user, password_hash).await?;
        tracing::info!(user_id = %id, "User updated");
        self.revalidation.mark_stale([DASHBOARD_USERS]).await;
        Ok(updated)
    }

    /// Delete a user; an account cannot delete itself
    pub async fn delete_user(&self, claims: &UserClaims, id: Uuid) -> AppResult<()> {
        if claims.user_id == id {
            return Err(AppError::Conflict("You cannot delete your own account".to_string()));
        }
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        self.revalidation.mark_stale([DASHBOARD_USERS]).await;
        Ok(())
    }

    /// Create the bootstrap administrator when no admin exists yet
    pub async fn ensure_admin(&self, seed: &SeedConfig) -> AppResult<Option<User>> {
        if self.repository.users.admin_exists().await? {
            return Ok(None);
        }
        let admin = CreateUser {
            email: seed.admin_email.clone(),
            password: seed.admin_password.clone(),
            name: seed.admin_name.clone(),
            role: Role::Admin,
            department_id: None,
            designation: None,
            phone: None,
            image: None,
        };
        admin.validate()?;
        let password_hash = self.hash_password(&admin.password)?;
        let created = self.repository.users.create(&admin, &password_hash).await?;
        tracing::warn!(email = %created.email, "Bootstrap administrator created; change its password");
        Ok(Some(created))
    }

    /// A department head needs an existing department
    async fn check_assignment(&self, role: Role, department_id: Option<&str>) -> AppResult<()> {
        match (role, department_id.filter(|d| !d.is_empty())) {
            (Role::DeptHead, None) => Err(FieldErrors::single(
                "departmentId",
                "A department head must be assigned to a department",
            )
            .into()),
            (_, Some(id)) => {
                if self.repository.departments.find_by_id(id).await?.is_none() {
                    return Err(FieldErrors::single(
                        "departmentId",
                        format!("Department '{}' does not exist", id),
                    )
                    .into());
                }
                Ok(())
            }
            (Role::Admin, None) => Ok(()),
        }
    }
}
