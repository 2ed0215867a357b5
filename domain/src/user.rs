//! Account registration and credential checks.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::users;
use email_address::EmailAddress;
use entity::role::Role;
use entity_api::user;
use log::*;
use password_auth::{generate_hash, verify_password};
use sea_orm::DatabaseConnection;

pub use entity_api::user::{find_by_email, find_by_id};

/// Passwords shorter than this are rejected at registration.
const MIN_PASSWORD_CHARS: usize = 6;

/// Register a new account. The password is hashed before it ever reaches the
/// persistence layer; a taken email surfaces as a `Conflict`.
pub async fn register(
    db: &DatabaseConnection,
    name: String,
    email: String,
    password: String,
) -> Result<users::Model, Error> {
    let name = name.trim().to_string();
    let email = email.trim().to_lowercase();
    validate_registration(&name, &email, &password)?;

    let now = chrono::Utc::now();
    let user = user::create(
        db,
        users::Model {
            id: crate::Id::new_v4(),
            name,
            email,
            password: generate_hash(&password),
            role: Role::User,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;

    info!("Registered new user {} ({})", user.email, user.id);

    Ok(user)
}

/// Check an email/password pair against the stored hash. Unknown emails and
/// wrong passwords are indistinguishable to the caller.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<users::Model, Error> {
    let email = email.trim().to_lowercase();

    let user = find_by_email(db, &email)
        .await?
        .ok_or_else(unauthenticated_error)?;

    verify_password(password, &user.password).map_err(|_| {
        debug!("Password verification failed for {}", email);
        unauthenticated_error()
    })?;

    Ok(user)
}

fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), Error> {
    let mut messages = Vec::new();

    if name.is_empty() {
        messages.push("name must not be empty".to_string());
    }
    if !EmailAddress::is_valid(email) {
        messages.push("email must be a valid email address".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        messages.push(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        ));
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(messages))
    }
}

fn unauthenticated_error() -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::Unauthenticated,
        )),
    }
}
