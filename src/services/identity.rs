// src/services/identity.rs
//
// User registration, credential verification and session resumption.
use crate::models::{ServiceError, User, ROLE_MEMBER};
use crate::storage::{Store, USERS};
use crate::utils::{avatar, password, validation};
use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

fn decode_user(bytes: &[u8]) -> Result<User, ServiceError> {
    serde_json::from_slice(bytes).map_err(|e| {
        error!("Failed to parse stored user: {:?}", e);
        ServiceError::StoreUnavailable
    })
}

fn encode_user(user: &User) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec(user).map_err(|e| {
        error!("Failed to serialize user: {:?}", e);
        ServiceError::Internal
    })
}

// Look up a user by display name, case-insensitively.
fn find_by_name(store: &dyn Store, name: &str) -> Result<Option<User>, ServiceError> {
    let wanted = name.to_lowercase();

    for (_, bytes) in store.scan(USERS)? {
        let user = decode_user(&bytes)?;
        if user.name.to_lowercase() == wanted {
            return Ok(Some(user));
        }
    }

    Ok(None)
}

fn find_by_email(store: &dyn Store, email: &str) -> Result<Option<User>, ServiceError> {
    for (_, bytes) in store.scan(USERS)? {
        let user = decode_user(&bytes)?;
        if user.email == email {
            return Ok(Some(user));
        }
    }

    Ok(None)
}

pub fn find_by_id(store: &dyn Store, user_id: &str) -> Result<Option<User>, ServiceError> {
    match store.get(USERS, user_id)? {
        Some(bytes) => Ok(Some(decode_user(&bytes)?)),
        None => Ok(None),
    }
}

// Register a new user. Display names are unique across the service,
// compared case-insensitively.
pub fn register(
    store: &dyn Store,
    name: &str,
    email: &str,
    plain_password: &str,
) -> Result<User, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("name is empty".to_string()));
    }

    validation::check_email(email)?;
    validation::check_password(plain_password)?;

    if find_by_name(store, name)?.is_some() {
        error!("❌ Name already taken: {}", name);
        return Err(ServiceError::NameTaken);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password::hash_password(plain_password)?,
        role: ROLE_MEMBER.to_string(),
        avatar_ref: avatar::avatar_ref(name),
        created_at: Utc::now(),
    };

    store.put(USERS, &user.id, &encode_user(&user)?)?;

    info!("✅ User registered: {} ({})", user.name, user.id);

    Ok(user)
}

// Verify credentials and return the matching user. Side-effect free.
pub fn authenticate(
    store: &dyn Store,
    email: &str,
    plain_password: &str,
) -> Result<User, ServiceError> {
    let user = match find_by_email(store, email)? {
        Some(user) => user,
        None => return Err(ServiceError::InvalidCredentials),
    };

    if !password::verify_password(plain_password, &user.password_hash)? {
        return Err(ServiceError::InvalidCredentials);
    }

    Ok(user)
}

// Rebuild a previously authenticated identity from durable state without
// re-verifying credentials.
pub fn resume_session(store: &dyn Store, user_id: &str) -> Result<User, ServiceError> {
    find_by_id(store, user_id)?.ok_or(ServiceError::SessionAbsent)
}
