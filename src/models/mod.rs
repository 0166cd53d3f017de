// zentic-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod message;
pub mod team;

pub use message::*;
pub use team::*;

// User models for authentication and identity
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub avatar_ref: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avatar_ref: String,
}

// JWT claims structure for authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub name: String,
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued at
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AssistantRequest {
    pub prompt: String,
    pub context: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AssistantReply {
    pub reply: String,
}

// Custom error types. Every validation and authorization failure carries
// its specific kind; nothing gets coerced into a bare boolean.
#[derive(Debug)]
pub enum ServiceError {
    InvalidInput(String),
    NameTaken,
    InvalidCredentials,
    SessionAbsent,
    TeamNotFound,
    UserNotFound,
    RoleNotFound,
    MemberNotFound,
    RequestNotFound,
    AlreadyMember,
    AlreadyRequested,
    Forbidden,
    ProtectedRole,
    DuplicateRole,
    EmptyMessage,
    AssistantUnavailable,
    StoreUnavailable,
    Internal,
}

// Implement Display for ServiceError
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ServiceError::NameTaken => write!(f, "Name is already taken"),
            ServiceError::InvalidCredentials => write!(f, "Invalid credentials"),
            ServiceError::SessionAbsent => write!(f, "No active session"),
            ServiceError::TeamNotFound => write!(f, "Team not found"),
            ServiceError::UserNotFound => write!(f, "User not found"),
            ServiceError::RoleNotFound => write!(f, "Role not found"),
            ServiceError::MemberNotFound => write!(f, "Member not found"),
            ServiceError::RequestNotFound => write!(f, "Join request not found"),
            ServiceError::AlreadyMember => write!(f, "User is already a team member"),
            ServiceError::AlreadyRequested => write!(f, "Join request already pending"),
            ServiceError::Forbidden => write!(f, "Forbidden"),
            ServiceError::ProtectedRole => write!(f, "Role is protected and cannot be removed"),
            ServiceError::DuplicateRole => write!(f, "Role already exists"),
            ServiceError::EmptyMessage => write!(f, "Message text is empty"),
            ServiceError::AssistantUnavailable => write!(f, "Assistant backend unavailable"),
            ServiceError::StoreUnavailable => write!(f, "Storage unavailable"),
            ServiceError::Internal => write!(f, "Internal Server Error"),
        }
    }
}

// Implement std::error::Error for ServiceError
impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InvalidInput(_) | ServiceError::EmptyMessage =>
                HttpResponse::BadRequest().json(self.to_string()),
            ServiceError::InvalidCredentials | ServiceError::SessionAbsent =>
                HttpResponse::Unauthorized().json(self.to_string()),
            ServiceError::Forbidden =>
                HttpResponse::Forbidden().json(self.to_string()),
            ServiceError::TeamNotFound
            | ServiceError::UserNotFound
            | ServiceError::RoleNotFound
            | ServiceError::MemberNotFound
            | ServiceError::RequestNotFound =>
                HttpResponse::NotFound().json(self.to_string()),
            ServiceError::NameTaken
            | ServiceError::AlreadyMember
            | ServiceError::AlreadyRequested
            | ServiceError::ProtectedRole
            | ServiceError::DuplicateRole =>
                HttpResponse::Conflict().json(self.to_string()),
            ServiceError::AssistantUnavailable =>
                HttpResponse::ServiceUnavailable().json(self.to_string()),
            ServiceError::StoreUnavailable | ServiceError::Internal =>
                HttpResponse::InternalServerError().json(self.to_string()),
        }
    }
}
