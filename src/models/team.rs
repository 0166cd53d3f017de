// zentic-service/src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Protected roles exist in every team and can never be removed.
pub const ROLE_OWNER: &str = "Owner";
pub const ROLE_MEMBER: &str = "Member";
pub const PROTECTED_ROLES: [&str; 2] = [ROLE_OWNER, ROLE_MEMBER];

// Default vocabulary a new team starts with.
pub const DEFAULT_ROLES: [&str; 4] = ["Owner", "Manager", "Member", "Assistant"];

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub company_name: String,
    pub cover_image_ref: Option<String>,
    pub owner_id: String,
    pub members: Vec<TeamMember>,
    pub roles: Vec<String>,
    pub pending_requests: Vec<JoinRequest>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

// An identity snapshot inside a team roster. Join requests carry no
// credentials, so members hold only the public part of a User.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamMember {
    pub user_id: String,
    pub name: String,
    pub avatar_ref: String,
    pub role: String,
}

// A pending intent to join a team. Pending -> Accepted | Rejected,
// terminal either way; the request record is removed on resolution.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JoinRequest {
    pub user_id: String,
    pub user_name: String,
    pub user_avatar_ref: String,
    pub requested_at: DateTime<Utc>,
}

impl Team {
    pub fn member(&self, user_id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some()
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub fn has_pending_request(&self, user_id: &str) -> bool {
        self.pending_requests.iter().any(|r| r.user_id == user_id)
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|r| r == role_name)
    }
}

// Request bodies for the team routes
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateTeamRequest {
    pub name: String,
    pub company_name: String,
    pub cover_image_ref: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResolveRequest {
    pub accept: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RoleRequest {
    pub role: String,
}
