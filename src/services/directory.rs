// src/services/directory.rs
//
// Team creation, lookup and search.
use crate::models::{ServiceError, Team, TeamMember, User, DEFAULT_ROLES, ROLE_OWNER};
use crate::storage::{Store, TEAMS};
use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

pub fn decode_team(bytes: &[u8]) -> Result<Team, ServiceError> {
    serde_json::from_slice(bytes).map_err(|e| {
        error!("Failed to parse stored team: {:?}", e);
        ServiceError::StoreUnavailable
    })
}

pub fn save_team(store: &dyn Store, team: &Team) -> Result<(), ServiceError> {
    let bytes = serde_json::to_vec(team).map_err(|e| {
        error!("Failed to serialize team: {:?}", e);
        ServiceError::Internal
    })?;

    store.put(TEAMS, &team.id, &bytes)
}

pub fn load_team(store: &dyn Store, team_id: &str) -> Result<Team, ServiceError> {
    match store.get(TEAMS, team_id)? {
        Some(bytes) => decode_team(&bytes),
        None => Err(ServiceError::TeamNotFound),
    }
}

// Create a team with the caller as its sole member, promoted to Owner.
// One team per user: creating while already on a roster is rejected.
pub fn create_team(
    store: &dyn Store,
    owner: &User,
    name: &str,
    company_name: &str,
    cover_image_ref: Option<String>,
) -> Result<Team, ServiceError> {
    let name = name.trim();
    let company_name = company_name.trim();

    if name.is_empty() {
        return Err(ServiceError::InvalidInput("team name is empty".to_string()));
    }
    if company_name.is_empty() {
        return Err(ServiceError::InvalidInput("company name is empty".to_string()));
    }

    match find_by_member(store, &owner.id) {
        Ok(_) => {
            error!("❌ User {} already belongs to a team", owner.id);
            return Err(ServiceError::AlreadyMember);
        }
        Err(ServiceError::TeamNotFound) => {}
        Err(e) => return Err(e),
    }

    let team = Team {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        company_name: company_name.to_string(),
        cover_image_ref,
        owner_id: owner.id.clone(),
        members: vec![TeamMember {
            user_id: owner.id.clone(),
            name: owner.name.clone(),
            avatar_ref: owner.avatar_ref.clone(),
            role: ROLE_OWNER.to_string(),
        }],
        roles: DEFAULT_ROLES.iter().map(|r| r.to_string()).collect(),
        pending_requests: Vec::new(),
        created_at: Utc::now(),
    };

    save_team(store, &team)?;

    info!("✅ Team created: {} ({})", team.name, team.id);

    Ok(team)
}

// Case-insensitive substring search on team name or company name,
// returned in stable store order with no ranking.
pub fn search(store: &dyn Store, query: &str) -> Result<Vec<Team>, ServiceError> {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();

    for (_, bytes) in store.scan(TEAMS)? {
        let team = decode_team(&bytes)?;
        if team.name.to_lowercase().contains(&needle)
            || team.company_name.to_lowercase().contains(&needle)
        {
            matches.push(team);
        }
    }

    Ok(matches)
}

// The team, if any, whose roster contains the given user.
pub fn find_by_member(store: &dyn Store, user_id: &str) -> Result<Team, ServiceError> {
    for (_, bytes) in store.scan(TEAMS)? {
        let team = decode_team(&bytes)?;
        if team.is_member(user_id) {
            return Ok(team);
        }
    }

    Err(ServiceError::TeamNotFound)
}
