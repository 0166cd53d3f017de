// src/services/membership.rs
//
// Join-request lifecycle: request -> accept | reject. Every mutation is a
// read-modify-write on the team record under its key lock, so two
// concurrent resolutions of the same request cannot both succeed.
use crate::models::{JoinRequest, ServiceError, Team, TeamMember, User, ROLE_MEMBER};
use crate::services::directory;
use crate::storage::{KeyLockRegistry, Store, TEAMS};
use chrono::Utc;
use log::{error, info};

// File a pending request to join a team. Rejected when the requester is
// already on any roster (one team per user) or already has a request
// pending on this team.
pub fn request_to_join(
    store: &dyn Store,
    locks: &KeyLockRegistry,
    team_id: &str,
    requester: &User,
) -> Result<JoinRequest, ServiceError> {
    match directory::find_by_member(store, &requester.id) {
        Ok(_) => return Err(ServiceError::AlreadyMember),
        Err(ServiceError::TeamNotFound) => {}
        Err(e) => return Err(e),
    }

    let lock = locks.lock_for(TEAMS, team_id)?;
    let _guard = lock.lock().map_err(|_| ServiceError::Internal)?;

    let mut team = directory::load_team(store, team_id)?;

    if team.is_member(&requester.id) {
        return Err(ServiceError::AlreadyMember);
    }
    if team.has_pending_request(&requester.id) {
        return Err(ServiceError::AlreadyRequested);
    }

    let request = JoinRequest {
        user_id: requester.id.clone(),
        user_name: requester.name.clone(),
        user_avatar_ref: requester.avatar_ref.clone(),
        requested_at: Utc::now(),
    };

    team.pending_requests.push(request.clone());
    directory::save_team(store, &team)?;

    info!("📨 Join request from {} for team {}", requester.name, team_id);

    Ok(request)
}

// Resolve a pending request. Only the team owner may resolve; the request
// is removed either way, and acceptance appends a roster entry built from
// the request snapshot with the default Member role.
pub fn resolve(
    store: &dyn Store,
    locks: &KeyLockRegistry,
    team_id: &str,
    actor_id: &str,
    user_id: &str,
    accept: bool,
) -> Result<Team, ServiceError> {
    let lock = locks.lock_for(TEAMS, team_id)?;
    let _guard = lock.lock().map_err(|_| ServiceError::Internal)?;

    let mut team = directory::load_team(store, team_id)?;

    if !team.is_owner(actor_id) {
        error!("❌ User {} is not the owner of team {}", actor_id, team_id);
        return Err(ServiceError::Forbidden);
    }

    let position = team
        .pending_requests
        .iter()
        .position(|r| r.user_id == user_id)
        .ok_or(ServiceError::RequestNotFound)?;

    let request = team.pending_requests.remove(position);

    if accept && !team.is_member(&request.user_id) {
        team.members.push(TeamMember {
            user_id: request.user_id.clone(),
            name: request.user_name.clone(),
            avatar_ref: request.user_avatar_ref.clone(),
            role: ROLE_MEMBER.to_string(),
        });
    }

    directory::save_team(store, &team)?;

    info!(
        "✅ Join request for {} on team {} {}",
        user_id,
        team_id,
        if accept { "accepted" } else { "rejected" }
    );

    Ok(team)
}
