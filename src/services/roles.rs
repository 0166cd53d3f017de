// src/services/roles.rs
//
// Per-team role vocabulary. "Owner" and "Member" are protected and can
// never be removed; custom role names match case-sensitively.
use crate::models::{ServiceError, Team, PROTECTED_ROLES};
use crate::services::directory;
use crate::storage::{KeyLockRegistry, Store, TEAMS};
use log::{error, info};

fn load_for_owner(
    store: &dyn Store,
    team_id: &str,
    actor_id: &str,
) -> Result<Team, ServiceError> {
    let team = directory::load_team(store, team_id)?;

    if !team.is_owner(actor_id) {
        error!("❌ User {} is not the owner of team {}", actor_id, team_id);
        return Err(ServiceError::Forbidden);
    }

    Ok(team)
}

pub fn add_role(
    store: &dyn Store,
    locks: &KeyLockRegistry,
    team_id: &str,
    actor_id: &str,
    role_name: &str,
) -> Result<Team, ServiceError> {
    let role_name = role_name.trim();
    if role_name.is_empty() {
        return Err(ServiceError::InvalidInput("role name is empty".to_string()));
    }

    let lock = locks.lock_for(TEAMS, team_id)?;
    let _guard = lock.lock().map_err(|_| ServiceError::Internal)?;

    let mut team = load_for_owner(store, team_id, actor_id)?;

    if team.has_role(role_name) {
        return Err(ServiceError::DuplicateRole);
    }

    team.roles.push(role_name.to_string());
    directory::save_team(store, &team)?;

    info!("✅ Role '{}' added to team {}", role_name, team_id);

    Ok(team)
}

// Members still holding the removed role keep the orphaned label; no
// automatic reassignment happens here.
pub fn remove_role(
    store: &dyn Store,
    locks: &KeyLockRegistry,
    team_id: &str,
    actor_id: &str,
    role_name: &str,
) -> Result<Team, ServiceError> {
    let lock = locks.lock_for(TEAMS, team_id)?;
    let _guard = lock.lock().map_err(|_| ServiceError::Internal)?;

    let mut team = load_for_owner(store, team_id, actor_id)?;

    if PROTECTED_ROLES.contains(&role_name) {
        return Err(ServiceError::ProtectedRole);
    }

    let position = team
        .roles
        .iter()
        .position(|r| r == role_name)
        .ok_or(ServiceError::RoleNotFound)?;

    team.roles.remove(position);
    directory::save_team(store, &team)?;

    info!("🗑️ Role '{}' removed from team {}", role_name, team_id);

    Ok(team)
}

pub fn assign_role(
    store: &dyn Store,
    locks: &KeyLockRegistry,
    team_id: &str,
    actor_id: &str,
    member_id: &str,
    role_name: &str,
) -> Result<Team, ServiceError> {
    let lock = locks.lock_for(TEAMS, team_id)?;
    let _guard = lock.lock().map_err(|_| ServiceError::Internal)?;

    let mut team = load_for_owner(store, team_id, actor_id)?;

    // The owner entry always holds the Owner role; reassigning it would
    // break the roster invariant.
    if member_id == team.owner_id {
        return Err(ServiceError::ProtectedRole);
    }

    if !team.has_role(role_name) {
        return Err(ServiceError::RoleNotFound);
    }

    let member = team
        .members
        .iter_mut()
        .find(|m| m.user_id == member_id)
        .ok_or(ServiceError::MemberNotFound)?;

    member.role = role_name.to_string();
    directory::save_team(store, &team)?;

    info!(
        "✅ Member {} on team {} now holds role '{}'",
        member_id, team_id, role_name
    );

    Ok(team)
}
