use crate::models::{CreateTeamRequest, ResolveRequest, RoleRequest, ServiceError};
use crate::services::{directory, identity, membership, roles};
use crate::state::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::info;
use serde::Deserialize;

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

// Create a new team with the caller as owner
#[post("/teams")]
async fn create_team(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let owner = identity::resume_session(data.store.as_ref(), &user_id)?;

    info!("📝 Creating new team: {} for user: {}", body.name, user_id);

    let team = directory::create_team(
        data.store.as_ref(),
        &owner,
        &body.name,
        &body.company_name,
        body.cover_image_ref.clone(),
    )?;

    Ok(HttpResponse::Ok().json(team))
}

// Search teams by name or company name
#[get("/teams/search")]
async fn search_teams(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ServiceError> {
    get_user_id_from_request(&req)?;

    let teams = directory::search(data.store.as_ref(), &query.q)?;

    info!("🔍 Team search '{}' matched {} teams", query.q, teams.len());

    Ok(HttpResponse::Ok().json(teams))
}

// Get the team the caller belongs to
#[get("/teams/mine")]
async fn my_team(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let team = directory::find_by_member(data.store.as_ref(), &user_id)?;

    Ok(HttpResponse::Ok().json(team))
}

// File a join request for a team
#[post("/teams/{team_id}/join-requests")]
async fn request_to_join(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();
    let requester = identity::resume_session(data.store.as_ref(), &user_id)?;

    let request =
        membership::request_to_join(data.store.as_ref(), &data.locks, &team_id, &requester)?;

    Ok(HttpResponse::Ok().json(request))
}

// Accept or reject a pending join request (owner only)
#[post("/teams/{team_id}/join-requests/{user_id}/resolve")]
async fn resolve_request(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<ResolveRequest>,
) -> Result<HttpResponse, ServiceError> {
    let actor_id = get_user_id_from_request(&req)?;
    let (team_id, user_id) = path.into_inner();

    let team = membership::resolve(
        data.store.as_ref(),
        &data.locks,
        &team_id,
        &actor_id,
        &user_id,
        body.accept,
    )?;

    Ok(HttpResponse::Ok().json(team))
}

// Get team members (members only)
#[get("/teams/{team_id}/members")]
async fn get_members(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let team = directory::load_team(data.store.as_ref(), &team_id)?;
    if !team.is_member(&user_id) {
        return Err(ServiceError::Forbidden);
    }

    Ok(HttpResponse::Ok().json(team.members))
}

// Add a custom role to the team vocabulary (owner only)
#[post("/teams/{team_id}/roles")]
async fn add_role(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RoleRequest>,
) -> Result<HttpResponse, ServiceError> {
    let actor_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let team = roles::add_role(data.store.as_ref(), &data.locks, &team_id, &actor_id, &body.role)?;

    Ok(HttpResponse::Ok().json(team))
}

// Remove a custom role (owner only; protected roles are refused)
#[delete("/teams/{team_id}/roles/{role}")]
async fn remove_role(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let actor_id = get_user_id_from_request(&req)?;
    let (team_id, role) = path.into_inner();

    let team = roles::remove_role(data.store.as_ref(), &data.locks, &team_id, &actor_id, &role)?;

    Ok(HttpResponse::Ok().json(team))
}

// Change a member's role (owner only)
#[put("/teams/{team_id}/members/{user_id}/role")]
async fn assign_role(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<RoleRequest>,
) -> Result<HttpResponse, ServiceError> {
    let actor_id = get_user_id_from_request(&req)?;
    let (team_id, member_id) = path.into_inner();

    let team = roles::assign_role(
        data.store.as_ref(),
        &data.locks,
        &team_id,
        &actor_id,
        &member_id,
        &body.role,
    )?;

    Ok(HttpResponse::Ok().json(team))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(search_teams)
        .service(my_team)
        .service(request_to_join)
        .service(resolve_request)
        .service(get_members)
        .service(add_role)
        .service(remove_role)
        .service(assign_role);
}
