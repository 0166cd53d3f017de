use crate::models::{PostMessageRequest, ServiceError};
use crate::services::{directory, identity, messaging};
use crate::state::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::info;
use tokio::sync::broadcast;

// Handlers check team membership before touching the channel.
fn require_member(
    data: &AppState,
    team_id: &str,
    user_id: &str,
) -> Result<(), ServiceError> {
    let team = directory::load_team(data.store.as_ref(), team_id)?;
    if !team.is_member(user_id) {
        return Err(ServiceError::Forbidden);
    }
    Ok(())
}

// Post a message to the team channel
#[post("/teams/{team_id}/messages")]
async fn post_message(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostMessageRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    require_member(&data, &team_id, &user_id)?;

    let sender = identity::resume_session(data.store.as_ref(), &user_id)?;
    let message = messaging::post(
        data.store.as_ref(),
        &data.locks,
        &data.hub,
        &team_id,
        &sender,
        &body.text,
    )?;

    Ok(HttpResponse::Ok().json(message))
}

// Full channel replay in sent order
#[get("/teams/{team_id}/messages")]
async fn get_messages(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    require_member(&data, &team_id, &user_id)?;

    let messages = messaging::history(data.store.as_ref(), &team_id)?;

    Ok(HttpResponse::Ok().json(messages))
}

// Live feed of messages posted after subscription, as server-sent events.
// No backlog replay: clients fetch history separately and de-duplicate by
// message id.
#[get("/teams/{team_id}/messages/stream")]
async fn stream_messages(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    require_member(&data, &team_id, &user_id)?;

    let receiver = data.hub.subscribe(&team_id)?;

    info!("📡 User {} subscribed to team {} channel", user_id, team_id);

    let stream = futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    let payload = match serde_json::to_string(&message) {
                        Ok(payload) => payload,
                        Err(_) => continue,
                    };
                    let frame = web::Bytes::from(format!("data: {}\n\n", payload));
                    return Some((Ok::<_, std::convert::Infallible>(frame), receiver));
                }
                // Lagging drops the oldest undelivered messages; keep going.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .streaming(stream))
}

// Register all message routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(post_message)
        .service(get_messages)
        .service(stream_messages);
}
