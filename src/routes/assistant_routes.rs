use crate::models::{AssistantReply, AssistantRequest, ServiceError};
use crate::services::assistant;
use crate::state::AppState;
use crate::utils::get_user_id_from_request;
use actix_web::{post, web, HttpRequest, HttpResponse};
use log::info;

// Forward a prompt to the completion backend. Backend failures never
// surface as HTTP errors here; the reply degrades to the fallback text.
#[post("/assistant")]
async fn ask_assistant(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<AssistantRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("🤖 Assistant prompt from user {}", user_id);

    let context = body.context.clone().unwrap_or_default();
    let reply = assistant::reply(data.assistant.as_ref(), &body.prompt, &context);

    Ok(HttpResponse::Ok().json(AssistantReply { reply }))
}

// Register assistant routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ask_assistant);
}
