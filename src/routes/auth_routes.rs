use crate::models::{LoginResponse, RegisterRequest, ServiceError, UserCredentials};
use crate::services::identity;
use crate::state::AppState;
use crate::utils::{get_user_id_from_request, jwt};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Register a new user and log them straight in
#[post("/auth/register")]
async fn register(
    data: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("📝 Register request for name: {}", body.name);

    let user = identity::register(data.store.as_ref(), &body.name, &body.email, &body.password)?;
    let token = jwt::generate_token(&user)?;

    info!("✅ User registered successfully: {}", user.id);

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(LoginResponse {
            token,
            user_id: user.id,
            name: user.name,
            email: user.email,
            avatar_ref: user.avatar_ref,
        }))
}

// Login and get JWT token
#[post("/auth/login")]
async fn login(
    data: web::Data<AppState>,
    credentials: web::Json<UserCredentials>,
) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Login request for email: {}", credentials.email);

    let user = match identity::authenticate(
        data.store.as_ref(),
        &credentials.email,
        &credentials.password,
    ) {
        Ok(user) => user,
        Err(e) => {
            error!("❌ Login failed for {}: {}", credentials.email, e);
            return Err(e);
        }
    };

    let token = jwt::generate_token(&user)?;

    info!("✅ User logged in successfully: {}", user.id);

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(LoginResponse {
            token,
            user_id: user.id,
            name: user.name,
            email: user.email,
            avatar_ref: user.avatar_ref,
        }))
}

// Resume the session held by the bearer token (requires authentication)
#[get("/auth/me")]
async fn me(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let user = identity::resume_session(data.store.as_ref(), &user_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "user_id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "avatar_ref": user.avatar_ref,
        "created_at": user.created_at
    })))
}

// Register all auth routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(me);
}
