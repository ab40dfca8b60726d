/// Login, logout and one-time registration endpoints
use crate::{
    account::{
        LoginRequest, LoginResponse, RegisterCheckRequest, RegisterCheckResponse,
        RegisterCompleteRequest,
    },
    api::middleware::{clear_session_cookie, extract_session_token, session_cookie},
    context::AppContext,
    error::AppResult,
    policy::Role,
};
use axum::{
    extract::State,
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

/// Build auth routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/register", get(register_form))
        .route("/register/check", post(register_check))
        .route("/register/complete", post(register_complete))
}

/// Login page stand-in; the anonymous redirect for gated routes lands here
async fn login_form() -> Json<serde_json::Value> {
    Json(json!({
        "message": "POST global_id and password to /login"
    }))
}

/// Authenticate and set the session cookie
async fn login(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (user, session) = ctx.account_manager.login(&req.global_id, &req.password).await?;

    let role = Role::from_str(&user.role)?;
    tracing::info!(global_id = %user.global_id, role = %user.role, "Login");

    let jar = jar.add(session_cookie(session.token, &ctx.config));

    Ok((
        jar,
        Json(LoginResponse {
            global_id: user.global_id,
            name: user.name,
            role,
            location: user.location,
            redirect_to: role.home_dashboard().to_string(),
        }),
    ))
}

/// Destroy the session and send the caller back to the login page
async fn logout(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    if let Some(token) = extract_session_token(&headers) {
        ctx.account_manager.delete_session(&token).await?;
    }

    let jar = jar.remove(clear_session_cookie());

    Ok((jar, Redirect::to("/login")))
}

/// Registration page stand-in
async fn register_form() -> Json<serde_json::Value> {
    Json(json!({
        "message": "POST global_id to /register/check, then password to /register/complete"
    }))
}

/// Look up a provisioned identity awaiting registration
async fn register_check(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterCheckRequest>,
) -> AppResult<Json<RegisterCheckResponse>> {
    let user = ctx.account_manager.register_check(&req.global_id).await?;

    Ok(Json(RegisterCheckResponse {
        role: Role::from_str(&user.role)?,
        global_id: user.global_id,
        name: user.name,
        phone: user.phone,
        email: user.email,
        location: user.location,
    }))
}

/// Finalize registration by setting the password
async fn register_complete(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterCompleteRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ctx.account_manager
        .register_complete(&req.global_id, &req.password)
        .await?;

    tracing::info!(global_id = %req.global_id.trim(), "Registration completed");

    Ok(Json(json!({ "registered": true })))
}
