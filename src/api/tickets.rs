/// Ticket lifecycle endpoints: submit, assign, start, complete
use crate::{
    auth::AuthContext,
    context::AppContext,
    db::models::Ticket,
    error::AppResult,
    policy::Action,
    tickets::{
        AssignTicketRequest, CompleteTicketRequest, StartTicketRequest, SubmitTicketRequest,
    },
};
use axum::{extract::State, routing::post, Json, Router};
use serde_json::json;

/// Build ticket mutation routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/ticket/submit", post(submit))
        .route("/planner/assign", post(assign))
        .route("/technician/start", post(start))
        .route("/technician/complete", post(complete))
}

/// Raise a new ticket
async fn submit(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    Json(req): Json<SubmitTicketRequest>,
) -> AppResult<Json<Ticket>> {
    auth.require(Action::SubmitTicket)?;

    let ticket = ctx.ticket_store.submit(&auth.session, req).await?;

    Ok(Json(ticket))
}

/// Assign a ticket to an executer
async fn assign(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    Json(req): Json<AssignTicketRequest>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require(Action::AssignTicket)?;

    ctx.ticket_store
        .assign(&auth.scope(), &auth.session, req.ticket_id, &req.assignee_id)
        .await?;

    Ok(Json(json!({ "ticket_id": req.ticket_id, "status": "Assigned" })))
}

/// Start work on a ticket assigned to the caller
async fn start(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    Json(req): Json<StartTicketRequest>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require(Action::StartTicket)?;

    ctx.ticket_store
        .start(&auth.scope(), &auth.session, req.ticket_id)
        .await?;

    Ok(Json(json!({ "ticket_id": req.ticket_id, "status": "In Progress" })))
}

/// Close out a ticket the caller is working on
async fn complete(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    Json(req): Json<CompleteTicketRequest>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require(Action::CompleteTicket)?;

    ctx.ticket_store
        .complete(
            &auth.scope(),
            &auth.session,
            req.ticket_id,
            req.completion_note.as_deref(),
        )
        .await?;

    Ok(Json(json!({ "ticket_id": req.ticket_id, "status": "Completed" })))
}
