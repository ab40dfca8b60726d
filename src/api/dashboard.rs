/// Per-role dashboard endpoints
///
/// Each handler checks the role gate first, then runs the reads under the
/// session's location scope.
use crate::{
    auth::AuthContext,
    context::AppContext,
    error::AppResult,
    policy::Action,
    tickets::{AssignableUser, TicketSummary, TicketView},
};
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Build dashboard routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/dashboard/user", get(user_dashboard))
        .route("/dashboard/technician", get(technician_dashboard))
        .route("/dashboard/planner", get(planner_dashboard))
        .route("/dashboard/admin", get(admin_dashboard))
}

/// Caller identity echoed on every dashboard
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardUser {
    pub global_id: String,
    pub name: String,
    pub role: String,
    pub location: String,
}

impl From<&AuthContext> for DashboardUser {
    fn from(auth: &AuthContext) -> Self {
        Self {
            global_id: auth.session.global_id.clone(),
            name: auth.session.name.clone(),
            role: auth.session.role.as_str().to_string(),
            location: auth.session.location.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketListResponse {
    pub user: DashboardUser,
    pub tickets: Vec<TicketView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlannerDashboardResponse {
    pub user: DashboardUser,
    pub tickets: Vec<TicketView>,
    pub technicians: Vec<AssignableUser>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminDashboardResponse {
    pub user: DashboardUser,
    pub tickets: Vec<TicketView>,
    pub summary: TicketSummary,
}

/// Tickets raised by the caller
async fn user_dashboard(
    State(ctx): State<AppContext>,
    auth: AuthContext,
) -> AppResult<Json<TicketListResponse>> {
    auth.require(Action::ViewOwnTickets)?;

    let tickets = ctx
        .ticket_store
        .user_dashboard(&auth.scope(), &auth.session.global_id)
        .await?;

    Ok(Json(TicketListResponse {
        user: (&auth).into(),
        tickets,
    }))
}

/// Tickets assigned to the caller
async fn technician_dashboard(
    State(ctx): State<AppContext>,
    auth: AuthContext,
) -> AppResult<Json<TicketListResponse>> {
    auth.require(Action::ViewTechnicianDashboard)?;

    let tickets = ctx
        .ticket_store
        .technician_dashboard(&auth.scope(), &auth.session.global_id)
        .await?;

    Ok(Json(TicketListResponse {
        user: (&auth).into(),
        tickets,
    }))
}

/// All in-scope tickets plus the users an assignment can target
async fn planner_dashboard(
    State(ctx): State<AppContext>,
    auth: AuthContext,
) -> AppResult<Json<PlannerDashboardResponse>> {
    auth.require(Action::ViewPlannerDashboard)?;

    let scope = auth.scope();
    let tickets = ctx.ticket_store.tickets_in_scope(&scope).await?;
    let technicians = ctx.ticket_store.assignable_users(&scope).await?;

    Ok(Json(PlannerDashboardResponse {
        user: (&auth).into(),
        tickets,
        technicians,
    }))
}

/// All in-scope tickets plus the status/category summary
async fn admin_dashboard(
    State(ctx): State<AppContext>,
    auth: AuthContext,
) -> AppResult<Json<AdminDashboardResponse>> {
    auth.require(Action::ViewAdminDashboard)?;

    let (tickets, summary) = ctx.ticket_store.admin_dashboard(&auth.scope()).await?;

    Ok(Json(AdminDashboardResponse {
        user: (&auth).into(),
        tickets,
        summary,
    }))
}
