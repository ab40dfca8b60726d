/// Ticket store implementation using runtime queries
///
/// Every mutation is a single conditional UPDATE whose WHERE clause carries
/// both the ticket id and the caller's scope; zero affected rows is the only
/// signal for "not found or not yours", so there is no read-then-write race
/// to exploit and no existence leak across locations.
use crate::{
    account::SessionUser,
    db::models::Ticket,
    error::{AppError, AppResult},
    policy::ScopeFilter,
    tickets::{
        normalize_category, AssignableUser, SubmitTicketRequest, TicketStatus, TicketSummary,
        TicketView, FACILITY_SERVICE,
    },
};
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Columns selected for dashboard views
const TICKET_VIEW_COLUMNS: &str = "t.id, t.global_id, t.raised_by, t.category, t.description, \
     t.building_no, t.area_code, t.sub_area, t.keyword, t.location, t.status, \
     t.assigned_to, a.name AS assigned_to_name, t.planner_id, p.name AS planner_name, \
     t.completion_note, t.created_at, t.started_at, t.completed_at, t.updated_at";

/// Ticket store service
pub struct TicketStore {
    db: SqlitePool,
}

impl TicketStore {
    /// Create a new ticket store
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a ticket in state New
    ///
    /// Location and raiser identity are stamped from the session, never from
    /// the request body. Facility tickets must carry all four structured
    /// fields; other categories store NULL for them regardless of input.
    pub async fn submit(
        &self,
        session: &SessionUser,
        req: SubmitTicketRequest,
    ) -> AppResult<Ticket> {
        let category = normalize_category(&req.category);

        let (building_no, area_code, sub_area, keyword) = if category == FACILITY_SERVICE {
            let fields = validate_facility_fields(&req)?;
            (
                Some(fields.0),
                Some(fields.1),
                Some(fields.2),
                Some(fields.3),
            )
        } else {
            (None, None, None, None)
        };

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tickets
                (global_id, raised_by, category, description,
                 building_no, area_code, sub_area, keyword,
                 location, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&session.global_id)
        .bind(&session.name)
        .bind(&category)
        .bind(req.description.trim())
        .bind(&building_no)
        .bind(&area_code)
        .bind(&sub_area)
        .bind(&keyword)
        .bind(&session.location)
        .bind(TicketStatus::New.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(AppError::Database)?;

        let id = result.last_insert_rowid();
        tracing::info!(
            ticket_id = id,
            raiser = %session.global_id,
            category = %category,
            "Ticket submitted"
        );

        Ok(Ticket {
            id,
            global_id: session.global_id.clone(),
            raised_by: session.name.clone(),
            category,
            description: req.description.trim().to_string(),
            building_no,
            area_code,
            sub_area,
            keyword,
            location: session.location.clone(),
            status: TicketStatus::New.as_str().to_string(),
            assigned_to: None,
            planner_id: None,
            completion_note: None,
            created_at: now,
            started_at: None,
            completed_at: None,
            updated_at: now,
        })
    }

    /// Assign a New ticket to an executer
    ///
    /// The assignee and the acting planner are recorded together. The update
    /// only matches a New ticket inside the actor's scope.
    pub async fn assign(
        &self,
        scope: &ScopeFilter,
        actor: &SessionUser,
        ticket_id: i64,
        assignee_id: &str,
    ) -> AppResult<()> {
        if !self.is_assignable(assignee_id, scope).await? {
            return Err(AppError::Validation(
                "Selected user cannot be assigned tickets at this location".to_string(),
            ));
        }

        let result = sqlx::query(
            "UPDATE tickets
             SET assigned_to = ?1, planner_id = ?2, status = ?3, updated_at = ?4
             WHERE id = ?5 AND location = ?6 AND status = ?7",
        )
        .bind(assignee_id)
        .bind(&actor.global_id)
        .bind(TicketStatus::Assigned.as_str())
        .bind(Utc::now())
        .bind(ticket_id)
        .bind(&scope.location)
        .bind(TicketStatus::New.as_str())
        .execute(&self.db)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ticket not found".to_string()));
        }

        tracing::info!(
            ticket_id,
            assignee = %assignee_id,
            planner = %actor.global_id,
            "Ticket assigned"
        );

        Ok(())
    }

    /// Move an Assigned ticket to In Progress
    ///
    /// The actor must be the recorded assignee; being a technician at the
    /// right location is not enough.
    pub async fn start(
        &self,
        scope: &ScopeFilter,
        actor: &SessionUser,
        ticket_id: i64,
    ) -> AppResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE tickets
             SET status = ?1, started_at = ?2, updated_at = ?3
             WHERE id = ?4 AND location = ?5 AND assigned_to = ?6 AND status = ?7",
        )
        .bind(TicketStatus::InProgress.as_str())
        .bind(now)
        .bind(now)
        .bind(ticket_id)
        .bind(&scope.location)
        .bind(&actor.global_id)
        .bind(TicketStatus::Assigned.as_str())
        .execute(&self.db)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ticket not found".to_string()));
        }

        tracing::info!(ticket_id, actor = %actor.global_id, "Ticket started");

        Ok(())
    }

    /// Move an In Progress ticket to Completed, storing the optional note
    pub async fn complete(
        &self,
        scope: &ScopeFilter,
        actor: &SessionUser,
        ticket_id: i64,
        completion_note: Option<&str>,
    ) -> AppResult<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE tickets
             SET status = ?1, completion_note = ?2, completed_at = ?3, updated_at = ?4
             WHERE id = ?5 AND location = ?6 AND assigned_to = ?7 AND status = ?8",
        )
        .bind(TicketStatus::Completed.as_str())
        .bind(completion_note)
        .bind(now)
        .bind(now)
        .bind(ticket_id)
        .bind(&scope.location)
        .bind(&actor.global_id)
        .bind(TicketStatus::InProgress.as_str())
        .execute(&self.db)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ticket not found".to_string()));
        }

        tracing::info!(ticket_id, actor = %actor.global_id, "Ticket completed");

        Ok(())
    }

    /// Tickets raised by the caller, in scope, most recent first
    pub async fn user_dashboard(
        &self,
        scope: &ScopeFilter,
        global_id: &str,
    ) -> AppResult<Vec<TicketView>> {
        let tickets = sqlx::query_as::<_, TicketView>(&format!(
            "SELECT {TICKET_VIEW_COLUMNS}
             FROM tickets t
             LEFT JOIN users a ON t.assigned_to = a.global_id
             LEFT JOIN users p ON t.planner_id = p.global_id
             WHERE t.global_id = ?1 AND t.location = ?2
             ORDER BY t.created_at DESC"
        ))
        .bind(global_id)
        .bind(&scope.location)
        .fetch_all(&self.db)
        .await
        .map_err(AppError::Database)?;

        Ok(tickets)
    }

    /// Tickets assigned to the caller, in scope, most recent first
    pub async fn technician_dashboard(
        &self,
        scope: &ScopeFilter,
        global_id: &str,
    ) -> AppResult<Vec<TicketView>> {
        let tickets = sqlx::query_as::<_, TicketView>(&format!(
            "SELECT {TICKET_VIEW_COLUMNS}
             FROM tickets t
             LEFT JOIN users a ON t.assigned_to = a.global_id
             LEFT JOIN users p ON t.planner_id = p.global_id
             WHERE t.assigned_to = ?1 AND t.location = ?2
             ORDER BY t.created_at DESC"
        ))
        .bind(global_id)
        .bind(&scope.location)
        .fetch_all(&self.db)
        .await
        .map_err(AppError::Database)?;

        Ok(tickets)
    }

    /// All tickets in scope, most recent first
    pub async fn tickets_in_scope(&self, scope: &ScopeFilter) -> AppResult<Vec<TicketView>> {
        let tickets = sqlx::query_as::<_, TicketView>(&format!(
            "SELECT {TICKET_VIEW_COLUMNS}
             FROM tickets t
             LEFT JOIN users a ON t.assigned_to = a.global_id
             LEFT JOIN users p ON t.planner_id = p.global_id
             WHERE t.location = ?1
             ORDER BY t.created_at DESC"
        ))
        .bind(&scope.location)
        .fetch_all(&self.db)
        .await
        .map_err(AppError::Database)?;

        Ok(tickets)
    }

    /// Users the planner dashboard offers as assignees, in scope
    pub async fn assignable_users(&self, scope: &ScopeFilter) -> AppResult<Vec<AssignableUser>> {
        let users = sqlx::query_as::<_, AssignableUser>(
            "SELECT global_id, name, location
             FROM users
             WHERE role IN ('technician', 'planner', 'admin') AND location = ?1
             ORDER BY name",
        )
        .bind(&scope.location)
        .fetch_all(&self.db)
        .await
        .map_err(AppError::Database)?;

        Ok(users)
    }

    /// In-scope tickets plus the admin summary over exactly that set
    pub async fn admin_dashboard(
        &self,
        scope: &ScopeFilter,
    ) -> AppResult<(Vec<TicketView>, TicketSummary)> {
        let tickets = self.tickets_in_scope(scope).await?;
        let summary = TicketSummary::from_tickets(&tickets);

        Ok((tickets, summary))
    }

    async fn is_assignable(&self, global_id: &str, scope: &ScopeFilter) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM users
                 WHERE global_id = ?1
                   AND role IN ('technician', 'planner', 'admin')
                   AND location = ?2
             )",
        )
        .bind(global_id)
        .bind(&scope.location)
        .fetch_one(&self.db)
        .await
        .map_err(AppError::Database)?;

        Ok(exists)
    }
}

/// Check the four structured facility fields; all must be present and
/// non-blank, and every missing one is reported by name.
fn validate_facility_fields(
    req: &SubmitTicketRequest,
) -> AppResult<(String, String, String, String)> {
    let mut field_errors = HashMap::new();

    let mut require = |name: &str, value: &Option<String>| -> String {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                field_errors.insert(name.to_string(), "This field is required".to_string());
                String::new()
            }
        }
    };

    let building_no = require("building_no", &req.building_no);
    let area_code = require("area_code", &req.area_code);
    let sub_area = require("sub_area", &req.sub_area);
    let keyword = require("keyword", &req.keyword);

    if !field_errors.is_empty() {
        return Err(AppError::ValidationFields {
            message: "Missing Facility Service details".to_string(),
            field_errors,
        });
    }

    Ok((building_no, area_code, sub_area, keyword))
}
