/// Ticket domain: categories, lifecycle states, dashboards
///
/// The lifecycle is strictly forward-only: New -> Assigned -> In Progress ->
/// Completed. There is no cancel or reopen.

mod store;

pub use store::TicketStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Canonical label for the category that requires structured facility fields
pub const FACILITY_SERVICE: &str = "Facility Service";

/// Ticket lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    New,
    Assigned,
    InProgress,
    Completed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::Assigned => "Assigned",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Completed => "Completed",
        }
    }
}

/// Normalize a raw category to the canonical set
///
/// Case-insensitive aliases of the facility category collapse to the
/// canonical label; anything unrecognized (or empty) becomes "Other".
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.to_lowercase().as_str() {
        "facility service" | "facility_service" | "facility" => FACILITY_SERVICE.to_string(),
        "breakdown" => "Breakdown".to_string(),
        "safety" => "Safety".to_string(),
        _ => "Other".to_string(),
    }
}

/// Ticket submission request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTicketRequest {
    pub category: String,
    pub description: String,
    pub building_no: Option<String>,
    pub area_code: Option<String>,
    pub sub_area: Option<String>,
    pub keyword: Option<String>,
}

/// Assignment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTicketRequest {
    pub ticket_id: i64,
    pub assignee_id: String,
}

/// Start request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTicketRequest {
    pub ticket_id: i64,
}

/// Completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteTicketRequest {
    pub ticket_id: i64,
    pub completion_note: Option<String>,
}

/// Ticket row joined with display names for the dashboards
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TicketView {
    pub id: i64,
    pub global_id: String,
    pub raised_by: String,
    pub category: String,
    pub description: String,
    pub building_no: Option<String>,
    pub area_code: Option<String>,
    pub sub_area: Option<String>,
    pub keyword: Option<String>,
    pub location: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub planner_id: Option<String>,
    pub planner_name: Option<String>,
    pub completion_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// User eligible to be assigned a ticket
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AssignableUser {
    pub global_id: String,
    pub name: String,
    pub location: String,
}

/// Summary block on the admin dashboard, computed over exactly the in-scope
/// ticket set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketSummary {
    pub total: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub category_counts: BTreeMap<String, usize>,
}

impl TicketSummary {
    pub fn from_tickets(tickets: &[TicketView]) -> Self {
        let mut summary = TicketSummary {
            total: tickets.len(),
            ..Default::default()
        };

        for ticket in tickets {
            *summary
                .status_counts
                .entry(ticket.status.clone())
                .or_default() += 1;
            *summary
                .category_counts
                .entry(ticket.category.clone())
                .or_default() += 1;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category_aliases() {
        assert_eq!(normalize_category("Facility Service"), FACILITY_SERVICE);
        assert_eq!(normalize_category("facility"), FACILITY_SERVICE);
        assert_eq!(normalize_category("FACILITY_SERVICE"), FACILITY_SERVICE);
        assert_eq!(normalize_category("  facility service  "), FACILITY_SERVICE);
        assert_eq!(normalize_category("breakdown"), "Breakdown");
        assert_eq!(normalize_category("Safety"), "Safety");
    }

    #[test]
    fn test_normalize_category_fallback() {
        assert_eq!(normalize_category(""), "Other");
        assert_eq!(normalize_category("   "), "Other");
        assert_eq!(normalize_category("plumbing"), "Other");
        assert_eq!(normalize_category("other"), "Other");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TicketStatus::New.as_str(), "New");
        assert_eq!(TicketStatus::InProgress.as_str(), "In Progress");
    }
}
