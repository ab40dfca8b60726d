/// Authorization policy: role-gated actions and location scoping
///
/// Every dashboard read and every ticket mutation goes through this module.
/// Roles come from the users table and are fixed at login; the location
/// scope binds uniformly for all roles, admins included.
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// User roles, in no particular order of privilege: permissions are
/// per-action sets rather than a hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    NormalUser,
    Technician,
    Planner,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::NormalUser => "normal_user",
            Role::Technician => "technician",
            Role::Planner => "planner",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "normal_user" => Ok(Role::NormalUser),
            "technician" => Ok(Role::Technician),
            "planner" => Ok(Role::Planner),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::Validation(format!("Invalid role: {}", s))),
        }
    }

    /// Whether this role may perform the given action
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::ViewOwnTickets | Action::SubmitTicket => true,
            Action::ViewPlannerDashboard | Action::AssignTicket => {
                matches!(self, Role::Planner | Role::Admin)
            }
            Action::ViewTechnicianDashboard | Action::StartTicket | Action::CompleteTicket => {
                matches!(self, Role::Technician | Role::Planner | Role::Admin)
            }
            Action::ViewAdminDashboard => matches!(self, Role::Admin),
        }
    }

    /// Dashboard a freshly logged-in user of this role lands on
    pub fn home_dashboard(&self) -> &'static str {
        match self {
            Role::NormalUser => "/dashboard/user",
            Role::Technician => "/dashboard/technician",
            Role::Planner => "/dashboard/planner",
            Role::Admin => "/dashboard/admin",
        }
    }
}

/// Role-gated actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewOwnTickets,
    SubmitTicket,
    ViewPlannerDashboard,
    AssignTicket,
    ViewTechnicianDashboard,
    StartTicket,
    CompleteTicket,
    ViewAdminDashboard,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewOwnTickets => "view own tickets",
            Action::SubmitTicket => "submit ticket",
            Action::ViewPlannerDashboard => "view planner dashboard",
            Action::AssignTicket => "assign ticket",
            Action::ViewTechnicianDashboard => "view technician dashboard",
            Action::StartTicket => "start ticket",
            Action::CompleteTicket => "complete ticket",
            Action::ViewAdminDashboard => "view admin dashboard",
        }
    }
}

/// Location scope applied to every ticket query and mutation
///
/// There is deliberately no role exemption here: an earlier incarnation of
/// the system let admins at one site see every location, which left the two
/// copies of the dashboard code disagreeing about what "all tickets" meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    pub location: String,
}

impl ScopeFilter {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::NormalUser, Role::Technician, Role::Planner, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert!(Role::from_str("manager").is_err());
    }

    #[test]
    fn test_everyone_can_raise_and_view_own() {
        for role in [Role::NormalUser, Role::Technician, Role::Planner, Role::Admin] {
            assert!(role.allows(Action::SubmitTicket));
            assert!(role.allows(Action::ViewOwnTickets));
        }
    }

    #[test]
    fn test_assignment_is_planner_and_admin_only() {
        assert!(Role::Planner.allows(Action::AssignTicket));
        assert!(Role::Admin.allows(Action::AssignTicket));
        assert!(!Role::Technician.allows(Action::AssignTicket));
        assert!(!Role::NormalUser.allows(Action::AssignTicket));

        assert!(Role::Planner.allows(Action::ViewPlannerDashboard));
        assert!(!Role::Technician.allows(Action::ViewPlannerDashboard));
    }

    #[test]
    fn test_execution_excludes_normal_users() {
        for action in [
            Action::ViewTechnicianDashboard,
            Action::StartTicket,
            Action::CompleteTicket,
        ] {
            assert!(Role::Technician.allows(action));
            assert!(Role::Planner.allows(action));
            assert!(Role::Admin.allows(action));
            assert!(!Role::NormalUser.allows(action));
        }
    }

    #[test]
    fn test_admin_dashboard_is_admin_only() {
        assert!(Role::Admin.allows(Action::ViewAdminDashboard));
        for role in [Role::NormalUser, Role::Technician, Role::Planner] {
            assert!(!role.allows(Action::ViewAdminDashboard));
        }
    }

    #[test]
    fn test_home_dashboards() {
        assert_eq!(Role::NormalUser.home_dashboard(), "/dashboard/user");
        assert_eq!(Role::Admin.home_dashboard(), "/dashboard/admin");
    }
}
