//! Projects and their payable milestones

use serde::{Deserialize, Serialize};

use crate::{Amount, Timestamp};

/// Project identifier
pub type ProjectId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Approved,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Approved => "approved",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

/// Milestone lifecycle: pending -> submitted -> approved/paid
///
/// Nothing stops a caller from writing a backward transition through
/// [`ProjectUpdate::milestones`]; only the workflows move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Pending,
    Submitted,
    Approved,
    Paid,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::Submitted => "submitted",
            MilestoneStatus::Approved => "approved",
            MilestoneStatus::Paid => "paid",
        }
    }
}

/// Payable sub-deliverable of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub description: String,
    pub amount: Amount,
    pub status: MilestoneStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<Timestamp>,
}

impl Milestone {
    /// New milestone in `pending` state
    pub fn pending(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            amount,
            status: MilestoneStatus::Pending,
            submitted_at: None,
            approved_at: None,
        }
    }
}

/// Project in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub total_budget: Amount,
    /// May exceed `total_budget`; not enforced
    pub allocated_funds: Amount,
    /// May exceed `total_budget`; not enforced
    pub spent_funds: Amount,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
    pub milestones: Vec<Milestone>,
    pub created_at: Timestamp,
}

impl Project {
    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }

    /// Share of the budget already spent, in percent
    pub fn progress_percent(&self) -> f64 {
        if self.total_budget == 0 {
            return 0.0;
        }
        self.spent_funds as f64 / self.total_budget as f64 * 100.0
    }

    /// Budget not yet spent; negative on overrun
    pub fn remaining_budget(&self) -> Amount {
        self.total_budget.saturating_sub(self.spent_funds)
    }

    pub fn paid_milestones(&self) -> usize {
        self.milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Paid)
            .count()
    }

    pub fn is_assigned_to(&self, name: &str) -> bool {
        self.contractor.as_deref() == Some(name)
    }
}

/// Caller-supplied fields of a new project
///
/// The store fills in id and creation time. Milestones are kept as given,
/// statuses included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub location: String,
    pub total_budget: Amount,
    pub allocated_funds: Amount,
    pub spent_funds: Amount,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
    pub milestones: Vec<Milestone>,
}

impl NewProject {
    pub(crate) fn into_project(self, id: ProjectId, created_at: Timestamp) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            location: self.location,
            total_budget: self.total_budget,
            allocated_funds: self.allocated_funds,
            spent_funds: self.spent_funds,
            status: self.status,
            contractor: self.contractor,
            milestones: self.milestones,
            created_at,
        }
    }
}

/// Partial field set merged over an existing project
///
/// `None` leaves the field untouched. Id and creation time are not
/// replaceable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub total_budget: Option<Amount>,
    pub allocated_funds: Option<Amount>,
    pub spent_funds: Option<Amount>,
    pub status: Option<ProjectStatus>,
    pub contractor: Option<String>,
    pub milestones: Option<Vec<Milestone>>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProjectUpdate::default()
    }

    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(location) = self.location {
            project.location = location;
        }
        if let Some(total_budget) = self.total_budget {
            project.total_budget = total_budget;
        }
        if let Some(allocated_funds) = self.allocated_funds {
            project.allocated_funds = allocated_funds;
        }
        if let Some(spent_funds) = self.spent_funds {
            project.spent_funds = spent_funds;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(contractor) = self.contractor {
            project.contractor = Some(contractor);
        }
        if let Some(milestones) = self.milestones {
            project.milestones = milestones;
        }
    }
}
