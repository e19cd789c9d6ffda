//! Fund allocation, project creation and the milestone lifecycle
//!
//! Each workflow issues up to two store calls (project update, then a
//! transaction). They are not atomic: if the second call fails the first
//! stays applied.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{LedgerError, LedgerResult};
use crate::project::{Milestone, MilestoneStatus, NewProject, Project, ProjectStatus, ProjectUpdate};
use crate::store::Ledger;
use crate::transaction::{NewTransaction, Transaction, TransactionStatus, TransactionType};
use crate::user::{User, UserRole};
use crate::Amount;

/// Sender name used for government allocations
pub const TREASURY: &str = "Government Treasury";
/// Counterparty of milestone submissions and approvals
pub const LOCAL_AUTHORITY: &str = "Local Authority";
/// Payee used when a project has no contractor
pub const UNASSIGNED_CONTRACTOR: &str = "Contractor";

/// Who receives an allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientKind {
    LocalAuthority,
    Contractor,
}

/// Allocation form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub recipient_kind: RecipientKind,
    pub recipient: String,
    pub amount: Amount,
    /// Empty means no project
    pub project_id: String,
    pub description: String,
}

/// Record a completed allocation (or payment, for contractor recipients).
///
/// When the request names a project that exists, its allocated funds grow by
/// the amount; an unknown project id is recorded on the transaction as-is.
/// The amount is not checked against the remaining budget; the running
/// total saturates instead of overflowing.
pub fn allocate_funds(ledger: &mut Ledger, user: &User, request: AllocationRequest) -> LedgerResult<Transaction> {
    let from = if user.role == UserRole::Government {
        TREASURY.to_string()
    } else {
        user.name.clone()
    };
    let kind = match request.recipient_kind {
        RecipientKind::LocalAuthority => TransactionType::Allocation,
        RecipientKind::Contractor => TransactionType::Payment,
    };

    let mut new = NewTransaction::new(from, request.recipient, request.amount, kind, TransactionStatus::Completed)
        .with_description(request.description);
    if !request.project_id.is_empty() {
        new = new.with_project(request.project_id.clone());
    }
    let tx = ledger.add_transaction(new)?;

    let allocated = ledger
        .project(&request.project_id)
        .map(|p| p.allocated_funds.saturating_add(request.amount));
    if let Some(allocated) = allocated {
        ledger.update_project(
            &request.project_id,
            ProjectUpdate { allocated_funds: Some(allocated), ..Default::default() },
        )?;
    }

    Ok(tx)
}

/// Project creation form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub budget: Amount,
    /// Empty means unassigned
    pub contractor: String,
}

/// `percent`% of `budget`, rounded toward zero, without forming `budget * percent`
fn share_of(budget: Amount, percent: Amount) -> Amount {
    budget / 100 * percent + budget % 100 * percent / 100
}

/// Default milestone plan: 20% initiation, 60% development, 20% completion
fn default_milestones(ledger: &Ledger, budget: Amount) -> Vec<Milestone> {
    let share = |percent: Amount| share_of(budget, percent);
    let ids = ledger.ids();
    vec![
        Milestone::pending(ids.milestone_id(), "Project Initiation", "Initial project setup and planning", share(20)),
        Milestone::pending(ids.milestone_id(), "Development Phase", "Main construction and development work", share(60)),
        Milestone::pending(ids.milestone_id(), "Project Completion", "Final touches and project handover", share(20)),
    ]
}

/// Create a `planning` project with the default milestone plan
pub fn create_project(ledger: &mut Ledger, request: ProjectRequest) -> LedgerResult<Project> {
    let milestones = default_milestones(ledger, request.budget);
    let contractor = Some(request.contractor).filter(|c| !c.is_empty());

    ledger.add_project(NewProject {
        name: request.name,
        description: request.description,
        location: request.location,
        total_budget: request.budget,
        allocated_funds: 0,
        spent_funds: 0,
        status: ProjectStatus::Planning,
        contractor,
        milestones,
    })
}

fn find_milestone(ledger: &Ledger, project_id: &str, milestone_id: &str) -> LedgerResult<(Project, Milestone)> {
    let project = ledger
        .project(project_id)
        .ok_or_else(|| LedgerError::ProjectNotFound(project_id.to_string()))?;
    let milestone = project.milestone(milestone_id).ok_or_else(|| LedgerError::MilestoneNotFound {
        project: project_id.to_string(),
        milestone: milestone_id.to_string(),
    })?;
    Ok((project.clone(), milestone.clone()))
}

fn expect_status(project: &Project, milestone: &Milestone, expected: MilestoneStatus) -> LedgerResult<()> {
    if milestone.status == expected {
        return Ok(());
    }
    warn!(
        "milestone {} of {} is {}, expected {}",
        milestone.id,
        project.id,
        milestone.status.as_str(),
        expected.as_str()
    );
    Err(LedgerError::InvalidMilestoneStatus {
        project: project.id.clone(),
        milestone: milestone.id.clone(),
        status: milestone.status.as_str(),
        expected: expected.as_str(),
    })
}

/// Copy of `milestones` with one entry rewritten by `change`
fn with_milestone(milestones: &[Milestone], milestone_id: &str, change: impl Fn(&mut Milestone)) -> Vec<Milestone> {
    milestones
        .iter()
        .cloned()
        .map(|mut m| {
            if m.id == milestone_id {
                change(&mut m);
            }
            m
        })
        .collect()
}

/// Outcome of a milestone step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneReceipt {
    pub project: Project,
    pub transaction: Transaction,
}

/// Mark a milestone submitted and record a pending payment request.
///
/// Only the project's contractor may submit, and only a `pending` milestone.
pub fn submit_milestone(
    ledger: &mut Ledger,
    user: &User,
    project_id: &str,
    milestone_id: &str,
) -> LedgerResult<MilestoneReceipt> {
    let (project, milestone) = find_milestone(ledger, project_id, milestone_id)?;
    if !project.is_assigned_to(&user.name) {
        warn!("{} tried to submit milestone {} of {}", user.name, milestone_id, project_id);
        return Err(LedgerError::NotProjectContractor {
            project: project_id.to_string(),
            user: user.name.clone(),
        });
    }
    expect_status(&project, &milestone, MilestoneStatus::Pending)?;
    let now = ledger.now();

    let milestones = with_milestone(&project.milestones, milestone_id, |m| {
        m.status = MilestoneStatus::Submitted;
        m.submitted_at = Some(now);
    });
    let project = ledger.update_project(
        project_id,
        ProjectUpdate { milestones: Some(milestones), ..Default::default() },
    )?;

    let transaction = ledger.add_transaction(
        NewTransaction::new(
            user.name.clone(),
            LOCAL_AUTHORITY,
            milestone.amount,
            TransactionType::Payment,
            TransactionStatus::Pending,
        )
        .with_project(project_id)
        .with_description(format!("Milestone submission: {}", milestone.name)),
    )?;

    info!("milestone {} of {} submitted by {}", milestone_id, project_id, user.name);
    Ok(MilestoneReceipt { project, transaction })
}

/// Mark a milestone paid, add its amount to spent funds and record the
/// completed payment to the contractor.
///
/// Only a `submitted` milestone can be approved. Spent funds may pass the
/// total budget.
pub fn approve_milestone(ledger: &mut Ledger, project_id: &str, milestone_id: &str) -> LedgerResult<MilestoneReceipt> {
    let (project, milestone) = find_milestone(ledger, project_id, milestone_id)?;
    expect_status(&project, &milestone, MilestoneStatus::Submitted)?;
    let now = ledger.now();

    let milestones = with_milestone(&project.milestones, milestone_id, |m| {
        m.status = MilestoneStatus::Paid;
        m.approved_at = Some(now);
    });
    let updated = ledger.update_project(
        project_id,
        ProjectUpdate {
            milestones: Some(milestones),
            spent_funds: Some(project.spent_funds.saturating_add(milestone.amount)),
            ..Default::default()
        },
    )?;

    let payee = project
        .contractor
        .clone()
        .unwrap_or_else(|| UNASSIGNED_CONTRACTOR.to_string());
    let transaction = ledger.add_transaction(
        NewTransaction::new(
            LOCAL_AUTHORITY,
            payee,
            milestone.amount,
            TransactionType::Payment,
            TransactionStatus::Completed,
        )
        .with_project(project_id)
        .with_description(format!("Payment approved: {}", milestone.name)),
    )?;

    info!("milestone {} of {} approved and paid", milestone_id, project_id);
    Ok(MilestoneReceipt { project: updated, transaction })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::LedgerConfig;
    use crate::ids::SequentialIds;
    use crate::session::fabricate_user;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;

    fn ledger() -> Ledger {
        Ledger::open_with(
            LedgerConfig::default(),
            Arc::new(MemoryStorage::new()),
            Arc::new(SequentialIds::new()),
            Arc::new(ManualClock::new(NOW)),
        )
        .unwrap()
    }

    fn login(ledger: &Ledger, role: UserRole) -> User {
        fabricate_user(role, None, ledger.ids().as_ref())
    }

    /// Contractor-role user named after the project's assigned contractor
    fn contractor_of(ledger: &Ledger, project_id: &str) -> User {
        let mut user = login(ledger, UserRole::Contractor);
        user.name = ledger.project(project_id).unwrap().contractor.clone().unwrap();
        user
    }

    #[test]
    fn test_submit_milestone() {
        let mut ledger = ledger();
        let contractor = contractor_of(&ledger, "proj_002");
        let before = ledger.transactions().len();

        let receipt = submit_milestone(&mut ledger, &contractor, "proj_002", "ms_004").unwrap();

        let milestone = receipt.project.milestone("ms_004").unwrap();
        assert_eq!(milestone.status, MilestoneStatus::Submitted);
        assert_eq!(milestone.submitted_at, Some(NOW));
        assert_eq!(milestone.approved_at, None);

        assert_eq!(ledger.transactions().len(), before + 1);
        let tx = &receipt.transaction;
        assert_eq!(tx.kind, TransactionType::Payment);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.amount, 250_000);
        assert_eq!(tx.from, "SportsBuild Inc");
        assert_eq!(tx.to, LOCAL_AUTHORITY);
        assert_eq!(tx.description, "Milestone submission: Foundation Work");
        assert_eq!(ledger.project("proj_002"), Some(&receipt.project));
    }

    #[test]
    fn test_approve_milestone_pays_contractor() {
        let mut ledger = ledger();
        let funds_before = ledger.total_funds();

        let receipt = approve_milestone(&mut ledger, "proj_001", "ms_002").unwrap();

        let milestone = receipt.project.milestone("ms_002").unwrap();
        assert_eq!(milestone.status, MilestoneStatus::Paid);
        assert_eq!(milestone.approved_at, Some(NOW));
        assert_eq!(receipt.project.spent_funds, 350_000);
        assert_eq!(receipt.project.paid_milestones(), 2);

        let tx = &receipt.transaction;
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.from, LOCAL_AUTHORITY);
        assert_eq!(tx.to, "GreenSpace Contractors");
        assert_eq!(ledger.total_funds(), funds_before);
    }

    #[test]
    fn test_unknown_targets_are_named() {
        let mut ledger = ledger();
        let user = login(&ledger, UserRole::Contractor);

        assert!(matches!(
            submit_milestone(&mut ledger, &user, "proj_nope", "ms_004"),
            Err(LedgerError::ProjectNotFound(_))
        ));
        assert!(matches!(
            approve_milestone(&mut ledger, "proj_002", "ms_001"),
            Err(LedgerError::MilestoneNotFound { .. })
        ));
        assert_eq!(ledger.transactions().len(), 3);
    }

    #[test]
    fn test_submit_rejects_other_contractors() {
        let mut ledger = ledger();
        let outsider = login(&ledger, UserRole::Contractor);
        let projects_before = ledger.projects().to_vec();

        let err = submit_milestone(&mut ledger, &outsider, "proj_002", "ms_004").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotProjectContractor { ref project, ref user } if project == "proj_002" && user == "James Wilson"
        ));
        assert_eq!(ledger.projects(), projects_before.as_slice());
        assert_eq!(ledger.transactions().len(), 3);
    }

    #[test]
    fn test_submit_only_from_pending() {
        let mut ledger = ledger();
        let contractor = contractor_of(&ledger, "proj_001");
        let projects_before = ledger.projects().to_vec();

        for (milestone, status) in [("ms_001", "paid"), ("ms_002", "submitted")] {
            let err = submit_milestone(&mut ledger, &contractor, "proj_001", milestone).unwrap_err();
            assert!(matches!(
                err,
                LedgerError::InvalidMilestoneStatus { status: s, expected: "pending", .. } if s == status
            ));
        }

        assert_eq!(ledger.projects(), projects_before.as_slice());
        assert_eq!(ledger.transactions().len(), 3);
    }

    #[test]
    fn test_approve_only_from_submitted() {
        let mut ledger = ledger();

        approve_milestone(&mut ledger, "proj_001", "ms_002").unwrap();
        let err = approve_milestone(&mut ledger, "proj_001", "ms_002").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidMilestoneStatus { status: "paid", expected: "submitted", .. }));

        let err = approve_milestone(&mut ledger, "proj_002", "ms_004").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidMilestoneStatus { status: "pending", .. }));

        let park = ledger.project("proj_001").unwrap();
        assert_eq!(park.spent_funds, 350_000);
        let payments = ledger
            .transactions()
            .iter()
            .filter(|t| t.description == "Payment approved: Infrastructure Installation")
            .count();
        assert_eq!(payments, 1);
        assert_eq!(
            ledger.project("proj_002").unwrap().milestone("ms_004").unwrap().status,
            MilestoneStatus::Pending
        );
    }

    #[test]
    fn test_full_milestone_cycle() {
        let mut ledger = ledger();
        let contractor = contractor_of(&ledger, "proj_002");

        submit_milestone(&mut ledger, &contractor, "proj_002", "ms_005").unwrap();
        let receipt = approve_milestone(&mut ledger, "proj_002", "ms_005").unwrap();

        assert_eq!(receipt.project.milestone("ms_005").unwrap().status, MilestoneStatus::Paid);
        assert_eq!(receipt.project.spent_funds, 300_000);
        assert_eq!(receipt.transaction.to, "SportsBuild Inc");
        assert!(submit_milestone(&mut ledger, &contractor, "proj_002", "ms_005").is_err());
    }

    #[test]
    fn test_large_amounts_do_not_overflow() {
        let mut ledger = ledger();
        let official = login(&ledger, UserRole::Government);

        let project = create_project(
            &mut ledger,
            ProjectRequest {
                name: "Dam".to_string(),
                description: String::new(),
                location: String::new(),
                budget: i64::MAX / 10,
                contractor: String::new(),
            },
        )
        .unwrap();
        let amounts: Vec<_> = project.milestones.iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![184_467_440_737_095_516, 553_402_322_211_286_548, 184_467_440_737_095_516]);

        let amounts: Vec<_> = create_project(
            &mut ledger,
            ProjectRequest {
                name: "Bridge".to_string(),
                description: String::new(),
                location: String::new(),
                budget: i64::MAX,
                contractor: String::new(),
            },
        )
        .unwrap()
        .milestones
        .iter()
        .map(|m| m.amount)
        .collect();
        assert_eq!(amounts, vec![1_844_674_407_370_955_161, 5_534_023_222_112_865_484, 1_844_674_407_370_955_161]);

        for _ in 0..2 {
            allocate_funds(
                &mut ledger,
                &official,
                AllocationRequest {
                    recipient_kind: RecipientKind::LocalAuthority,
                    recipient: "Regional Council North".to_string(),
                    amount: i64::MAX,
                    project_id: project.id.clone(),
                    description: String::new(),
                },
            )
            .unwrap();
        }
        assert_eq!(ledger.project(&project.id).unwrap().allocated_funds, i64::MAX);
        assert_eq!(ledger.total_funds(), i64::MAX);
    }

    #[test]
    fn test_government_allocation_updates_project() {
        let mut ledger = ledger();
        let official = login(&ledger, UserRole::Government);

        let tx = allocate_funds(
            &mut ledger,
            &official,
            AllocationRequest {
                recipient_kind: RecipientKind::LocalAuthority,
                recipient: "Regional Council South".to_string(),
                amount: 100_000,
                project_id: "proj_002".to_string(),
                description: "Top-up".to_string(),
            },
        )
        .unwrap();

        assert_eq!(tx.from, TREASURY);
        assert_eq!(tx.kind, TransactionType::Allocation);
        assert_eq!(tx.project_id.as_deref(), Some("proj_002"));
        assert_eq!(ledger.project("proj_002").unwrap().allocated_funds, 850_000);
        assert_eq!(ledger.total_funds(), 600_000);
    }

    #[test]
    fn test_contractor_allocation_without_project() {
        let mut ledger = ledger();
        let authority = login(&ledger, UserRole::LocalAuthority);
        let projects_before = ledger.projects().to_vec();

        let tx = allocate_funds(
            &mut ledger,
            &authority,
            AllocationRequest {
                recipient_kind: RecipientKind::Contractor,
                recipient: "SportsBuild Inc".to_string(),
                amount: 5,
                project_id: String::new(),
                description: "Advance".to_string(),
            },
        )
        .unwrap();

        assert_eq!(tx.from, "David Martinez");
        assert_eq!(tx.kind, TransactionType::Payment);
        assert_eq!(tx.project_id, None);
        assert_eq!(ledger.projects(), projects_before.as_slice());
    }

    #[test]
    fn test_create_project_splits_budget() {
        let mut ledger = ledger();
        let project = create_project(
            &mut ledger,
            ProjectRequest {
                name: "Library".to_string(),
                description: "Town library".to_string(),
                location: "Old Town".to_string(),
                budget: 100_001,
                contractor: String::new(),
            },
        )
        .unwrap();

        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.contractor, None);
        let amounts: Vec<_> = project.milestones.iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![20_000, 60_000, 20_000]);
        assert!(project.milestones.iter().all(|m| m.status == MilestoneStatus::Pending));
        assert_eq!(ledger.projects().len(), 3);
    }
}
