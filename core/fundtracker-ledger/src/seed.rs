//! Demonstration records loaded on first run

use crate::clock::DAY_MS;
use crate::project::{Milestone, MilestoneStatus, Project, ProjectStatus};
use crate::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::Timestamp;

fn days_ago(now: Timestamp, days: i64) -> Timestamp {
    now - DAY_MS * days
}

#[allow(clippy::too_many_arguments)]
fn seed_tx(
    id: &str,
    hash: &str,
    from: &str,
    to: &str,
    amount: i64,
    kind: TransactionType,
    project_id: &str,
    description: &str,
    timestamp: Timestamp,
    status: TransactionStatus,
    block_height: u64,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        hash: hash.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        amount,
        kind,
        project_id: Some(project_id.to_string()),
        description: description.to_string(),
        timestamp,
        status,
        block_height,
    }
}

/// Three transactions: two completed, one pending
pub fn seed_transactions(now: Timestamp) -> Vec<Transaction> {
    vec![
        seed_tx(
            "1",
            "0x7d1af...",
            "Government Treasury",
            "Regional Council North",
            500_000,
            TransactionType::Allocation,
            "proj_001",
            "Initial allocation for Community Park Development",
            days_ago(now, 7),
            TransactionStatus::Completed,
            12345,
        ),
        seed_tx(
            "2",
            "0x8e2bg...",
            "Regional Council North",
            "GreenSpace Contractors",
            150_000,
            TransactionType::Payment,
            "proj_001",
            "Payment for Phase 1: Site Preparation",
            days_ago(now, 5),
            TransactionStatus::Completed,
            12346,
        ),
        seed_tx(
            "3",
            "0x9f3ch...",
            "Government Treasury",
            "Regional Council South",
            750_000,
            TransactionType::Allocation,
            "proj_002",
            "Allocation for Sports Complex Construction",
            days_ago(now, 3),
            TransactionStatus::Pending,
            12347,
        ),
    ]
}

/// Two projects with three milestones each
pub fn seed_projects(now: Timestamp) -> Vec<Project> {
    let mut site_prep = Milestone::pending("ms_001", "Site Preparation", "Clear land and prepare foundation", 150_000);
    site_prep.status = MilestoneStatus::Paid;
    site_prep.submitted_at = Some(days_ago(now, 6));
    site_prep.approved_at = Some(days_ago(now, 5));

    let mut infrastructure = Milestone::pending(
        "ms_002",
        "Infrastructure Installation",
        "Install utilities and basic infrastructure",
        200_000,
    );
    infrastructure.status = MilestoneStatus::Submitted;
    infrastructure.submitted_at = Some(days_ago(now, 2));

    vec![
        Project {
            id: "proj_001".to_string(),
            name: "Community Park Development".to_string(),
            description: "Development of a multi-purpose community park with playground, walking trails, and recreational facilities.".to_string(),
            location: "Riverside District, Northern Region".to_string(),
            total_budget: 500_000,
            allocated_funds: 500_000,
            spent_funds: 150_000,
            status: ProjectStatus::InProgress,
            contractor: Some("GreenSpace Contractors".to_string()),
            created_at: days_ago(now, 14),
            milestones: vec![
                site_prep,
                infrastructure,
                Milestone::pending(
                    "ms_003",
                    "Recreational Facilities",
                    "Build playground and sports equipment",
                    150_000,
                ),
            ],
        },
        Project {
            id: "proj_002".to_string(),
            name: "Sports Complex Construction".to_string(),
            description: "Construction of a modern sports complex with indoor courts, gym facilities, and community meeting spaces.".to_string(),
            location: "Central Square, Southern Region".to_string(),
            total_budget: 750_000,
            allocated_funds: 750_000,
            spent_funds: 0,
            status: ProjectStatus::Approved,
            contractor: Some("SportsBuild Inc".to_string()),
            created_at: days_ago(now, 10),
            milestones: vec![
                Milestone::pending("ms_004", "Foundation Work", "Excavation and foundation construction", 250_000),
                Milestone::pending("ms_005", "Structural Framework", "Main building structure and roofing", 300_000),
                Milestone::pending(
                    "ms_006",
                    "Interior Finishing",
                    "Flooring, equipment installation, and final touches",
                    200_000,
                ),
            ],
        },
    ]
}
