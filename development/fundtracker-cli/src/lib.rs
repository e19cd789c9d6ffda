//! FundTracker command line
//!
//! Drives the ledger against file-backed storage in a data directory and
//! prints results as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use fundtracker_ledger::prelude::*;
use fundtracker_ledger::session::fabricate_user;
use fundtracker_ledger::views::{transaction_history, visible_projects, DashboardSummary, TransactionFilter};
use fundtracker_ledger::workflow::{self, AllocationRequest, ProjectRequest, RecipientKind};
use fundtracker_ledger::FileStorage;

#[derive(Debug, Parser)]
#[command(name = "fundtracker", version, about = "Simulated public-fund ledger")]
pub struct Cli {
    /// Data directory (defaults to FUNDTRACKER_DATA_DIR or ./.fundtracker)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the ledger, seeding demonstration data on first run
    Init,
    /// Log in as a role's demo user
    Login {
        #[arg(value_parser = parse_role)]
        role: UserRole,
        #[arg(long)]
        email: Option<String>,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Record a completed allocation or payment
    Allocate {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: i64,
        #[arg(long, value_enum, default_value_t = RecipientArg::LocalAuthority)]
        recipient: RecipientArg,
        #[arg(long, default_value = "")]
        project: String,
        #[arg(long)]
        description: String,
    },
    /// Create a project with the default milestone plan
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long)]
        budget: i64,
        #[arg(long, default_value = "")]
        contractor: String,
    },
    SubmitMilestone { project: String, milestone: String },
    ApproveMilestone { project: String, milestone: String },
    /// Transaction history visible to the current user
    Transactions {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long = "type", value_enum)]
        kind: Option<TypeArg>,
    },
    /// Projects visible to the current user
    Projects,
    /// Dashboard figures for the current user
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecipientArg {
    LocalAuthority,
    Contractor,
}

impl From<RecipientArg> for RecipientKind {
    fn from(arg: RecipientArg) -> Self {
        match arg {
            RecipientArg::LocalAuthority => RecipientKind::LocalAuthority,
            RecipientArg::Contractor => RecipientKind::Contractor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Completed,
}

impl From<StatusArg> for TransactionStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => TransactionStatus::Pending,
            StatusArg::Approved => TransactionStatus::Approved,
            StatusArg::Completed => TransactionStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Allocation,
    Transfer,
    Payment,
}

impl From<TypeArg> for TransactionType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Allocation => TransactionType::Allocation,
            TypeArg::Transfer => TransactionType::Transfer,
            TypeArg::Payment => TransactionType::Payment,
        }
    }
}

fn parse_role(s: &str) -> Result<UserRole, String> {
    s.parse()
}

fn config_for(cli: &Cli) -> LedgerConfig {
    let config = LedgerConfig::default();
    match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    }
}

/// Logged-in user, or an anonymous public viewer for read-only commands
fn viewer(session: &Session, ledger: &Ledger) -> Result<User> {
    Ok(match session.current_user()? {
        Some(user) => user,
        None => fabricate_user(UserRole::Public, None, ledger.ids().as_ref()),
    })
}

fn logged_in(session: &Session) -> Result<User> {
    session.require_user().context("log in first with `fundtracker login <role>`")
}

/// Execute one command and return what should be printed
pub fn run(cli: &Cli) -> Result<Value> {
    let config = config_for(cli);
    let storage = FileStorage::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let mut ledger = Ledger::open(config, Arc::new(storage)).context("loading ledger")?;
    let session = Session::for_ledger(&ledger);
    debug!("running {:?}", cli.command);

    let output = match &cli.command {
        Command::Init => json!({
            "transactions": ledger.transactions().len(),
            "projects": ledger.projects().len(),
            "totalFunds": ledger.total_funds(),
            "pendingTransactions": ledger.pending_count(),
        }),
        Command::Login { role, email } => serde_json::to_value(session.login(*role, email.as_deref())?)?,
        Command::Logout => {
            session.logout()?;
            json!({ "loggedOut": true })
        }
        Command::Whoami => serde_json::to_value(session.current_user()?)?,
        Command::Allocate { to, amount, recipient, project, description } => {
            let user = logged_in(&session)?;
            let tx = workflow::allocate_funds(
                &mut ledger,
                &user,
                AllocationRequest {
                    recipient_kind: (*recipient).into(),
                    recipient: to.clone(),
                    amount: *amount,
                    project_id: project.clone(),
                    description: description.clone(),
                },
            )?;
            serde_json::to_value(tx)?
        }
        Command::CreateProject { name, description, location, budget, contractor } => {
            let project = workflow::create_project(
                &mut ledger,
                ProjectRequest {
                    name: name.clone(),
                    description: description.clone(),
                    location: location.clone(),
                    budget: *budget,
                    contractor: contractor.clone(),
                },
            )?;
            serde_json::to_value(project)?
        }
        Command::SubmitMilestone { project, milestone } => {
            let user = logged_in(&session)?;
            let receipt = workflow::submit_milestone(&mut ledger, &user, project, milestone)?;
            json!({ "project": receipt.project, "transaction": receipt.transaction })
        }
        Command::ApproveMilestone { project, milestone } => {
            let receipt = workflow::approve_milestone(&mut ledger, project, milestone)?;
            json!({ "project": receipt.project, "transaction": receipt.transaction })
        }
        Command::Transactions { search, status, kind } => {
            let user = viewer(&session, &ledger)?;
            let filter = TransactionFilter {
                search: search.clone(),
                status: status.map(Into::into),
                kind: kind.map(Into::into),
            };
            serde_json::to_value(transaction_history(&user, ledger.transactions(), &filter))?
        }
        Command::Projects => {
            let user = viewer(&session, &ledger)?;
            serde_json::to_value(visible_projects(&user, ledger.projects()))?
        }
        Command::Summary => {
            let user = logged_in(&session)?;
            serde_json::to_value(DashboardSummary::build(&ledger, &user))?
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_in(dir: &TempDir, args: &[&str]) -> Result<Value> {
        let mut argv = vec!["fundtracker", "--data-dir"];
        argv.push(dir.path().to_str().unwrap());
        argv.extend_from_slice(args);
        run(&Cli::try_parse_from(argv)?)
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "fundtracker", "-vv", "transactions", "--status", "pending", "--type", "payment",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Transactions { status, kind, .. } => {
                assert_eq!(status, Some(StatusArg::Pending));
                assert_eq!(kind, Some(TypeArg::Payment));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["fundtracker", "login", "treasurer"]).is_err());
        assert!(Cli::try_parse_from(["fundtracker", "login", "local_authority"]).is_ok());
    }

    #[test]
    fn test_init_reports_seed() {
        let dir = TempDir::new().unwrap();
        let out = run_in(&dir, &["init"]).unwrap();
        assert_eq!(out["transactions"], 3);
        assert_eq!(out["projects"], 2);
        assert_eq!(out["totalFunds"], 500_000);
        assert_eq!(out["pendingTransactions"], 1);
    }

    #[test]
    fn test_submit_requires_login() {
        let dir = TempDir::new().unwrap();
        assert!(run_in(&dir, &["submit-milestone", "proj_002", "ms_004"]).is_err());

        run_in(&dir, &["login", "contractor"]).unwrap();
        assert!(run_in(&dir, &["submit-milestone", "proj_002", "ms_004"]).is_err());

        let project = run_in(
            &dir,
            &["create-project", "--name", "Clinic", "--budget", "1000", "--contractor", "James Wilson"],
        )
        .unwrap();
        let project_id = project["id"].as_str().unwrap().to_string();
        let milestone_id = project["milestones"][0]["id"].as_str().unwrap().to_string();

        let out = run_in(&dir, &["submit-milestone", &project_id, &milestone_id]).unwrap();
        assert_eq!(out["transaction"]["status"], "pending");
        assert_eq!(out["transaction"]["from"], "James Wilson");
        assert!(run_in(&dir, &["submit-milestone", &project_id, &milestone_id]).is_err());

        let history = run_in(&dir, &["transactions", "--status", "pending"]).unwrap();
        assert_eq!(history.as_array().unwrap().len(), 1);

        let paid = run_in(&dir, &["approve-milestone", &project_id, &milestone_id]).unwrap();
        assert_eq!(paid["project"]["spentFunds"], 200);
        assert!(run_in(&dir, &["approve-milestone", &project_id, &milestone_id]).is_err());
    }

    #[test]
    fn test_allocation_then_summary() {
        let dir = TempDir::new().unwrap();
        run_in(&dir, &["login", "government"]).unwrap();
        let tx = run_in(
            &dir,
            &["allocate", "--to", "Regional Council South", "--amount", "100000", "--project", "proj_002", "--description", "Top-up"],
        )
        .unwrap();
        assert_eq!(tx["type"], "allocation");
        assert_eq!(tx["from"], "Government Treasury");

        let summary = run_in(&dir, &["summary"]).unwrap();
        assert_eq!(summary["totalFunds"], 600_000);
        assert_eq!(summary["role"], "Government Official");

        run_in(&dir, &["logout"]).unwrap();
        assert_eq!(run_in(&dir, &["whoami"]).unwrap(), Value::Null);
        assert_eq!(run_in(&dir, &["projects"]).unwrap().as_array().unwrap().len(), 2);
    }
}
