//! Roles and the fabricated user identities behind the login stub

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Government,
    LocalAuthority,
    Contractor,
    Public,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Government,
        UserRole::LocalAuthority,
        UserRole::Contractor,
        UserRole::Public,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Government => "government",
            UserRole::LocalAuthority => "local_authority",
            UserRole::Contractor => "contractor",
            UserRole::Public => "public",
        }
    }

    /// Label shown next to the user's name
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Government => "Government Official",
            UserRole::LocalAuthority => "Local Authority",
            UserRole::Contractor => "Contractor",
            UserRole::Public => "Public Viewer",
        }
    }

    /// Cosmetic capability labels; nothing enforces them
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            UserRole::Government => &["Allocate Funds", "View All Projects", "Create Projects"],
            UserRole::LocalAuthority => &["Receive Funds", "Approve Payments", "Manage Local Projects"],
            UserRole::Contractor => &["Submit Milestones", "Request Payments", "View Project Status"],
            UserRole::Public => &["View Transactions", "Track Fund Usage", "Public Audit"],
        }
    }

    pub fn directory(&self) -> &'static RoleDirectory {
        match self {
            UserRole::Government => &GOVERNMENT,
            UserRole::LocalAuthority => &LOCAL_AUTHORITY,
            UserRole::Contractor => &CONTRACTOR,
            UserRole::Public => &PUBLIC,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "government" => Ok(UserRole::Government),
            "local_authority" | "local-authority" => Ok(UserRole::LocalAuthority),
            "contractor" => Ok(UserRole::Contractor),
            "public" => Ok(UserRole::Public),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Demo identity offered for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoUser {
    pub name: &'static str,
    pub email: &'static str,
}

/// Fixed per-role lookup table used by the login stub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDirectory {
    pub title: &'static str,
    pub organization: &'static str,
    pub users: &'static [DemoUser],
}

impl RoleDirectory {
    /// Every login for the role resolves to this identity
    pub fn primary(&self) -> &'static DemoUser {
        &self.users[0]
    }
}

static GOVERNMENT: RoleDirectory = RoleDirectory {
    title: "Government / NGO Login",
    organization: "Ministry of Rural Development",
    users: &[
        DemoUser { name: "Sarah Johnson", email: "sarah.johnson@gov.ru" },
        DemoUser { name: "Michael Chen", email: "michael.chen@ngo.org" },
    ],
};

static LOCAL_AUTHORITY: RoleDirectory = RoleDirectory {
    title: "Local Authority Login",
    organization: "Regional Development Council",
    users: &[
        DemoUser { name: "David Martinez", email: "david.martinez@regional.gov" },
        DemoUser { name: "Emma Thompson", email: "emma.thompson@council.gov" },
    ],
};

static CONTRACTOR: RoleDirectory = RoleDirectory {
    title: "Contractor Login",
    organization: "Construction Partners Ltd",
    users: &[
        DemoUser { name: "James Wilson", email: "james.wilson@builders.com" },
        DemoUser { name: "Lisa Garcia", email: "lisa.garcia@construction.co" },
    ],
};

static PUBLIC: RoleDirectory = RoleDirectory {
    title: "Public Access",
    organization: "General Public",
    users: &[DemoUser { name: "Anonymous Viewer", email: "public@viewer.com" }],
};

/// Current-user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub organization: String,
}
