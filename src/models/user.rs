//! User model
//!
//! Defines the User entity and the platform roles. Every account belongs to
//! one of the three participant roles (school, supplier, producer) or is an
//! administrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User entity representing a registered account.
///
/// Roles determine which side of the waste-to-fuel workflow the account
/// participates in: suppliers log waste, producers process it and fulfil
/// fuel requests, schools order fuel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique, used for login)
    pub email: String,
    /// Password hash (argon2); empty for Google-only accounts
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Platform role
    pub role: UserRole,
    /// Account status (active/suspended)
    pub status: UserStatus,
    /// Organization the account represents (school name, farm, plant)
    pub organization: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Profile photo URL
    pub profile_photo: Option<String>,
    /// Cover photo URL
    pub cover_photo: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User. The password must already be hashed
    /// (`services::password::hash_password`).
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Set by the database
            name,
            email,
            password_hash,
            role,
            status: UserStatus::Active,
            organization: None,
            phone: None,
            profile_photo: None,
            cover_photo: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check if the user is a biogas producer
    pub fn is_producer(&self) -> bool {
        self.role == UserRole::Producer
    }

    /// Check if the user is a waste supplier
    pub fn is_supplier(&self) -> bool {
        self.role == UserRole::Supplier
    }

    /// Check if the user is a school
    pub fn is_school(&self) -> bool {
        self.role == UserRole::School
    }

    /// Check if the account is suspended
    pub fn is_suspended(&self) -> bool {
        self.status == UserStatus::Suspended
    }

    /// Check if the account is active
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Platform role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// School ordering fuel deliveries
    School,
    /// Organic waste supplier
    Supplier,
    /// Biogas producer
    Producer,
    /// Administrator - full access
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::School
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::School => write!(f, "school"),
            UserRole::Supplier => write!(f, "supplier"),
            UserRole::Producer => write!(f, "producer"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "school" => Ok(UserRole::School),
            "supplier" => Ok(UserRole::Supplier),
            "producer" => Ok(UserRole::Producer),
            "admin" => Ok(UserRole::Admin),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Active - normal access
    Active,
    /// Suspended - cannot login
    Suspended,
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl FromStr for UserStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(anyhow::anyhow!("Invalid user status: {}", s)),
        }
    }
}

/// Input for updating a user's own profile
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub profile_photo: Option<String>,
    pub cover_photo: Option<String>,
}
