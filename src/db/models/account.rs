//! Account models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Privilege level of an account, least privileged first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    Client,
    Employee,
    Admin,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Client => "Client",
            AccountType::Employee => "Employee",
            AccountType::Admin => "Admin",
        }
    }

    /// Employees and admins may manage the catalog.
    pub fn is_staff(&self) -> bool {
        matches!(self, AccountType::Employee | AccountType::Admin)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AccountType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Client" => Ok(AccountType::Client),
            "Employee" => Ok(AccountType::Employee),
            "Admin" => Ok(AccountType::Admin),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

/// A full account row, password hash included. Never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: i64,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_password: String,
    #[sqlx(try_from = "String")]
    pub account_type: AccountType,
}

impl Account {
    /// Whether a usable password hash is stored for this account.
    pub fn has_password(&self) -> bool {
        !self.account_password.is_empty()
    }
}

/// Public identity of an account: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub account_id: i64,
    pub account_firstname: String,
    pub account_lastname: String,
    pub account_email: String,
    pub account_type: AccountType,
}

impl From<Account> for AccountProfile {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.account_id,
            account_firstname: account.account_firstname,
            account_lastname: account.account_lastname,
            account_email: account.account_email,
            account_type: account.account_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub account_type: AccountType,
}
