//! Row models for the account and catalog tables.

pub mod account;
pub mod inventory;

pub use account::*;
pub use inventory::*;
