pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod models;
pub mod service;

pub use crate::config::EngineConfig;
pub use crate::core::{SimplifyStrategy, SplitRequest};
pub use crate::error::SettlementError;
pub use crate::models::{
    Balances, Expense, Member, MemberPosition, PairwiseDebt, Settlement, SettlementPlan,
    SimplifiedDebt, Split,
};
pub use crate::service::SettlementEngine;

#[cfg(test)]
mod tests;
