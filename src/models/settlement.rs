use super::balance::Balances;
use super::member::Member;
use crate::error::SettlementError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Suggested payment: `from` should pay `to` the given amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedDebt {
    pub from: Member,
    pub to: Member,
    pub amount: i64,
}

impl SimplifiedDebt {
    pub fn new(from: Member, to: Member, amount: i64) -> Result<Self, SettlementError> {
        validate_transfer(&from, &to, amount)?;
        Ok(SimplifiedDebt { from, to, amount })
    }
}

/// A real-world payment recorded by the persistence layer.
///
/// Only confirmed settlements are netted against expense balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: Uuid,
    pub from: Member,
    pub to: Member,
    pub amount: i64,
    pub recorded_at: DateTime<Utc>,
    pub is_confirmed: bool,
}

impl Settlement {
    pub fn record(from: Member, to: Member, amount: i64) -> Result<Self, SettlementError> {
        validate_transfer(&from, &to, amount)?;
        Ok(Settlement {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            recorded_at: Utc::now(),
            is_confirmed: false,
        })
    }

    /// Records the settlement as an acted-upon suggestion.
    pub fn from_debt(debt: &SimplifiedDebt) -> Result<Self, SettlementError> {
        Settlement::record(debt.from.clone(), debt.to.clone(), debt.amount)
    }

    pub fn confirm(mut self) -> Self {
        self.is_confirmed = true;
        self
    }

    pub fn validate(&self) -> Result<(), SettlementError> {
        validate_transfer(&self.from, &self.to, self.amount)
    }
}

fn validate_transfer(from: &Member, to: &Member, amount: i64) -> Result<(), SettlementError> {
    if amount <= 0 {
        return Err(SettlementError::InvalidAmount(amount));
    }
    if from == to {
        return Err(SettlementError::SelfSettlement(from.to_string()));
    }
    Ok(())
}

/// Direct obligation between two members before any simplification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseDebt {
    pub debtor: Member,
    pub creditor: Member,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub balances: Balances,
    pub transfers: Vec<SimplifiedDebt>,
}

/// One member's slice of a settlement plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPosition {
    pub member: Member,
    pub balance: i64,
    pub pays: Vec<SimplifiedDebt>,
    pub receives: Vec<SimplifiedDebt>,
}
