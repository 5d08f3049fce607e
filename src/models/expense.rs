use super::member::Member;
use crate::error::SettlementError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Portion of one expense attributed to one member, in minor units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub member: Member,
    pub owed: i64,
}

impl Split {
    pub fn new(member: Member, owed: i64) -> Result<Self, SettlementError> {
        if owed < 0 {
            return Err(SettlementError::InvalidShare(owed));
        }
        Ok(Split { member, owed })
    }
}

/// A recorded purchase paid by one member and shared by its splits.
///
/// Invariants, checked by [`Expense::new`] and [`Expense::validate`]:
/// * `amount >= 1`
/// * every split member appears once
/// * the splits' `owed` values sum to `amount`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    payer: Member,
    amount: i64,
    splits: Vec<Split>,
}

impl Expense {
    pub fn new(payer: Member, amount: i64, splits: Vec<Split>) -> Result<Self, SettlementError> {
        let expense = Expense {
            payer,
            amount,
            splits,
        };
        expense.validate()?;
        Ok(expense)
    }

    pub fn payer(&self) -> &Member {
        &self.payer
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Re-checks the record invariants. Deserialized expenses skip the
    /// constructor, so the aggregator calls this on every input.
    pub fn validate(&self) -> Result<(), SettlementError> {
        if self.amount < 1 {
            return Err(SettlementError::InvalidAmount(self.amount));
        }

        let mut seen = BTreeSet::new();
        let mut total: i64 = 0;
        for split in &self.splits {
            if split.owed < 0 {
                return Err(SettlementError::InvalidShare(split.owed));
            }
            if !seen.insert(&split.member) {
                return Err(SettlementError::DuplicateSplitMember(
                    split.member.to_string(),
                ));
            }
            total = total
                .checked_add(split.owed)
                .ok_or(SettlementError::AmountOverflow)?;
        }

        if total != self.amount {
            return Err(SettlementError::SplitSumMismatch {
                expected: self.amount,
                actual: total,
            });
        }
        Ok(())
    }
}
