use super::member::Member;
use super::settlement::SimplifiedDebt;
use crate::error::SettlementError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Net position of every member of a group, in minor units.
///
/// Positive means the group owes the member, negative means the member owes
/// the group. Backed by a `BTreeMap` so iteration order (and therefore every
/// derived result) is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<Member, i64>);

impl Balances {
    pub fn new() -> Self {
        Balances(BTreeMap::new())
    }

    /// Every member starts at zero.
    pub fn zeroed<'a>(members: impl IntoIterator<Item = &'a Member>) -> Self {
        Balances(members.into_iter().map(|m| (m.clone(), 0)).collect())
    }

    pub fn get(&self, member: &Member) -> Option<i64> {
        self.0.get(member).copied()
    }

    pub fn contains(&self, member: &Member) -> bool {
        self.0.contains_key(member)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Member, i64> {
        self.0.iter()
    }

    /// Sum of all balances, widened so that a corrupt snapshot cannot overflow.
    pub fn total(&self) -> i128 {
        self.0.values().map(|&b| b as i128).sum()
    }

    pub fn nonzero_count(&self) -> usize {
        self.0.values().filter(|&&b| b != 0).count()
    }

    pub fn is_settled(&self) -> bool {
        self.0.values().all(|&b| b == 0)
    }

    /// Fails with `UnbalancedInput` unless the balances net to zero.
    pub fn ensure_conserved(&self) -> Result<(), SettlementError> {
        let total = self.total();
        if total != 0 {
            let clamped = i64::try_from(total).unwrap_or(if total > 0 {
                i64::MAX
            } else {
                i64::MIN
            });
            return Err(SettlementError::UnbalancedInput(clamped));
        }
        Ok(())
    }

    /// Adds `delta` to a known member's balance.
    pub fn adjust(&mut self, member: &Member, delta: i64) -> Result<(), SettlementError> {
        let balance = self
            .0
            .get_mut(member)
            .ok_or_else(|| SettlementError::UnknownMember(member.to_string()))?;
        *balance = balance
            .checked_add(delta)
            .ok_or(SettlementError::AmountOverflow)?;
        Ok(())
    }

    /// Applies a payment: the payer's balance rises, the payee's falls.
    pub fn apply(&mut self, debt: &SimplifiedDebt) -> Result<(), SettlementError> {
        self.adjust(&debt.from, debt.amount)?;
        self.adjust(&debt.to, -debt.amount)
    }
}

impl FromIterator<(Member, i64)> for Balances {
    fn from_iter<I: IntoIterator<Item = (Member, i64)>>(iter: I) -> Self {
        Balances(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = (&'a Member, &'a i64);
    type IntoIter = btree_map::Iter<'a, Member, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
