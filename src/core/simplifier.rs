use crate::error::SettlementError;
use crate::models::{Balances, Member, SimplifiedDebt};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Largest zero-sum group the subset matcher searches for.
pub const MAX_SUBSET_SIZE: usize = 4;

/// Above this many open balances subset matching falls back to the sweep.
pub const SUBSET_MEMBER_LIMIT: usize = 24;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimplifyStrategy {
    /// Sort once, then sweep debtors against creditors.
    #[default]
    Greedy,
    /// Settle zero-sum groups of up to `max_group_size` members among
    /// themselves first, then sweep whatever is left.
    ///
    /// Each search scans up to `C(n, k)` combinations of the `n` open
    /// balances and restarts after every match, so the cost grows as
    /// `O(n^(k+1))`. `k` is capped at [`MAX_SUBSET_SIZE`] and groups with
    /// more than [`SUBSET_MEMBER_LIMIT`] open balances use the greedy sweep.
    SubsetMatching { max_group_size: usize },
}

/// Computes payments that bring every balance to zero using the greedy sweep.
///
/// At most `n - 1` payments are produced for `n` members with a nonzero
/// balance. The result is a heuristic, not a proven minimum.
pub fn simplify_debts(balances: &Balances) -> Result<Vec<SimplifiedDebt>, SettlementError> {
    simplify_with(balances, SimplifyStrategy::Greedy)
}

pub fn simplify_with(
    balances: &Balances,
    strategy: SimplifyStrategy,
) -> Result<Vec<SimplifiedDebt>, SettlementError> {
    if let Err(e) = balances.ensure_conserved() {
        warn!("Refusing to simplify balances that do not net to zero: {}", e);
        return Err(e);
    }

    let entries: Vec<(Member, i64)> = balances
        .iter()
        .filter(|(_, b)| **b != 0)
        .map(|(m, b)| (m.clone(), *b))
        .collect();
    debug!(
        ?strategy,
        "Simplifying debts for {} members with open balances",
        entries.len()
    );

    let transfers = match strategy {
        SimplifyStrategy::SubsetMatching { max_group_size } if max_group_size >= 2 => {
            if entries.len() > SUBSET_MEMBER_LIMIT {
                debug!(
                    "{} open balances exceed the subset matching limit of {}, sweeping instead",
                    entries.len(),
                    SUBSET_MEMBER_LIMIT
                );
                sweep(entries)
            } else {
                subset_match(entries, max_group_size.min(MAX_SUBSET_SIZE))
            }
        }
        _ => sweep(entries),
    };

    debug!("Simplified debts: {:?}", transfers);
    Ok(transfers)
}

/// Applies `transfers` to a copy of `balances` and checks that nothing is
/// left outstanding.
pub fn verify_plan(
    balances: &Balances,
    transfers: &[SimplifiedDebt],
) -> Result<(), SettlementError> {
    let mut residual = balances.clone();
    for transfer in transfers {
        residual.apply(transfer)?;
    }
    if !residual.is_settled() {
        let outstanding = residual
            .iter()
            .fold(0i64, |acc, (_, b)| acc.saturating_add((*b).max(0)));
        warn!("Settlement plan leaves {} outstanding", outstanding);
        return Err(SettlementError::UnbalancedInput(outstanding));
    }
    Ok(())
}

// `entries` must net to zero; both sides then run out together.
fn sweep(entries: Vec<(Member, i64)>) -> Vec<SimplifiedDebt> {
    let mut debtors: Vec<(Member, u64)> = Vec::new();
    let mut creditors: Vec<(Member, u64)> = Vec::new();
    for (member, balance) in entries {
        if balance < 0 {
            debtors.push((member, balance.unsigned_abs()));
        } else if balance > 0 {
            creditors.push((member, balance as u64));
        }
    }

    // largest first, ties by member id
    debtors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].1.min(creditors[j].1);
        if amount > 0 {
            // bounded by a creditor balance, so it fits back into i64
            transfers.push(SimplifiedDebt {
                from: debtors[i].0.clone(),
                to: creditors[j].0.clone(),
                amount: amount as i64,
            });
        }
        debtors[i].1 -= amount;
        creditors[j].1 -= amount;
        if debtors[i].1 == 0 {
            i += 1;
        }
        if creditors[j].1 == 0 {
            j += 1;
        }
    }
    transfers
}

fn subset_match(mut remaining: Vec<(Member, i64)>, max_group_size: usize) -> Vec<SimplifiedDebt> {
    let mut transfers = Vec::new();

    for size in 2..=max_group_size {
        while let Some(group) = find_zero_sum_group(&remaining, size) {
            let mut subset = Vec::with_capacity(size);
            for &index in group.iter().rev() {
                subset.push(remaining.remove(index));
            }
            subset.reverse();
            debug!(
                "Settling zero-sum group {:?}",
                subset.iter().map(|(m, _)| m.as_str()).collect::<Vec<_>>()
            );
            transfers.extend(sweep(subset));
        }
    }

    transfers.extend(sweep(remaining));
    transfers
}

// First zero-sum combination in lexicographic index order; indices ascend.
fn find_zero_sum_group(entries: &[(Member, i64)], size: usize) -> Option<Vec<usize>> {
    if entries.len() < size {
        return None;
    }
    (0..entries.len())
        .combinations(size)
        .find(|combo| combo.iter().map(|&i| entries[i].1 as i128).sum::<i128>() == 0)
}
