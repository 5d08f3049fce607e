use crate::error::SettlementError;
use crate::models::{Member, Split};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Basis points making up a whole amount.
pub const FULL_BASIS_POINTS: u64 = 10_000;

/// How a new expense's cost is shared among its participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "participants", rename_all = "snake_case")]
pub enum SplitRequest {
    Equal(Vec<Member>),
    Exact(Vec<Split>),
    /// Member and share in basis points; shares must total 10000.
    Percentage(Vec<(Member, u32)>),
    /// Member and relative weight.
    Shares(Vec<(Member, u32)>),
}

pub fn allocate(amount: i64, request: &SplitRequest) -> Result<Vec<Split>, SettlementError> {
    match request {
        SplitRequest::Equal(participants) => split_equally(amount, participants),
        SplitRequest::Exact(splits) => split_exact(amount, splits),
        SplitRequest::Percentage(entries) => split_by_percentages(amount, entries),
        SplitRequest::Shares(entries) => split_by_shares(amount, entries),
    }
}

/// Splits `amount` evenly across `participants`.
///
/// Everyone gets `amount / n`; the first participant additionally absorbs the
/// whole remainder, so the result always sums to `amount`. The caller picks
/// the order (payer first, ascending id, ...) and thereby who absorbs it.
pub fn split_equally(amount: i64, participants: &[Member]) -> Result<Vec<Split>, SettlementError> {
    check_amount(amount)?;
    check_participants(participants.iter())?;

    let n = participants.len() as i64;
    let base = amount / n;
    debug!(amount, participants = n, base, "Splitting equally");

    let bases = participants.iter().map(|m| (m.clone(), base)).collect();
    absorb_remainder(amount, bases)
}

/// Accepts caller-supplied shares as long as they cover `amount` exactly.
pub fn split_exact(amount: i64, splits: &[Split]) -> Result<Vec<Split>, SettlementError> {
    check_amount(amount)?;
    check_participants(splits.iter().map(|s| &s.member))?;

    let mut total: i64 = 0;
    for split in splits {
        if split.owed < 0 {
            warn!("Negative share {} for member {}", split.owed, split.member);
            return Err(SettlementError::InvalidShare(split.owed));
        }
        total = total
            .checked_add(split.owed)
            .ok_or(SettlementError::AmountOverflow)?;
    }
    if total != amount {
        warn!("Exact splits sum {} does not match amount {}", total, amount);
        return Err(SettlementError::SplitSumMismatch {
            expected: amount,
            actual: total,
        });
    }
    Ok(splits.to_vec())
}

/// Splits `amount` by basis points, flooring each share. The rounding
/// leftover goes to the first entry, same as [`split_equally`].
pub fn split_by_percentages(
    amount: i64,
    entries: &[(Member, u32)],
) -> Result<Vec<Split>, SettlementError> {
    check_amount(amount)?;
    check_participants(entries.iter().map(|(m, _)| m))?;

    let total_bp: u64 = entries.iter().map(|(_, bp)| u64::from(*bp)).sum();
    if total_bp != FULL_BASIS_POINTS {
        warn!("Percentages total {} basis points", total_bp);
        return Err(SettlementError::InvalidPercentages(total_bp));
    }

    let bases = entries
        .iter()
        .map(|(m, bp)| (m.clone(), proportion(amount, u64::from(*bp), FULL_BASIS_POINTS)))
        .collect();
    absorb_remainder(amount, bases)
}

/// Splits `amount` proportionally to positive integer weights.
pub fn split_by_shares(
    amount: i64,
    entries: &[(Member, u32)],
) -> Result<Vec<Split>, SettlementError> {
    check_amount(amount)?;
    check_participants(entries.iter().map(|(m, _)| m))?;

    if let Some((member, _)) = entries.iter().find(|(_, w)| *w == 0) {
        warn!("Zero weight for member {}", member);
        return Err(SettlementError::InvalidWeight(member.to_string()));
    }
    let total_weight: u64 = entries.iter().map(|(_, w)| u64::from(*w)).sum();

    let bases = entries
        .iter()
        .map(|(m, w)| (m.clone(), proportion(amount, u64::from(*w), total_weight)))
        .collect();
    absorb_remainder(amount, bases)
}

// floor(amount * part / whole); part <= whole so the result fits in i64
fn proportion(amount: i64, part: u64, whole: u64) -> i64 {
    ((amount as i128 * part as i128) / whole as i128) as i64
}

fn absorb_remainder(amount: i64, bases: Vec<(Member, i64)>) -> Result<Vec<Split>, SettlementError> {
    let allocated: i64 = bases.iter().map(|(_, owed)| owed).sum();
    let remainder = amount - allocated;

    let splits: Vec<Split> = bases
        .into_iter()
        .enumerate()
        .map(|(i, (member, owed))| Split {
            member,
            owed: if i == 0 { owed + remainder } else { owed },
        })
        .collect();

    let total: i64 = splits.iter().map(|s| s.owed).sum();
    if total != amount {
        return Err(SettlementError::SplitSumMismatch {
            expected: amount,
            actual: total,
        });
    }
    debug!(remainder, "Allocated {} splits", splits.len());
    Ok(splits)
}

fn check_amount(amount: i64) -> Result<(), SettlementError> {
    if amount < 1 {
        warn!("Rejecting allocation of non-positive amount {}", amount);
        return Err(SettlementError::InvalidAmount(amount));
    }
    Ok(())
}

fn check_participants<'a>(
    participants: impl Iterator<Item = &'a Member>,
) -> Result<(), SettlementError> {
    let mut seen = BTreeSet::new();
    for member in participants {
        if !seen.insert(member) {
            warn!("Participant {} listed twice", member);
            return Err(SettlementError::DuplicateSplitMember(member.to_string()));
        }
    }
    if seen.is_empty() {
        warn!("Allocation requested with no participants");
        return Err(SettlementError::EmptyParticipants);
    }
    Ok(())
}
