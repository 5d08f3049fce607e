use crate::error::SettlementError;
use crate::models::{Balances, Expense, Member, PairwiseDebt, Settlement};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Folds a group's expenses into one net balance per member.
///
/// The payer is credited the full amount and each split member is debited
/// what they owe. Every member of `members` appears in the result, including
/// those untouched by any expense. Expenses are re-validated and any payer or
/// split member outside the group is rejected rather than skipped.
pub fn compute_balances(
    members: &[Member],
    expenses: &[Expense],
) -> Result<Balances, SettlementError> {
    debug!(
        "Computing balances for {} members over {} expenses",
        members.len(),
        expenses.len()
    );
    let mut ledger = Ledger::open(members.iter().map(|m| (m, 0)));

    for expense in expenses {
        if let Err(e) = expense.validate() {
            warn!("Invalid expense paid by {}: {}", expense.payer(), e);
            return Err(e);
        }
        ledger.post(expense.payer(), expense.amount())?;
        for split in expense.splits() {
            ledger.post(&split.member, -split.owed)?;
        }
    }

    let balances = ledger.close()?;
    // holds for any validated expense set; trips on a torn snapshot
    balances.ensure_conserved()?;
    debug!("Balances calculated: {:?}", balances);
    Ok(balances)
}

/// Nets confirmed real-world payments against expense-derived balances.
///
/// A payment from `from` to `to` reduces what `from` owes and what `to` is
/// owed. Unconfirmed settlements are ignored.
pub fn apply_settlements(
    balances: &Balances,
    settlements: &[Settlement],
) -> Result<Balances, SettlementError> {
    let mut ledger = Ledger::open(balances.iter().map(|(m, b)| (m, *b)));
    let mut applied = 0usize;

    for settlement in settlements.iter().filter(|s| s.is_confirmed) {
        settlement.validate()?;
        ledger.post(&settlement.from, settlement.amount)?;
        ledger.post(&settlement.to, -settlement.amount)?;
        applied += 1;
    }

    let netted = ledger.close()?;
    netted.ensure_conserved()?;
    debug!(
        "Applied {} of {} recorded settlements",
        applied,
        settlements.len()
    );
    Ok(netted)
}

/// Who owes whom directly, before any simplification.
///
/// Each split member owes the payer their share; obligations running both
/// ways between a pair are netted into one entry. Sorted by debtor, then
/// creditor.
pub fn pairwise_debts(
    members: &[Member],
    expenses: &[Expense],
) -> Result<Vec<PairwiseDebt>, SettlementError> {
    let known: BTreeSet<&Member> = members.iter().collect();
    // keyed by (lower, higher) member; positive means lower owes higher
    let mut net_by_pair: BTreeMap<(Member, Member), i128> = BTreeMap::new();

    for expense in expenses {
        expense.validate()?;
        let payer = expense.payer();
        if !known.contains(payer) {
            return Err(SettlementError::UnknownMember(payer.to_string()));
        }
        for split in expense.splits() {
            if !known.contains(&split.member) {
                return Err(SettlementError::UnknownMember(split.member.to_string()));
            }
            if &split.member == payer || split.owed == 0 {
                continue;
            }
            let (key, delta) = if split.member < *payer {
                ((split.member.clone(), payer.clone()), split.owed)
            } else {
                ((payer.clone(), split.member.clone()), -split.owed)
            };
            *net_by_pair.entry(key).or_insert(0) += i128::from(delta);
        }
    }

    let mut debts = net_by_pair
        .into_iter()
        .filter(|(_, net)| *net != 0)
        .map(|((low, high), net)| {
            let amount = i64::try_from(net.abs()).map_err(|_| SettlementError::AmountOverflow)?;
            Ok(if net > 0 {
                PairwiseDebt {
                    debtor: low,
                    creditor: high,
                    amount,
                }
            } else {
                PairwiseDebt {
                    debtor: high,
                    creditor: low,
                    amount,
                }
            })
        })
        .collect::<Result<Vec<_>, SettlementError>>()?;
    debts.sort_by(|a, b| (&a.debtor, &a.creditor).cmp(&(&b.debtor, &b.creditor)));
    Ok(debts)
}

// Running totals are kept in i128 so the result does not depend on posting
// order; only the closing balances have to fit in i64.
struct Ledger(BTreeMap<Member, i128>);

impl Ledger {
    fn open<'a>(opening: impl Iterator<Item = (&'a Member, i64)>) -> Self {
        Ledger(opening.map(|(m, b)| (m.clone(), i128::from(b))).collect())
    }

    fn post(&mut self, member: &Member, delta: i64) -> Result<(), SettlementError> {
        let balance = self
            .0
            .get_mut(member)
            .ok_or_else(|| SettlementError::UnknownMember(member.to_string()))?;
        *balance = balance
            .checked_add(i128::from(delta))
            .ok_or(SettlementError::AmountOverflow)?;
        Ok(())
    }

    fn close(self) -> Result<Balances, SettlementError> {
        self.0
            .into_iter()
            .map(|(member, balance)| {
                i64::try_from(balance)
                    .map(|b| (member, b))
                    .map_err(|_| SettlementError::AmountOverflow)
            })
            .collect()
    }
}
