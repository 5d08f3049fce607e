use crate::config::EngineConfig;
use crate::core::{self as engine, SplitRequest};
use crate::error::SettlementError;
use crate::models::*;
use tracing::{debug, info, warn};

/// Entry point used by the API layer.
///
/// Holds configuration only; every call works on its own arguments, so one
/// engine can be shared freely between request handlers.
#[derive(Clone, Debug, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            strategy = ?config.strategy,
            net_recorded_settlements = config.net_recorded_settlements,
            "Initializing SettlementEngine"
        );
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // EXPENSES

    /// Allocates the cost of a new expense and returns the validated record,
    /// ready to be persisted together with its splits.
    pub fn create_expense(
        &self,
        payer: &Member,
        amount: i64,
        request: &SplitRequest,
    ) -> Result<Expense, SettlementError> {
        info!("Creating expense paid by {} for amount {}", payer, amount);
        let splits = engine::allocate(amount, request)?;
        let expense = Expense::new(payer.clone(), amount, splits)?;
        debug!("Expense splits: {:?}", expense.splits());
        Ok(expense)
    }

    // BALANCES

    pub fn group_balances(
        &self,
        members: &[Member],
        expenses: &[Expense],
        settlements: &[Settlement],
    ) -> Result<Balances, SettlementError> {
        info!(
            "Calculating balances for {} members, {} expenses, {} settlements",
            members.len(),
            expenses.len(),
            settlements.len()
        );
        let balances = engine::compute_balances(members, expenses)?;
        if self.config.net_recorded_settlements {
            engine::apply_settlements(&balances, settlements)
        } else {
            if !settlements.is_empty() {
                debug!("Ignoring {} recorded settlements", settlements.len());
            }
            Ok(balances)
        }
    }

    pub fn direct_debts(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> Result<Vec<PairwiseDebt>, SettlementError> {
        info!("Calculating direct debts over {} expenses", expenses.len());
        engine::pairwise_debts(members, expenses)
    }

    // SETTLE UP

    pub fn settle_up(
        &self,
        members: &[Member],
        expenses: &[Expense],
        settlements: &[Settlement],
    ) -> Result<SettlementPlan, SettlementError> {
        let balances = self.group_balances(members, expenses, settlements)?;
        self.plan(balances)
    }

    /// Simplifies already computed balances into a checked settlement plan.
    pub fn plan(&self, balances: Balances) -> Result<SettlementPlan, SettlementError> {
        let transfers = engine::simplify_with(&balances, self.config.strategy)?;
        if let Err(e) = engine::verify_plan(&balances, &transfers) {
            warn!("Settlement plan failed verification: {}", e);
            return Err(e);
        }
        info!(
            "Settle up needs {} transfers for {} open balances",
            transfers.len(),
            balances.nonzero_count()
        );
        Ok(SettlementPlan {
            balances,
            transfers,
        })
    }

    /// What a single member pays and receives under `transfers`.
    ///
    /// `transfers` is usually the output of `settle_up` for `balances`, but
    /// any list of payments is accepted.
    pub fn member_position(
        &self,
        member: &Member,
        balances: &Balances,
        transfers: &[SimplifiedDebt],
    ) -> Result<MemberPosition, SettlementError> {
        let balance = balances.get(member).ok_or_else(|| {
            warn!("Member {} not found in group balances", member);
            SettlementError::UnknownMember(member.to_string())
        })?;

        let (pays, receives): (Vec<_>, Vec<_>) = transfers
            .iter()
            .filter(|t| &t.from == member || &t.to == member)
            .cloned()
            .partition(|t| &t.from == member);

        Ok(MemberPosition {
            member: member.clone(),
            balance,
            pays,
            receives,
        })
    }
}
