pub mod balance;
pub mod expense;
pub mod member;
pub mod settlement;

pub use balance::Balances;
pub use expense::{Expense, Split};
pub use member::Member;
pub use settlement::{MemberPosition, PairwiseDebt, Settlement, SettlementPlan, SimplifiedDebt};
