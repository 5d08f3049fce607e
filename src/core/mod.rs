pub mod aggregator;
pub mod allocator;
pub mod simplifier;

pub use aggregator::{apply_settlements, compute_balances, pairwise_debts};
pub use allocator::{
    SplitRequest, allocate, split_by_percentages, split_by_shares, split_equally, split_exact,
};
pub use simplifier::{SimplifyStrategy, simplify_debts, simplify_with, verify_plan};
