use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SettlementError {
    /// Amount must be a positive number of minor units
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// An allocation needs at least one participant
    #[error("Participant list is empty")]
    EmptyParticipants,

    /// Splits of an expense do not add up to its amount
    #[error("Splits sum to {actual} but expense amount is {expected}")]
    SplitSumMismatch { expected: i64, actual: i64 },

    /// Balances do not net to zero
    #[error("Balances are unbalanced by {0}")]
    UnbalancedInput(i64),

    /// Member is not part of the group
    #[error("Member {0} is not a group member")]
    UnknownMember(String),

    /// Same member appears twice in one expense
    #[error("Member {0} appears more than once in the splits")]
    DuplicateSplitMember(String),

    #[error("Member identifier is empty")]
    InvalidMember,

    #[error("Invalid share: {0}")]
    InvalidShare(i64),

    /// Percentages are expressed in basis points and must total 10000
    #[error("Percentages total {0} basis points, expected 10000")]
    InvalidPercentages(u64),

    #[error("Invalid weight for member {0}")]
    InvalidWeight(String),

    #[error("Member {0} cannot settle with themselves")]
    SelfSettlement(String),

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SettlementError {
    /// Status the API layer should answer with when surfacing this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SettlementError::InvalidAmount(_)
            | SettlementError::EmptyParticipants
            | SettlementError::SplitSumMismatch { .. }
            | SettlementError::UnknownMember(_)
            | SettlementError::DuplicateSplitMember(_)
            | SettlementError::InvalidMember
            | SettlementError::InvalidShare(_)
            | SettlementError::InvalidPercentages(_)
            | SettlementError::InvalidWeight(_)
            | SettlementError::SelfSettlement(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SettlementError::UnbalancedInput(_)
            | SettlementError::AmountOverflow
            | SettlementError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
