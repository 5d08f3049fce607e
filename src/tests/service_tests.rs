use super::{balances, debt, init_logging, member, members};
use crate::config::EngineConfig;
use crate::core::{SimplifyStrategy, SplitRequest};
use crate::logger::init_tracing;
use crate::models::{Member, Settlement};
use crate::{SettlementEngine, SettlementError};
use http::StatusCode;
use std::collections::HashMap;

fn create_test_engine() -> SettlementEngine {
    init_logging();
    SettlementEngine::new(EngineConfig::default())
}

#[test]
fn test_three_way_dinner_settle_up() {
    let engine = create_test_engine();
    let group = members(&["A", "B", "C"]);

    let expense = engine
        .create_expense(
            &member("A"),
            100,
            &SplitRequest::Equal(group.clone()),
        )
        .unwrap();
    let owed: Vec<i64> = expense.splits().iter().map(|s| s.owed).collect();
    assert_eq!(owed, vec![34, 33, 33]);

    let plan = engine.settle_up(&group, &[expense], &[]).unwrap();
    assert_eq!(plan.balances.get(&member("A")), Some(66));
    assert_eq!(plan.balances.get(&member("B")), Some(-33));
    assert_eq!(plan.balances.get(&member("C")), Some(-33));
    assert_eq!(plan.transfers, vec![debt("B", "A", 33), debt("C", "A", 33)]);
}

#[test]
fn test_two_person_settle_up() {
    let engine = create_test_engine();
    let group = members(&["A", "B"]);

    let expense = engine
        .create_expense(&member("A"), 150, &SplitRequest::Equal(group.clone()))
        .unwrap();
    let plan = engine.settle_up(&group, &[expense], &[]).unwrap();
    assert_eq!(plan.transfers, vec![debt("B", "A", 75)]);
}

#[test]
fn test_create_expense_surfaces_allocation_errors() {
    let engine = create_test_engine();
    let result = engine.create_expense(&member("A"), 0, &SplitRequest::Equal(members(&["A"])));
    assert!(matches!(result, Err(SettlementError::InvalidAmount(0))));

    let result = engine.create_expense(&member("A"), 10, &SplitRequest::Equal(vec![]));
    assert!(matches!(result, Err(SettlementError::EmptyParticipants)));
}

#[test]
fn test_recorded_settlements_stop_repeat_suggestions() {
    let engine = create_test_engine();
    let group = members(&["A", "B", "C"]);
    let expense = engine
        .create_expense(&member("A"), 100, &SplitRequest::Equal(group.clone()))
        .unwrap();
    let expenses = vec![expense];

    let plan = engine.settle_up(&group, &expenses, &[]).unwrap();
    let paid = Settlement::from_debt(&plan.transfers[0]).unwrap().confirm();

    let plan = engine
        .settle_up(&group, &expenses, std::slice::from_ref(&paid))
        .unwrap();
    assert_eq!(plan.transfers, vec![debt("C", "A", 33)]);
    assert_eq!(plan.balances.get(&member("B")), Some(0));

    let ignoring = SettlementEngine::new(EngineConfig {
        net_recorded_settlements: false,
        ..EngineConfig::default()
    });
    let plan = ignoring.settle_up(&group, &expenses, &[paid]).unwrap();
    assert_eq!(plan.transfers.len(), 2);
}

#[test]
fn test_member_position() {
    let engine = create_test_engine();
    let group = members(&["A", "B", "C"]);
    let expense = engine
        .create_expense(&member("A"), 100, &SplitRequest::Equal(group.clone()))
        .unwrap();
    let plan = engine.settle_up(&group, &[expense], &[]).unwrap();

    let position = |id: &str| engine.member_position(&member(id), &plan.balances, &plan.transfers);

    let creditor = position("A").unwrap();
    assert_eq!(creditor.balance, 66);
    assert!(creditor.pays.is_empty());
    assert_eq!(creditor.receives.len(), 2);

    let debtor = position("B").unwrap();
    assert_eq!(debtor.pays, vec![debt("B", "A", 33)]);
    assert!(debtor.receives.is_empty());

    assert_eq!(position("Z"), Err(SettlementError::UnknownMember("Z".to_string())));
}

#[test]
fn test_member_position_over_caller_transfers() {
    let engine = create_test_engine();
    let current = balances(&[("A", 30), ("B", -20), ("C", -10)]);
    let transfers = vec![debt("B", "A", 20), debt("C", "A", 10), debt("B", "C", 5)];

    let position = engine.member_position(&member("C"), &current, &transfers).unwrap();
    assert_eq!(position.balance, -10);
    assert_eq!(position.pays, vec![debt("C", "A", 10)]);
    assert_eq!(position.receives, vec![debt("B", "C", 5)]);

    let untouched = engine.member_position(&member("C"), &current, &[]).unwrap();
    assert!(untouched.pays.is_empty() && untouched.receives.is_empty());
}

#[test]
fn test_direct_debts_through_engine() {
    let engine = create_test_engine();
    let group = members(&["A", "B"]);
    let expense = engine
        .create_expense(&member("B"), 10, &SplitRequest::Equal(group.clone()))
        .unwrap();

    let debts = engine.direct_debts(&group, &[expense]).unwrap();
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].debtor, member("A"));
    assert_eq!(debts[0].amount, 5);
}

#[test]
fn test_plan_serializes_for_api_layer() {
    let engine = create_test_engine();
    let group = members(&["A", "B", "C"]);
    let expense = engine
        .create_expense(&member("A"), 100, &SplitRequest::Equal(group.clone()))
        .unwrap();
    let plan = engine.settle_up(&group, &[expense], &[]).unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "balances": { "A": 66, "B": -33, "C": -33 },
            "transfers": [
                { "from": "B", "to": "A", "amount": 33 },
                { "from": "C", "to": "A", "amount": 33 }
            ]
        })
    );
}

#[test]
fn test_config_defaults() {
    let config = EngineConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_config_reads_strategy() {
    let vars = HashMap::from([
        ("SETTLE_STRATEGY", "subset"),
        ("SETTLE_MAX_GROUP_SIZE", "4"),
        ("SETTLE_NET_SETTLEMENTS", "false"),
        ("SETTLE_LOG_LEVEL", "debug"),
    ]);
    let config = EngineConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

    assert_eq!(
        config.strategy,
        SimplifyStrategy::SubsetMatching { max_group_size: 4 }
    );
    assert!(!config.net_recorded_settlements);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_config_rejects_malformed_values() {
    let result = EngineConfig::from_lookup(|key| {
        (key == "SETTLE_STRATEGY").then(|| "optimal".to_string())
    });
    assert!(matches!(result, Err(SettlementError::Config(_))));

    let result = EngineConfig::from_lookup(|key| {
        (key == "SETTLE_NET_SETTLEMENTS").then(|| "maybe".to_string())
    });
    assert!(matches!(result, Err(SettlementError::Config(_))));
}

#[test]
fn test_error_status_codes() {
    assert_eq!(
        SettlementError::InvalidAmount(0).status_code(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        SettlementError::EmptyParticipants.status_code(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        SettlementError::UnbalancedInput(1).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_tracing_init_is_repeatable() {
    let config = EngineConfig::default();
    init_tracing(&config);
    assert!(!init_tracing(&config));
}

#[test]
fn test_member_identifiers() {
    assert_eq!(Member::parse("  "), Err(SettlementError::InvalidMember));
    assert_eq!(Member::parse("alice").unwrap().as_str(), "alice");
    assert_eq!(Member::from(42u64), member("42"));
}

#[test]
fn test_blank_member_ids_are_rejected_when_deserialized() {
    assert!(serde_json::from_str::<Member>(r#""""#).is_err());
    assert_eq!(
        serde_json::from_str::<Member>(r#""bob""#).unwrap(),
        member("bob")
    );

    let expense = serde_json::from_str::<crate::models::Expense>(
        r#"{"payer":" ","amount":10,"splits":[{"member":"A","owed":10}]}"#,
    );
    assert!(expense.is_err());
}
