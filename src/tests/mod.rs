mod service_tests;

use crate::config::EngineConfig;
use crate::logger::init_tracing;
use crate::models::{Balances, Member, SimplifiedDebt};

pub fn init_logging() {
    let config = EngineConfig {
        log_level: "debug".to_string(),
        ..EngineConfig::default()
    };
    init_tracing(&config);
}

pub fn member(id: &str) -> Member {
    Member::parse(id).unwrap()
}

pub fn members(ids: &[&str]) -> Vec<Member> {
    ids.iter().map(|id| member(id)).collect()
}

pub fn balances(entries: &[(&str, i64)]) -> Balances {
    entries
        .iter()
        .map(|(id, amount)| (member(id), *amount))
        .collect()
}

pub fn debt(from: &str, to: &str, amount: i64) -> SimplifiedDebt {
    SimplifiedDebt::new(member(from), member(to), amount).unwrap()
}
