use ferrocast_core::Strategy;
use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct StrategyRow {
    strategy: Strategy,
    column: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct StrategiesResponseData {
    strategies: Vec<StrategyRow>,
}

pub fn run() -> Result<CommandResult, CliError> {
    let strategies = Strategy::ALL
        .iter()
        .map(|&strategy| StrategyRow {
            strategy,
            column: strategy.column(),
            description: strategy.description(),
        })
        .collect();

    let data = serde_json::to_value(StrategiesResponseData { strategies })?;
    Ok(CommandResult::ok(data))
}
