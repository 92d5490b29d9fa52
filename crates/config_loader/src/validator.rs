//! Config validation
//!
//! Rules:
//! - sink name, when given, is not empty
//! - file sink has a path, other sinks have none
//! - submission_capacity >= 1

use contracts::{ContractError, LoggerConfig, SinkType};

/// Validate a LoggerConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &LoggerConfig) -> Result<(), ContractError> {
    validate_sink(config)?;
    validate_dispatch(config)?;
    Ok(())
}

fn validate_sink(config: &LoggerConfig) -> Result<(), ContractError> {
    let sink = &config.sink;

    if let Some(name) = &sink.name {
        if name.trim().is_empty() {
            return Err(ContractError::config_validation(
                "sink.name",
                "sink name cannot be empty",
            ));
        }
    }

    match (sink.sink_type, &sink.path) {
        (SinkType::File, None) => Err(ContractError::config_validation(
            "sink.path",
            "file sink requires a path",
        )),
        (SinkType::File, Some(path)) if path.as_os_str().is_empty() => Err(
            ContractError::config_validation("sink.path", "file sink path cannot be empty"),
        ),
        (other, Some(_)) if other != SinkType::File => Err(ContractError::config_validation(
            "sink.path",
            format!("path is only valid for file sinks, got sink_type '{other}'"),
        )),
        _ => Ok(()),
    }
}

fn validate_dispatch(config: &LoggerConfig) -> Result<(), ContractError> {
    if config.dispatch.submission_capacity == 0 {
        return Err(ContractError::config_validation(
            "dispatch.submission_capacity",
            "submission_capacity must be >= 1",
        ));
    }
    Ok(())
}
