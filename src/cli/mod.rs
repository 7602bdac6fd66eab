//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the statusio binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::{Result, StatusioError};
use crate::request::{ParamValue, Params};

/// Status.io API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "statusio", about = "Status.io API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Status page ID.
    #[arg(long, global = true, env = "STATUSIO_STATUSPAGE_ID")]
    pub page: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the status summary of a page.
    Summary,

    /// List entities of a page.
    List {
        /// The type of entity to list.
        entity: Entity,
    },

    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: String,
    },

    /// Print the operation table.
    Operations,

    /// Invoke any operation by name.
    Call {
        /// Operation name, e.g. `incident_create`.
        operation: String,

        /// Positional identifiers appended to the path.
        segments: Vec<String>,

        /// Text parameter as `key=value`.
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Numeric parameter as `key=value`.
        #[arg(long = "number", value_parser = parse_key_value)]
        numbers: Vec<(String, String)>,

        /// List element as `key=value`; repeat to add more elements.
        #[arg(long = "list", value_parser = parse_key_value)]
        lists: Vec<(String, String)>,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A component and its containers.
    #[value(alias = "components")]
    Component,
    /// An incident.
    #[value(alias = "incidents")]
    Incident,
    /// A maintenance window.
    #[value(alias = "maintenances")]
    Maintenance,
    /// A notification subscriber.
    #[value(alias = "subscribers")]
    Subscriber,
}

/// Parse a `key=value` argument.
///
/// # Errors
///
/// Returns an error if there is no `=` or the key is empty.
pub fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// Assemble the parameter mapping of a `call` command.
///
/// # Errors
///
/// Returns [`StatusioError::InvalidParameter`] if a `--number` value is not a
/// number.
pub fn call_params(
    params: &[(String, String)],
    numbers: &[(String, String)],
    lists: &[(String, String)],
) -> Result<Params> {
    let mut mapping = Params::new();

    for (key, value) in params {
        mapping.insert(key.as_str(), value.as_str());
    }

    for (key, value) in numbers {
        let number: serde_json::Number =
            value.parse().map_err(|_| StatusioError::InvalidParameter {
                name: key.clone(),
                reason: format!("'{value}' is not a number"),
            })?;
        mapping.insert(key.as_str(), ParamValue::Number(number));
    }

    let mut grouped: Vec<(&str, Vec<String>)> = Vec::new();
    for (key, value) in lists {
        match grouped.iter_mut().find(|(k, _)| k == key) {
            Some((_, items)) => items.push(value.clone()),
            None => grouped.push((key.as_str(), vec![value.clone()])),
        }
    }
    for (key, items) in grouped {
        mapping.insert(key, items);
    }

    Ok(mapping)
}
