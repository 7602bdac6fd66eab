//! CLI argument parsing tests.

use clap::Parser;
use statusio::cli::{call_params, parse_key_value, Cli, Command, Entity};
use statusio::ParamValue;

#[test]
fn test_cli_parses_summary_subcommand() {
    let cli = Cli::parse_from(["statusio", "--page", "p1", "summary"]);

    assert!(!cli.json);
    assert_eq!(cli.page.as_deref(), Some("p1"));
    assert!(matches!(cli.command, Command::Summary));
}

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["statusio", "get", "incident", "i1", "--page", "p1"]);

    match cli.command {
        Command::Get { entity, id } => {
            assert_eq!(entity, Entity::Incident);
            assert_eq!(id, "i1");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["statusio", "list", "maintenances"]);

    match cli.command {
        Command::List { entity } => assert_eq!(entity, Entity::Maintenance),
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_global_json_flag() {
    // --json before subcommand
    let cli = Cli::parse_from(["statusio", "--json", "list", "components"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["statusio", "list", "components", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_entity_aliases() {
    for (raw, expected) in [
        ("component", Entity::Component),
        ("components", Entity::Component),
        ("incidents", Entity::Incident),
        ("subscribers", Entity::Subscriber),
    ] {
        let cli = Cli::parse_from(["statusio", "list", raw]);
        match cli.command {
            Command::List { entity } => assert_eq!(entity, expected),
            _ => panic!("Expected List command"),
        }
    }
}

#[test]
fn test_invalid_entity_rejected() {
    let result = Cli::try_parse_from(["statusio", "list", "projects"]);
    assert!(result.is_err());
}

#[test]
fn test_operations_subcommand() {
    let cli = Cli::parse_from(["statusio", "operations"]);
    assert!(matches!(cli.command, Command::Operations));
}

#[test]
fn test_call_subcommand() {
    let cli = Cli::parse_from([
        "statusio",
        "call",
        "incident_create",
        "--param",
        "statuspage_id=p1",
        "--param",
        "incident_name=API outage",
        "--number",
        "current_status=500",
        "--list",
        "infrastructure_affected=c1-k1",
        "--list",
        "infrastructure_affected=c1-k2",
    ]);

    match cli.command {
        Command::Call {
            operation,
            segments,
            params,
            numbers,
            lists,
        } => {
            assert_eq!(operation, "incident_create");
            assert!(segments.is_empty());

            let mapping = call_params(&params, &numbers, &lists).unwrap();
            assert_eq!(mapping.get("incident_name"), Some(&ParamValue::from("API outage")));
            assert_eq!(mapping.get("current_status"), Some(&ParamValue::from(500u16)));
            assert_eq!(
                mapping.get("infrastructure_affected"),
                Some(&ParamValue::from(vec!["c1-k1", "c1-k2"]))
            );
        }
        _ => panic!("Expected Call command"),
    }
}

#[test]
fn test_call_segments() {
    let cli = Cli::parse_from(["statusio", "call", "incident_single", "p1", "i1"]);

    match cli.command {
        Command::Call { segments, .. } => assert_eq!(segments, vec!["p1", "i1"]),
        _ => panic!("Expected Call command"),
    }
}

#[test]
fn test_key_value_parsing() {
    assert_eq!(
        parse_key_value("details=a=b").unwrap(),
        ("details".to_string(), "a=b".to_string())
    );
    assert_eq!(parse_key_value("empty=").unwrap().1, "");
    assert!(parse_key_value("novalue").is_err());
    assert!(parse_key_value("=x").is_err());

    let bad_number = call_params(&[], &[("current_status".to_string(), "high".to_string())], &[]);
    assert!(bad_number.is_err());
}
