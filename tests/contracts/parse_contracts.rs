use agentbook::tooling::cli::{AgentCommands, BackupCommands, Cli, Commands};
use clap::{CommandFactory, Parser};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["agentbook", "agent", "list"],
        vec!["agentbook", "agent", "list", "--format", "json"],
        vec!["agentbook", "agent", "show", "2"],
        vec!["agentbook", "agent", "create", "--name", "Writer"],
        vec![
            "agentbook",
            "agent",
            "edit",
            "1",
            "--temperature",
            "-0.5",
            "--max-tokens",
            "512",
        ],
        vec!["agentbook", "agent", "duplicate", "1"],
        vec!["agentbook", "agent", "remove", "1", "--force"],
        vec!["agentbook", "backup", "create"],
        vec!["agentbook", "backup", "list", "--format", "json"],
        vec![
            "agentbook",
            "backup",
            "restore",
            "agents_backup_20240101_120000.json",
            "--force",
        ],
        vec!["agentbook", "backup", "prune", "--max", "10"],
        vec!["agentbook", "import", "team.json", "--mode", "append"],
        vec!["agentbook", "export", "out.json"],
        vec!["agentbook", "chat", "what is new?"],
        vec!["agentbook", "chat"],
        vec![
            "agentbook",
            "--workspace",
            "/tmp/ws",
            "--log-level",
            "debug",
            "agent",
            "list",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_or_non_numeric_positions() {
    assert!(Cli::try_parse_from(["agentbook", "agent", "show"]).is_err());
    assert!(Cli::try_parse_from(["agentbook", "agent", "show", "first"]).is_err());
    assert!(Cli::try_parse_from(["agentbook", "agent", "remove", "-1"]).is_err());
    assert!(Cli::try_parse_from(["agentbook", "backup", "show"]).is_err());
}

#[test]
fn parse_edit_keeps_numeric_fields_as_text() {
    let cli = Cli::try_parse_from(["agentbook", "agent", "edit", "3", "--temperature", "abc"])
        .unwrap();
    match cli.command {
        Commands::Agent {
            command: AgentCommands::Edit { position, fields },
        } => {
            assert_eq!(position, 3);
            assert_eq!(fields.temperature.as_deref(), Some("abc"));
            assert!(fields.name.is_none());
        }
        _ => panic!("expected agent edit"),
    }
}

#[test]
fn parse_backup_prune_defaults_to_config() {
    let cli = Cli::try_parse_from(["agentbook", "backup", "prune"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Backup {
            command: BackupCommands::Prune { max: None }
        }
    ));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
