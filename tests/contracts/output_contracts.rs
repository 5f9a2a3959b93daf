use agentbook::agent::codec;
use agentbook::backup::SnapshotKind;
use agentbook::error::ApiError;
use agentbook::tooling::cli::{
    AgentCommands, AgentFieldArgs, BackupCommands, CliContext, Commands,
};
use std::sync::Arc;
use tempfile::TempDir;

use crate::contracts::support::{agent, context, write_agents, CannedKnowledge};

const TWO_AGENTS: &str = r#"[
  {"id": "1", "name": "Researcher", "model": "gemini-2.0-flash", "temperature": 0.3},
  {"id": "2", "name": "Writer", "model": "gpt-4o", "max_tokens": 1024, "avatar": "pen.png"}
]"#;

#[test]
fn agent_list_json_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let output = cli
        .execute(&agent(AgentCommands::List {
            format: "json".to_string(),
        }))
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["total"], 2);
    let agents = parsed["agents"].as_array().expect("agents array");
    assert_eq!(agents[0]["position"], 1);
    assert_eq!(agents[0]["id"], "1");
    assert_eq!(agents[0]["name"], "Researcher");
    assert_eq!(agents[0]["selected"], true);
    assert_eq!(agents[1]["model"], "gpt-4o");
    assert_eq!(agents[1]["selected"], false);
}

#[test]
fn agent_show_json_uses_on_disk_field_names() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let output = cli
        .execute(&agent(AgentCommands::Show {
            position: 2,
            format: "json".to_string(),
        }))
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["max_tokens"], 1024);
    assert_eq!(parsed["temperature"], 0.7);
    assert_eq!(parsed["avatar"], "pen.png");
    assert!(parsed.get("apiKeyVariableName").is_some());
    assert!(parsed.get("welcomeMessage").is_some());
}

#[test]
fn agent_show_out_of_range_reports_position() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let err = cli
        .execute(&agent(AgentCommands::Show {
            position: 5,
            format: "text".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(err, ApiError::IndexOutOfRange { index: 4, len: 2 }));
}

#[test]
fn agent_create_saves_and_backs_up_previous_file() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let output = cli
        .execute(&agent(AgentCommands::Create {
            fields: AgentFieldArgs {
                name: Some("Reviewer".to_string()),
                ..AgentFieldArgs::default()
            },
        }))
        .unwrap();
    assert!(output.contains("Reviewer"));

    let saved = codec::load(&temp.path().join("agents.json")).unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[2].id, "3");
    assert_eq!(saved[2].name, "Reviewer");
    assert_eq!(saved[2].api_key_variable_name, "YOUR_API_KEY_HERE");

    let snapshots = cli.backups().list().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].kind(), Some(SnapshotKind::Auto));
    assert_eq!(
        std::fs::read_to_string(cli.backups().path_for(&snapshots[0])).unwrap(),
        TWO_AGENTS
    );
}

#[test]
fn agent_edit_with_invalid_number_changes_nothing() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let err = cli
        .execute(&agent(AgentCommands::Edit {
            position: 1,
            fields: AgentFieldArgs {
                max_tokens: Some("12.5".to_string()),
                ..AgentFieldArgs::default()
            },
        }))
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError { .. }));

    assert_eq!(
        std::fs::read_to_string(temp.path().join("agents.json")).unwrap(),
        TWO_AGENTS
    );
    assert!(cli.backups().list().unwrap().is_empty());
    assert_eq!(cli.store().records()[0].max_tokens, 2048);
}

#[test]
fn agent_edit_keeps_unknown_keys() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    cli.execute(&agent(AgentCommands::Edit {
        position: 2,
        fields: AgentFieldArgs {
            temperature: Some("0.9".to_string()),
            ..AgentFieldArgs::default()
        },
    }))
    .unwrap();

    let saved = codec::load(&temp.path().join("agents.json")).unwrap();
    assert_eq!(saved[1].temperature, 0.9);
    assert_eq!(saved[1].extra["avatar"], "pen.png");
    assert_eq!(cli.store().selected(), Some(1));
}

#[test]
fn agent_remove_with_force_deletes_and_saves() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    cli.execute(&agent(AgentCommands::Remove {
        position: 1,
        force: true,
    }))
    .unwrap();

    let saved = codec::load(&temp.path().join("agents.json")).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Writer");
    assert_eq!(cli.store().selected(), Some(0));
}

#[test]
fn backup_create_then_list_json() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let created = cli
        .execute(&Commands::Backup {
            command: BackupCommands::Create,
        })
        .unwrap();
    assert!(created.starts_with("Backup created: agents_backup_"));

    let output = cli
        .execute(&Commands::Backup {
            command: BackupCommands::List {
                format: "json".to_string(),
            },
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["total"], 1);
    let entry = &parsed["snapshots"][0];
    assert_eq!(entry["kind"], "manual");
    assert!(entry["id"].as_str().unwrap().ends_with(".json"));
    assert!(entry["taken_at"].as_str().is_some());
}

#[test]
fn backup_create_on_empty_list_is_refused() {
    let temp = TempDir::new().unwrap();
    let cli = context(temp.path());
    let err = cli
        .execute(&Commands::Backup {
            command: BackupCommands::Create,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NothingToBackUp));
}

#[test]
fn backup_restore_replaces_agents_and_keeps_an_auto_backup() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    std::fs::create_dir_all(temp.path().join("backups")).unwrap();
    std::fs::write(
        temp.path().join("backups/agents_backup_20240101_120000.json"),
        r#"[{"id":"old","name":"Archived"}]"#,
    )
    .unwrap();
    let cli = context(temp.path());

    cli.execute(&Commands::Backup {
        command: BackupCommands::Restore {
            id: "agents_backup_20240101_120000.json".to_string(),
            force: true,
        },
    })
    .unwrap();

    let saved = codec::load(&temp.path().join("agents.json")).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, "old");

    let kinds: Vec<_> = cli
        .backups()
        .list()
        .unwrap()
        .iter()
        .map(|id| id.kind())
        .collect();
    assert_eq!(kinds, [Some(SnapshotKind::Auto), Some(SnapshotKind::Manual)]);
}

#[test]
fn backup_show_rejects_path_like_ids() {
    let temp = TempDir::new().unwrap();
    let cli = context(temp.path());
    let err = cli
        .execute(&Commands::Backup {
            command: BackupCommands::Show {
                id: "../agents.json".to_string(),
            },
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidSnapshotId(_)));
}

#[test]
fn startup_prunes_to_max_backups() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("backups");
    std::fs::create_dir_all(&dir).unwrap();
    for day in 1..=31 {
        std::fs::write(
            dir.join(format!("agents_backup_202401{:02}_090000.json", day)),
            "[]",
        )
        .unwrap();
    }
    for day in 1..=4 {
        std::fs::write(
            dir.join(format!("agents_auto_backup_202402{:02}_090000.json", day)),
            "[]",
        )
        .unwrap();
    }

    let cli = context(temp.path());
    let remaining = cli.backups().list().unwrap();
    assert_eq!(remaining.len(), 30);
    assert!(!dir.join("agents_backup_20240105_090000.json").exists());
    assert!(dir.join("agents_backup_20240106_090000.json").exists());
}

#[test]
fn unreadable_primary_file_starts_empty_and_is_backed_up_on_save() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), "this is not json");
    let cli = context(temp.path());
    assert!(cli.store().is_empty());

    cli.execute(&agent(AgentCommands::Create {
        fields: AgentFieldArgs::default(),
    }))
    .unwrap();

    let snapshots = cli.backups().list().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(
        std::fs::read_to_string(cli.backups().path_for(&snapshots[0])).unwrap(),
        "this is not json"
    );
    assert_eq!(codec::load(cli.agents_path()).unwrap()[0].name, "New Agent 1");
}

#[test]
fn import_append_then_export() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    std::fs::write(
        temp.path().join("incoming.json"),
        r#"[{"id":"9","name":"X"}]"#,
    )
    .unwrap();
    let cli = context(temp.path());

    cli.execute(&Commands::Import {
        path: "incoming.json".into(),
        mode: Some("append".to_string()),
    })
    .unwrap();
    assert_eq!(cli.store().len(), 3);

    let output = cli
        .execute(&Commands::Export {
            path: "out/all.json".into(),
        })
        .unwrap();
    assert!(output.starts_with("Exported 3 agent(s)"));
    let exported = codec::load(&temp.path().join("out/all.json")).unwrap();
    assert_eq!(exported, cli.store().records());
}

#[test]
fn import_with_unknown_mode_changes_nothing() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    std::fs::write(temp.path().join("incoming.json"), "[]").unwrap();
    let cli = context(temp.path());

    let err = cli
        .execute(&Commands::Import {
            path: "incoming.json".into(),
            mode: Some("merge".to_string()),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
    assert_eq!(cli.store().len(), 2);
}

#[test]
fn chat_prints_transcript_from_knowledge_service() {
    let temp = TempDir::new().unwrap();
    let service = CannedKnowledge::new("Forty-two.");
    let cli = context(temp.path()).with_knowledge_service(service.clone());

    let output = cli
        .execute(&Commands::Chat {
            message: Some("  What is the answer?  ".to_string()),
        })
        .unwrap();

    assert_eq!(output, "You: What is the answer?\n\nAI: Forty-two.");
    assert_eq!(
        service.queries.lock().as_slice(),
        ["What is the answer?".to_string()]
    );
}

#[test]
fn chat_with_blank_message_does_not_call_service() {
    let temp = TempDir::new().unwrap();
    let service = CannedKnowledge::new("unused");
    let cli = context(temp.path()).with_knowledge_service(Arc::clone(&service) as _);

    let output = cli
        .execute(&Commands::Chat {
            message: Some("   ".to_string()),
        })
        .unwrap();
    assert_eq!(output, "Nothing to send.");
    assert!(service.queries.lock().is_empty());
}

#[test]
fn mistyped_fields_do_not_empty_the_list_at_startup() {
    let temp = TempDir::new().unwrap();
    write_agents(
        temp.path(),
        r#"[{"id": 1, "name": "A", "max_tokens": 4096.0}, {"id": "2", "name": "B", "temperature": null}]"#,
    );
    let cli = context(temp.path());

    let store = cli.store();
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[0].id, "1");
    assert_eq!(store.records()[0].max_tokens, 4096);
    assert_eq!(store.records()[1].temperature, 0.7);

    cli.execute(&agent(AgentCommands::Create {
        fields: AgentFieldArgs::default(),
    }))
    .unwrap();
    let saved = codec::load(cli.agents_path()).unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[0].name, "A");
}

#[test]
fn agent_duplicate_reports_the_save() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let output = cli
        .execute(&agent(AgentCommands::Duplicate { position: 2 }))
        .unwrap();

    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("Agent duplicated: 3. Writer (copy) (id 2_copy)"));
    let save_line = lines.next().expect("save summary line");
    assert!(save_line.starts_with("Saved 3 agent(s) to "));
    assert!(save_line.contains("previous version in agents_auto_backup_"));
    assert_eq!(codec::load(cli.agents_path()).unwrap().len(), 3);
}

#[test]
fn position_zero_is_rejected_without_touching_the_file() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let cli = context(temp.path());

    let err = cli
        .execute(&agent(AgentCommands::Remove {
            position: 0,
            force: true,
        }))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidPosition(0)));
    assert_eq!(
        std::fs::read_to_string(temp.path().join("agents.json")).unwrap(),
        TWO_AGENTS
    );
}

#[test]
fn context_new_reads_storage_from_config_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("custom.toml");
    std::fs::write(
        &config_path,
        "[storage]\nagents_file = \"team.json\"\nbackup_dir = \"snapshots\"\n",
    )
    .unwrap();
    std::fs::write(temp.path().join("team.json"), TWO_AGENTS).unwrap();

    let cli = CliContext::new(temp.path().to_path_buf(), Some(config_path)).unwrap();
    assert_eq!(cli.agents_path(), temp.path().join("team.json"));
    assert_eq!(cli.backups().dir(), temp.path().join("snapshots"));
    assert_eq!(cli.store().len(), 2);
}

#[test]
fn backup_dir_holding_the_agent_file_is_refused_at_startup() {
    let temp = TempDir::new().unwrap();
    write_agents(temp.path(), TWO_AGENTS);
    let config_path = temp.path().join("custom.toml");
    std::fs::write(&config_path, "[storage]\nbackup_dir = \".\"\n").unwrap();

    let result = CliContext::new(temp.path().to_path_buf(), Some(config_path));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
    assert_eq!(
        std::fs::read_to_string(temp.path().join("agents.json")).unwrap(),
        TWO_AGENTS
    );
}
