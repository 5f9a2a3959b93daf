use agentbook::agent::{codec, AgentRecord};
use proptest::prelude::*;
use tempfile::TempDir;

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,24}",
        Just("智能体助手".to_string()),
        Just("Ünïcödé ✓ \"quoted\" \\ back\nslash".to_string()),
        Just(String::new()),
    ]
}

fn record_strategy() -> impl Strategy<Value = AgentRecord> {
    (
        (text(), text(), text(), text(), text()),
        (text(), -1.0e6f64..1.0e6f64, any::<i64>(), text()),
    )
        .prop_map(
            |(
                (id, name, api_key_variable_name, api_url, model),
                (system_prompt, temperature, max_tokens, welcome_message),
            )| AgentRecord {
                id,
                name,
                api_key_variable_name,
                api_url,
                model,
                system_prompt,
                temperature,
                max_tokens,
                welcome_message,
                ..AgentRecord::default()
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn save_then_load_returns_equal_list(records in prop::collection::vec(record_strategy(), 0..6)) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("agents.json");
        codec::save(&path, &records).unwrap();
        let loaded = codec::load(&path).unwrap();
        prop_assert_eq!(loaded, records);
    }
}

#[test]
fn non_ascii_text_is_written_literally() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agents.json");
    let record = AgentRecord {
        id: "1".to_string(),
        name: "知识库助手".to_string(),
        system_prompt: "用中文回答。".to_string(),
        ..AgentRecord::default()
    };
    codec::save(&path, &[record.clone()]).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("知识库助手"));
    assert!(!raw.contains("\\u"));
    assert_eq!(codec::load(&path).unwrap(), vec![record]);
}

#[test]
fn unknown_keys_survive_a_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agents.json");
    std::fs::write(
        &path,
        r#"[{"id":"1","name":"A","avatar":"robot.png","tags":["x","y"]}]"#,
    )
    .unwrap();

    let records = codec::load(&path).unwrap();
    codec::save(&path, &records).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value[0]["avatar"], "robot.png");
    assert_eq!(value[0]["tags"][1], "y");
    assert_eq!(value[0]["temperature"], 0.7);
    assert_eq!(value[0]["max_tokens"], 2048);
}
