use core_logic::{ConfigError, DelayWindow, GasConfig, GasSettings, MintConfig, MintSettings};
use std::io::Write;
use tempfile::NamedTempFile;

const VALID: &str = r#"{
    "contractAddress": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
    "providerUrl": "https://rpc.example.com",
    "privateKeyFilePath": "keys.txt",
    "contractAbiPath": "abi.json",
    "pause": { "min": 60, "max": 120 },
    "order": [3, 1, 2]
}"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_required_fields() {
    let file = write_temp(VALID);
    let config = MintConfig::load(file.path().to_str().unwrap()).unwrap();

    assert_eq!(
        config.contract_address,
        "0x5FbDB2315678afecb367f032d93F642f64180aa3"
    );
    assert_eq!(config.provider_url, "https://rpc.example.com");
    assert_eq!(config.private_key_file_path, "keys.txt");
    assert_eq!(config.contract_abi_path, "abi.json");
    assert_eq!(config.pause, DelayWindow::new(60, 120));
    assert_eq!(config.order, vec![3, 1, 2]);
}

#[test]
fn test_optional_sections_default() {
    let config = MintConfig::from_json(VALID, "inline").unwrap();

    assert_eq!(config.gas, GasSettings::default());
    assert_eq!(config.mint, MintSettings::default());
    assert_eq!(config.mint.method, "purchase");
    assert_eq!(config.mint.quantity, 1);
    assert_eq!(config.mint.repetitions(), DelayWindow::new(5, 20));
    assert_eq!(config.mint.attempt_pause(), DelayWindow::new(10, 30));

    let gas = GasConfig::from(&config.gas);
    assert_eq!(gas.ceiling_gwei, 270.0);
    assert_eq!(gas.poll_window, DelayWindow::new(5, 6));
}

#[test]
fn test_partial_gas_section_keeps_other_defaults() {
    let json = VALID.replace(
        r#""order": [3, 1, 2]"#,
        r#""order": [1], "gas": { "ceilingGwei": 80, "maxPolls": 10 }"#,
    );
    let config = MintConfig::from_json(&json, "inline").unwrap();

    assert_eq!(config.gas.ceiling_gwei, 80.0);
    assert_eq!(config.gas.max_polls, Some(10));
    assert_eq!(config.gas.max_fee_multiplier, 1.2);
    assert_eq!(config.gas.priority_max_gwei, 40.0);
}

#[test]
fn test_missing_field_is_parse_error() {
    let json = VALID.replace(r#""contractAbiPath": "abi.json","#, "");
    match MintConfig::from_json(&json, "config.json") {
        Err(ConfigError::ParseError { path, msg }) => {
            assert_eq!(path, "config.json");
            assert!(msg.contains("contractAbiPath"));
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_inverted_pause_rejected() {
    let json = VALID.replace(r#""min": 60, "max": 120"#, r#""min": 9, "max": 3"#);
    assert!(matches!(
        MintConfig::from_json(&json, "inline"),
        Err(ConfigError::InvalidValue { field, .. }) if field == "pause"
    ));
}

#[test]
fn test_fractional_pause_rejected() {
    let json = VALID.replace(r#""min": 60, "max": 120"#, r#""min": 0.5, "max": 2"#);
    assert!(matches!(
        MintConfig::from_json(&json, "config.json"),
        Err(ConfigError::ParseError { path, .. }) if path == "config.json"
    ));
}

#[test]
fn test_zero_max_polls_rejected() {
    let json = VALID.replace(
        r#""order": [3, 1, 2]"#,
        r#""order": [1], "gas": { "maxPolls": 0 }"#,
    );
    assert!(matches!(
        MintConfig::from_json(&json, "inline"),
        Err(ConfigError::InvalidValue { field, .. }) if field == "gas.maxPolls"
    ));
}

#[test]
fn test_empty_order_is_allowed() {
    let json = VALID.replace(r#""order": [3, 1, 2]"#, r#""order": []"#);
    let config = MintConfig::from_json(&json, "inline").unwrap();
    assert!(config.order.is_empty());
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        MintConfig::load("definitely/not/here/config.json"),
        Err(ConfigError::FileNotFound { .. })
    ));
}
