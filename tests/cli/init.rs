use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, JPA_STORE, person_project};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["includes"], serde_json::json!(["src/main/java"]));
    assert_eq!(
        parsed["resourceRoots"],
        serde_json::json!(["src/main/resources"])
    );
    assert_eq!(parsed["outputRoot"], "target/classes");
    assert_eq!(parsed["resourceSuffix"], ".sql");
    assert_eq!(parsed["flavors"], serde_json::json!(["jpa", "jdbc"]));
    assert!(parsed.get("manifest").is_none());

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"));

    let content = test.read_file(".namedsqlrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".namedsqlrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"));

    assert_eq!(test.read_file(".namedsqlrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = person_project()?;
    test.command().arg("init").status()?;

    assert_cmd_snapshot!(test.process_command());

    assert!(test.exists(JPA_STORE));

    Ok(())
}
