use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["translateFunctions"], serde_json::json!(["translate"]));
    assert_eq!(parsed["opaqueReachSeverity"], "info");
    assert_eq!(parsed["ignoreTestFiles"], true);

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(test.command().arg("init"))?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Created .keyreachrc.json\n");
    assert!(test.root().join(".keyreachrc.json").exists());

    let content = test.read_file(".keyreachrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".keyreachrc.json", "{}")?;

    let out = run(test.command().arg("init"))?;

    assert_eq!(out.code, Some(1));
    assert_eq!(out.stderr, "Error: .keyreachrc.json already exists\n");
    assert_eq!(test.read_file(".keyreachrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    run(test.command().arg("init"))?;
    test.write_file(
        "src/app.tsx",
        r#"const LABELS = translate({ title: "i18n.title" });
export function App() { return <h1>{LABELS.title}</h1>; }
"#,
    )?;

    let out = run(&mut test.check_command())?;
    assert_eq!(
        out.code,
        Some(0),
        "Check command should work with initialized config. stderr: {}",
        out.stderr
    );

    Ok(())
}
