use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

const PETS: &str = r#"const LABELS = translate({
  bird: "i18n.bird",
  cat: "i18n.cat",
  dog: "i18n.dog",
});

export const Pets = () => (
  <ul>
    <li>{LABELS.bird}</li>
    <li>{LABELS.cat}</li>
  </ul>
);
"#;

const FORWARDED: &str = r#"const LABELS = translate({
  a: { title: "i18n.a.title" },
});

export const Page = () => <Card labels={LABELS.a} />;
"#;

#[test]
fn test_unused_key() -> Result<()> {
    let test = CliTest::with_file("src/pets.tsx", PETS)?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert_eq!(out.stderr, "");
    assert_snapshot!(out.stdout, @r#"
    error: "LABELS.dog is declared but never used"  unused-key
      --> ./src/pets.tsx:4:3
      |
    4 |   dog: "i18n.dog",
      |   ^
      = note: translation id i18n.dog
      = hint: remove the key from the translate() declaration

    ✘ 1 problem (1 error, 0 warnings)
    "#);

    Ok(())
}

#[test]
fn test_clean_project() -> Result<()> {
    let test = CliTest::with_file(
        "src/pets.tsx",
        r#"const LABELS = translate({ bird: "i18n.bird" });
export const Bird = () => <p>{LABELS.bird}</p>;
"#,
    )?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Checked 1 source file - no issues found\n");

    Ok(())
}

#[test]
fn test_computed_access_and_ternary() -> Result<()> {
    let test = CliTest::with_file(
        "src/sizes.tsx",
        r#"const LABELS = translate({
  a: { b: { c: { [SIZE.small]: "i18n.small", [SIZE.big]: "i18n.big" } } },
  on: "i18n.on",
  off: "i18n.off",
});

export const Size = ({ type, active }) => (
  <p>
    {LABELS.a.b.c[type]}
    {active ? LABELS.on : LABELS.off}
  </p>
);
"#,
    )?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Checked 1 source file - no issues found\n");

    Ok(())
}

#[test]
fn test_lazy_key_must_be_called() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/called.tsx",
        r#"const LABELS = translate({ getDesc: ["i18n.desc", "lazy"] });
export const Desc = () => <p>{LABELS.getDesc()}</p>;
"#,
    )?;
    test.write_file(
        "src/uncalled.tsx",
        r#"const LABELS = translate({ getDesc: ["i18n.desc", "lazy"] });
export const Desc = () => <p>{LABELS.getDesc}</p>;
"#,
    )?;

    let out = run(test.check_command().args(["--format", "json"]))?;

    assert_eq!(out.code, Some(1));
    let findings: Value = serde_json::from_str(&out.stdout)?;
    assert_eq!(
        findings,
        serde_json::json!([{
            "kind": "unused-key",
            "severity": "error",
            "keyPath": "LABELS.getDesc",
            "translationId": "i18n.desc",
            "file": "./src/uncalled.tsx",
            "line": 1,
            "column": 28,
            "message": "LABELS.getDesc is declared but never used",
            "hint": "remove the key from the translate() declaration"
        }])
    );

    Ok(())
}

#[test]
fn test_json_format_is_empty_array_when_clean() -> Result<()> {
    let test = CliTest::with_file(
        "src/pets.tsx",
        r#"const LABELS = translate({ bird: "i18n.bird" });
export const Bird = () => <p>{LABELS.bird}</p>;
"#,
    )?;

    let out = run(test.check_command().args(["--format", "json"]))?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "[]\n");

    Ok(())
}

#[test]
fn test_accessed_but_undeclared() -> Result<()> {
    let test = CliTest::with_file(
        "src/pets.tsx",
        r#"const LABELS = translate({ bird: "i18n.bird" });
export const Pets = () => <p>{LABELS.bird}{LABELS.fish}</p>;
"#,
    )?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert_snapshot!(out.stdout, @r#"
    error: "LABELS.fish is accessed but not declared"  accessed-but-undeclared
      --> ./src/pets.tsx:2:44
      |
    2 | export const Pets = () => <p>{LABELS.bird}{LABELS.fish}</p>;
      |                                            ^

    ✘ 1 problem (1 error, 0 warnings)
    "#);

    Ok(())
}

#[test]
fn test_forwarded_object_is_info_by_default() -> Result<()> {
    let test = CliTest::with_file("src/page.tsx", FORWARDED)?;

    let out = run(&mut test.check_command())?;

    // Info findings do not fail the check.
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.starts_with(
        "info: \"LABELS.a.title is only reached through a forwarded parent object\"  reached-only-opaquely\n"
    ));
    assert!(out.stdout.ends_with("✘ 1 problem (0 errors, 0 warnings, 1 info)\n"));

    Ok(())
}

#[test]
fn test_opaque_severity_flag() -> Result<()> {
    let test = CliTest::with_file("src/page.tsx", FORWARDED)?;

    let out = run(test.check_command().args(["--opaque-severity", "error"]))?;
    assert_eq!(out.code, Some(1));
    assert!(out.stdout.starts_with("error: "));

    let out = run(test.check_command().args(["--opaque-severity", "off"]))?;
    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Checked 1 source file - no issues found\n");

    Ok(())
}

#[test]
fn test_parse_failure_is_a_warning() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/broken.tsx", "const = translate({")?;
    test.write_file(
        "src/pets.tsx",
        r#"const LABELS = translate({ bird: "i18n.bird" });
export const Bird = () => <p>{LABELS.bird}</p>;
"#,
    )?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stderr,
        "warning: 1 file(s) could not be parsed (use -v for details)\n"
    );

    let out = run(test.check_command().arg("-v"))?;
    assert!(out.stderr.contains("warning: ./src/broken.tsx - "));

    Ok(())
}

#[test]
fn test_config_ignores() -> Result<()> {
    let test = CliTest::new()?;

    test.write_file(
        ".keyreachrc.json",
        r#"{
         "ignores": ["**/generated/**"],
         "includes": []
     }"#,
    )?;
    test.write_file("generated/labels.tsx", PETS)?;
    test.write_file(
        "src/pets.tsx",
        r#"const LABELS = translate({ bird: "i18n.bird" });
export const Bird = () => <p>{LABELS.bird}</p>;
"#,
    )?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Checked 1 source file - no issues found\n");

    Ok(())
}

#[test]
fn test_config_translate_functions() -> Result<()> {
    let test = CliTest::new()?;

    test.write_file(
        ".keyreachrc.json",
        r#"{ "translateFunctions": ["defineLabels"] }"#,
    )?;
    test.write_file(
        "src/pets.tsx",
        r#"import { defineLabels as dl } from "./i18n";

const LABELS = dl({ bird: "i18n.bird", cat: "i18n.cat" });
const OTHER = translate({ dog: "i18n.dog" });

export const Bird = () => <p>{LABELS.bird}</p>;
"#,
    )?;

    let out = run(test.check_command().args(["--format", "json"]))?;

    assert_eq!(out.code, Some(1));
    let findings: Value = serde_json::from_str(&out.stdout)?;
    let paths: Vec<&str> = findings
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|f| f["keyPath"].as_str())
        .collect();
    assert_eq!(paths, vec!["LABELS.cat"]);

    Ok(())
}

#[test]
fn test_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".keyreachrc.json", r#"{ "translateFunctions": [] }"#)?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert_eq!(
        out.stderr,
        "Error: 'translateFunctions' must name at least one function\n"
    );

    Ok(())
}

#[test]
fn test_source_root() -> Result<()> {
    let test = CliTest::with_file("web/src/pets.tsx", PETS)?;

    let out = run(test.check_command().args(["--source-root", "web"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("  --> web/src/pets.tsx:4:3\n"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(test.command().arg("--help"))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("check"));
    assert!(out.stdout.contains("init"));

    Ok(())
}
