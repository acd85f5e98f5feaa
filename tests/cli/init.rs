use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .poctlrc.json

    ----- stderr -----
    ");

    let content = test.read_file(".poctlrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    for field in ["project", "sources", "extractOutput", "i18nDir", "template", "rules", "remote"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}' field", field);
    }
    assert_eq!(parsed["remote"]["resource"], "core");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".poctlrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.read_file(".poctlrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file("src/plupload.js", "plupload.translate('Add files');\n")?;
    test.write_file("src/jquery.ui.plupload/jquery.ui.plupload.js", "_('Start upload');\n")?;
    test.write_file(
        "src/jquery.plupload.queue/jquery.plupload.queue.js",
        "_('Stop upload');\n",
    )?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "Extract should work with the initialized config. stderr: {}",
        crate::stderr(&output)
    );
    let template = test.read_file("tmp/en.po")?;
    assert!(template.contains("msgid \"Add files\""));
    assert!(template.contains("msgid \"Stop upload\""));

    Ok(())
}
