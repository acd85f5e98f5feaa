use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_extract_writes_template() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.js",
        r#"var save = _("Save");
var count = _n("%d file", "%d files", n);
var again = _("Save");
"#,
    )?;

    let output = test
        .extract_command()
        .args(["--from", "src", "--to", "out/en.po"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "✓ Extracted 2 messages from 1 source file into out/en.po\n"
    );

    let template = test.read_file("out/en.po")?;
    assert!(template.starts_with("msgid \"\"\nmsgstr \"\"\n\"Project-Id-Version: plupload\\n\"\n"));
    assert!(template.contains(
        "\n#: src/app.js:1\n#: src/app.js:3\nmsgid \"Save\"\nmsgstr \"\"\n"
    ));
    assert!(template.contains(
        "\n#: src/app.js:2\nmsgid \"%d file\"\nmsgid_plural \"%d files\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n"
    ));

    Ok(())
}

#[test]
fn test_extract_flags_unresolved_arguments() -> Result<()> {
    let test = CliTest::with_file("lib/ui.js", "_(prefix + 'name');\n")?;

    let output = test
        .extract_command()
        .args(["--from", "lib/ui.js", "--to", "en.po"])
        .output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("warning: 1 message could not be resolved statically"));

    let template = test.read_file("en.po")?;
    assert!(template.contains("#. unresolved argument\n#: lib/ui.js:1\n#, needs-review\nmsgid \"prefix + 'name'\"\n"));

    Ok(())
}

#[test]
fn test_extract_uses_config_rules() -> Result<()> {
    let test = CliTest::with_file(
        ".poctlrc.json",
        r#"{
  "project": { "name": "uploader", "version": "3.0" },
  "sources": ["lib/*.js"],
  "extractOutput": "i18n/en.po",
  "rules": [{ "function": "i18n.t", "messageArg": 1 }]
}"#,
    )?;
    test.write_file("lib/a.js", "i18n.t(ctx, 'Browse');\n_('Ignored');\n")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let template = test.read_file("i18n/en.po")?;
    assert!(template.contains("\"Project-Id-Version: uploader 3.0\\n\""));
    assert!(template.contains("msgid \"Browse\""));
    assert!(!template.contains("Ignored"));

    Ok(())
}

#[test]
fn test_extract_missing_source_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .extract_command()
        .args(["--from", "missing.js", "--to", "en.po"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Error: cannot read missing.js"));
    assert!(!test.root().join("en.po").exists());

    Ok(())
}
