use anyhow::Result;

use crate::{CliTest, stderr, stdout};

const LOOSE: &str = r#"msgid ""
msgstr ""
"Language: fr\n"
#: src/plupload.js:4
msgid "Save"
msgstr ""
"Enregistrer"
msgid "Stop"
msgstr ""
"#;

#[test]
fn test_reformat_to_file() -> Result<()> {
    let test = CliTest::with_file("fr.po", LOOSE)?;

    let output = test
        .reformat_command()
        .args(["--from", "fr.po", "--to", "out/fr.po"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "✓ Reformatted 1 catalog\n");

    assert_eq!(
        test.read_file("out/fr.po")?,
        r#"msgid ""
msgstr ""
"Language: fr\n"

#: src/plupload.js:4
msgid "Save"
msgstr "Enregistrer"

msgid "Stop"
msgstr ""
"#
    );

    Ok(())
}

#[test]
fn test_reformat_defaults_to_i18n_dir() -> Result<()> {
    let test = CliTest::with_file("tmp/fr.po", LOOSE)?;
    test.write_file("tmp/en.po", "msgid \"Save\"\nmsgstr \"\"\n")?;

    let output = test
        .reformat_command()
        .args(["--from", "tmp/fr.po", "tmp/en.po", "-v"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("tmp/i18n/fr.po").is_file());
    assert!(test.root().join("tmp/i18n/en.po").is_file());
    assert!(stdout(&output).ends_with("✓ Reformatted 2 catalogs\n"));

    Ok(())
}

#[test]
fn test_reformat_requires_from() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.reformat_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr(&output), "Error: missing required parameter `from`\n");

    Ok(())
}

#[test]
fn test_reformat_reports_parse_line() -> Result<()> {
    let test = CliTest::with_file("bad.po", "msgid \"a\"\nmsgstr \"\"\n\nmsgstr \"b\"\n")?;

    let output = test
        .reformat_command()
        .args(["--from", "bad.po", "--to", "out.po"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr(&output),
        "Error: bad.po: line 4: message block has no msgid\n"
    );
    assert!(!test.root().join("out.po").exists());

    Ok(())
}
