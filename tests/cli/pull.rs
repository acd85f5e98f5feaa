use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{CliTest, stderr, stdout};

const TEMPLATE: &str = r#"msgid ""
msgstr ""
"Project-Id-Version: plupload\n"

#: src/plupload.js:3
msgid "Add files"
msgstr ""

#: src/plupload.js:9
msgid "Start upload"
msgstr ""
"#;

async fn remote(locales: &[(&str, ResponseTemplate)]) -> MockServer {
    let server = MockServer::start().await;
    let languages: Vec<_> = locales
        .iter()
        .map(|(code, _)| json!({ "code": code, "name": code }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/project/plupload/resource/core/"))
        .and(query_param("details", ""))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "available_languages": languages })),
        )
        .mount(&server)
        .await;
    for (code, response) in locales {
        Mock::given(method("GET"))
            .and(path(format!("/project/plupload/resource/core/translation/{}/", code)))
            .respond_with(response.clone())
            .mount(&server)
            .await;
    }
    server
}

fn catalog(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "content": content, "mimetype": "text/x-po" }))
}

#[test]
fn test_pull_requires_auth() -> Result<()> {
    let test = CliTest::with_file("tmp/en.po", TEMPLATE)?;

    let output = test.pull_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr(&output), "Error: missing required parameter `auth`\n");
    assert!(!test.root().join("tmp/i18n").exists());

    Ok(())
}

#[test]
fn test_pull_checks_auth_before_reading_config() -> Result<()> {
    let test = CliTest::with_file(".poctlrc.json", "{ not json")?;

    let output = test.pull_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr(&output), "Error: missing required parameter `auth`\n");

    Ok(())
}

#[test]
fn test_pull_rejects_malformed_auth() -> Result<()> {
    let test = CliTest::with_file("tmp/en.po", TEMPLATE)?;

    let output = test.pull_command().env("POCTL_AUTH", "alice").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid value for `auth`"));

    Ok(())
}

#[test]
fn test_pull_requires_template() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .pull_command()
        .args(["--auth", "alice:secret"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Error: cannot read ./tmp/en.po"));

    Ok(())
}

#[tokio::test]
async fn test_pull_writes_merged_locales() -> Result<()> {
    let server = remote(&[(
        "fr",
        catalog(
            "msgid \"\"\nmsgstr \"\"\n\"Language: fr\\n\"\n\nmsgid \"Add files\"\nmsgstr \"Ajouter des fichiers\"\n\nmsgid \"Cancel\"\nmsgstr \"Annuler\"\n",
        ),
    )])
    .await;
    let test = CliTest::with_file("tmp/en.po", TEMPLATE)?;

    let output = test
        .pull_command()
        .args(["--endpoint", &server.uri(), "-v"])
        .env("POCTL_AUTH", "alice:secret")
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "  fr ./tmp/i18n/fr.po (1 translated, 1 untranslated, 1 obsolete)\n✓ Pulled 1 locale\n"
    );

    assert_eq!(
        test.read_file("tmp/i18n/fr.po")?,
        r#"msgid ""
msgstr ""
"Project-Id-Version: plupload\n"
"Language: fr\n"

#: src/plupload.js:3
msgid "Add files"
msgstr "Ajouter des fichiers"

#: src/plupload.js:9
msgid "Start upload"
msgstr ""

#~ msgid "Cancel"
#~ msgstr "Annuler"
"#
    );

    Ok(())
}

#[tokio::test]
async fn test_pull_partial_failure() -> Result<()> {
    let server = remote(&[
        ("de", catalog("msgid \"Add files\"\nmsgstr \"Dateien hinzufügen\"\n")),
        ("fr", ResponseTemplate::new(500)),
    ])
    .await;
    let test = CliTest::with_file("tmp/en.po", TEMPLATE)?;

    let output = test
        .pull_command()
        .args(["--endpoint", &server.uri(), "--auth", "alice:secret", "--to", "po"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).ends_with("✘ Pulled 1 locale, 1 locale failed\n"));
    assert!(test.root().join("po/de.po").is_file());
    assert!(!test.root().join("po/fr.po").exists());

    Ok(())
}

#[tokio::test]
async fn test_pull_rejected_credentials_write_nothing() -> Result<()> {
    let server = remote(&[
        ("de", catalog("msgid \"Add files\"\nmsgstr \"Dateien hinzufügen\"\n")),
        ("fr", ResponseTemplate::new(401)),
    ])
    .await;
    let test = CliTest::with_file("tmp/en.po", TEMPLATE)?;

    let output = test
        .pull_command()
        .args(["--endpoint", &server.uri(), "--auth", "alice:secret"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("authentication rejected"));
    assert!(!test.root().join("tmp/i18n").exists());

    Ok(())
}
