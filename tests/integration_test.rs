use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use std::fs;
use tempfile::{TempDir, tempdir};

/// A `newsrpm` command isolated from the caller's environment and config.
fn newsrpm(home: &TempDir, base_url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("newsrpm"));
    cmd.env_remove("NEWSRPM_CONFIG")
        .env_remove("NEWSRPM_AUTH_MODE")
        .env_remove("NEWSRPM_BASE_URL")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("NEWSRPM_API_KEY", "test-key")
        .arg("--base-url")
        .arg(base_url);
    cmd
}

#[test]
fn test_search_prints_top_results() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server
        .mock("POST", "/search/article")
        .match_header("authorization", "privateKey test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "fullText": "AI",
            "count": 10,
            "publisher": ["Reuters", "AP"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"rows":[
                {"headline":"AI beats humans","provider":"Reuters","slug":"ai-beats-humans"},
                {"provider":"AP","slug":"untitled"}
            ]}"#,
        )
        .create();

    newsrpm(&home, &server.url())
        .args(["search", "--fulltext", "AI", "--count", "10", "--publisher", "Reuters, AP"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Top results:"))
        .stdout(predicates::str::contains("- AI beats humans [Reuters] ai-beats-humans"))
        .stdout(predicates::str::contains("- (no headline) [AP] untitled"));

    mock.assert();
}

#[test]
fn test_index_with_query_auth_and_save() {
    let mut server = Server::new();
    let home = tempdir().unwrap();
    let out = home.path().join("responses/index.json");

    let mock = server
        .mock("POST", "/search/indexedData")
        .match_query(Matcher::UrlEncoded("T".into(), "test-key".into()))
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(serde_json::json!({
            "key": "publisher",
            "value": ["Reuters", "BBC"]
        })))
        .with_status(200)
        .with_body(
            r#"{"success":true,"rows":[{"headline":null,"slug":"a","meta":{"lang":"en"}}],"next":null}"#,
        )
        .create();

    newsrpm(&home, &server.url())
        .args(["--auth-mode", "private-query", "index", "publisher", "--value", "Reuters,BBC"])
        .arg("--save")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicates::str::contains("- (no headline) [] a"))
        .stdout(predicates::str::contains("Saved raw JSON to"));

    mock.assert();
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!({
            "success": true,
            "rows": [{"headline": null, "slug": "a", "meta": {"lang": "en"}}],
            "next": null
        })
    );
}

#[test]
fn test_article_by_slug() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server
        .mock("GET", "/article/my-article-slug")
        .with_status(200)
        .with_body(r#"{"success":true,"doc":{"headline":"Markets rally"}}"#)
        .create();

    newsrpm(&home, &server.url())
        .args(["article", "slug", "my-article-slug"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Markets rally"));

    mock.assert();
}

#[test]
fn test_providers_public_header() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server
        .mock("GET", "/provider")
        .match_header("authorization", "publicKey test-key")
        .with_status(200)
        .with_body(r#"{"success":true,"rows":[{"provider":"Reuters"},{"provider":"BBC"}]}"#)
        .create();

    newsrpm(&home, &server.url())
        .env("NEWSRPM_AUTH_MODE", "public-header")
        .arg("providers")
        .assert()
        .success()
        .stdout(predicates::str::contains("Providers:\n- Reuters\n- BBC"));

    mock.assert();
}

#[test]
fn test_body_render_counts_chunks() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server
        .mock("GET", "/body/abc123/render")
        .with_status(200)
        .with_body(
            r#"{"success":true,"body":{"v":1,"chunks":[
                {"name":"summary","format":"html","content":"<p>a</p>"},
                {"name":"full","format":"html","content":"<p>b</p>"}
            ]}}"#,
        )
        .create();

    newsrpm(&home, &server.url())
        .args(["body", "abc123", "--render"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Body chunks: 2"));

    mock.assert();
}

#[test]
fn test_upload_from_json_file() {
    let mut server = Server::new();
    let home = tempdir().unwrap();
    let article = home.path().join("article.json");
    fs::write(
        &article,
        r#"{"provider":"p","headline":"h","slug":"s","date":"2024-01-01","quality":0,"visiblity":"public"}"#,
    )
    .unwrap();

    let mock = server
        .mock("POST", "/article")
        .match_body(Matcher::PartialJson(serde_json::json!({"visiblity": "public", "quality": 0})))
        .with_status(200)
        .with_body(r#"{"success":true,"id":321}"#)
        .create();

    newsrpm(&home, &server.url())
        .arg("upload")
        .arg("--json")
        .arg(&article)
        .assert()
        .success()
        .stdout(predicates::str::contains("Uploaded. id=321"));

    mock.assert();
}

#[test]
fn test_upload_prints_string_id() {
    let mut server = Server::new();
    let home = tempdir().unwrap();
    let article = home.path().join("article.json");
    fs::write(
        &article,
        r#"{"provider":"p","headline":"h","slug":"s","date":"2024-01-01","quality":1}"#,
    )
    .unwrap();

    let mock = server
        .mock("POST", "/article")
        .with_status(200)
        .with_body(r#"{"success":true,"id":"a1b2"}"#)
        .create();

    newsrpm(&home, &server.url())
        .arg("upload")
        .arg("--json")
        .arg(&article)
        .assert()
        .success()
        .stdout(predicates::str::contains("Uploaded. id=a1b2"));

    mock.assert();
}

#[test]
fn test_providers_skips_null_names() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server
        .mock("GET", "/provider")
        .with_status(200)
        .with_body(r#"{"success":true,"rows":[{"provider":"R"},{"provider":null}]}"#)
        .create();

    newsrpm(&home, &server.url())
        .arg("providers")
        .assert()
        .success()
        .stdout(predicates::str::contains("Providers:\n- R\n"));

    mock.assert();
}

#[test]
fn test_unauthorized_prints_hint_and_fails() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server
        .mock("GET", "/provider")
        .with_status(401)
        .with_body(r#"{"error":"invalid key"}"#)
        .expect(1)
        .create();

    newsrpm(&home, &server.url())
        .arg("providers")
        .assert()
        .failure()
        .stderr(predicates::str::contains("listProviders failed (401)"))
        .stderr(predicates::str::contains("hint: check credentials/auth mode"));

    mock.assert();
}

#[test]
fn test_server_error_is_retried_from_config_policy() {
    let mut server = Server::new();
    let home = tempdir().unwrap();
    let config = home.path().join("newsrpm.json");
    fs::write(
        &config,
        r#"{"newsrpm": {"apiKey": "file-key", "retry": {"maxRetries": 2, "baseDelayMs": 10, "maxDelayMs": 20, "jitter": false}}}"#,
    )
    .unwrap();

    let mock = server
        .mock("GET", "/body/b1")
        .match_header("authorization", "privateKey file-key")
        .with_status(503)
        .expect(3)
        .create();

    newsrpm(&home, &server.url())
        .env_remove("NEWSRPM_API_KEY")
        .arg("--config")
        .arg(&config)
        .args(["body", "b1"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("getBody failed (503)"));

    mock.assert();
}

#[test]
fn test_not_found_is_not_retried() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server
        .mock("GET", "/article/42")
        .with_status(404)
        .expect(1)
        .create();

    newsrpm(&home, &server.url())
        .args(["article", "id", "42"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("getArticleById failed (404)"));

    mock.assert();
}

#[test]
fn test_missing_api_key_fails_before_any_request() {
    let mut server = Server::new();
    let home = tempdir().unwrap();

    let mock = server.mock("GET", Matcher::Any).expect(0).create();

    newsrpm(&home, &server.url())
        .env_remove("NEWSRPM_API_KEY")
        .arg("providers")
        .assert()
        .failure()
        .stderr(predicates::str::contains("No NewsRPM API key"));

    mock.assert();
}

#[test]
fn test_upload_with_missing_fields_makes_no_request() {
    let mut server = Server::new();
    let home = tempdir().unwrap();
    let article = home.path().join("article.json");
    fs::write(&article, r#"{"provider":"p","headline":"h"}"#).unwrap();

    let mock = server.mock("POST", "/article").expect(0).create();

    newsrpm(&home, &server.url())
        .arg("upload")
        .arg("--json")
        .arg(&article)
        .assert()
        .failure()
        .stderr(predicates::str::contains("Missing required article fields: slug, date, quality"));

    mock.assert();
}
