use std::process::{Command, Output};

use serde_json::Value;

const USAGE: &str = "Usage: recipe-scrape <url> [--user <name>] [--extract-only]";

fn create_recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_recipe-scrape"))
        .args(args)
        .env("RUST_LOG", "error") // Suppress debug logs
        .output()
        .expect("Failed to execute command")
}

async fn serve_pancakes(server: &mut mockito::ServerGuard) -> mockito::Mock {
    let json_ld = r#"
    {
        "@context": "https://schema.org/",
        "@type": "Recipe",
        "name": "Pancakes",
        "keywords": "breakfast, sweet",
        "recipeIngredient": ["1 cup flour", "2 eggs"],
        "recipeInstructions": "Whisk and fry."
    }
    "#;

    server
        .mock("GET", "/pancakes")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(create_recipe_html(json_ld))
        .create_async()
        .await
}

#[tokio::test]
async fn test_default_run_prints_stored_record() {
    let mut server = mockito::Server::new_async().await;
    let _m = serve_pancakes(&mut server).await;
    let url = format!("{}/pancakes", server.url());

    let output = run_cli(&[&url]);
    assert!(output.status.success());

    let record: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["origin"], "local");
    assert_eq!(record["notes"], serde_json::json!([]));
    assert_eq!(record["url"], url.as_str());
    assert!(record["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(record["name"], "Pancakes");
    assert_eq!(
        record["recipeIngredient"],
        serde_json::json!(["1 cup flour", "2 eggs"])
    );
    assert_eq!(record["recipeInstructions"], serde_json::json!(["Whisk and fry."]));
}

#[tokio::test]
async fn test_user_flag_sets_origin() {
    let mut server = mockito::Server::new_async().await;
    let _m = serve_pancakes(&mut server).await;
    let url = format!("{}/pancakes", server.url());

    let output = run_cli(&[&url, "--user", "jo"]);
    assert!(output.status.success());

    let record: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["origin"], "jo");
}

#[tokio::test]
async fn test_extract_only_prints_fields_without_provenance() {
    let mut server = mockito::Server::new_async().await;
    let _m = serve_pancakes(&mut server).await;
    let url = format!("{}/pancakes", server.url());

    let output = run_cli(&[&url, "--extract-only"]);
    assert!(output.status.success());

    let fields: Value = serde_json::from_slice(&output.stdout).unwrap();
    let fields = fields.as_object().unwrap();
    for key in ["id", "url", "origin", "notes"] {
        assert!(!fields.contains_key(key), "unexpected key {key}");
    }
    assert_eq!(fields["name"], "Pancakes");
    assert_eq!(fields["keywords"], serde_json::json!(["breakfast", "sweet"]));
}

#[tokio::test]
async fn test_extraction_failure_exits_with_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/plain")
        .with_status(200)
        .with_body("<html><body><p>No recipe here</p></body></html>")
        .create_async()
        .await;

    let output = run_cli(&[&format!("{}/plain", server.url())]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_missing_url_prints_usage() {
    let output = run_cli(&[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains(USAGE));
}

#[test]
fn test_unknown_flag_prints_usage() {
    let output = run_cli(&["https://example.com/recipe", "--verbose"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unexpected argument: --verbose"));
    assert!(stderr.contains(USAGE));
}

#[test]
fn test_user_flag_without_name_is_rejected() {
    let output = run_cli(&["https://example.com/recipe", "--user"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--user requires a name"));
}
