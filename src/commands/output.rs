use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::path::Path;

use crate::{
    api::{Article, MultipleArticleResponse},
    runtime::Runtime,
};

/// Search results shown per command.
pub const TOP_RESULTS: usize = 5;

pub(crate) fn article_line(article: Article<'_>) -> String {
    format!(
        "- {} [{}] {}",
        article.headline().unwrap_or("(no headline)"),
        article.provider().unwrap_or(""),
        article.slug().unwrap_or("")
    )
}

/// Lines summarizing the first few rows of a search.
pub(crate) fn top_results(response: &MultipleArticleResponse) -> Vec<String> {
    let lines: Vec<String> = response.rows().take(TOP_RESULTS).map(article_line).collect();
    if lines.is_empty() {
        return vec!["No results.".to_string()];
    }
    let mut out = vec!["Top results:".to_string()];
    out.extend(lines);
    out
}

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Writes `data` as pretty JSON to `path`, creating missing parent
/// directories. Response types serialize to the payload as received.
pub fn save_json<R: Runtime, S: Serialize>(runtime: &R, path: &Path, data: &S) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !runtime.exists(parent) {
            debug!("Creating directory {:?}", parent);
            runtime.create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(data).context("Failed to serialize response")?;
    runtime.write(path, json.as_bytes())?;
    println!("Saved raw JSON to {}", path.display());
    Ok(())
}

pub(crate) fn save_if_requested<R: Runtime, S: Serialize>(
    runtime: &R,
    save: Option<&Path>,
    data: &S,
) -> Result<()> {
    match save {
        Some(path) => save_json(runtime, path, data),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::*;
    use serde_json::json;

    #[test]
    fn test_article_line() {
        let full = json!({"headline": "A", "provider": "X", "slug": "a"});
        assert_eq!(article_line(Article::new(&full)), "- A [X] a");
        let bare = json!({"headline": null, "provider": 7});
        assert_eq!(article_line(Article::new(&bare)), "- (no headline) [] ");
    }

    #[test]
    fn test_top_results_limits_to_five() {
        let rows: Vec<_> = (0..8)
            .map(|i| json!({"headline": format!("H{}", i), "provider": "P", "slug": "s"}))
            .collect();
        let response = MultipleArticleResponse::from(json!({"success": true, "rows": rows}));
        let lines = top_results(&response);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Top results:");
        assert_eq!(lines[5], "- H4 [P] s");
    }

    #[test]
    fn test_top_results_empty() {
        let response = MultipleArticleResponse::from(json!({"success": true, "rows": []}));
        assert_eq!(top_results(&response), vec!["No results."]);
    }

    #[test]
    fn test_save_json_writes_response_as_received() {
        let payload = json!({
            "success": true,
            "rows": [{"headline": null, "slug": "a", "meta": {"lang": "en"}}]
        });
        let expected = serde_json::to_string_pretty(&payload).unwrap();
        let mut runtime = MockRuntime::new();
        runtime
            .expect_write()
            .withf(move |_, contents| std::str::from_utf8(contents).unwrap() == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        let response = MultipleArticleResponse::from(payload);
        save_json(&runtime, Path::new("res.json"), &response).unwrap();
    }

    #[test]
    fn test_save_json_creates_parent() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(Path::new("out")))
            .returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(Path::new("out")))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| {
                path.ends_with("out/res.json")
                    && std::str::from_utf8(contents).unwrap() == "{\n  \"success\": true\n}"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        save_json(&runtime, Path::new("out/res.json"), &json!({"success": true})).unwrap();
    }

    #[test]
    fn test_save_json_bare_file_name_skips_mkdir() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().times(0);
        runtime.expect_create_dir_all().times(0);
        runtime.expect_write().times(1).returning(|_, _| Ok(()));

        save_json(&runtime, Path::new("res.json"), &json!({})).unwrap();
    }

    #[test]
    fn test_save_if_requested_without_path_does_nothing() {
        let runtime = MockRuntime::new();
        save_if_requested(&runtime, None, &json!({"a": 1})).unwrap();
    }
}
