use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};

/// Kept-record count between progress prints in non-verbose mode
const PROGRESS_INTERVAL: u64 = 5000;

/// Two-hex-character shard directory name for an article title. A pure
/// function of the title only, so the same title always lands in the same
/// shard regardless of namespace or run. The digest is used for bucketing,
/// not for any security purpose.
pub fn shard_for_title(title: &str) -> String {
    let digest = Sha1::digest(title.as_bytes());
    format!("{:02x}", digest[0])
}

/// Writes validated article records into the sharded cache tree of one
/// namespace. Incomplete records (no `article_body`, or one missing `html`
/// or `wikitext`) are counted and dropped; a line that fails to parse as
/// JSON at all aborts the run.
pub struct Ingestor {
    namespace_dir: PathBuf,
    verbose: bool,
    kept: u64,
    skipped: u64,
}

impl Ingestor {
    /// `project_dir` is `<directory>/<project>`; entries land under
    /// `<project_dir>/<namespace_id>/<shard>/`.
    pub fn new(project_dir: &Path, namespace_id: i64, verbose: bool) -> Self {
        Self {
            namespace_dir: project_dir.join(namespace_id.to_string()),
            verbose,
            kept: 0,
            skipped: 0,
        }
    }

    /// Records written so far
    pub fn kept(&self) -> u64 {
        self.kept
    }

    /// Records dropped for having no complete body
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Ingest every line of one file from a chunk archive. The progress
    /// counter restarts for each file.
    pub fn ingest_file(&mut self, name: &str, reader: &mut dyn BufRead) -> Result<()> {
        let mut count = 0u64;
        for line in reader.lines() {
            let line = line?;
            if self.ingest_line(name, &line)? {
                count += 1;
                if !self.verbose && count % PROGRESS_INTERVAL == 0 {
                    println!("{}", count);
                }
            }
        }
        Ok(())
    }

    /// Ingest a single newline-delimited JSON record. Returns true when a
    /// cache file was written, false when the record was dropped.
    pub fn ingest_line(&mut self, context: &str, line: &str) -> Result<bool> {
        let article: Value =
            serde_json::from_str(line).map_err(|source| Error::MalformedRecord {
                context: context.to_string(),
                source,
            })?;

        if !has_complete_body(&article) {
            self.skipped += 1;
            if self.verbose {
                println!(
                    "Found article {} ({}) with no body",
                    field_display(&article, "name"),
                    field_display(&article, "identifier"),
                );
            }
            return Ok(false);
        }

        let title = article
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingField {
                context: context.to_string(),
                field: "name",
            })?;
        let identifier = identifier_stem(&article).ok_or_else(|| Error::MissingField {
            context: context.to_string(),
            field: "identifier",
        })?;

        if self.verbose {
            let size = article
                .get("version")
                .and_then(|v| v.get("size"))
                .cloned()
                .unwrap_or_default();
            println!(
                "Found article {} ({}) with {}{} body",
                title,
                identifier,
                size.get("value").cloned().unwrap_or_else(|| Value::from(0)),
                size.get("unit_text").and_then(Value::as_str).unwrap_or("B"),
            );
        }

        let shard_dir = self.namespace_dir.join(shard_for_title(title));
        fs::create_dir_all(&shard_dir)?;

        // Pretty-printed with sorted keys and literal non-ASCII to keep the
        // cache human-inspectable. One whole-buffer write per record, so a
        // crash never leaves a half-written file.
        let rendered = serde_json::to_vec_pretty(&article)?;
        fs::write(shard_dir.join(format!("{}.json", identifier)), rendered)?;

        self.kept += 1;
        Ok(true)
    }
}

/// A record is cache-worthy only if `article_body` is present and carries
/// both `html` and `wikitext`.
fn has_complete_body(article: &Value) -> bool {
    match article.get("article_body") {
        Some(body) => body.get("html").is_some() && body.get("wikitext").is_some(),
        None => false,
    }
}

/// Filename stem for a record: its `identifier`, which the service may send
/// as either a string or a number.
fn identifier_stem(article: &Value) -> Option<String> {
    match article.get("identifier") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn field_display(article: &Value, key: &str) -> String {
    match article.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete_article(title: &str, identifier: &str) -> String {
        serde_json::json!({
            "name": title,
            "identifier": identifier,
            "article_body": {"html": "<p>hi</p>", "wikitext": "hi"},
            "version": {"size": {"value": 42, "unit_text": "B"}}
        })
        .to_string()
    }

    #[test]
    fn test_shard_is_first_digest_byte() {
        assert_eq!(shard_for_title("Rust (programming language)"), "ad");
        assert_eq!(shard_for_title("Main Page"), "29");
        // non-ASCII titles hash over their UTF-8 bytes
        assert_eq!(shard_for_title("Zürich"), "9b");
    }

    #[test]
    fn test_shard_is_deterministic() {
        assert_eq!(shard_for_title("Main Page"), shard_for_title("Main Page"));
    }

    #[test]
    fn test_complete_record_is_written() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        let line = complete_article("Main Page", "123");
        assert!(ingestor.ingest_line("chunk_0", &line).unwrap());
        assert_eq!(ingestor.kept(), 1);

        let path = dir.path().join("0").join("29").join("123.json");
        let written = fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, serde_json::from_str::<Value>(&line).unwrap());

        // pretty-printed with two-space indentation and sorted keys
        assert!(written.starts_with("{\n  \"article_body\""));
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        ingestor
            .ingest_line("chunk_0", &complete_article("Zürich", "7"))
            .unwrap();

        let written = fs::read_to_string(dir.path().join("0/9b/7.json")).unwrap();
        assert!(written.contains("Zürich"));
        assert!(!written.contains("\\u"));
    }

    #[test]
    fn test_numeric_identifier() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        let line = serde_json::json!({
            "name": "Main Page",
            "identifier": 456,
            "article_body": {"html": "h", "wikitext": "w"}
        })
        .to_string();
        assert!(ingestor.ingest_line("chunk_0", &line).unwrap());
        assert!(dir.path().join("0/29/456.json").exists());
    }

    #[test]
    fn test_incomplete_records_are_dropped() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        let missing_body = serde_json::json!({"name": "A", "identifier": "1"}).to_string();
        let missing_wikitext = serde_json::json!({
            "name": "B", "identifier": "2", "article_body": {"html": "h"}
        })
        .to_string();
        let missing_html = serde_json::json!({
            "name": "C", "identifier": "3", "article_body": {"wikitext": "w"}
        })
        .to_string();

        for line in [&missing_body, &missing_wikitext, &missing_html] {
            assert!(!ingestor.ingest_line("chunk_0", line).unwrap());
        }

        assert_eq!(ingestor.kept(), 0);
        assert_eq!(ingestor.skipped(), 3);
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_malformed_line_aborts() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        let result = ingestor.ingest_line("chunk_0", "{not json");
        assert!(matches!(result, Err(Error::MalformedRecord { .. })));
    }

    #[test]
    fn test_complete_record_without_name_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        let line = serde_json::json!({
            "identifier": "1",
            "article_body": {"html": "h", "wikitext": "w"}
        })
        .to_string();
        let result = ingestor.ingest_line("chunk_0", &line);
        assert!(matches!(
            result,
            Err(Error::MissingField { field: "name", .. })
        ));
    }

    #[test]
    fn test_reingestion_overwrites_same_path() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        let line = complete_article("Main Page", "123");
        ingestor.ingest_line("chunk_0", &line).unwrap();
        ingestor.ingest_line("chunk_0", &line).unwrap();

        let shard_dir = dir.path().join("0/29");
        assert_eq!(fs::read_dir(&shard_dir).unwrap().count(), 1);
        assert_eq!(ingestor.kept(), 2);
    }

    #[test]
    fn test_same_title_shards_identically_across_namespaces() {
        let dir = TempDir::new().unwrap();
        let mut main_ns = Ingestor::new(dir.path(), 0, false);
        let mut category_ns = Ingestor::new(dir.path(), 14, false);

        let line = complete_article("Main Page", "123");
        main_ns.ingest_line("chunk_0", &line).unwrap();
        category_ns.ingest_line("chunk_0", &line).unwrap();

        assert!(dir.path().join("0/29/123.json").exists());
        assert!(dir.path().join("14/29/123.json").exists());
    }

    #[test]
    fn test_ingest_file_mixed_lines() {
        let dir = TempDir::new().unwrap();
        let mut ingestor = Ingestor::new(dir.path(), 0, false);

        let complete = complete_article("Main Page", "123");
        let incomplete = serde_json::json!({"name": "X", "identifier": "9"}).to_string();
        let data = format!("{}\n{}\n", complete, incomplete);

        ingestor
            .ingest_file("articles_0.ndjson", &mut data.as_bytes())
            .unwrap();

        assert_eq!(ingestor.kept(), 1);
        assert_eq!(ingestor.skipped(), 1);
        assert!(dir.path().join("0/29/123.json").exists());
    }
}
