//! Small helpers for logging and output files.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Keeps at most `max` characters and appends `"…(+N bytes)"` with the number
/// of bytes dropped. Never splits a multi-byte character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure the directory that will hold `file_path` exists and is writable.
///
/// Creates missing directories, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %file_path))]
pub async fn ensure_writable_parent(file_path: &str) -> Result<(), Box<dyn Error>> {
    let dir = match Path::new(file_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}

/// Write the assembled document to `file_path`, creating parent directories.
///
/// # Arguments
///
/// * `file_path` - Destination chosen with `--output`
/// * `content` - The redacted document
///
/// # Returns
///
/// An error when the destination cannot be created or written; the caller
/// treats that as a failed run.
#[instrument(level = "info", skip_all, fields(path = %file_path, bytes = content.len()))]
pub async fn write_output(file_path: &str, content: &str) -> Result<(), Box<dyn Error>> {
    ensure_writable_parent(file_path).await?;
    fs::write(file_path, content).await?;
    info!("Wrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        assert_eq!(truncate_for_log("Größe", 3), "Grö…(+3 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_writable_parent_creates_directory() {
        let dir = std::env::temp_dir().join(format!("news_digest_test_{}", std::process::id()));
        let file = dir.join("nested").join("digest.txt");
        ensure_writable_parent(file.to_str().unwrap()).await.unwrap();
        assert!(dir.join("nested").is_dir());
        let _ = stdfs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_write_output_writes_document() {
        let dir = std::env::temp_dir().join(format!("news_digest_out_{}", std::process::id()));
        let file = dir.join("digest.txt");
        write_output(file.to_str().unwrap(), "[FRAMEWORK] ARTICLE 1 BEGIN\n")
            .await
            .unwrap();
        assert_eq!(
            stdfs::read_to_string(&file).unwrap(),
            "[FRAMEWORK] ARTICLE 1 BEGIN\n"
        );
        let _ = stdfs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_write_output_fails_when_parent_is_a_file() {
        let blocker =
            std::env::temp_dir().join(format!("news_digest_blocker_{}", std::process::id()));
        stdfs::write(&blocker, "not a directory").unwrap();
        let file = blocker.join("digest.txt");

        let result = write_output(file.to_str().unwrap(), "content").await;
        assert!(result.is_err());
        let _ = stdfs::remove_file(&blocker);
    }
}
