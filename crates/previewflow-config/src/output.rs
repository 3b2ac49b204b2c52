//! パイプラインのステップ出力
//!
//! GitHub Actions の `GITHUB_OUTPUT` のように、後続ステップへ渡す値を
//! `key=value` 行としてファイルに追記する。

use crate::error::{ConfigError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// ステップ出力の書き込み先
///
/// パスが設定されていない場合、書き込みは何もしない。
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    path: Option<PathBuf>,
}

impl StepOutput {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// `key=value` 行をまとめて追記する
    pub fn append(&self, entries: &[(&str, &str)]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            for (key, value) in entries {
                writeln!(file, "{}={}", key, value)?;
            }
            Ok(())
        };

        write().map_err(|source| ConfigError::OutputWrite {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), count = entries.len(), "Appended step outputs");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_append_to_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("output");
        fs::write(&path, "previous=1\n").unwrap();

        let output = StepOutput::new(Some(path.clone()));
        output
            .append(&[("url", "https://pr-1-web.example.com"), ("temp-path", "/srv/web-pr-1")])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "previous=1\nurl=https://pr-1-web.example.com\ntemp-path=/srv/web-pr-1\n"
        );
    }

    #[test]
    fn test_disabled_output_is_noop() {
        StepOutput::new(None).append(&[("url", "x")]).unwrap();

        // 空文字列のパスも無効扱い（開こうとして失敗しない）
        StepOutput::new(Some(PathBuf::new()))
            .append(&[("url", "x")])
            .unwrap();
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = StepOutput::new(Some(temp_dir.path().join("missing").join("output")));

        let result = output.append(&[("url", "x")]);
        assert!(matches!(result, Err(ConfigError::OutputWrite { .. })));
    }
}
