//! previewflow の設定まわり
//!
//! - compose ファイルの探索
//! - 一時スタックのパス命名 (`<app-path>-pr-<N>`)
//! - パイプラインのステップ出力 (`GITHUB_OUTPUT` / `--output-file`)

pub mod error;
pub mod output;
pub mod paths;

pub use error::*;
pub use output::StepOutput;
pub use paths::PreviewPaths;

use std::path::{Path, PathBuf};

/// compose ファイル名の候補（優先順）
pub const COMPOSE_FILE_CANDIDATES: [&str; 4] = [
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

/// ディレクトリ内の compose ファイルを探す
///
/// [`COMPOSE_FILE_CANDIDATES`] の順に検索し、最初に見つかったものを返す。
pub fn find_compose_file(dir: &Path) -> Result<PathBuf> {
    for filename in &COMPOSE_FILE_CANDIDATES {
        let path = dir.join(filename);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Found compose file");
            return Ok(path);
        }
    }

    Err(ConfigError::ComposeFileNotFound(dir.to_path_buf()))
}
