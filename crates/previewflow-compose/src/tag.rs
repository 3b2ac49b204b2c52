//! 常設デプロイのイメージタグ更新
//!
//! compose を構造的に読み書きするとコメントや書式が失われるため、
//! `image:` 行だけをテキストとして置換する。

use crate::error::{ComposeError, Result};
use previewflow_config::find_compose_file;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// タグ更新の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagUpdate {
    /// 対象イメージがない、または既に同じタグ
    Unchanged { manifest_path: PathBuf },
    Updated { manifest_path: PathBuf },
}

/// `image: <registry>/<repo>:<何か>` 行のタグを置換する
pub fn replace_image_tag(content: &str, registry: &str, repo: &str, tag: &str) -> Result<String> {
    let pattern = format!(
        r"(image:\s*{}/{}):.*",
        regex::escape(registry.trim_end_matches('/')),
        regex::escape(repo)
    );
    let re = Regex::new(&pattern)?;
    Ok(re
        .replace_all(content, |caps: &regex::Captures| format!("{}:{}", &caps[1], tag))
        .into_owned())
}

/// アプリディレクトリの compose のタグを更新する
pub fn update_image_tag(app_path: &Path, registry: &str, repo: &str, tag: &str) -> Result<TagUpdate> {
    let manifest_path = find_compose_file(app_path)?;
    let content = fs::read_to_string(&manifest_path).map_err(|source| ComposeError::Io {
        path: manifest_path.clone(),
        source,
    })?;

    let updated = replace_image_tag(&content, registry, repo, tag)?;
    if updated == content {
        return Ok(TagUpdate::Unchanged { manifest_path });
    }

    fs::write(&manifest_path, updated).map_err(|source| ComposeError::Io {
        path: manifest_path.clone(),
        source,
    })?;
    tracing::info!(path = %manifest_path.display(), tag = %tag, "Updated image tag");
    Ok(TagUpdate::Updated { manifest_path })
}
