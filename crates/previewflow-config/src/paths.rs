//! 一時スタックのパス命名

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// アプリケーションと、その PR 用一時スタックのパス
///
/// 一時スタックは元ディレクトリの隣に `<app-path>-pr-<N>` として作られる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPaths {
    /// 元のアプリケーションディレクトリ
    pub app_path: PathBuf,
    /// アプリ名（app_path の最後のセグメント）
    pub app_name: String,
    /// PR 番号
    pub pr_number: u64,
    /// 一時スタックのディレクトリ
    pub temp_path: PathBuf,
}

impl PreviewPaths {
    pub fn new(app_path: impl AsRef<Path>, pr_number: u64) -> Result<Self> {
        // 末尾の `/` などを正規化しておく
        let app_path: PathBuf = app_path.as_ref().components().collect();

        let app_name = app_path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ConfigError::InvalidAppPath(app_path.clone()))?
            .to_string();

        let mut temp_path = app_path.clone().into_os_string();
        temp_path.push(format!("-pr-{}", pr_number));

        Ok(Self {
            app_path,
            app_name,
            pr_number,
            temp_path: PathBuf::from(temp_path),
        })
    }
}
