//! PR 用一時スタックのディレクトリ操作
//!
//! 元アプリのディレクトリを `<app-path>-pr-<N>` に複製し、compose を
//! 書き換えて、デプロイポリシーのサイドカーを置く。

use crate::error::{ComposeError, Result};
use crate::model::ComposeFile;
use crate::rewrite::{self, RewriteOptions, RewriteReport};
use previewflow_config::{PreviewPaths, find_compose_file};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 一時スタック用のシークレット上書きファイル名
pub const TEMP_ENV_FILE: &str = ".enc-temp.env";

/// デプロイポリシーのサイドカーファイル名
pub const POLICY_FILE: &str = "docker-cd.yml";

/// 一時スタックはローリングアップデートしない
pub const POLICY_CONTENT: &str = "rolling_update: false\n";

/// 一時スタック作成の入力
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub paths: PreviewPaths,
    pub tag: String,
    pub registry: String,
    pub repo_owner: String,
    /// シークレット上書きファイルを持つ兄弟リポジトリ
    pub app_repo_path: Option<PathBuf>,
}

impl PreviewRequest {
    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            app_name: self.paths.app_name.clone(),
            pr_number: self.paths.pr_number,
            tag: self.tag.clone(),
            registry: self.registry.clone(),
            repo_owner: self.repo_owner.clone(),
        }
    }
}

/// シークレット上書きファイルの扱い
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsOverride {
    /// 兄弟リポジトリが指定されていない
    NotRequested,
    /// 兄弟リポジトリに上書きファイルがない
    Missing(PathBuf),
    /// 一時スタックにコピーした
    Copied(PathBuf),
}

/// 作成した一時スタック
#[derive(Debug, Clone)]
pub struct PreviewStack {
    pub temp_path: PathBuf,
    pub manifest_path: PathBuf,
    /// 書き換え後の compose の内容
    pub manifest: String,
    pub report: RewriteReport,
    pub secrets: SecretsOverride,
    /// env_file に上書きファイルを追加したサービス
    pub env_override_services: Vec<String>,
}

impl PreviewStack {
    pub fn url(&self) -> String {
        self.report.host.url()
    }
}

/// 一時スタックを作成する
///
/// 順序: 複製 → シークレット上書き → パース → 書き換え → 書き出し → サイドカー。
/// ドメイン検出に失敗した場合、compose もサイドカーも書き出さない。
pub fn create_preview_stack(request: &PreviewRequest) -> Result<PreviewStack> {
    let paths = &request.paths;

    materialize(&paths.app_path, &paths.temp_path)?;
    info!(from = %paths.app_path.display(), to = %paths.temp_path.display(), "Copied app directory");

    let secrets = copy_secrets_override(request.app_repo_path.as_deref(), &paths.temp_path)?;

    let manifest_path = find_compose_file(&paths.temp_path)?;
    let mut doc = load_manifest(&manifest_path)?;

    let report = rewrite::rewrite(&mut doc, &request.rewrite_options())?;

    let env_override_services = if paths.temp_path.join(TEMP_ENV_FILE).is_file() {
        let updated = rewrite::prefer_env_override(&mut doc, TEMP_ENV_FILE);
        info!(services = ?updated, "Added {} to env_file list", TEMP_ENV_FILE);
        updated
    } else {
        Vec::new()
    };

    let manifest = save_manifest(&manifest_path, &doc)?;
    write_policy(&paths.temp_path)?;

    Ok(PreviewStack {
        temp_path: paths.temp_path.clone(),
        manifest_path,
        manifest,
        report,
        secrets,
        env_override_services,
    })
}

/// 一時スタックを削除する
///
/// 存在しなかった場合は `false`。
pub fn remove_preview_stack(paths: &PreviewPaths) -> Result<bool> {
    if !paths.temp_path.exists() {
        return Ok(false);
    }

    fs::remove_dir_all(&paths.temp_path).map_err(|source| ComposeError::Io {
        path: paths.temp_path.clone(),
        source,
    })?;
    info!(path = %paths.temp_path.display(), "Removed preview stack");
    Ok(true)
}

/// 既存の一時ディレクトリを消してから元ディレクトリを複製する
fn materialize(app_path: &Path, temp_path: &Path) -> Result<()> {
    if !app_path.is_dir() {
        return Err(ComposeError::AppDirNotFound(app_path.to_path_buf()));
    }

    if temp_path.exists() {
        debug!(path = %temp_path.display(), "Removing previous preview stack");
        fs::remove_dir_all(temp_path).map_err(|source| ComposeError::Io {
            path: temp_path.to_path_buf(),
            source,
        })?;
    }

    copy_dir_recursive(app_path, temp_path).map_err(|source| ComposeError::Copy {
        from: app_path.to_path_buf(),
        to: temp_path.to_path_buf(),
        source,
    })
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// 兄弟リポジトリのシークレット上書きファイルをコピーする
///
/// リポジトリ未指定・ファイルなしはログのみ。コピー自体の失敗はエラー。
fn copy_secrets_override(app_repo_path: Option<&Path>, temp_path: &Path) -> Result<SecretsOverride> {
    let Some(app_repo_path) = app_repo_path else {
        return Ok(SecretsOverride::NotRequested);
    };

    let source = app_repo_path.join(TEMP_ENV_FILE);
    if !source.is_file() {
        info!(path = %source.display(), "No secrets override found, skipping");
        return Ok(SecretsOverride::Missing(source));
    }

    let dest = temp_path.join(TEMP_ENV_FILE);
    fs::copy(&source, &dest).map_err(|err| ComposeError::Copy {
        from: source.clone(),
        to: dest.clone(),
        source: err,
    })?;
    info!(from = %source.display(), to = %dest.display(), "Copied secrets override");
    Ok(SecretsOverride::Copied(dest))
}

/// compose ファイルを読み込む
pub fn load_manifest(path: &Path) -> Result<ComposeFile> {
    let content = fs::read_to_string(path).map_err(|source| ComposeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ComposeFile::from_yaml_str(&content).map_err(|source| ComposeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// compose ファイルを書き出し、書き出した内容を返す
pub fn save_manifest(path: &Path, doc: &ComposeFile) -> Result<String> {
    let content = doc.to_yaml_string()?;
    fs::write(path, &content).map_err(|source| ComposeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content)
}

fn write_policy(temp_path: &Path) -> Result<()> {
    let path = temp_path.join(POLICY_FILE);
    fs::write(&path, POLICY_CONTENT).map_err(|source| ComposeError::Io { path, source })
}
