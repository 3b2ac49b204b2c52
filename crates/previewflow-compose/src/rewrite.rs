//! プレビュー用の compose 書き換え
//!
//! 元アプリの compose を PR 専用スタックとして動かせるように書き換える。
//! どのルールも入力だけで結果が決まる純粋な変換なので、同じ入力からは
//! 常に同じ出力になる。
//!
//! 1. Host(`...`) ルールからルーティングドメインを検出
//! 2. 自分たちのレジストリのイメージのタグを差し替え
//! 3. traefik の router / service 名とホスト名を PR 用に置換
//! 4. 絶対パスのバインドマウントを名前付きボリュームに変換して宣言

use crate::error::{ComposeError, Result};
use crate::model::{BindMount, ComposeFile, VolumeMount, split_image_reference};
use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

/// デフォルトのコンテナレジストリ
pub const DEFAULT_REGISTRY: &str = "ghcr.io";

/// `Host(`app.example.com`)` 形式のルール。最初のホスト名を取る
static HOST_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Host\(\s*`([^`]+)`").unwrap());

/// 書き換えの入力
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// 元アプリ名（アプリディレクトリの最後のセグメント）
    pub app_name: String,
    pub pr_number: u64,
    /// 差し替え先のイメージタグ
    pub tag: String,
    /// レジストリホスト (ghcr.io)
    pub registry: String,
    /// 自分たちのイメージを示すレジストリの owner / namespace
    pub repo_owner: String,
}

impl RewriteOptions {
    /// 一時スタック名 (`<app>-pr-<N>`)
    pub fn stack_name(&self) -> String {
        format!("{}-pr-{}", self.app_name, self.pr_number)
    }

    /// タグを差し替える対象イメージのプレフィックス (`ghcr.io/owner/`)
    pub fn image_prefix(&self) -> String {
        format!(
            "{}/{}/",
            self.registry.trim_end_matches('/'),
            self.repo_owner.trim_matches('/')
        )
    }
}

/// 検出したホスト名と、PR 用のホスト名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHost {
    /// ラベルから検出した元のホスト名
    pub original: String,
    /// 最初の DNS ラベルを除いたドメイン
    pub domain: String,
    /// `pr-<N>-<app>.<domain>`
    pub hostname: String,
}

impl PreviewHost {
    pub fn derive(original: &str, app_name: &str, pr_number: u64) -> Result<Self> {
        let domain = original
            .split_once('.')
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty())
            .ok_or_else(|| ComposeError::InvalidHostname(original.to_string()))?;

        Ok(Self {
            original: original.to_string(),
            domain: domain.to_string(),
            hostname: format!("pr-{}-{}.{}", pr_number, app_name, domain),
        })
    }

    pub fn url(&self) -> String {
        format!("https://{}", self.hostname)
    }
}

/// 書き換え結果のサマリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
    pub host: PreviewHost,
    /// タグを差し替えたサービス
    pub retagged_services: Vec<String>,
    /// 変化したラベルの数
    pub labels_changed: usize,
    /// バインドマウントから作った名前付きボリューム（初出順）
    pub volume_names: Vec<String>,
}

/// ラベルから最初の Host ルールのホスト名を探す
///
/// サービスはファイル上の順、ラベルはサービス内の順で線形に探索し、
/// 最初に見つかったものを返す。
pub fn detect_host(doc: &ComposeFile) -> Option<String> {
    doc.services
        .iter()
        .filter_map(|(name, service)| service.labels.as_ref().map(|labels| (name, labels)))
        .flat_map(|(name, labels)| labels.entries().into_iter().map(move |l| (name, l)))
        .find_map(|(name, label)| {
            let host = HOST_RULE.captures(&label)?.get(1)?.as_str().trim().to_string();
            debug!(service = %name, host = %host, "Detected routing host");
            Some(host)
        })
}

/// 自分たちのイメージのタグを差し替え、変更したサービス名を返す
pub fn retag_images(doc: &mut ComposeFile, image_prefix: &str, tag: &str) -> Vec<String> {
    let mut retagged = Vec::new();
    for (name, service) in doc.services.iter_mut() {
        let Some(image) = service.image.as_deref() else {
            continue;
        };
        if !image.starts_with(image_prefix) {
            continue;
        }

        let new_image = split_image_reference(image).with_tag(tag);
        debug!(service = %name, from = %image, to = %new_image, "Retagging image");
        service.image = Some(new_image);
        retagged.push(name.clone());
    }
    retagged
}

/// ラベル文字列に適用する置換
#[derive(Debug, Clone)]
pub struct LabelRenames {
    pairs: Vec<(String, String)>,
}

impl LabelRenames {
    pub fn new(options: &RewriteOptions, host: &PreviewHost) -> Self {
        let stack_name = options.stack_name();
        let pairs = vec![
            (
                format!("traefik.http.routers.{}", options.app_name),
                format!("traefik.http.routers.{}", stack_name),
            ),
            (
                format!("traefik.http.services.{}", options.app_name),
                format!("traefik.http.services.{}", stack_name),
            ),
            (host.original.clone(), host.hostname.clone()),
        ];
        Self { pairs }
    }

    /// 出現箇所をすべて置換する（正規表現ではなく単純な文字列置換）
    pub fn apply(&self, label: &str) -> String {
        self.pairs
            .iter()
            .fold(label.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

/// すべてのサービスのラベルを書き換え、変化したラベル数を返す
pub fn rename_labels(doc: &mut ComposeFile, renames: &LabelRenames) -> usize {
    doc.services
        .values_mut()
        .filter_map(|service| service.labels.as_mut())
        .map(|labels| labels.rewrite(|label| renames.apply(label)))
        .sum()
}

/// 絶対パスのバインドマウントを名前付きボリュームに変換する
///
/// 作ったボリューム名を初出順・重複なしで返す。
pub fn convert_bind_mounts(doc: &mut ComposeFile) -> IndexSet<String> {
    let mut names = IndexSet::new();
    for (service_name, service) in doc.services.iter_mut() {
        let Some(volumes) = service.volumes.as_mut() else {
            continue;
        };

        for volume in volumes.iter_mut() {
            let VolumeMount::Short(spec) = volume else {
                continue;
            };
            let Some(mount) = BindMount::parse(spec) else {
                continue;
            };

            let named = mount.to_named();
            debug!(service = %service_name, from = %spec, to = %named, "Converting bind mount");
            names.insert(mount.volume_name());
            *spec = named;
        }
    }
    names
}

/// env_file を持つサービスに上書き用ファイルを最後に追加する
///
/// env_file は後勝ちなので、末尾に置いたファイルの値が優先される。
/// env_file を持たないサービスには追加しない。追加したサービス名を返す。
pub fn prefer_env_override(doc: &mut ComposeFile, file: &str) -> Vec<String> {
    doc.services
        .iter_mut()
        .filter_map(|(name, service)| {
            let env_file = service.env_file.as_mut()?;
            env_file.push_last(file).then(|| name.clone())
        })
        .collect()
}

/// compose をプレビュー用に書き換える
pub fn rewrite(doc: &mut ComposeFile, options: &RewriteOptions) -> Result<RewriteReport> {
    let original = detect_host(doc).ok_or(ComposeError::DomainNotFound)?;
    let host = PreviewHost::derive(&original, &options.app_name, options.pr_number)?;
    info!(original = %host.original, preview = %host.hostname, "Derived preview hostname");

    let retagged_services = retag_images(doc, &options.image_prefix(), &options.tag);

    let renames = LabelRenames::new(options, &host);
    let labels_changed = rename_labels(doc, &renames);

    let volume_names = convert_bind_mounts(doc);
    let added = doc.declare_volumes(volume_names.iter().map(String::as_str));
    if !added.is_empty() {
        debug!(volumes = ?added, "Declared named volumes");
    }

    Ok(RewriteReport {
        host,
        retagged_services,
        labels_changed,
        volume_names: volume_names.into_iter().collect(),
    })
}
