//! ボリュームマウント定義

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// ホストパスから名前を決められないときのボリューム名
pub const DEFAULT_VOLUME_NAME: &str = "data";

/// サービスの volumes 要素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolumeMount {
    /// `host:container[:options]` 形式
    Short(String),
    /// `type: bind` などの構造化形式（書き換えずに通す）
    Long(Value),
}

/// 短縮形式のうち、ホスト側が絶対パスのバインドマウント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount<'a> {
    pub host_path: &'a str,
    /// コンテナ側パスとオプション（`/data:ro` など）
    pub target: &'a str,
}

impl<'a> BindMount<'a> {
    /// 短縮形式を解析する
    ///
    /// 最初の `:` で分割し、残りはオプションごとコンテナ側として扱う。
    /// `:` を含まないもの（匿名ボリューム）やホスト側が絶対パスでないもの
    /// （名前付きボリューム、相対パス）は `None`。
    pub fn parse(spec: &'a str) -> Option<Self> {
        let (host_path, target) = spec.split_once(':')?;
        if !host_path.starts_with('/') {
            return None;
        }
        Some(Self { host_path, target })
    }

    pub fn volume_name(&self) -> String {
        volume_name_for_host_path(self.host_path)
    }

    /// 名前付きボリューム参照に変換した短縮形式
    pub fn to_named(&self) -> String {
        format!("{}:{}", self.volume_name(), self.target)
    }
}

/// ホストパスから名前付きボリュームの名前を決める
///
/// 最後の空でないセグメントを使う (`/data/app/uploads` → `uploads`)。
/// ボリューム名は英数字で始まる必要があるので先頭の記号は落とし、
/// 何も残らなければ [`DEFAULT_VOLUME_NAME`]。
pub fn volume_name_for_host_path(host_path: &str) -> String {
    host_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.trim_start_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_VOLUME_NAME)
        .to_string()
}
