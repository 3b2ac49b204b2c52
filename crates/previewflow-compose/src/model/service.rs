//! サービス定義

use super::volume::VolumeMount;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// サービス定義
///
/// ```yaml
/// web:
///   image: ghcr.io/owner/app:tag
///   labels:
///     - traefik.http.routers.app.rule=Host(`app.example.com`)
///   volumes:
///     - /srv/data/app:/data
///   env_file: .enc.env
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<VolumeMount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<EnvFile>,
    /// その他のキー（ports, restart, networks ...）
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// ルーティングラベル
///
/// compose はリスト形式 (`- key=value`) とマップ形式 (`key: value`) の両方を許す。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    List(Vec<String>),
    Map(IndexMap<String, Value>),
}

impl Labels {
    /// ラベル文字列を格納順に列挙
    ///
    /// マップ形式では `key=value` に組み立てる（値が文字列でないものは値を省く）。
    pub fn entries(&self) -> Vec<String> {
        match self {
            Labels::List(labels) => labels.clone(),
            Labels::Map(labels) => labels
                .iter()
                .map(|(key, value)| match value.as_str() {
                    Some(value) => format!("{}={}", key, value),
                    None => key.clone(),
                })
                .collect(),
        }
    }

    /// すべてのラベル文字列に変換を適用し、変化したラベルの数を返す
    ///
    /// マップ形式ではキーと文字列値の両方に適用する。
    pub fn rewrite<F>(&mut self, f: F) -> usize
    where
        F: Fn(&str) -> String,
    {
        match self {
            Labels::List(labels) => {
                let mut changed = 0;
                for label in labels.iter_mut() {
                    let rewritten = f(label);
                    if rewritten != *label {
                        *label = rewritten;
                        changed += 1;
                    }
                }
                changed
            }
            Labels::Map(labels) => {
                let mut changed = 0;
                let rewritten: IndexMap<String, Value> = labels
                    .iter()
                    .map(|(key, value)| {
                        let new_key = f(key);
                        let new_value = match value {
                            Value::String(s) => Value::String(f(s)),
                            other => other.clone(),
                        };
                        if new_key != *key || new_value != *value {
                            changed += 1;
                        }
                        (new_key, new_value)
                    })
                    .collect();
                *labels = rewritten;
                changed
            }
        }
    }
}

/// env_file 指定（単一ファイル or リスト）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvFile {
    Single(String),
    List(Vec<EnvFileEntry>),
}

/// env_file リストの要素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvFileEntry {
    Path(String),
    /// `{ path: ..., required: false }` 形式
    Detailed(Mapping),
}

impl EnvFileEntry {
    pub fn path(&self) -> Option<&str> {
        match self {
            EnvFileEntry::Path(path) => Some(path),
            EnvFileEntry::Detailed(map) => map.get("path").and_then(Value::as_str),
        }
    }
}

impl EnvFile {
    pub fn contains(&self, file: &str) -> bool {
        match self {
            EnvFile::Single(path) => path == file,
            EnvFile::List(entries) => entries.iter().any(|e| e.path() == Some(file)),
        }
    }

    /// ファイルを末尾に追加する（後勝ちなので最優先になる）
    ///
    /// 既に含まれている場合は何もしない。追加したら true。
    pub fn push_last(&mut self, file: &str) -> bool {
        if self.contains(file) {
            return false;
        }

        let mut entries = match std::mem::replace(self, EnvFile::List(Vec::new())) {
            EnvFile::Single(path) => vec![EnvFileEntry::Path(path)],
            EnvFile::List(entries) => entries,
        };
        entries.push(EnvFileEntry::Path(file.to_string()));
        *self = EnvFile::List(entries);
        true
    }
}
