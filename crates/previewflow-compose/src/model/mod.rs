//! Deployment Description (docker-compose) のデータモデル
//!
//! 書き換えに関係するフィールドだけを型付けし、それ以外のキーは
//! `extra` にそのまま保持して書き戻す。

mod image;
mod service;
mod volume;

pub use image::{ImageRef, split_image_reference};
pub use service::{EnvFile, EnvFileEntry, Labels, Service};
pub use volume::{BindMount, DEFAULT_VOLUME_NAME, VolumeMount, volume_name_for_host_path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// compose ファイル全体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeFile {
    /// サービス定義（ファイル上の順序を保持）
    #[serde(default)]
    pub services: IndexMap<String, Service>,
    /// トップレベルのボリューム宣言
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<IndexMap<String, Value>>,
    /// networks, secrets など書き換え対象外のキー
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    /// 読み込んだときのキー順
    #[serde(skip)]
    key_order: KeyOrder,
}

impl ComposeFile {
    /// YAML から読み込む
    ///
    /// `<<: *anchor` のマージキーは型に載せる前に展開する。
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut value: Value = serde_yaml::from_str(content)?;
        value.apply_merge()?;

        let key_order = KeyOrder::capture(&value);
        let mut doc: Self = serde_yaml::from_value(value)?;
        doc.key_order = key_order;
        Ok(doc)
    }

    /// YAML に書き出す
    ///
    /// トップレベルと各サービスのキーは読み込んだときの順に戻し、
    /// 後から増えたキー（`volumes` など）は末尾に置く。
    /// serde_yaml は行の折り返しをせず、同じ入力からは常に同じ出力になる。
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        let mut value = serde_yaml::to_value(self)?;
        self.key_order.restore(&mut value);
        serde_yaml::to_string(&value)
    }

    /// ボリューム宣言を追加（既存の宣言は変更しない）
    ///
    /// 新しく追加した名前を返す。
    pub fn declare_volumes<'a, I>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names = names.into_iter().peekable();
        if names.peek().is_none() {
            return Vec::new();
        }

        let declarations = self.volumes.get_or_insert_with(IndexMap::new);
        let mut added = Vec::new();
        for name in names {
            if !declarations.contains_key(name) {
                declarations.insert(name.to_string(), Value::Null);
                added.push(name.to_string());
            }
        }
        added
    }
}

/// トップレベルと各サービスのキー順
#[derive(Debug, Clone, Default, PartialEq)]
struct KeyOrder {
    top: Vec<String>,
    services: IndexMap<String, Vec<String>>,
}

impl KeyOrder {
    fn capture(value: &Value) -> Self {
        let Some(root) = value.as_mapping() else {
            return Self::default();
        };

        let services = root
            .get("services")
            .and_then(Value::as_mapping)
            .map(|services| {
                services
                    .iter()
                    .filter_map(|(name, service)| {
                        Some((name.as_str()?.to_string(), keys_of(service.as_mapping()?)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            top: keys_of(root),
            services,
        }
    }

    fn restore(&self, value: &mut Value) {
        let Some(root) = value.as_mapping_mut() else {
            return;
        };
        reorder(root, &self.top);

        let Some(services) = root.get_mut("services").and_then(Value::as_mapping_mut) else {
            return;
        };
        for (name, order) in &self.services {
            if let Some(service) = services.get_mut(name.as_str()).and_then(Value::as_mapping_mut) {
                reorder(service, order);
            }
        }
    }
}

fn keys_of(mapping: &Mapping) -> Vec<String> {
    mapping
        .keys()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// `order` にあるキーをその順で前に、残りは元の順のまま後ろに並べる
fn reorder(mapping: &mut Mapping, order: &[String]) {
    let position = |key: &Value| {
        key.as_str()
            .and_then(|key| order.iter().position(|o| o == key))
            .unwrap_or(usize::MAX)
    };

    let mut entries: Vec<(Value, Value)> = std::mem::take(mapping).into_iter().collect();
    entries.sort_by_key(|(key, _)| position(key));
    *mapping = entries.into_iter().collect();
}
