//! previewflow の compose 操作
//!
//! - [`model`]: compose ファイルの型付きモデル
//! - [`rewrite`]: PR プレビュー用の書き換えルール
//! - [`stack`]: 一時スタックディレクトリの作成・削除
//! - [`tag`]: 常設デプロイのイメージタグ更新

pub mod error;
pub mod model;
pub mod rewrite;
pub mod stack;
pub mod tag;

pub use error::{ComposeError, Result};
pub use model::{ComposeFile, EnvFile, EnvFileEntry, Labels, Service, VolumeMount};
pub use rewrite::{DEFAULT_REGISTRY, PreviewHost, RewriteOptions, RewriteReport};
pub use stack::{
    POLICY_FILE, PreviewRequest, PreviewStack, SecretsOverride, TEMP_ENV_FILE,
    create_preview_stack, remove_preview_stack,
};
pub use tag::{TagUpdate, update_image_tag};
