use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("アプリケーションパスからアプリ名を決定できません: {0}")]
    InvalidAppPath(PathBuf),

    #[error(
        "compose ファイルが見つかりません: {0}\n\
        以下のいずれかを配置してください: docker-compose.yml, docker-compose.yaml, compose.yml, compose.yaml"
    )]
    ComposeFileNotFound(PathBuf),

    #[error("ステップ出力ファイルへの書き込みに失敗しました: {path}\n理由: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
