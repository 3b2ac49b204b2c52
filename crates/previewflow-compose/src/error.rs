use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("IO エラー: {path}\n理由: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ディレクトリのコピーに失敗しました: {from} -> {to}\n理由: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("アプリケーションディレクトリが見つかりません: {0}")]
    AppDirNotFound(PathBuf),

    #[error("compose パースエラー: {path}\n理由: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("compose シリアライズエラー: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error(
        "ルーティングドメインを検出できません\n\
        ヒント: いずれかのサービスのラベルに Host(`app.example.com`) 形式のルールが必要です"
    )]
    DomainNotFound,

    #[error("ホスト名からドメインを取り出せません: {0}")]
    InvalidHostname(String),

    #[error("イメージのパターンを組み立てられません: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Config(#[from] previewflow_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
