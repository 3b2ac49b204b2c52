pub mod cleanup;
pub mod comment;
pub mod deployment;
pub mod git_push;
pub mod health;
pub mod rewrite;
pub mod update_tag;

use clap::ValueEnum;

/// comment / deployment の操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// プレビューを公開した
    Deploy,
    /// プレビューを片付けた
    Cleanup,
}
