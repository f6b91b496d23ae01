//! # compose 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compose.rs`

use super::StepOptions;
use clap::Args;
use std::path::PathBuf;

/// compose 子命令参数
#[derive(Args, Debug)]
pub struct ComposeArgs {
    #[command(flatten)]
    pub options: StepOptions,

    /// Extra MOPAC keyword (repeatable), e.g. 'GNORM=0.1'
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Position of this step in the flowchart (1 = first)
    #[arg(long, default_value_t = 1)]
    pub step_index: usize,

    /// Net charge of the structure
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub charge: i32,

    /// Spin multiplicity of the structure
    #[arg(long, default_value_t = 1)]
    pub multiplicity: u32,

    /// Output directory for the input decks
    #[arg(short = 'o', long, default_value = ".")]
    pub output: PathBuf,
}
