//! # params 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/params.rs`

use super::StepArg;
use clap::Args;

/// params 子命令参数
#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Step type
    #[arg(long, value_enum)]
    pub step: StepArg,

    /// Also print the help text of each parameter
    #[arg(long)]
    pub verbose: bool,
}
