//! # analyze 子命令 CLI 定义
//!
//! .aux 文件可以逐个给出，也可以由 `--job-dir` 自动查找
//! （`input.aux` 在前，随后是 `followup_N.aux`）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze.rs`

use super::StepOptions;
use clap::Args;
use std::path::PathBuf;

/// analyze 子命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub options: StepOptions,

    /// MOPAC .aux files in run order
    #[arg(long = "aux", num_args = 1.., conflicts_with = "job_dir", required_unless_present = "job_dir")]
    pub aux: Vec<PathBuf>,

    /// Directory containing the .aux files of the step
    #[arg(long)]
    pub job_dir: Option<PathBuf>,

    /// Store a result as KEY=variable or KEY=table/column (repeatable)
    #[arg(long = "result", value_name = "KEY=TARGET")]
    pub results: Vec<String>,

    /// Output directory for side files (defaults to the job directory or '.')
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// Largest structure for which the per-atom table is printed
    #[arg(long, default_value_t = 25)]
    pub max_atoms_to_print: usize,

    /// Plot the IR spectrum (IR and thermodynamics steps)
    #[arg(long)]
    pub plot: bool,
}
