//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compose`: 生成 MOPAC 输入文件
//! - `analyze`: 分析 MOPAC 的 .aux 输出
//! - `params`: 列出步骤参数
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compose, analyze, params

pub mod analyze;
pub mod compose;
pub mod params;

use crate::config::StepKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// mopac-step - MOPAC 工作流步骤
#[derive(Parser)]
#[command(name = "mopac-step")]
#[command(version)]
#[command(about = "Compose MOPAC inputs and analyze MOPAC results", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Write MOPAC input decks for a step
    Compose(compose::ComposeArgs),

    /// Analyze MOPAC .aux output for a step
    Analyze(analyze::AnalyzeArgs),

    /// List the parameters of a step
    Params(params::ParamsArgs),
}

/// 步骤类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StepArg {
    /// Single point energy
    Energy,
    /// Vibrational frequencies and IR spectrum
    Ir,
    /// Thermodynamic functions
    Thermodynamics,
}

impl From<StepArg> for StepKind {
    fn from(step: StepArg) -> Self {
        match step {
            StepArg::Energy => StepKind::Energy,
            StepArg::Ir => StepKind::Ir,
            StepArg::Thermodynamics => StepKind::Thermodynamics,
        }
    }
}

/// compose 与 analyze 共用的步骤参数
#[derive(Args, Debug)]
pub struct StepOptions {
    /// Step type
    #[arg(long, value_enum)]
    pub step: StepArg,

    /// Structure file (.xyz)
    #[arg(short = 's', long)]
    pub structure: PathBuf,

    /// Step parameter as NAME=VALUE (repeatable)
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Workflow variable as NAME=VALUE, referenced from parameters as $NAME
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,
}
