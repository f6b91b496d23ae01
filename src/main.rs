//! # mopac-step - MOPAC 工作流步骤
//!
//! 半经验量子化学程序 MOPAC 的计算步骤：由参数与分子结构生成输入文件，
//! 并把 .aux 输出解析为报告、原子属性与可存储的结果。
//!
//! ## 子命令
//! - `compose` - 生成 MOPAC 输入文件 (input.mop, followup_N.mop)
//! - `analyze` - 分析 .aux 输出
//! - `params`  - 列出步骤参数
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── mopac/      (关键词组装与输出分析)
//!   │     ├── parsers/    (.aux 与 .xyz 解析)
//!   │     ├── config/     (步骤参数)
//!   │     ├── references/ (文献与引用规则)
//!   │     └── models/     (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod config;
mod error;
mod models;
mod mopac;
mod parsers;
mod references;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
