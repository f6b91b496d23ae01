//! # 工具函数模块
//!
//! 提供美化输出、进度条、文本排版与单位换算。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `mopac/` 使用
//! - 子模块: output, progress, text, units

pub mod output;
pub mod progress;
pub mod text;
pub mod units;
