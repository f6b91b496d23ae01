//! # 数据模型模块
//!
//! 定义分子结构与计算结果数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `mopac/` 和 `commands/` 使用
//! - 子模块: structure, results

pub mod results;
pub mod structure;

pub use results::{ResultMapping, ResultValue};
pub use structure::{AtomTable, ColumnType, Configuration, System};
