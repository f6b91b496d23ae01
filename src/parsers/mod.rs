//! # 解析器模块
//!
//! 提供 MOPAC 输出与结构文件的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `mopac/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: aux, xyz

pub mod aux;
pub mod xyz;
