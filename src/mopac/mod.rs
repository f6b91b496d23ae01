//! # MOPAC 步骤模块
//!
//! 由步骤参数生成 MOPAC 关键词与输入文件，并分析 `.aux` 输出。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `config/`, `models/`, `references/`, `utils/`
//! - 子模块: keywords, compose, description, deck, orbitals, store, analyze,
//!   spectrum, vibrations

pub mod analyze;
pub mod compose;
pub mod deck;
pub mod description;
pub mod keywords;
pub mod orbitals;
pub mod spectrum;
pub mod store;
pub mod vibrations;

pub use analyze::{analyze_energy, AnalysisOptions};
pub use compose::build_jobs;
pub use deck::input_deck;
pub use description::description_text;
pub use store::{RequestedResult, WorkflowStore};
pub use vibrations::analyze_vibrations;
