//! # 文献引用模块
//!
//! 记录计算中使用的方法与参数化所对应的文献。
//! `CitationRegistry` 由调用方注入；`References` 是默认实现，按别名去重。
//!
//! ## 依赖关系
//! - 被 `mopac/compose.rs`, `commands/compose.rs` 使用
//! - 子模块: bibliography, rules

pub mod bibliography;
pub mod rules;

pub use bibliography::{Bibliography, MopacBibliography};
pub use rules::cite_hamiltonian;

use crate::error::{MopacStepError, Result};

/// 本程序登记引用时使用的模块名
pub const MODULE_NAME: &str = "mopac_step";

/// 一条引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationRecord {
    pub alias: String,
    pub raw: String,
    pub module: String,
    /// 重要程度，1 为最高
    pub level: u8,
    pub note: String,
}

/// 引用登记接口。同一别名可以多次登记。
pub trait CitationRegistry {
    fn register(&mut self, alias: &str, record: CitationRecord) -> Result<()>;
}

/// 从文献库取原文并登记
pub fn cite(
    bibliography: &dyn Bibliography,
    registry: &mut dyn CitationRegistry,
    alias: &str,
    level: u8,
    note: &str,
) -> Result<()> {
    let raw = bibliography
        .raw(alias)
        .ok_or_else(|| MopacStepError::UnknownCitation(alias.to_string()))?;
    registry.register(
        alias,
        CitationRecord {
            alias: alias.to_string(),
            raw: raw.to_string(),
            module: MODULE_NAME.to_string(),
            level,
            note: note.to_string(),
        },
    )
}

/// 按首次登记顺序保存的引用列表
#[derive(Debug, Clone, Default)]
pub struct References {
    entries: Vec<(CitationRecord, usize)>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &CitationRecord> {
        self.entries.iter().map(|(record, _)| record)
    }

    /// 别名被登记的次数
    pub fn count(&self, alias: &str) -> usize {
        self.entries
            .iter()
            .find(|(record, _)| record.alias == alias)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.count(alias) > 0
    }
}

impl CitationRegistry for References {
    fn register(&mut self, alias: &str, record: CitationRecord) -> Result<()> {
        match self.entries.iter_mut().find(|(r, _)| r.alias == alias) {
            Some((_, n)) => *n += 1,
            None => self.entries.push((record, 1)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cite_twice_is_accepted() {
        let mut references = References::new();
        cite(&MopacBibliography, &mut references, "Stewart_2007", 1, "PM6").unwrap();
        cite(&MopacBibliography, &mut references, "Stewart_2007", 1, "PM6").unwrap();

        assert_eq!(references.len(), 1);
        assert_eq!(references.count("Stewart_2007"), 2);

        let record = references.records().next().unwrap();
        assert_eq!(record.module, MODULE_NAME);
        assert_eq!(record.level, 1);
    }

    #[test]
    fn test_unknown_alias() {
        let mut references = References::new();
        let err = cite(&MopacBibliography, &mut references, "Nobody_1900", 1, "").unwrap_err();
        assert!(matches!(err, MopacStepError::UnknownCitation(_)));
        assert!(references.is_empty());
    }
}
