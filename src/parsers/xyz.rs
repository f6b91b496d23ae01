//! # XYZ 格式读写
//!
//! ## XYZ 格式说明
//! ```text
//! 3                      # 原子数
//! water                  # 注释行（构型名称）
//! O  0.000  0.000  0.000 # 元素 x y z (Å)
//! H  0.757  0.586  0.000
//! H -0.757  0.586  0.000
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `mopac/vibrations.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{MopacStepError, Result};
use crate::models::{AtomTable, Configuration};
use std::fs;
use std::path::Path;

/// 解析 XYZ 文件
pub fn parse_xyz_file(path: &Path) -> Result<Configuration> {
    let content = fs::read_to_string(path).map_err(|e| MopacStepError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xyz_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 XYZ 格式
pub fn parse_xyz_content(content: &str, default_name: &str) -> Result<Configuration> {
    let error = |reason: String| MopacStepError::ParseError {
        format: "xyz".to_string(),
        path: default_name.to_string(),
        reason,
    };

    let mut lines = content.lines();

    let n_atoms: usize = lines
        .next()
        .map(str::trim)
        .ok_or_else(|| error("File is empty".to_string()))?
        .parse()
        .map_err(|_| error("First line must be the number of atoms".to_string()))?;

    let name = lines.next().map(str::trim).unwrap_or_default();
    let name = if name.is_empty() { default_name } else { name };

    let mut atoms = AtomTable::new();
    for (i, line) in lines.filter(|l| !l.trim().is_empty()).take(n_atoms).enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(error(format!("Invalid atom line {}: '{}'", i + 3, line.trim())));
        }

        let mut xyz = [0.0; 3];
        for (k, value) in parts[1..4].iter().enumerate() {
            xyz[k] = value
                .parse()
                .map_err(|_| error(format!("Invalid coordinate '{}' on line {}", value, i + 3)))?;
        }
        atoms.push(normalize_symbol(parts[0]), xyz);
    }

    if atoms.len() != n_atoms {
        return Err(error(format!(
            "Expected {} atoms, found {}",
            n_atoms,
            atoms.len()
        )));
    }

    Ok(Configuration::new(name, atoms))
}

/// 元素符号规范化，如 "CL" -> "Cl"
fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// 转换为 XYZ 文本
pub fn to_xyz_string(configuration: &Configuration) -> String {
    let mut content = format!("{}\n{}\n", configuration.n_atoms(), configuration.name);
    for (symbol, [x, y, z]) in configuration
        .atoms
        .symbols()
        .iter()
        .zip(configuration.atoms.coordinates())
    {
        content.push_str(&format!("{:<2} {:>14.8} {:>14.8} {:>14.8}\n", symbol, x, y, z));
    }
    content
}

/// 写出 XYZ 文件
pub fn write_xyz_file(path: &Path, configuration: &Configuration) -> Result<()> {
    fs::write(path, to_xyz_string(configuration)).map_err(|e| MopacStepError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "3\nwater\nO 0.0 0.0 0.0\nh 0.757 0.586 0.0\nH -0.757 0.586 0.0\n";

    #[test]
    fn test_parse_xyz() {
        let configuration = parse_xyz_content(WATER, "fallback").unwrap();
        assert_eq!(configuration.name, "water");
        assert_eq!(configuration.n_atoms(), 3);
        assert_eq!(configuration.atoms.symbols()[1], "H");
        assert!((configuration.atoms.coordinates()[2][0] + 0.757).abs() < 1e-12);
    }

    #[test]
    fn test_blank_comment_uses_default_name() {
        let configuration = parse_xyz_content("1\n\nHe 0 0 0\n", "helium").unwrap();
        assert_eq!(configuration.name, "helium");
    }

    #[test]
    fn test_atom_count_mismatch() {
        let err = parse_xyz_content("2\nx\nHe 0 0 0\n", "x").unwrap_err();
        assert!(err.to_string().contains("Expected 2 atoms"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("water.xyz");
        let original = parse_xyz_content(WATER, "water").unwrap();

        write_xyz_file(&path, &original).unwrap();
        let back = parse_xyz_file(&path).unwrap();
        assert_eq!(back.atoms.symbols(), original.atoms.symbols());
        assert_eq!(back.name, "water");
    }
}
