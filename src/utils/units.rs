//! # 单位换算
//!
//! 能量、长度与温度单位的简单换算表，以及“数值 + 单位”字符串的拆分。
//!
//! ## 依赖关系
//! - 被 `config/`（参数校验与换算）和 `mopac/analyze.rs`（生成焓）使用

use crate::error::{MopacStepError, Result};

/// 单位换算接口
pub trait UnitConverter {
    /// 将 `value` 从 `from` 单位换算到 `to` 单位，返回数值
    fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64>;
}

/// 单位量纲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Energy,
    Length,
    Temperature,
}

/// (单位名, 量纲, 系数, 偏移)：基准值 = 数值 × 系数 + 偏移
///
/// 能量基准为 kJ/mol，长度基准为 Å，温度基准为 K。
const UNITS: &[(&str, Dimension, f64, f64)] = &[
    ("kJ/mol", Dimension::Energy, 1.0, 0.0),
    ("kcal/mol", Dimension::Energy, 4.184, 0.0),
    ("eV", Dimension::Energy, 96.485_332_12, 0.0),
    ("E_h", Dimension::Energy, 2625.499_639, 0.0),
    ("hartree", Dimension::Energy, 2625.499_639, 0.0),
    ("Å", Dimension::Length, 1.0, 0.0),
    ("angstrom", Dimension::Length, 1.0, 0.0),
    ("nm", Dimension::Length, 10.0, 0.0),
    ("pm", Dimension::Length, 0.01, 0.0),
    ("bohr", Dimension::Length, 0.529_177_210_9, 0.0),
    ("K", Dimension::Temperature, 1.0, 0.0),
    ("degC", Dimension::Temperature, 1.0, 273.15),
    ("°C", Dimension::Temperature, 1.0, 273.15),
    ("degF", Dimension::Temperature, 5.0 / 9.0, 459.67 * 5.0 / 9.0),
    ("°F", Dimension::Temperature, 5.0 / 9.0, 459.67 * 5.0 / 9.0),
];

/// 内置换算表
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitTable;

impl UnitTable {
    fn lookup(unit: &str) -> Option<(Dimension, f64, f64)> {
        UNITS
            .iter()
            .find(|(name, ..)| *name == unit)
            .or_else(|| UNITS.iter().find(|(name, ..)| name.eq_ignore_ascii_case(unit)))
            .map(|(_, dim, factor, offset)| (*dim, *factor, *offset))
    }
}

impl UnitConverter for UnitTable {
    fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64> {
        let error = || MopacStepError::UnitConversion {
            value,
            from: from.to_string(),
            to: to.to_string(),
        };

        let (from_dim, from_factor, from_offset) = Self::lookup(from).ok_or_else(error)?;
        let (to_dim, to_factor, to_offset) = Self::lookup(to).ok_or_else(error)?;
        if from_dim != to_dim {
            return Err(error());
        }

        Ok((value * from_factor + from_offset - to_offset) / to_factor)
    }
}

/// 拆分 "1.3 Å" 形式的字符串，单位缺省时返回 `None`
pub fn split_quantity(text: &str) -> Option<(f64, Option<&str>)> {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let value: f64 = parts.next()?.parse().ok()?;
    let unit = parts.next().map(str::trim).filter(|u| !u.is_empty());
    Some((value, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kcal_to_kj() {
        let kj = UnitTable.convert(-10.0, "kcal/mol", "kJ/mol").unwrap();
        assert!((kj - (-41.84)).abs() < 1e-9);
    }

    #[test]
    fn test_length_conversion() {
        let a = UnitTable.convert(0.13, "nm", "Å").unwrap();
        assert!((a - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_incompatible_units() {
        assert!(UnitTable.convert(1.0, "eV", "Å").is_err());
        assert!(UnitTable.convert(1.0, "furlong", "Å").is_err());
    }

    #[test]
    fn test_temperature_offsets() {
        let k = UnitTable.convert(25.0, "degC", "K").unwrap();
        assert!((k - 298.15).abs() < 1e-9);
        let k = UnitTable.convert(32.0, "degF", "K").unwrap();
        assert!((k - 273.15).abs() < 1e-9);
        assert!(UnitTable.convert(1.0, "K", "kcal/mol").is_err());
    }

    #[test]
    fn test_split_quantity() {
        assert_eq!(split_quantity("1.3 Å"), Some((1.3, Some("Å"))));
        assert_eq!(split_quantity("78.4"), Some((78.4, None)));
        assert_eq!(split_quantity("abc"), None);
    }
}
