//! # 分子结构数据模型
//!
//! 定义体系 (System)、构型 (Configuration) 与原子表 (AtomTable)。
//! 原子表除元素与坐标外，还可以挂载按需创建的逐原子属性列（电荷、自旋等）。
//!
//! ## 依赖关系
//! - 被 `parsers/xyz.rs`, `mopac/` 使用
//! - 使用 `error.rs`

use crate::error::{MopacStepError, Result};
use std::collections::BTreeMap;

/// 属性列的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Float,
    Integer,
}

/// 逐原子属性列
#[derive(Debug, Clone)]
pub struct AttributeColumn {
    pub coltype: ColumnType,

    /// 为 true 时只属于当前构型，新建构型时不会复制
    pub configuration_dependent: bool,

    pub values: Vec<f64>,
}

/// 原子表
#[derive(Debug, Clone, Default)]
pub struct AtomTable {
    symbols: Vec<String>,

    /// 笛卡尔坐标 (Å)
    coordinates: Vec<[f64; 3]>,

    attributes: BTreeMap<String, AttributeColumn>,
}

impl AtomTable {
    pub fn new() -> Self {
        AtomTable::default()
    }

    /// 追加一个原子
    pub fn push(&mut self, symbol: impl Into<String>, xyz: [f64; 3]) {
        self.symbols.push(symbol.into());
        self.coordinates.push(xyz);
        for column in self.attributes.values_mut() {
            column.values.push(0.0);
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// 元素符号（按原子顺序）
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn coordinates(&self) -> &[[f64; 3]] {
        &self.coordinates
    }

    /// 整体替换坐标，长度必须与原子数一致
    pub fn set_coordinates(&mut self, xyz: Vec<[f64; 3]>) -> Result<()> {
        if xyz.len() != self.len() {
            return Err(MopacStepError::AttributeLength {
                name: "coordinates".to_string(),
                expected: self.len(),
                found: xyz.len(),
            });
        }
        self.coordinates = xyz;
        Ok(())
    }

    /// 新增属性列，初值为 0。已存在时保持不变。
    pub fn add_attribute(
        &mut self,
        name: &str,
        coltype: ColumnType,
        configuration_dependent: bool,
    ) {
        let n = self.len();
        self.attributes
            .entry(name.to_string())
            .or_insert_with(|| AttributeColumn {
                coltype,
                configuration_dependent,
                values: vec![0.0; n],
            });
    }

    /// 为所有原子整体赋值
    pub fn assign(&mut self, name: &str, values: &[f64]) -> Result<()> {
        let n = self.len();
        let column = self
            .attributes
            .get_mut(name)
            .ok_or_else(|| MopacStepError::UnknownAttribute(name.to_string()))?;

        if values.len() != n {
            return Err(MopacStepError::AttributeLength {
                name: name.to_string(),
                expected: n,
                found: values.len(),
            });
        }

        if column.coltype == ColumnType::Integer && values.iter().any(|v| v.fract() != 0.0) {
            return Err(MopacStepError::InvalidArgument(format!(
                "Attribute '{}' holds integers",
                name
            )));
        }

        column.values.clear();
        column.values.extend_from_slice(values);
        Ok(())
    }

    /// 复制原子表，但丢弃与构型相关的属性列
    fn shared_copy(&self) -> AtomTable {
        AtomTable {
            symbols: self.symbols.clone(),
            coordinates: self.coordinates.clone(),
            attributes: self
                .attributes
                .iter()
                .filter(|(_, c)| !c.configuration_dependent)
                .map(|(k, c)| (k.clone(), c.clone()))
                .collect(),
        }
    }
}

/// 分子构型
#[derive(Debug, Clone)]
pub struct Configuration {
    /// 构型名称
    pub name: String,

    /// 净电荷
    pub charge: i32,

    /// 自旋多重度 (2S+1)
    pub spin_multiplicity: u32,

    /// 周期性维数，分子为 0
    pub periodicity: u8,

    pub atoms: AtomTable,
}

impl Configuration {
    pub fn new(name: impl Into<String>, atoms: AtomTable) -> Self {
        Configuration {
            name: name.into(),
            charge: 0,
            spin_multiplicity: 1,
            periodicity: 0,
            atoms,
        }
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// 计算化学式（按元素字母序）
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for symbol in self.atoms.symbols() {
            *counts.entry(symbol.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// 体系：同一组原子的多个构型
#[derive(Debug, Clone)]
pub struct System {
    pub name: String,
    configurations: Vec<Configuration>,
    current: usize,
}

impl System {
    pub fn new(name: impl Into<String>, initial: Configuration) -> Self {
        System {
            name: name.into(),
            configurations: vec![initial],
            current: 0,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configurations[self.current]
    }

    /// 当前构型的序号（从 1 开始）
    pub fn configuration_number(&self) -> usize {
        self.current + 1
    }

    pub fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.configurations[self.current]
    }

    /// 以当前构型为模板新建构型并设为当前构型
    pub fn create_configuration(&mut self) -> &mut Configuration {
        let template = &self.configurations[self.current];
        let configuration = Configuration {
            name: template.name.clone(),
            charge: template.charge,
            spin_multiplicity: template.spin_multiplicity,
            periodicity: template.periodicity,
            atoms: template.atoms.shared_copy(),
        };
        self.configurations.push(configuration);
        self.current = self.configurations.len() - 1;
        &mut self.configurations[self.current]
    }
}

#[cfg(test)]
impl AtomTable {
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.attributes.get(name).map(|c| c.values.as_slice())
    }
}

#[cfg(test)]
impl System {
    pub fn n_configurations(&self) -> usize {
        self.configurations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Configuration {
        let mut atoms = AtomTable::new();
        atoms.push("O", [0.0, 0.0, 0.0]);
        atoms.push("H", [0.757, 0.586, 0.0]);
        atoms.push("H", [-0.757, 0.586, 0.0]);
        Configuration::new("water", atoms)
    }

    #[test]
    fn test_formula() {
        assert_eq!(water().formula(), "H2O");
    }

    #[test]
    fn test_add_attribute_is_lazy() {
        let mut conf = water();
        conf.atoms.add_attribute("charge", ColumnType::Float, true);
        conf.atoms.assign("charge", &[-0.6, 0.3, 0.3]).unwrap();

        // 再次添加不会覆盖已有值
        conf.atoms.add_attribute("charge", ColumnType::Float, true);
        assert_eq!(conf.atoms.column("charge").unwrap(), &[-0.6, 0.3, 0.3]);
    }

    #[test]
    fn test_assign_length_mismatch() {
        let mut conf = water();
        conf.atoms.add_attribute("charge", ColumnType::Float, true);
        let err = conf.atoms.assign("charge", &[0.1, -0.1]).unwrap_err();
        assert!(matches!(
            err,
            MopacStepError::AttributeLength {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_integer_column_rejects_fractions() {
        let mut conf = water();
        conf.atoms.add_attribute("label", ColumnType::Integer, false);
        assert!(conf.atoms.assign("label", &[1.0, 2.0, 2.5]).is_err());
        conf.atoms.assign("label", &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(conf.atoms.column("label").unwrap(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_assign_unknown_attribute() {
        let mut conf = water();
        assert!(conf.atoms.assign("spin", &[0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_new_configuration_drops_dependent_columns() {
        let mut conf = water();
        conf.atoms.add_attribute("charge", ColumnType::Float, true);
        conf.atoms.add_attribute("label", ColumnType::Integer, false);

        let mut system = System::new("water", conf);
        let new_conf = system.create_configuration();

        assert!(!new_conf.atoms.contains("charge"));
        assert!(new_conf.atoms.contains("label"));
        assert_eq!(system.n_configurations(), 2);
    }
}
