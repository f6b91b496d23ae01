//! # 步骤参数模块
//!
//! 每个 MOPAC 步骤声明一组参数（类型、缺省值、可选值、说明）。
//! `ParameterSet` 保存用户设定的原始值；`current_values_to_dict` 解析
//! `$变量` 引用并按声明校验，得到 `ValueDict`，再由各步骤构造强类型参数。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `mopac/` 使用
//! - 子模块: energy, vibrations

pub mod energy;
pub mod vibrations;

pub use energy::{
    Convergence, EnergyParameters, Hamiltonian, HamiltonianFamily, Mozyme, MozymeFollowUp,
    StructureSource,
};
pub use vibrations::{StructureHandling, ThermodynamicsParameters, VibrationParameters};

use crate::error::{MopacStepError, Result};
use crate::utils::units::{split_quantity, UnitConverter, UnitTable};
use std::collections::BTreeMap;

/// 步骤类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Energy,
    Ir,
    Thermodynamics,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Energy => write!(f, "Energy"),
            StepKind::Ir => write!(f, "IR Spectrum"),
            StepKind::Thermodynamics => write!(f, "Thermodynamics"),
        }
    }
}

/// 参数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// 取值必须在枚举列表中
    Enumeration,
    Boolean,
    Integer,
    Float,
    /// 自由文本，枚举列表仅作提示
    String,
    List,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Enumeration => write!(f, "enumeration"),
            Kind::Boolean => write!(f, "boolean"),
            Kind::Integer => write!(f, "integer"),
            Kind::Float => write!(f, "float"),
            Kind::String => write!(f, "string"),
            Kind::List => write!(f, "list"),
        }
    }
}

/// 参数声明
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: Kind,
    /// 列表类型以空白分隔
    pub default: &'static str,
    pub default_units: &'static str,
    pub enumeration: &'static [&'static str],
    pub description: &'static str,
    pub help_text: &'static str,
}

/// 参数原始值
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Scalar(String),
    List(Vec<String>),
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Scalar(s) => write!(f, "{}", s),
            ParameterValue::List(items) => write!(f, "{}", items.join(" ")),
        }
    }
}

impl ParameterSpec {
    fn default_value(&self) -> ParameterValue {
        match self.kind {
            Kind::List => ParameterValue::List(
                self.default
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
            ),
            _ => ParameterValue::Scalar(self.default.to_string()),
        }
    }

    /// 按声明校验取值
    fn validate(&self, value: &ParameterValue) -> Result<()> {
        let text = match value {
            ParameterValue::List(_) if self.kind == Kind::List => return Ok(()),
            ParameterValue::List(items) => {
                return Err(self.invalid(&items.join(" "), "a single value is required"))
            }
            ParameterValue::Scalar(s) => s.as_str(),
        };

        match self.kind {
            Kind::Enumeration => {
                if !self.enumeration.contains(&text) {
                    return Err(MopacStepError::UnknownOption {
                        parameter: self.name.to_string(),
                        value: text.to_string(),
                    });
                }
            }
            Kind::Boolean => {
                parse_bool(text).ok_or_else(|| self.invalid(text, "expected yes or no"))?;
            }
            Kind::Integer => {
                let trimmed = text.trim();
                trimmed
                    .parse::<i64>()
                    .map_err(|_| self.invalid(text, "expected an integer"))?;
                if !self.enumeration.is_empty() && !self.enumeration.contains(&trimmed) {
                    return Err(MopacStepError::UnknownOption {
                        parameter: self.name.to_string(),
                        value: trimmed.to_string(),
                    });
                }
            }
            Kind::Float => {
                let (_, unit) =
                    split_quantity(text).ok_or_else(|| self.invalid(text, "expected a number"))?;
                if let Some(unit) = unit {
                    if self.default_units.is_empty() {
                        return Err(self.invalid(text, "this parameter does not take units"));
                    }
                    UnitTable.convert(1.0, unit, self.default_units).map_err(|_| {
                        self.invalid(
                            text,
                            &format!("cannot convert '{}' to '{}'", unit, self.default_units),
                        )
                    })?;
                }
            }
            Kind::String | Kind::List => {}
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> MopacStepError {
        MopacStepError::InvalidParameter {
            parameter: self.name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "yes" | "true" | "y" | "1" => Some(true),
        "no" | "false" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// 一个步骤实例的参数集合
#[derive(Debug, Clone)]
pub struct ParameterSet {
    specs: Vec<ParameterSpec>,
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterSet {
    /// 由若干组声明构造；后出现的同名声明覆盖先前的
    pub fn new(groups: &[&[ParameterSpec]]) -> Self {
        let mut specs: Vec<ParameterSpec> = Vec::new();
        for group in groups {
            for spec in group.iter() {
                match specs.iter_mut().find(|s| s.name == spec.name) {
                    Some(existing) => *existing = *spec,
                    None => specs.push(*spec),
                }
            }
        }
        ParameterSet {
            specs,
            values: BTreeMap::new(),
        }
    }

    /// 指定步骤的参数集合
    pub fn for_step(step: StepKind) -> Self {
        match step {
            StepKind::Energy => ParameterSet::new(&[energy::ENERGY_PARAMETERS]),
            StepKind::Ir => ParameterSet::new(&[
                energy::ENERGY_PARAMETERS,
                vibrations::STRUCTURE_HANDLING_PARAMETERS,
                vibrations::IR_PARAMETERS,
            ]),
            StepKind::Thermodynamics => ParameterSet::new(&[
                energy::ENERGY_PARAMETERS,
                vibrations::STRUCTURE_HANDLING_PARAMETERS,
                vibrations::THERMODYNAMICS_PARAMETERS,
            ]),
        }
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    pub fn spec(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// 设定标量值；列表类型按空白拆分
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let spec = self
            .spec(name)
            .ok_or_else(|| MopacStepError::UnknownParameter(name.to_string()))?;
        let value = match spec.kind {
            Kind::List => {
                ParameterValue::List(value.split_whitespace().map(str::to_string).collect())
            }
            _ => ParameterValue::Scalar(value.trim().to_string()),
        };
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// 解析 "name=value" 形式的设定
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            MopacStepError::InvalidArgument(format!(
                "Expected NAME=VALUE for a parameter, got '{}'",
                assignment
            ))
        })?;
        self.set(name.trim(), value)
    }

    pub fn set_list(&mut self, name: &str, items: Vec<String>) -> Result<()> {
        if self.spec(name).is_none() {
            return Err(MopacStepError::UnknownParameter(name.to_string()));
        }
        self.values
            .insert(name.to_string(), ParameterValue::List(items));
        Ok(())
    }

    /// 所有参数的当前值（未设定的取缺省值），不做校验
    pub fn values_to_dict(&self) -> BTreeMap<String, ParameterValue> {
        self.specs
            .iter()
            .map(|spec| {
                let value = self
                    .values
                    .get(spec.name)
                    .cloned()
                    .unwrap_or_else(|| spec.default_value());
                (spec.name.to_string(), value)
            })
            .collect()
    }

    /// 解析 `$变量` 并校验所有参数
    pub fn current_values_to_dict(&self, context: &BTreeMap<String, String>) -> Result<ValueDict> {
        let mut resolved = BTreeMap::new();
        for (name, value) in self.values_to_dict() {
            let value = match value {
                ParameterValue::Scalar(s) if s.starts_with('$') => {
                    let variable = s.trim_start_matches('$');
                    let text = context
                        .get(variable)
                        .ok_or_else(|| MopacStepError::UndefinedVariable(variable.to_string()))?;
                    ParameterValue::Scalar(text.clone())
                }
                other => other,
            };

            if let Some(spec) = self.spec(&name) {
                spec.validate(&value)?;
            }
            resolved.insert(name, value);
        }
        Ok(ValueDict { values: resolved })
    }
}

/// 任一步骤的强类型参数
#[derive(Debug, Clone, PartialEq)]
pub enum StepParameters {
    Energy(EnergyParameters),
    Ir(VibrationParameters),
    Thermodynamics(ThermodynamicsParameters),
}

impl StepParameters {
    pub fn from_values(step: StepKind, values: &ValueDict) -> Result<Self> {
        Ok(match step {
            StepKind::Energy => StepParameters::Energy(EnergyParameters::from_values(values)?),
            StepKind::Ir => StepParameters::Ir(VibrationParameters::from_values(values)?),
            StepKind::Thermodynamics => {
                StepParameters::Thermodynamics(ThermodynamicsParameters::from_values(values)?)
            }
        })
    }

    pub fn kind(&self) -> StepKind {
        match self {
            StepParameters::Energy(_) => StepKind::Energy,
            StepParameters::Ir(_) => StepKind::Ir,
            StepParameters::Thermodynamics(_) => StepKind::Thermodynamics,
        }
    }

    pub fn energy(&self) -> &EnergyParameters {
        match self {
            StepParameters::Energy(p) => p,
            StepParameters::Ir(p) => &p.energy,
            StepParameters::Thermodynamics(p) => &p.vibrations.energy,
        }
    }
}

/// 已校验的参数值
#[derive(Debug, Clone)]
pub struct ValueDict {
    values: BTreeMap<String, ParameterValue>,
}

impl ValueDict {
    fn get(&self, name: &str) -> Result<&ParameterValue> {
        self.values
            .get(name)
            .ok_or_else(|| MopacStepError::UnknownParameter(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Result<String> {
        Ok(self.get(name)?.to_string())
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        let text = self.text(name)?;
        parse_bool(&text).ok_or_else(|| MopacStepError::InvalidParameter {
            parameter: name.to_string(),
            value: text.clone(),
            reason: "expected yes or no".to_string(),
        })
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        let text = self.text(name)?;
        text.trim()
            .parse()
            .map_err(|_| MopacStepError::InvalidParameter {
                parameter: name.to_string(),
                value: text.clone(),
                reason: "expected an integer".to_string(),
            })
    }

    /// 浮点数及其单位（若给出）
    pub fn quantity(&self, name: &str) -> Result<(f64, Option<String>)> {
        let text = self.text(name)?;
        split_quantity(&text)
            .map(|(v, u)| (v, u.map(str::to_string)))
            .ok_or_else(|| MopacStepError::InvalidParameter {
                parameter: name.to_string(),
                value: text.clone(),
                reason: "expected a number".to_string(),
            })
    }

    /// 浮点数的原始数字文本（去掉单位）
    pub fn number_text(&self, name: &str) -> Result<String> {
        self.quantity(name)?;
        let text = self.text(name)?;
        Ok(text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    /// 换算到 `units` 的数值；未给单位时按 `units` 理解
    pub fn quantity_in(&self, name: &str, units: &str) -> Result<f64> {
        match self.quantity(name)? {
            (value, None) => Ok(value),
            (value, Some(unit)) if unit == units => Ok(value),
            (value, Some(unit)) => UnitTable.convert(value, &unit, units),
        }
    }

    /// 换算到 `units` 的间隔，只取比例不计偏移（温度步长）
    pub fn interval_in(&self, name: &str, units: &str) -> Result<f64> {
        match self.quantity(name)? {
            (value, None) => Ok(value),
            (value, Some(unit)) if unit == units => Ok(value),
            (value, Some(unit)) => {
                Ok(UnitTable.convert(value, &unit, units)? - UnitTable.convert(0.0, &unit, units)?)
            }
        }
    }

    /// 以 `units` 表示的数字文本；单位相同或缺省时保留原文
    pub fn number_text_in(&self, name: &str, units: &str) -> Result<String> {
        match self.quantity(name)? {
            (_, None) => self.number_text(name),
            (_, Some(unit)) if unit == units => self.number_text(name),
            (value, Some(unit)) => Ok(format!("{:.3E}", UnitTable.convert(value, &unit, units)?)),
        }
    }

    pub fn list(&self, name: &str) -> Result<Vec<String>> {
        match self.get(name)? {
            ParameterValue::List(items) => Ok(items.clone()),
            ParameterValue::Scalar(s) => Ok(s.split_whitespace().map(str::to_string).collect()),
        }
    }

    /// 解析为枚举类型
    pub fn choice<T>(&self, name: &str) -> Result<T>
    where
        T: std::str::FromStr<Err = MopacStepError>,
    {
        self.text(name)?.parse()
    }
}
