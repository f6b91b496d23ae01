//! # 振动与热力学计算参数
//!
//! 红外（振动频率）与热力学步骤在单点能参数之上增加的参数，
//! 以及结构更新方式（覆盖当前构型或新建构型）与构型命名。
//!
//! ## 依赖关系
//! - 被 `config/mod.rs` 使用
//! - 使用 `config/energy.rs`

use super::{EnergyParameters, Hamiltonian, Kind, ParameterSpec, ValueDict};
use crate::error::{MopacStepError, Result};
use std::str::FromStr;

pub const STRUCTURE_HANDLING_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: "structure handling",
        kind: Kind::Enumeration,
        default: "be put in a new configuration",
        default_units: "",
        enumeration: &[
            "overwrite the current configuration",
            "be put in a new configuration",
        ],
        description: "Optimized structure will",
        help_text: "Whether to overwrite the current configuration, or create a new \
                    configuration for the new structure",
    },
    ParameterSpec {
        name: "configuration name",
        kind: Kind::String,
        default: "optimized with <Hamiltonian>",
        default_units: "",
        enumeration: &[
            "optimized with <Hamiltonian>",
            "keep current name",
            "use configuration number",
        ],
        description: "Configuration name:",
        help_text: "The name for the new configuration",
    },
];

pub const IR_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: "let",
        kind: Kind::Boolean,
        default: "no",
        default_units: "",
        enumeration: &["yes", "no"],
        description: "Use structure even if not a minimum:",
        help_text: "Don't stop if the initial structure is not a minimum or other \
                    stationary point.",
    },
    ParameterSpec {
        name: "configuration name",
        kind: Kind::String,
        default: "vibrations with <Hamiltonian>",
        default_units: "",
        enumeration: &[
            "keep current name",
            "vibrations with <Hamiltonian>",
            "use configuration number",
        ],
        description: "Configuration name:",
        help_text: "The name for the new configuration",
    },
];

pub const THERMODYNAMICS_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: "Tmin",
        kind: Kind::Float,
        default: "200",
        default_units: "K",
        enumeration: &[],
        description: "Minimum temperature:",
        help_text: "The minimum temperature for the thermodynamic functions.",
    },
    ParameterSpec {
        name: "Tmax",
        kind: Kind::Float,
        default: "400",
        default_units: "K",
        enumeration: &[],
        description: "Maximum temperature:",
        help_text: "The maximum temperature for the thermodynamic functions.",
    },
    ParameterSpec {
        name: "Tstep",
        kind: Kind::Float,
        default: "10",
        default_units: "K",
        enumeration: &[],
        description: "Temperature interval:",
        help_text: "The interval between temperatures for the thermodynamic functions.",
    },
    ParameterSpec {
        name: "trans",
        kind: Kind::Integer,
        default: "0",
        default_units: "",
        enumeration: &[],
        description: "Number of internal rotations to ignore:",
        help_text: "The number of internal rotations to ignore. A corresponding number of \
                    the lowest modes will be ignored, which is a first approximation.",
    },
];

/// 更新后的结构如何保存
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureHandling {
    Overwrite,
    NewConfiguration,
}

impl FromStr for StructureHandling {
    type Err = MopacStepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overwrite the current configuration" => Ok(StructureHandling::Overwrite),
            "be put in a new configuration" => Ok(StructureHandling::NewConfiguration),
            other => Err(MopacStepError::UnknownOption {
                parameter: "structure handling".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for StructureHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureHandling::Overwrite => write!(f, "overwrite the current configuration"),
            StructureHandling::NewConfiguration => write!(f, "be put in a new configuration"),
        }
    }
}

/// 构型命名方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationName {
    KeepCurrent,
    /// 构型在体系中的序号（从 1 开始）
    ConfigurationNumber,
    /// 自定义名称，`<Hamiltonian>` 会被替换
    Template(String),
}

impl FromStr for ConfigurationName {
    type Err = MopacStepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "keep current name" => Ok(ConfigurationName::KeepCurrent),
            "use configuration number" => Ok(ConfigurationName::ConfigurationNumber),
            "" => Err(MopacStepError::InvalidParameter {
                parameter: "configuration name".to_string(),
                value: String::new(),
                reason: "the name must not be empty".to_string(),
            }),
            other => Ok(ConfigurationName::Template(other.to_string())),
        }
    }
}

impl ConfigurationName {
    /// 计算新名称；`None` 表示保持原名
    pub fn resolve(&self, hamiltonian: Hamiltonian, number: usize) -> Option<String> {
        match self {
            ConfigurationName::KeepCurrent => None,
            ConfigurationName::ConfigurationNumber => Some(number.to_string()),
            ConfigurationName::Template(template) => {
                Some(template.replace("<Hamiltonian>", hamiltonian.as_str()))
            }
        }
    }

    pub fn describe(&self, hamiltonian: Hamiltonian) -> String {
        match self {
            ConfigurationName::KeepCurrent => "keeping the current name.".to_string(),
            ConfigurationName::ConfigurationNumber => {
                "using the index of the configuration (1, 2, ...) as its name.".to_string()
            }
            ConfigurationName::Template(template) => format!(
                "with '{}' as its name.",
                template.replace("<Hamiltonian>", hamiltonian.as_str())
            ),
        }
    }
}

/// 红外（振动）步骤参数
#[derive(Debug, Clone, PartialEq)]
pub struct VibrationParameters {
    pub energy: EnergyParameters,
    /// 结构不是驻点时仍继续 (LET)
    pub let_structure: bool,
    pub structure_handling: StructureHandling,
    pub configuration_name: ConfigurationName,
}

impl VibrationParameters {
    pub fn from_values(values: &ValueDict) -> Result<Self> {
        Ok(VibrationParameters {
            energy: EnergyParameters::from_values(values)?,
            let_structure: if values.contains("let") {
                values.boolean("let")?
            } else {
                false
            },
            structure_handling: values.choice("structure handling")?,
            configuration_name: values.choice("configuration name")?,
        })
    }
}

/// 热力学步骤参数
#[derive(Debug, Clone, PartialEq)]
pub struct ThermodynamicsParameters {
    pub vibrations: VibrationParameters,
    /// 温度范围与步长 (K)
    pub t_min: f64,
    pub t_max: f64,
    pub t_step: f64,
    /// 忽略的内旋转数
    pub trans: u32,
}

impl ThermodynamicsParameters {
    pub fn from_values(values: &ValueDict) -> Result<Self> {
        let t_min = values.quantity_in("Tmin", "K")?;
        let t_max = values.quantity_in("Tmax", "K")?;
        let t_step = values.interval_in("Tstep", "K")?;

        if t_max < t_min || t_step <= 0.0 {
            return Err(MopacStepError::InvalidParameter {
                parameter: "Tstep".to_string(),
                value: format!("{}..{} by {}", t_min, t_max, t_step),
                reason: "the temperature range must be increasing with a positive step"
                    .to_string(),
            });
        }

        let trans = values.integer("trans")?;
        let trans = u32::try_from(trans).map_err(|_| MopacStepError::InvalidParameter {
            parameter: "trans".to_string(),
            value: trans.to_string(),
            reason: "must not be negative".to_string(),
        })?;

        Ok(ThermodynamicsParameters {
            vibrations: VibrationParameters::from_values(values)?,
            t_min,
            t_max,
            t_step,
            trans,
        })
    }

    /// MOPAC THERMO 关键词
    pub fn thermo_keyword(&self) -> String {
        format!("THERMO({},{},{})", self.t_min, self.t_max, self.t_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParameterSet, StepKind};
    use std::collections::BTreeMap;

    #[test]
    fn test_ir_defaults() {
        let params = ParameterSet::for_step(StepKind::Ir);
        let values = params.current_values_to_dict(&BTreeMap::new()).unwrap();
        let p = VibrationParameters::from_values(&values).unwrap();

        assert!(!p.let_structure);
        assert_eq!(p.structure_handling, StructureHandling::NewConfiguration);
        assert_eq!(
            p.configuration_name.resolve(Hamiltonian::Pm7, 2).as_deref(),
            Some("vibrations with PM7")
        );
    }

    #[test]
    fn test_thermo_keyword() {
        let mut params = ParameterSet::for_step(StepKind::Thermodynamics);
        params.set("Tmin", "100").unwrap();
        params.set("Tstep", "50").unwrap();
        params.set("trans", "1").unwrap();
        let values = params.current_values_to_dict(&BTreeMap::new()).unwrap();
        let p = ThermodynamicsParameters::from_values(&values).unwrap();

        assert_eq!(p.thermo_keyword(), "THERMO(100,400,50)");
        assert_eq!(p.trans, 1);
    }

    #[test]
    fn test_thermo_temperatures_converted_to_kelvin() {
        let mut params = ParameterSet::for_step(StepKind::Thermodynamics);
        params.set("Tmin", "25 degC").unwrap();
        params.set("Tmax", "100 degC").unwrap();
        params.set("Tstep", "25 degC").unwrap();
        let values = params.current_values_to_dict(&BTreeMap::new()).unwrap();
        let p = ThermodynamicsParameters::from_values(&values).unwrap();
        assert!((p.t_min - 298.15).abs() < 1e-9);
        assert!((p.t_max - 373.15).abs() < 1e-9);
        assert!((p.t_step - 25.0).abs() < 1e-9);
        assert_eq!(p.thermo_keyword(), "THERMO(298.15,373.15,25)");

        let mut params = ParameterSet::for_step(StepKind::Thermodynamics);
        params.set("Tmin", "5 nm").unwrap();
        assert!(params.current_values_to_dict(&BTreeMap::new()).is_err());
    }

    #[test]
    fn test_thermo_rejects_bad_range() {
        let mut params = ParameterSet::for_step(StepKind::Thermodynamics);
        params.set("Tmin", "500").unwrap();
        let values = params.current_values_to_dict(&BTreeMap::new()).unwrap();
        assert!(ThermodynamicsParameters::from_values(&values).is_err());
    }

    #[test]
    fn test_configuration_name_options() {
        let keep: ConfigurationName = "keep current name".parse().unwrap();
        assert_eq!(keep.resolve(Hamiltonian::Am1, 1), None);

        let number: ConfigurationName = "use configuration number".parse().unwrap();
        assert_eq!(number.resolve(Hamiltonian::Am1, 3).as_deref(), Some("3"));
    }
}
