//! # 单点能计算参数
//!
//! 单点能步骤的参数声明与强类型参数 `EnergyParameters`。
//! 振动与热力学步骤在此基础上扩展。
//!
//! ## 依赖关系
//! - 被 `config/mod.rs`, `config/vibrations.rs` 使用
//! - 被 `mopac/` 使用

use super::{Kind, ParameterSpec, ValueDict};
use crate::error::{MopacStepError, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────
// 参数声明
// ─────────────────────────────────────────────────────────────

pub const ENERGY_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: "structure",
        kind: Kind::Enumeration,
        default: "default",
        default_units: "",
        enumeration: &["default", "initial", "current"],
        description: "Structure:",
        help_text: "The structure to use. By default, for the first calculation the \
                    incoming structure is used, and subsequently that from the previous \
                    MOPAC steps.",
    },
    ParameterSpec {
        name: "hamiltonian",
        kind: Kind::Enumeration,
        default: "PM7",
        default_units: "",
        enumeration: &[
            "AM1", "MNDO", "MNDOD", "PM3", "PM6", "PM6-D3", "PM6-DH+", "PM6-DH2", "PM6-DH2X",
            "PM6-D3H4", "PM6-D3H4X", "PM7", "PM7-TS", "RM1",
        ],
        description: "Hamiltonian:",
        help_text: "The Hamiltonian (parameterization) to use.",
    },
    ParameterSpec {
        name: "convergence",
        kind: Kind::Enumeration,
        default: "normal",
        default_units: "",
        enumeration: &["normal", "precise", "relative", "absolute"],
        description: "Convergence criterion:",
        help_text: "The convergence criterion for the energy. 'normal' is the default \
                    level, 'precise' tightens it by a factor of 100, 'relative' multiplies \
                    it by the given factor and 'absolute' sets it directly.",
    },
    ParameterSpec {
        name: "uhf",
        kind: Kind::Boolean,
        default: "no",
        default_units: "",
        enumeration: &["yes", "no"],
        description: "UHF for singlets:",
        help_text: "Whether to use UHF for singlet states.",
    },
    ParameterSpec {
        name: "COSMO",
        kind: Kind::Boolean,
        default: "no",
        default_units: "",
        enumeration: &["yes", "no"],
        description: "Solvent using COSMO:",
        help_text: "Whether to use COSMO solvation model.",
    },
    ParameterSpec {
        name: "MOZYME",
        kind: Kind::Enumeration,
        default: "for larger systems",
        default_units: "",
        enumeration: &["for larger systems", "always", "never"],
        description: "Use localized molecular orbitals (MOZYME):",
        help_text: "Whether and when to use localized molecular orbitals (LMO) by using \
                    MOZYME.",
    },
    ParameterSpec {
        name: "nMOZYME",
        kind: Kind::Integer,
        default: "300",
        default_units: "",
        enumeration: &[],
        description: "with this many atoms or more:",
        help_text: "The number of atoms to switch to using MOZYME.",
    },
    ParameterSpec {
        name: "MOZYME follow-up",
        kind: Kind::Enumeration,
        default: "recalculate the energy at the end using new, orthogonal localized orbitals",
        default_units: "",
        enumeration: &[
            "recalculate the energy at the end using new, orthogonal localized orbitals",
            "recalculate the energy at the end using exact, non-localized orbitals",
            "none",
        ],
        description: "Follow-up calculation:",
        help_text: "Whether to follow the localized molecular orbital calculation with \
                    another calculation to clean up the orbitals, or check by doing a full \
                    calculation without localizing the orbitals.",
    },
    ParameterSpec {
        name: "eps",
        kind: Kind::Float,
        default: "78.4",
        default_units: "",
        enumeration: &[],
        description: "Dielectric constant:",
        help_text: "The solvent's dielectric constant.",
    },
    ParameterSpec {
        name: "rsolve",
        kind: Kind::Float,
        default: "1.3",
        default_units: "Å",
        enumeration: &[],
        description: "Solvent radius:",
        help_text: "The solvent's approximate radius.",
    },
    ParameterSpec {
        name: "nspa",
        kind: Kind::Integer,
        default: "42",
        default_units: "",
        enumeration: &[
            "12", "32", "42", "92", "122", "162", "252", "272", "362", "482", "492", "752",
            "812", "1082", "1442", "1472",
        ],
        description: "Surface grid size:",
        help_text: "The number of points in the solvent-accessible surface grid per atom.",
    },
    ParameterSpec {
        name: "disex",
        kind: Kind::Float,
        default: "2.0",
        default_units: "",
        enumeration: &[],
        description: "Cutoff:",
        help_text: "The cutoff for exact calculation of segment-segment interactions in \
                    COSMO.",
    },
    ParameterSpec {
        name: "calculate gradients",
        kind: Kind::Boolean,
        default: "yes",
        default_units: "",
        enumeration: &["yes", "no"],
        description: "Calculate gradients:",
        help_text: "Whether to calculate the gradients.",
    },
    ParameterSpec {
        name: "relative",
        kind: Kind::Float,
        default: "0.1",
        default_units: "",
        enumeration: &[],
        description: "factor",
        help_text: "The factor to multiply the default SCF convergence criterion. Values \
                    >1 make the criterion looser; < 1, tighter.",
    },
    ParameterSpec {
        name: "absolute",
        kind: Kind::Float,
        default: "1.0E-07",
        default_units: "kcal/mol",
        enumeration: &[],
        description: "criterion",
        help_text: "The SCF convergence criterion, based on the change in energy between \
                    iterations.",
    },
    ParameterSpec {
        name: "extra keywords",
        kind: Kind::List,
        default: "",
        default_units: "",
        enumeration: &[],
        description: "Extra keywords",
        help_text: "Extra keywords to append to those from the GUI. This allows you to \
                    add to and override the GUI.",
    },
    ParameterSpec {
        name: "create tables",
        kind: Kind::Boolean,
        default: "yes",
        default_units: "",
        enumeration: &["yes", "no"],
        description: "Create tables as needed:",
        help_text: "Whether to create tables as needed for results being saved into \
                    tables.",
    },
];

// ─────────────────────────────────────────────────────────────
// 枚举选项
// ─────────────────────────────────────────────────────────────

/// 半经验哈密顿量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hamiltonian {
    Am1,
    Mndo,
    Mndod,
    Pm3,
    Pm6,
    Pm6D3,
    Pm6DhPlus,
    Pm6Dh2,
    Pm6Dh2x,
    Pm6D3h4,
    Pm6D3h4x,
    Pm7,
    Pm7Ts,
    Rm1,
}

/// 哈密顿量家族（引用表按家族组织）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HamiltonianFamily {
    Am1,
    Mndo,
    Pm3,
    Pm6,
    Pm7,
    Rm1,
}

impl Hamiltonian {
    pub const ALL: [Hamiltonian; 14] = [
        Hamiltonian::Am1,
        Hamiltonian::Mndo,
        Hamiltonian::Mndod,
        Hamiltonian::Pm3,
        Hamiltonian::Pm6,
        Hamiltonian::Pm6D3,
        Hamiltonian::Pm6DhPlus,
        Hamiltonian::Pm6Dh2,
        Hamiltonian::Pm6Dh2x,
        Hamiltonian::Pm6D3h4,
        Hamiltonian::Pm6D3h4x,
        Hamiltonian::Pm7,
        Hamiltonian::Pm7Ts,
        Hamiltonian::Rm1,
    ];

    /// MOPAC 关键词
    pub fn as_str(&self) -> &'static str {
        match self {
            Hamiltonian::Am1 => "AM1",
            Hamiltonian::Mndo => "MNDO",
            Hamiltonian::Mndod => "MNDOD",
            Hamiltonian::Pm3 => "PM3",
            Hamiltonian::Pm6 => "PM6",
            Hamiltonian::Pm6D3 => "PM6-D3",
            Hamiltonian::Pm6DhPlus => "PM6-DH+",
            Hamiltonian::Pm6Dh2 => "PM6-DH2",
            Hamiltonian::Pm6Dh2x => "PM6-DH2X",
            Hamiltonian::Pm6D3h4 => "PM6-D3H4",
            Hamiltonian::Pm6D3h4x => "PM6-D3H4X",
            Hamiltonian::Pm7 => "PM7",
            Hamiltonian::Pm7Ts => "PM7-TS",
            Hamiltonian::Rm1 => "RM1",
        }
    }

    pub fn family(&self) -> HamiltonianFamily {
        match self {
            Hamiltonian::Am1 => HamiltonianFamily::Am1,
            Hamiltonian::Mndo | Hamiltonian::Mndod => HamiltonianFamily::Mndo,
            Hamiltonian::Pm3 => HamiltonianFamily::Pm3,
            Hamiltonian::Pm6
            | Hamiltonian::Pm6D3
            | Hamiltonian::Pm6DhPlus
            | Hamiltonian::Pm6Dh2
            | Hamiltonian::Pm6Dh2x
            | Hamiltonian::Pm6D3h4
            | Hamiltonian::Pm6D3h4x => HamiltonianFamily::Pm6,
            Hamiltonian::Pm7 | Hamiltonian::Pm7Ts => HamiltonianFamily::Pm7,
            Hamiltonian::Rm1 => HamiltonianFamily::Rm1,
        }
    }
}

impl std::fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Hamiltonian {
    type Err = MopacStepError;

    fn from_str(s: &str) -> Result<Self> {
        Hamiltonian::ALL
            .iter()
            .copied()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| unknown("hamiltonian", s))
    }
}

/// 结构来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureSource {
    /// 第一步用初始结构，之后用前一步的结构
    Default,
    Initial,
    Current,
}

impl FromStr for StructureSource {
    type Err = MopacStepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(StructureSource::Default),
            "initial" => Ok(StructureSource::Initial),
            "current" => Ok(StructureSource::Current),
            other => Err(unknown("structure", other)),
        }
    }
}

impl StructureSource {
    /// 解析实际使用的结构；序列中的第一步总是使用初始结构
    pub fn resolve(&self, is_first_step: bool) -> StructureSource {
        if is_first_step {
            return StructureSource::Initial;
        }
        match self {
            StructureSource::Default | StructureSource::Current => StructureSource::Current,
            StructureSource::Initial => StructureSource::Initial,
        }
    }
}

/// SCF 收敛标准。相对因子与绝对阈值保留用户输入的原文。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convergence {
    Normal,
    Precise,
    Relative(String),
    Absolute(String),
}

impl Convergence {
    /// 由模式名和对应取值构造
    pub fn from_mode(mode: &str, relative: &str, absolute: &str) -> Result<Self> {
        match mode {
            "normal" => Ok(Convergence::Normal),
            "precise" => Ok(Convergence::Precise),
            "relative" => Ok(Convergence::Relative(relative.to_string())),
            "absolute" => Ok(Convergence::Absolute(absolute.to_string())),
            other => Err(unknown("convergence", other)),
        }
    }

    /// 对应的 MOPAC 关键词，normal 时为空
    pub fn keyword(&self) -> Option<String> {
        match self {
            Convergence::Normal => None,
            Convergence::Precise => Some("PRECISE".to_string()),
            Convergence::Relative(factor) => Some(format!("RELSCF={}", factor)),
            Convergence::Absolute(threshold) => Some(format!("SCFCRT={}", threshold)),
        }
    }
}

/// 何时使用局域分子轨道 (MOZYME)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mozyme {
    ForLargerSystems,
    Always,
    Never,
}

impl FromStr for Mozyme {
    type Err = MopacStepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "for larger systems" => Ok(Mozyme::ForLargerSystems),
            "always" => Ok(Mozyme::Always),
            "never" => Ok(Mozyme::Never),
            other => Err(unknown("MOZYME", other)),
        }
    }
}

/// MOZYME 计算后的后续计算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MozymeFollowUp {
    /// 用新的正交局域轨道重算能量
    NewLocalized,
    /// 用精确的非局域轨道重算能量
    Exact,
    None,
}

impl FromStr for MozymeFollowUp {
    type Err = MopacStepError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "none" {
            Ok(MozymeFollowUp::None)
        } else if s.contains("exact") {
            Ok(MozymeFollowUp::Exact)
        } else if s.contains("new") {
            Ok(MozymeFollowUp::NewLocalized)
        } else {
            Err(unknown("MOZYME follow-up", s))
        }
    }
}

/// COSMO 溶剂模型设定
#[derive(Debug, Clone, PartialEq)]
pub struct CosmoSettings {
    /// 介电常数（原文）
    pub eps: String,
    /// 溶剂半径 (Å)
    pub rsolve: f64,
    pub nspa: i64,
    /// 截断（原文）
    pub disex: String,
}

fn unknown(parameter: &str, value: &str) -> MopacStepError {
    MopacStepError::UnknownOption {
        parameter: parameter.to_string(),
        value: value.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────
// 强类型参数
// ─────────────────────────────────────────────────────────────

/// 单点能步骤参数
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyParameters {
    pub structure: StructureSource,
    pub hamiltonian: Hamiltonian,
    pub convergence: Convergence,
    pub uhf: bool,
    pub cosmo: Option<CosmoSettings>,
    pub mozyme: Mozyme,
    pub n_mozyme: usize,
    pub mozyme_follow_up: MozymeFollowUp,
    pub calculate_gradients: bool,
    pub extra_keywords: Vec<String>,
    pub create_tables: bool,
}

impl Default for EnergyParameters {
    fn default() -> Self {
        EnergyParameters {
            structure: StructureSource::Default,
            hamiltonian: Hamiltonian::Pm7,
            convergence: Convergence::Normal,
            uhf: false,
            cosmo: None,
            mozyme: Mozyme::ForLargerSystems,
            n_mozyme: 300,
            mozyme_follow_up: MozymeFollowUp::NewLocalized,
            calculate_gradients: true,
            extra_keywords: Vec::new(),
            create_tables: true,
        }
    }
}

impl EnergyParameters {
    /// 由已校验的参数值构造
    pub fn from_values(values: &ValueDict) -> Result<Self> {
        let convergence = Convergence::from_mode(
            &values.text("convergence")?,
            &values.number_text("relative")?,
            &values.number_text_in("absolute", "kcal/mol")?,
        )?;

        let cosmo = if values.boolean("COSMO")? {
            Some(CosmoSettings {
                eps: values.number_text("eps")?,
                rsolve: values.quantity_in("rsolve", "Å")?,
                nspa: values.integer("nspa")?,
                disex: values.number_text("disex")?,
            })
        } else {
            None
        };

        let n_mozyme = values.integer("nMOZYME")?;
        let n_mozyme = usize::try_from(n_mozyme).map_err(|_| MopacStepError::InvalidParameter {
            parameter: "nMOZYME".to_string(),
            value: n_mozyme.to_string(),
            reason: "must not be negative".to_string(),
        })?;

        Ok(EnergyParameters {
            structure: values.choice("structure")?,
            hamiltonian: values.choice("hamiltonian")?,
            convergence,
            uhf: values.boolean("uhf")?,
            cosmo,
            mozyme: values.choice("MOZYME")?,
            n_mozyme,
            mozyme_follow_up: values.choice("MOZYME follow-up")?,
            calculate_gradients: values.boolean("calculate gradients")?,
            extra_keywords: values.list("extra keywords")?,
            create_tables: values.boolean("create tables")?,
        })
    }

    /// 是否对给定原子数使用 MOZYME
    pub fn uses_mozyme(&self, n_atoms: usize) -> bool {
        match self.mozyme {
            Mozyme::Always => true,
            Mozyme::ForLargerSystems => n_atoms >= self.n_mozyme,
            Mozyme::Never => false,
        }
    }

    /// 是否有 MOZYME 后续计算（即输出有两段）
    pub fn has_mozyme_follow_up(&self, n_atoms: usize) -> bool {
        self.uses_mozyme(n_atoms) && self.mozyme_follow_up != MozymeFollowUp::None
    }

    /// 描述文本中 `{name}` 占位符的取值
    pub fn template_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        values.insert("hamiltonian".to_string(), self.hamiltonian.to_string());
        values.insert("nMOZYME".to_string(), self.n_mozyme.to_string());
        match &self.convergence {
            Convergence::Relative(factor) => {
                values.insert("relative".to_string(), factor.clone());
            }
            Convergence::Absolute(threshold) => {
                values.insert("absolute".to_string(), format!("{} kcal/mol", threshold));
            }
            _ => {}
        }
        if let Some(cosmo) = &self.cosmo {
            values.insert("eps".to_string(), cosmo.eps.clone());
            values.insert("rsolve".to_string(), format!("{:.2} Å", cosmo.rsolve));
            values.insert("nspa".to_string(), cosmo.nspa.to_string());
            values.insert("disex".to_string(), cosmo.disex.clone());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParameterSet, StepKind};

    fn build(settings: &[(&str, &str)]) -> Result<EnergyParameters> {
        let mut params = ParameterSet::for_step(StepKind::Energy);
        for (name, value) in settings {
            params.set(name, value)?;
        }
        let values = params.current_values_to_dict(&BTreeMap::new())?;
        EnergyParameters::from_values(&values)
    }

    #[test]
    fn test_defaults_match_schema() {
        assert_eq!(build(&[]).unwrap(), EnergyParameters::default());
    }

    #[test]
    fn test_hamiltonian_round_trip_names() {
        for h in Hamiltonian::ALL {
            assert_eq!(h.as_str().parse::<Hamiltonian>().unwrap(), h);
        }
        assert!("PM8".parse::<Hamiltonian>().is_err());
    }

    #[test]
    fn test_family() {
        assert_eq!(Hamiltonian::Mndod.family(), HamiltonianFamily::Mndo);
        assert_eq!(Hamiltonian::Pm6D3h4x.family(), HamiltonianFamily::Pm6);
        assert_eq!(Hamiltonian::Pm7Ts.family(), HamiltonianFamily::Pm7);
    }

    #[test]
    fn test_convergence_verbatim() {
        let p = build(&[("convergence", "relative"), ("relative", "0.25")]).unwrap();
        assert_eq!(p.convergence.keyword().as_deref(), Some("RELSCF=0.25"));

        let p = build(&[("convergence", "absolute"), ("absolute", "1.0E-09 kcal/mol")]).unwrap();
        assert_eq!(p.convergence.keyword().as_deref(), Some("SCFCRT=1.0E-09"));
    }

    #[test]
    fn test_absolute_threshold_converted_to_kcal() {
        let p = build(&[("convergence", "absolute"), ("absolute", "4.184E-07 kJ/mol")]).unwrap();
        assert_eq!(p.convergence.keyword().as_deref(), Some("SCFCRT=1.000E-7"));
    }

    #[test]
    fn test_unknown_convergence_names_value() {
        let err = Convergence::from_mode("tight", "0.1", "1e-7").unwrap_err();
        assert!(err.to_string().contains("'tight'"));
    }

    #[test]
    fn test_structure_resolution() {
        assert_eq!(StructureSource::Current.resolve(true), StructureSource::Initial);
        assert_eq!(StructureSource::Default.resolve(false), StructureSource::Current);
        assert_eq!(StructureSource::Initial.resolve(false), StructureSource::Initial);
        assert!("snapshot 3".parse::<StructureSource>().is_err());
    }

    #[test]
    fn test_cosmo_radius_converted() {
        let p = build(&[("COSMO", "yes"), ("rsolve", "0.2 nm")]).unwrap();
        let cosmo = p.cosmo.as_ref().unwrap();
        assert!((cosmo.rsolve - 2.0).abs() < 1e-9);
        assert_eq!(cosmo.nspa, 42);

        let text = p.template_values();
        assert_eq!(text.get("rsolve").map(String::as_str), Some("2.00 Å"));
    }

    #[test]
    fn test_mozyme_threshold() {
        let p = build(&[("nMOZYME", "10")]).unwrap();
        assert!(!p.uses_mozyme(9));
        assert!(p.uses_mozyme(10));

        let p = build(&[("MOZYME", "always"), ("MOZYME follow-up", "none")]).unwrap();
        assert!(p.uses_mozyme(1));
        assert!(!p.has_mozyme_follow_up(1));
    }
}
