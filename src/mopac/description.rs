//! # 步骤说明文本
//!
//! 生成描述即将进行的计算的段落，`{name}` 占位符用参数值替换。
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs`, `mopac/deck.rs` 使用
//! - 使用 `utils/text.rs`

use crate::config::{
    Convergence, EnergyParameters, Mozyme, MozymeFollowUp, StepParameters,
    ThermodynamicsParameters, VibrationParameters,
};
use crate::utils::text::substitute;

const MOZYME_DRIFT: &str = "The energy given by MOZYME slowly accumulates error due to the \
                            increasing non-orthogonality of the localized orbitals after many \
                            iterations.";

/// 单点能部分的说明
pub fn energy_description(p: &EnergyParameters) -> String {
    let mut text = String::from("Calculated with {hamiltonian}, converged to ");
    text.push_str(match p.convergence {
        Convergence::Normal => "the 'normal' level of 1.0e-04 kcal/mol.",
        Convergence::Precise => "the 'precise' level of 1.0e-06 kcal/mol.",
        Convergence::Relative(_) => "a factor of {relative} times the normal criterion.",
        Convergence::Absolute(_) => "{absolute}.",
    });

    if p.uhf {
        text.push_str(" The SCF will be spin-unrestricted (UHF) for all molecules.");
    } else {
        text.push_str(
            " The SCF will be restricted for closed-shell molecules (RHF) and \
             spin-unrestricted (UHF) for all others.",
        );
    }

    let uses_mozyme = match p.mozyme {
        Mozyme::Always => {
            text.push_str(
                "\n\nThe SCF will be solved using localized molecular orbitals (MOZYME), \
                 which is faster than the traditional method for larger systems.",
            );
            true
        }
        Mozyme::ForLargerSystems => {
            text.push_str(
                "\n\nThe SCF will be solved using localized molecular orbitals (MOZYME) \
                 for systems with {nMOZYME} atoms or more. This method is faster than \
                 the traditional method for larger systems.",
            );
            true
        }
        Mozyme::Never => false,
    };

    if uses_mozyme {
        text.push(' ');
        text.push_str(MOZYME_DRIFT);
        text.push_str(match p.mozyme_follow_up {
            MozymeFollowUp::Exact => {
                " A single point energy using the traditional method will be run to get \
                 the correct energy."
            }
            MozymeFollowUp::NewLocalized => {
                " A single point energy using fresh localized orbitals will be run to get \
                 the correct energy."
            }
            MozymeFollowUp::None => {
                " No follow-up calculation will be done, so be careful with the final \
                 energies produced."
            }
        });
    }

    if p.cosmo.is_some() {
        text.push_str(
            "\n\nThe COSMO solvation model will be used with dielectric constant = {eps}, \
             solvent radius = {rsolve}, {nspa} grid points per atom, and a cutoff of \
             {disex}.",
        );
    }

    substitute(&text, &p.template_values())
}

fn structure_handling_text(p: &VibrationParameters) -> String {
    format!(
        "The structure in the standard orientation will {} {}",
        p.structure_handling,
        p.configuration_name.describe(p.energy.hamiltonian)
    )
}

/// 红外步骤的说明
pub fn vibrations_description(p: &VibrationParameters) -> String {
    let mut text = String::from(
        "Harmonic vibrational calculation using {hamiltonian}, with the SCF converged to ",
    );
    text.push_str(match p.energy.convergence {
        Convergence::Normal => "the 'normal' level of 1.0e-07 kcal/mol.",
        Convergence::Precise => "the 'precise' level of 1.0e-09 kcal/mol.",
        Convergence::Relative(_) => "a factor of {relative} times the normal criterion.",
        Convergence::Absolute(_) => "{absolute}.",
    });
    if p.let_structure {
        text.push_str(" The calculation will continue even if the structure is not a minimum.");
    }
    let text = substitute(&text, &p.energy.template_values());

    format!(
        "{}\n\nThe energy and forces will be {}\n\n{}",
        text,
        lowercase_first(&energy_description(&p.energy)),
        structure_handling_text(p)
    )
}

/// 热力学步骤的说明
pub fn thermodynamics_description(p: &ThermodynamicsParameters) -> String {
    let mut text = format!(
        "Thermodynamic functions from {} K to {} K in steps of {} K, using the harmonic \
         frequencies from {}.",
        p.t_min, p.t_max, p.t_step, p.vibrations.energy.hamiltonian
    );
    match p.trans {
        0 => {}
        1 => text.push_str(" The lowest mode will be treated as an internal rotation."),
        n => text.push_str(&format!(
            " The {} lowest modes will be treated as internal rotations.",
            n
        )),
    }

    format!(
        "{}\n\nThe energy and forces will be {}\n\n{}",
        text,
        lowercase_first(&energy_description(&p.vibrations.energy)),
        structure_handling_text(&p.vibrations)
    )
}

/// 任一步骤的说明
pub fn description_text(step: &StepParameters) -> String {
    match step {
        StepParameters::Energy(p) => energy_description(p),
        StepParameters::Ir(p) => vibrations_description(p),
        StepParameters::Thermodynamics(p) => thermodynamics_description(p),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParameterSet, StepKind};
    use std::collections::BTreeMap;

    fn step(kind: StepKind, settings: &[(&str, &str)]) -> StepParameters {
        let mut params = ParameterSet::for_step(kind);
        for (name, value) in settings {
            params.set(name, value).unwrap();
        }
        let values = params.current_values_to_dict(&BTreeMap::new()).unwrap();
        StepParameters::from_values(kind, &values).unwrap()
    }

    #[test]
    fn test_energy_description_substituted() {
        let text = description_text(&step(
            StepKind::Energy,
            &[("hamiltonian", "AM1"), ("convergence", "relative"), ("relative", "0.5")],
        ));
        assert!(text.starts_with("Calculated with AM1, converged to a factor of 0.5"));
        assert!(text.contains("300 atoms or more"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_cosmo_paragraph() {
        let text = description_text(&step(StepKind::Energy, &[("COSMO", "yes")]));
        assert!(text.contains("dielectric constant = 78.4"));
        assert!(text.contains("solvent radius = 1.30 Å"));
    }

    #[test]
    fn test_ir_description() {
        let text = description_text(&step(StepKind::Ir, &[("MOZYME", "never")]));
        assert!(text.starts_with("Harmonic vibrational calculation using PM7"));
        assert!(text.contains("The energy and forces will be calculated with PM7"));
        assert!(text.contains("be put in a new configuration with 'vibrations with PM7'"));
    }

    #[test]
    fn test_thermo_description() {
        let text = description_text(&step(StepKind::Thermodynamics, &[("trans", "2")]));
        assert!(text.starts_with("Thermodynamic functions from 200 K to 400 K in steps of 10 K"));
        assert!(text.contains("The 2 lowest modes"));
    }
}
