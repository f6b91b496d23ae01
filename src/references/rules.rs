//! # 哈密顿量引用规则
//!
//! 每个哈密顿量家族有一条主引用和若干规则。规则包含一组元素（空表示无条件）、
//! 适用的哈密顿量变体（空表示全部）以及要登记的引用。
//! 结构中任一原子属于规则的元素集时，该规则触发一次。
//!
//! ## 依赖关系
//! - 被 `mopac/compose.rs` 使用
//! - 使用 `references/mod.rs`, `config/energy.rs`

use super::{cite, Bibliography, CitationRegistry};
use crate::config::{Hamiltonian, HamiltonianFamily};
use crate::error::Result;

/// 哈密顿量引用登记的重要程度
pub const CITATION_LEVEL: u8 = 1;

/// 一条引用规则
#[derive(Debug, Clone, Copy)]
pub struct CitationRule {
    pub elements: &'static [&'static str],
    pub variants: &'static [Hamiltonian],
    /// (别名, 说明)
    pub citations: &'static [(&'static str, &'static str)],
}

impl CitationRule {
    /// 规则是否对给定哈密顿量和元素触发
    pub fn applies(&self, hamiltonian: Hamiltonian, symbols: &[String]) -> bool {
        let variant_ok = self.variants.is_empty() || self.variants.contains(&hamiltonian);
        let element_ok = self.elements.is_empty()
            || symbols.iter().any(|s| self.elements.contains(&s.as_str()));
        variant_ok && element_ok
    }
}

/// 一个哈密顿量家族的引用
#[derive(Debug, Clone, Copy)]
pub struct MethodCitations {
    pub family: HamiltonianFamily,
    pub primary: (&'static str, &'static str),
    pub rules: &'static [CitationRule],
}

const fn rule(
    elements: &'static [&'static str],
    citations: &'static [(&'static str, &'static str)],
) -> CitationRule {
    CitationRule {
        elements,
        variants: &[],
        citations,
    }
}

const fn variant_rule(
    elements: &'static [&'static str],
    variants: &'static [Hamiltonian],
    citations: &'static [(&'static str, &'static str)],
) -> CitationRule {
    CitationRule {
        elements,
        variants,
        citations,
    }
}

const MOPAC_PARAMETERIZATION: &str = "The citation for the MOPAC parameterization.";
const MNDO_D: &str = "MNDO-D, parameters for Al, Si, P, S, Cl, Br, I, Zn, Cd, and Hg.";
const MNDO_ONLY: &[Hamiltonian] = &[Hamiltonian::Mndo];
const DH2: &[Hamiltonian] = &[Hamiltonian::Pm6Dh2, Hamiltonian::Pm6Dh2x];
const D3H4: &[Hamiltonian] = &[Hamiltonian::Pm6D3h4, Hamiltonian::Pm6D3h4x];

const AM1_RULES: &[CitationRule] = &[
    rule(&["F", "Cl", "Br", "I"], &[("Dewar_1988", "AM1 parameters for F, Cl, Br, I.")]),
    rule(&["Al"], &[("Dewar_1990", "AM1 parameters for Al.")]),
    rule(&["Si"], &[("Dewar_1987b", "AM1 parameters for Si.")]),
    rule(&["P"], &[("Dewar_1989", "AM1 parameters for P.")]),
    rule(&["S"], &[("Dewar_1990b", "AM1 parameters for S.")]),
    rule(&["Zn"], &[("Dewar_1988b", "AM1 parameters for Zn.")]),
    rule(&["Ge"], &[("Dewar_1989b", "AM1 parameters for Ge.")]),
    rule(&["Mo"], &[("Voityuk_2000", "AM1 parameters for Mo.")]),
    rule(&["Hg"], &[("Dewar_1989c", "AM1 parameters for Hg.")]),
    rule(
        &[
            "Li", "Be", "Na", "Mg", "K", "Ca", "Ga", "As", "Se", "Rb", "Sr", "In", "Sn", "Sb",
            "Te", "Cs", "Ba", "Pb", "Bi",
        ],
        &[("Stewart_2004", "AM1 parameterization for main-group elements.")],
    ),
];

const MNDO_RULES: &[CitationRule] = &[
    rule(&["Be"], &[("Dewar_1978", "MNDO parameters for Be.")]),
    rule(&["B"], &[("Davis_1981", "MNDO parameters for B and Al.")]),
    variant_rule(&["Al"], MNDO_ONLY, &[("Davis_1981", "MNDO parameters for B and Al.")]),
    rule(&["F"], &[("Dewar_1978b", "MNDO parameters for F.")]),
    variant_rule(&["Si"], MNDO_ONLY, &[("Dewar_1986", "Revised MNDO parameters for Si.")]),
    variant_rule(&["P"], MNDO_ONLY, &[("Dewar_1978b", "MNDO parameters for P.")]),
    variant_rule(&["S"], MNDO_ONLY, &[("Dewar_1986b", "MNDO parameters for S.")]),
    variant_rule(&["Cl"], MNDO_ONLY, &[("Dewar_1983", "MNDO parameters for Cl.")]),
    variant_rule(&["Zn"], MNDO_ONLY, &[("Dewar_1986c", "MNDO parameters for Zn.")]),
    rule(&["Ge"], &[("Dewar_1987", "MNDO parameters for Ge.")]),
    variant_rule(&["Br"], MNDO_ONLY, &[("Dewar_1983b", "MNDO parameters for Br.")]),
    rule(&["Sn"], &[("Dewar_1984", "MNDO parameters for Sn.")]),
    variant_rule(&["I"], MNDO_ONLY, &[("Dewar_1984b", "MNDO parameters for I.")]),
    variant_rule(&["Hg"], MNDO_ONLY, &[("Dewar_1985", "MNDO parameters for Hg.")]),
    rule(&["Pb"], &[("Dewar_1985b", "MNDO parameters for Pb.")]),
    rule(
        &[
            "Na", "Mg", "K", "Ca", "Ga", "As", "Se", "Rb", "Sr", "In", "Sb", "Te", "Cs", "Ba",
            "Tl", "Bi",
        ],
        &[("Stewart_2004", "MNDO parameterization for main-group elements.")],
    ),
    variant_rule(
        &["Al", "Si", "P", "S", "Cl", "Br", "I", "Zn", "Cd", "Hg"],
        &[Hamiltonian::Mndod],
        &[
            ("Thiel_1992", "MNDO-D formalism for d-orbitals."),
            ("Thiel_1996", MNDO_D),
        ],
    ),
];

const PM3_RULES: &[CitationRule] = &[
    rule(
        &[
            "Be", "Mg", "Zn", "Ga", "Ge", "As", "Se", "Cd", "In", "Sn", "Sb", "Te", "Hg", "Tl",
            "Pb", "Bi",
        ],
        &[("Stewart_1991", MOPAC_PARAMETERIZATION)],
    ),
    rule(&["Li"], &[("Anders_1993", MOPAC_PARAMETERIZATION)]),
    rule(
        &["B", "Na", "K", "Ca", "Rb", "Sr", "Cs", "Ba"],
        &[("Stewart_2004", MOPAC_PARAMETERIZATION)],
    ),
];

const PM6_RULES: &[CitationRule] = &[
    variant_rule(
        &[],
        &[Hamiltonian::Pm6D3],
        &[("Grimme_2010", "Dispersion correction by Grimme, et al.")],
    ),
    variant_rule(
        &[],
        &[Hamiltonian::Pm6DhPlus],
        &[("Korth_2010", "Hydrogen-bonding correction by Korth.")],
    ),
    variant_rule(
        &[],
        DH2,
        &[
            ("Korth_2009", "Hydrogen-bonding and dispersion correction."),
            ("Rezac_2009", "Hydrogen-bonding and dispersion correction."),
        ],
    ),
    variant_rule(
        &[],
        &[Hamiltonian::Pm6Dh2x],
        &[("Rezac_2011", "Halogen-bonding correction.")],
    ),
    variant_rule(
        &[],
        D3H4,
        &[
            ("Rezac_2011", "Hydrogen-bonding and dispersion correction."),
            ("Vorlova_2015", "Hydrogen-hydrogen repulsion correction."),
        ],
    ),
    variant_rule(
        &[],
        &[Hamiltonian::Pm6D3h4x],
        &[("Brahmkshatriya_2013", "Halogen-oxygen and halogen-nitrogen correction.")],
    ),
];

/// 所有哈密顿量家族的引用表
pub const METHOD_CITATIONS: &[MethodCitations] = &[
    MethodCitations {
        family: HamiltonianFamily::Am1,
        primary: ("Dewar_1985c", "Main reference for AM1 + C, H, N, O."),
        rules: AM1_RULES,
    },
    MethodCitations {
        family: HamiltonianFamily::Mndo,
        primary: ("Dewar_1977", "Main reference for MNDO + C, H, N, O."),
        rules: MNDO_RULES,
    },
    MethodCitations {
        family: HamiltonianFamily::Pm3,
        primary: ("Stewart_1989", MOPAC_PARAMETERIZATION),
        rules: PM3_RULES,
    },
    MethodCitations {
        family: HamiltonianFamily::Pm6,
        primary: ("Stewart_2007", "The PM6 parameterization in MOPAC."),
        rules: PM6_RULES,
    },
    MethodCitations {
        family: HamiltonianFamily::Pm7,
        primary: ("Stewart_2012", "The PM7 parameterization in MOPAC."),
        rules: &[],
    },
    MethodCitations {
        family: HamiltonianFamily::Rm1,
        primary: ("Rocha_2006", "RM1 parameterization."),
        rules: &[],
    },
];

/// 查找哈密顿量所属家族的引用表
pub fn method_citations(hamiltonian: Hamiltonian) -> Option<&'static MethodCitations> {
    let family = hamiltonian.family();
    METHOD_CITATIONS.iter().find(|m| m.family == family)
}

/// 登记哈密顿量及结构中元素对应的引用，返回登记次数
pub fn cite_hamiltonian(
    hamiltonian: Hamiltonian,
    symbols: &[String],
    bibliography: &dyn Bibliography,
    registry: &mut dyn CitationRegistry,
) -> Result<usize> {
    let Some(method) = method_citations(hamiltonian) else {
        return Ok(0);
    };

    let (alias, note) = method.primary;
    cite(bibliography, registry, alias, CITATION_LEVEL, note)?;
    let mut count = 1;

    for rule in method.rules {
        if !rule.applies(hamiltonian, symbols) {
            continue;
        }
        for (alias, note) in rule.citations {
            cite(bibliography, registry, alias, CITATION_LEVEL, note)?;
            count += 1;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::{MopacBibliography, References};

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn cited(hamiltonian: Hamiltonian, elements: &[&str]) -> References {
        let mut references = References::new();
        cite_hamiltonian(
            hamiltonian,
            &symbols(elements),
            &MopacBibliography,
            &mut references,
        )
        .unwrap();
        references
    }

    #[test]
    fn test_every_alias_in_bibliography() {
        for method in METHOD_CITATIONS {
            assert!(MopacBibliography.raw(method.primary.0).is_some());
            for rule in method.rules {
                for (alias, _) in rule.citations {
                    assert!(MopacBibliography.raw(alias).is_some(), "missing {}", alias);
                }
            }
        }
    }

    #[test]
    fn test_every_hamiltonian_has_primary() {
        for h in Hamiltonian::ALL {
            assert!(method_citations(h).is_some(), "{} has no citations", h);
        }
    }

    #[test]
    fn test_am1_halogens_fire_once() {
        let refs = cited(Hamiltonian::Am1, &["C", "F", "Cl", "H"]);
        assert!(refs.contains("Dewar_1985c"));
        assert_eq!(refs.count("Dewar_1988"), 1);
        assert!(!refs.contains("Stewart_2004"));
    }

    #[test]
    fn test_mndo_aluminum_only_for_mndo() {
        assert!(cited(Hamiltonian::Mndo, &["Al"]).contains("Davis_1981"));
        let refs = cited(Hamiltonian::Mndod, &["Al"]);
        assert!(!refs.contains("Davis_1981"));
        assert!(refs.contains("Thiel_1992"));
        assert!(refs.contains("Thiel_1996"));
        assert!(cited(Hamiltonian::Mndod, &["B"]).contains("Davis_1981"));
    }

    #[test]
    fn test_pm6_corrections() {
        let refs = cited(Hamiltonian::Pm6Dh2x, &["C"]);
        assert!(refs.contains("Stewart_2007"));
        assert!(refs.contains("Korth_2009"));
        assert!(refs.contains("Rezac_2009"));
        assert!(refs.contains("Rezac_2011"));

        let refs = cited(Hamiltonian::Pm6D3h4x, &["C"]);
        assert_eq!(refs.count("Rezac_2011"), 1);
        assert!(refs.contains("Vorlova_2015"));
        assert!(refs.contains("Brahmkshatriya_2013"));

        let refs = cited(Hamiltonian::Pm6, &["C"]);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_cite_count() {
        let mut references = References::new();
        let n = cite_hamiltonian(
            Hamiltonian::Pm3,
            &symbols(&["Li", "Zn", "Zn"]),
            &MopacBibliography,
            &mut references,
        )
        .unwrap();
        assert_eq!(n, 3);
    }
}
