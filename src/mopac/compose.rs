//! # MOPAC 输入关键词组装
//!
//! 根据步骤参数与结构生成 MOPAC 关键词列表，并登记所用方法的文献。
//!
//! ## 关键词顺序
//! 1. 用户额外关键词（原样）
//! 2. `1SCF` 与哈密顿量
//! 3. `OLDGEO`（使用前一步结构时）
//! 4. 收敛标准、`UHF`、`MOZYME`、COSMO、`GRADIENTS`
//! 5. 再次追加额外关键词（按元数据格式书写），保证用户设定最后生效
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs` 使用
//! - 使用 `config/`, `references/`, `mopac/keywords.rs`

use super::keywords::format_extra_keyword;
use crate::config::{EnergyParameters, MozymeFollowUp, StepParameters, StructureSource};
use crate::error::Result;
use crate::models::Configuration;
use crate::references::{cite_hamiltonian, Bibliography, CitationRegistry};

pub const SINGLE_POINT: &str = "1SCF";
pub const OLD_GEOMETRY: &str = "OLDGEO";

/// 一次 MOPAC 运行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MopacJob {
    pub keywords: Vec<String>,
    pub title: Option<String>,
}

impl MopacJob {
    pub fn new(keywords: Vec<String>) -> Self {
        MopacJob {
            keywords,
            title: None,
        }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// 删除第一个匹配的关键词
    pub fn remove(&mut self, keyword: &str) -> bool {
        match self.keywords.iter().position(|k| k == keyword) {
            Some(index) => {
                self.keywords.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, keyword: impl Into<String>) {
        self.keywords.push(keyword.into());
    }
}

/// 组装单点能关键词
pub fn compose_keywords(
    params: &EnergyParameters,
    configuration: &Configuration,
    is_first_step: bool,
    bibliography: &dyn Bibliography,
    registry: &mut dyn CitationRegistry,
) -> Result<Vec<String>> {
    let mut keywords = params.extra_keywords.clone();
    keywords.push(SINGLE_POINT.to_string());
    keywords.push(params.hamiltonian.to_string());

    cite_hamiltonian(
        params.hamiltonian,
        configuration.atoms.symbols(),
        bibliography,
        registry,
    )?;

    if params.structure.resolve(is_first_step) == StructureSource::Current {
        keywords.push(OLD_GEOMETRY.to_string());
    }

    if let Some(keyword) = params.convergence.keyword() {
        keywords.push(keyword);
    }

    if params.uhf {
        keywords.push("UHF".to_string());
    }

    if params.uses_mozyme(configuration.n_atoms()) {
        keywords.push("MOZYME".to_string());
    }

    if let Some(cosmo) = &params.cosmo {
        keywords.push(format!("EPS={}", cosmo.eps));
        keywords.push(format!("RSOLVE={:.2}", cosmo.rsolve));
        keywords.push(format!("NSPA={}", cosmo.nspa));
        keywords.push(format!("DISEX={}", cosmo.disex));
    }

    if params.calculate_gradients {
        keywords.push("GRADIENTS".to_string());
    }

    for entry in &params.extra_keywords {
        keywords.push(format_extra_keyword(entry));
    }

    Ok(keywords)
}

/// 单点能的运行列表；使用 MOZYME 时按设定追加后续计算
pub fn energy_jobs(keywords: Vec<String>, follow_up: MozymeFollowUp) -> Vec<MopacJob> {
    let main = MopacJob::new(keywords);
    let mut jobs = vec![main.clone()];

    if !main.contains("MOZYME") {
        return jobs;
    }

    let mut next = main;
    match follow_up {
        MozymeFollowUp::Exact => {
            next.remove("MOZYME");
            if !next.contains(SINGLE_POINT) {
                next.push(SINGLE_POINT);
            }
            next.push(OLD_GEOMETRY);
            next.title = Some("MOZYME follow-up using MOPAC".to_string());
            jobs.push(next);
        }
        MozymeFollowUp::NewLocalized => {
            if !next.contains(SINGLE_POINT) {
                next.push(SINGLE_POINT);
            }
            next.push(OLD_GEOMETRY);
            next.title = Some("MOZYME follow-up, reinitializing".to_string());
            jobs.push(next);
        }
        MozymeFollowUp::None => {}
    }

    jobs
}

/// 组装某一步骤的全部运行
pub fn build_jobs(
    step: &StepParameters,
    configuration: &Configuration,
    is_first_step: bool,
    bibliography: &dyn Bibliography,
    registry: &mut dyn CitationRegistry,
) -> Result<Vec<MopacJob>> {
    let energy = step.energy();
    let keywords = compose_keywords(energy, configuration, is_first_step, bibliography, registry)?;
    let mut jobs = energy_jobs(keywords, energy.mozyme_follow_up);

    let Some(first) = jobs.first_mut() else {
        return Ok(jobs);
    };

    match step {
        StepParameters::Energy(_) => {}
        StepParameters::Ir(p) => {
            first.remove(SINGLE_POINT);
            first.push("FORCE");
            if p.let_structure {
                first.push("LET");
            }
        }
        StepParameters::Thermodynamics(p) => {
            first.remove(SINGLE_POINT);
            first.push("FORCE");
            first.push(p.thermo_keyword());
            if p.trans > 0 {
                first.push(format!("TRANS={}", p.trans));
            }
        }
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParameterSet, StepKind};
    use crate::models::AtomTable;
    use crate::references::{MopacBibliography, References};
    use std::collections::BTreeMap;

    fn methane() -> Configuration {
        let mut atoms = AtomTable::new();
        atoms.push("C", [0.0, 0.0, 0.0]);
        for xyz in [
            [0.63, 0.63, 0.63],
            [-0.63, -0.63, 0.63],
            [-0.63, 0.63, -0.63],
            [0.63, -0.63, -0.63],
        ] {
            atoms.push("H", xyz);
        }
        Configuration::new("methane", atoms)
    }

    fn step(kind: StepKind, settings: &[(&str, &str)]) -> StepParameters {
        let mut params = ParameterSet::for_step(kind);
        for (name, value) in settings {
            params.set(name, value).unwrap();
        }
        let values = params.current_values_to_dict(&BTreeMap::new()).unwrap();
        StepParameters::from_values(kind, &values).unwrap()
    }

    fn keywords(settings: &[(&str, &str)], is_first_step: bool) -> Vec<String> {
        let p = step(StepKind::Energy, settings);
        let mut references = References::new();
        compose_keywords(
            p.energy(),
            &methane(),
            is_first_step,
            &MopacBibliography,
            &mut references,
        )
        .unwrap()
    }

    fn count(keywords: &[String], keyword: &str) -> usize {
        keywords.iter().filter(|k| *k == keyword).count()
    }

    #[test]
    fn test_marker_and_hamiltonian_once() {
        for h in crate::config::Hamiltonian::ALL {
            let kw = keywords(&[("hamiltonian", h.as_str())], true);
            assert_eq!(count(&kw, SINGLE_POINT), 1);
            assert_eq!(count(&kw, h.as_str()), 1);
        }
    }

    #[test]
    fn test_extra_keywords_last() {
        let kw = keywords(
            &[("extra keywords", "BONDS T=1D"), ("convergence", "precise")],
            false,
        );
        let last_derived = kw.iter().rposition(|k| k == "GRADIENTS").unwrap();
        let bonds = kw.iter().rposition(|k| k == "BONDS").unwrap();
        let time = kw.iter().rposition(|k| k == "T=1D").unwrap();
        assert!(bonds > last_derived);
        assert!(time > last_derived);
        assert_eq!(&kw[0], "BONDS");
    }

    #[test]
    fn test_convergence_keywords() {
        let kw = keywords(&[("convergence", "normal")], true);
        assert!(!kw.iter().any(|k| k.starts_with("RELSCF") || k == "PRECISE"));

        let kw = keywords(&[("convergence", "precise")], true);
        assert_eq!(count(&kw, "PRECISE"), 1);

        let kw = keywords(&[("convergence", "relative"), ("relative", "0.5")], true);
        assert!(kw.contains(&"RELSCF=0.5".to_string()));

        let kw = keywords(&[("convergence", "absolute"), ("absolute", "2.0E-08")], true);
        assert!(kw.contains(&"SCFCRT=2.0E-08".to_string()));
    }

    #[test]
    fn test_structure_source() {
        assert!(!keywords(&[("structure", "current")], true).contains(&"OLDGEO".to_string()));
        assert!(keywords(&[], false).contains(&"OLDGEO".to_string()));
        assert!(!keywords(&[("structure", "initial")], false).contains(&"OLDGEO".to_string()));
    }

    #[test]
    fn test_cosmo_and_uhf() {
        let kw = keywords(&[("COSMO", "yes"), ("uhf", "yes")], true);
        assert!(kw.contains(&"UHF".to_string()));
        assert!(kw.contains(&"EPS=78.4".to_string()));
        assert!(kw.contains(&"RSOLVE=1.30".to_string()));
        assert!(kw.contains(&"NSPA=42".to_string()));
        assert!(kw.contains(&"DISEX=2.0".to_string()));

        let kw = keywords(&[("COSMO", "yes"), ("rsolve", "0.2 nm")], true);
        assert!(kw.contains(&"RSOLVE=2.00".to_string()));
    }

    #[test]
    fn test_citations_registered() {
        let p = step(StepKind::Energy, &[("hamiltonian", "PM6-D3H4X")]);
        let mut references = References::new();
        compose_keywords(p.energy(), &methane(), true, &MopacBibliography, &mut references)
            .unwrap();
        assert!(references.contains("Stewart_2007"));
        assert!(references.contains("Brahmkshatriya_2013"));
    }

    #[test]
    fn test_mozyme_follow_up_jobs() {
        let kw = vec!["1SCF".to_string(), "PM7".to_string(), "MOZYME".to_string()];

        let jobs = energy_jobs(kw.clone(), MozymeFollowUp::Exact);
        assert_eq!(jobs.len(), 2);
        assert!(!jobs[1].contains("MOZYME"));
        assert!(jobs[1].contains("OLDGEO"));
        assert_eq!(jobs[1].title.as_deref(), Some("MOZYME follow-up using MOPAC"));

        let jobs = energy_jobs(kw.clone(), MozymeFollowUp::NewLocalized);
        assert!(jobs[1].contains("MOZYME"));
        assert_eq!(count(&jobs[1].keywords, SINGLE_POINT), 1);

        assert_eq!(energy_jobs(kw, MozymeFollowUp::None).len(), 1);
    }

    #[test]
    fn test_ir_and_thermo_jobs() {
        let mut references = References::new();
        let ir = step(StepKind::Ir, &[("let", "yes")]);
        let jobs = build_jobs(&ir, &methane(), true, &MopacBibliography, &mut references).unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(!jobs[0].contains(SINGLE_POINT));
        assert!(jobs[0].contains("FORCE"));
        assert!(jobs[0].contains("LET"));

        let thermo = step(StepKind::Thermodynamics, &[("trans", "2")]);
        let jobs =
            build_jobs(&thermo, &methane(), true, &MopacBibliography, &mut references).unwrap();
        assert!(jobs[0].contains("THERMO(200,400,10)"));
        assert!(jobs[0].contains("TRANS=2"));
    }
}
