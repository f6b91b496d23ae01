//! # MOPAC 关键词元数据
//!
//! 常用 MOPAC 关键词的说明和带参数时的书写格式。
//! 格式模板中的两个 `{}` 依次替换为关键词名和取值。
//!
//! ## 依赖关系
//! - 被 `mopac/compose.rs` 使用

/// 关键词说明
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub format: Option<&'static str>,
}

const fn keyword(name: &'static str, description: &'static str) -> KeywordInfo {
    KeywordInfo {
        name,
        description,
        format: None,
    }
}

const fn with_value(
    name: &'static str,
    description: &'static str,
    format: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        name,
        description,
        format: Some(format),
    }
}

pub const KEYWORDS: &[KeywordInfo] = &[
    keyword("1SCF", "Do only a single SCF calculation"),
    with_value("AUX", "Write the auxiliary output file", "{}({})"),
    with_value("CHARGE", "Net charge on the system", "{}={}"),
    with_value("CUTOFF", "Cutoff distance for interactions in MOZYME", "{}={}"),
    with_value("CYCLES", "Maximum number of geometry optimization steps", "{}={}"),
    with_value("DISEX", "Distance for exact COSMO segment interactions", "{}={}"),
    with_value("EPS", "Dielectric constant of the solvent", "{}={}"),
    with_value("FIELD", "Apply a static electric field", "{}=({})"),
    keyword("FORCE", "Calculate the vibrational frequencies"),
    keyword("GEO-OK", "Override interatomic distance checks"),
    with_value("GNORM", "Gradient norm for terminating optimization", "{}={}"),
    keyword("GRADIENTS", "Print the gradients"),
    with_value("ITRY", "Maximum number of SCF iterations", "{}={}"),
    keyword("LARGE", "Print expanded output"),
    keyword("LET", "Override safety checks"),
    keyword("MOZYME", "Use localized molecular orbitals"),
    with_value("MS", "Magnetic component of the spin", "{}={}"),
    with_value("NSPA", "Number of COSMO surface points per atom", "{}={}"),
    keyword("OLDGEO", "Use the geometry from the previous calculation"),
    keyword("PRECISE", "Tighten the convergence criteria"),
    with_value("RELSCF", "Scale the SCF convergence criterion", "{}={}"),
    with_value("RSOLVE", "Radius of the solvent molecule (Å)", "{}={}"),
    with_value("SCFCRT", "SCF convergence criterion (kcal/mol)", "{}={}"),
    with_value("T", "Maximum CPU time", "{}={}"),
    with_value("THERMO", "Thermodynamic functions over a temperature range", "{}({})"),
    with_value("THREADS", "Number of threads to use", "{}={}"),
    with_value("TRANS", "Number of internal rotations to remove", "{}={}"),
    keyword("UHF", "Unrestricted Hartree-Fock"),
];

/// 查找关键词
pub fn lookup(name: &str) -> Option<&'static KeywordInfo> {
    KEYWORDS.iter().find(|k| k.name == name)
}

/// 用模板书写带参数的关键词
pub fn render(template: &str, name: &str, value: &str) -> String {
    template.replacen("{}", name, 1).replacen("{}", value, 1)
}

/// 书写用户给出的额外关键词；带 `=` 的按第一个 `=` 拆分后套用模板
pub fn format_extra_keyword(entry: &str) -> String {
    match entry.split_once('=') {
        Some((name, value)) => match lookup(name).and_then(|k| k.format) {
            Some(template) => render(template, name, value),
            None => format!("{}={}", name, value),
        },
        None => entry.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_template() {
        assert_eq!(format_extra_keyword("THERMO=300,400"), "THERMO(300,400)");
        assert_eq!(format_extra_keyword("FIELD=0,0,1"), "FIELD=(0,0,1)");
        assert_eq!(format_extra_keyword("CHARGE=1"), "CHARGE=1");
    }

    #[test]
    fn test_unknown_and_plain_keywords() {
        assert_eq!(format_extra_keyword("FOO=bar"), "FOO=bar");
        assert_eq!(format_extra_keyword("A=b=c"), "A=b=c");
        assert_eq!(format_extra_keyword("BONDS"), "BONDS");
    }
}
