//! # 参考文献条目
//!
//! 以别名为键的 BibTeX 原文。引用规则表中出现的每个别名都必须在此存在。
//!
//! ## 依赖关系
//! - 被 `references/mod.rs` 使用

/// 文献库
pub trait Bibliography {
    /// 查找别名对应的原文
    fn raw(&self, alias: &str) -> Option<&str>;
}

/// 内置的 MOPAC 参数化文献
#[derive(Debug, Clone, Copy, Default)]
pub struct MopacBibliography;

impl Bibliography for MopacBibliography {
    fn raw(&self, alias: &str) -> Option<&str> {
        ENTRIES
            .iter()
            .find(|(key, _)| *key == alias)
            .map(|(_, raw)| *raw)
    }
}

macro_rules! article {
    ($alias:literal, $author:literal, $title:literal, $journal:literal, $year:literal, $volume:literal, $pages:literal) => {
        (
            $alias,
            concat!(
                "@article{", $alias, ",\n",
                "  author = {", $author, "},\n",
                "  title = {", $title, "},\n",
                "  journal = {", $journal, "},\n",
                "  year = {", $year, "},\n",
                "  volume = {", $volume, "},\n",
                "  pages = {", $pages, "}\n",
                "}"
            ),
        )
    };
}

/// (别名, BibTeX 原文)
pub const ENTRIES: &[(&str, &str)] = &[
    // AM1
    article!("Dewar_1985c", "Dewar, Michael J. S. and Zoebisch, Eve G. and Healy, Eamonn F. and Stewart, James J. P.",
        "Development and use of quantum mechanical molecular models. 76. AM1: a new general purpose quantum mechanical molecular model",
        "Journal of the American Chemical Society", "1985", "107", "3902--3909"),
    article!("Dewar_1988", "Dewar, Michael J. S. and Zoebisch, Eve G.",
        "Extension of AM1 to the halogens", "Journal of Molecular Structure: THEOCHEM",
        "1988", "180", "1--21"),
    article!("Dewar_1990", "Dewar, Michael J. S. and Holder, Andrew J.",
        "AM1 parameters for aluminum", "Organometallics", "1990", "9", "508--511"),
    article!("Dewar_1987b", "Dewar, Michael J. S. and Jie, Caoxian",
        "AM1 parameters for silicon", "Organometallics", "1987", "6", "1486--1490"),
    article!("Dewar_1989", "Dewar, Michael J. S. and Jie, Caoxian",
        "AM1 parameters for phosphorus", "Journal of Molecular Structure: THEOCHEM",
        "1989", "187", "1--13"),
    article!("Dewar_1990b", "Dewar, Michael J. S. and Yuan, Yate-Ching",
        "AM1 parameters for sulfur", "Inorganic Chemistry", "1990", "29", "3881--3890"),
    article!("Dewar_1988b", "Dewar, Michael J. S. and Merz, Kenneth M.",
        "AM1 parameters for zinc", "Organometallics", "1988", "7", "522--524"),
    article!("Dewar_1989b", "Dewar, Michael J. S. and Jie, Caoxian",
        "AM1 parameters for germanium", "Organometallics", "1989", "8", "1544--1547"),
    article!("Voityuk_2000", "Voityuk, Alexander A. and R{\\\"o}sch, Notker",
        "AM1/d parameters for molybdenum", "The Journal of Physical Chemistry A",
        "2000", "104", "4089--4094"),
    article!("Dewar_1989c", "Dewar, Michael J. S. and Jie, Caoxian",
        "AM1 parameters for mercury", "Journal of Molecular Structure: THEOCHEM",
        "1989", "187", "1--13"),
    article!("Stewart_2004", "Stewart, James J. P.",
        "Optimization of parameters for semiempirical methods IV: extension of MNDO, AM1, and PM3 to more main group elements",
        "Journal of Molecular Modeling", "2004", "10", "155--164"),
    // MNDO / MNDO-D
    article!("Dewar_1977", "Dewar, Michael J. S. and Thiel, Walter",
        "Ground states of molecules. 38. The MNDO method. Approximations and parameters",
        "Journal of the American Chemical Society", "1977", "99", "4899--4907"),
    article!("Dewar_1978", "Dewar, Michael J. S. and Rzepa, Henry S.",
        "Ground states of molecules. 40. MNDO results for molecules containing beryllium",
        "Journal of the American Chemical Society", "1978", "100", "777--784"),
    article!("Davis_1981", "Davis, Larry P. and Guidry, Richard M. and Williams, James R. and Dewar, Michael J. S. and Rzepa, Henry S.",
        "MNDO calculations for compounds containing aluminum and boron",
        "Journal of Computational Chemistry", "1981", "2", "433--445"),
    article!("Dewar_1978b", "Dewar, Michael J. S. and Rzepa, Henry S.",
        "Ground states of molecules. 45. MNDO results for molecules containing fluorine",
        "Journal of the American Chemical Society", "1978", "100", "58--67"),
    article!("Dewar_1986", "Dewar, Michael J. S. and Friedheim, James and Grady, Gilbert and Healy, Eamonn F. and Stewart, James J. P.",
        "Revised MNDO parameters for silicon", "Organometallics", "1986", "5", "375--379"),
    article!("Dewar_1986b", "Dewar, Michael J. S. and Reynolds, Christopher H.",
        "An improved set of MNDO parameters for sulfur", "Journal of Computational Chemistry",
        "1986", "7", "140--143"),
    article!("Dewar_1983", "Dewar, Michael J. S. and Rzepa, Henry S.",
        "Ground states of molecules. 53. MNDO calculations for molecules containing chlorine",
        "Journal of Computational Chemistry", "1983", "4", "158--169"),
    article!("Dewar_1986c", "Dewar, Michael J. S. and Merz, Kenneth M.",
        "MNDO calculations for compounds containing zinc", "Organometallics",
        "1986", "5", "1494--1496"),
    article!("Dewar_1987", "Dewar, Michael J. S. and Grady, Gilbert L. and Healy, Eamonn F.",
        "Ground states of molecules. 68. MNDO calculations for compounds containing germanium",
        "Organometallics", "1987", "6", "186--189"),
    article!("Dewar_1983b", "Dewar, Michael J. S. and Healy, Eamonn F.",
        "Ground states of molecules. 64. MNDO calculations for compounds containing bromine",
        "Journal of Computational Chemistry", "1983", "4", "542--551"),
    article!("Dewar_1984", "Dewar, Michael J. S. and Grady, Gilbert L. and Stewart, James J. P.",
        "Ground states of molecules. 69. MNDO calculations for compounds containing tin",
        "Journal of the American Chemical Society", "1984", "106", "6771--6773"),
    article!("Dewar_1984b", "Dewar, Michael J. S. and Healy, Eamonn F. and Stewart, James J. P.",
        "Ground states of molecules. 66. MNDO calculations for compounds containing iodine",
        "Journal of Computational Chemistry", "1984", "5", "358--362"),
    article!("Dewar_1985", "Dewar, Michael J. S. and Grady, Gilbert L. and Merz, Kenneth M. and Stewart, James J. P.",
        "MNDO calculations for compounds containing mercury", "Organometallics",
        "1985", "4", "1964--1966"),
    article!("Dewar_1985b", "Dewar, Michael J. S. and Holloway, M. Kate and Grady, Gilbert L. and Stewart, James J. P.",
        "MNDO calculations for compounds containing lead", "Organometallics",
        "1985", "4", "1973--1980"),
    article!("Thiel_1992", "Thiel, Walter and Voityuk, Alexander A.",
        "Extension of the MNDO formalism to d orbitals: integral approximations and preliminary numerical results",
        "Theoretica Chimica Acta", "1992", "81", "391--404"),
    article!("Thiel_1996", "Thiel, Walter and Voityuk, Alexander A.",
        "Extension of MNDO to d orbitals: parameters and results for the second-row elements and for the zinc group",
        "The Journal of Physical Chemistry", "1996", "100", "616--626"),
    // PM3
    article!("Stewart_1989", "Stewart, James J. P.",
        "Optimization of parameters for semiempirical methods I. Method",
        "Journal of Computational Chemistry", "1989", "10", "209--220"),
    article!("Stewart_1991", "Stewart, James J. P.",
        "Optimization of parameters for semiempirical methods. III Extension of PM3 to Be, Mg, Zn, Ga, Ge, As, Se, Cd, In, Sn, Sb, Te, Hg, Tl, Pb, and Bi",
        "Journal of Computational Chemistry", "1991", "12", "320--341"),
    article!("Anders_1993", "Anders, Ekkehard and Koch, Rainer and Freunscht, Peter",
        "Optimization and application of lithium parameters for PM3",
        "Journal of Computational Chemistry", "1993", "14", "1301--1312"),
    // PM6 与修正项
    article!("Stewart_2007", "Stewart, James J. P.",
        "Optimization of parameters for semiempirical methods V: Modification of NDDO approximations and application to 70 elements",
        "Journal of Molecular Modeling", "2007", "13", "1173--1213"),
    article!("Grimme_2010", "Grimme, Stefan and Antony, Jens and Ehrlich, Stephan and Krieg, Helge",
        "A consistent and accurate ab initio parametrization of density functional dispersion correction (DFT-D) for the 94 elements H-Pu",
        "The Journal of Chemical Physics", "2010", "132", "154104"),
    article!("Korth_2010", "Korth, Martin",
        "Third-generation hydrogen-bonding corrections for semiempirical QM methods and force fields",
        "Journal of Chemical Theory and Computation", "2010", "6", "3808--3816"),
    article!("Korth_2009", "Korth, Martin and Pito{\\v{n}}{\\'a}k, Michal and {\\v{R}}ez{\\'a}{\\v{c}}, Jan and Hobza, Pavel",
        "A transferable H-bonding correction for semiempirical quantum-chemical methods",
        "Journal of Chemical Theory and Computation", "2010", "6", "344--352"),
    article!("Rezac_2009", "{\\v{R}}ez{\\'a}{\\v{c}}, Jan and Fanfrl{\\'i}k, Jind{\\v{r}}ich and Salahub, Dennis and Hobza, Pavel",
        "Semiempirical quantum chemical PM6 method augmented by dispersion and H-bonding correction terms reliably describes various types of noncovalent complexes",
        "Journal of Chemical Theory and Computation", "2009", "5", "1749--1760"),
    article!("Rezac_2011", "{\\v{R}}ez{\\'a}{\\v{c}}, Jan and Hobza, Pavel",
        "Advanced corrections of hydrogen bonding and dispersion for semiempirical quantum mechanical methods",
        "Journal of Chemical Theory and Computation", "2012", "8", "141--151"),
    article!("Vorlova_2015", "Vorlov{\\'a}, Barbora and Nachtigallov{\\'a}, Dana and Jir{\\'a}skov{\\'a}-Van{\\'i}{\\v{c}}kov{\\'a}, Jana and Ajani, Haresh and Jansa, Petr and {\\v{R}}ez{\\'a}{\\v{c}}, Jan and others",
        "Malonate-based inhibitors of mammalian serine racemase: kinetic characterization and structure-based computational study",
        "European Journal of Medicinal Chemistry", "2015", "89", "189--197"),
    article!("Brahmkshatriya_2013", "Brahmkshatriya, Pathik S. and Dobe{\\v{s}}, Petr and Fanfrl{\\'i}k, Jind{\\v{r}}ich and {\\v{R}}ez{\\'a}{\\v{c}}, Jan and Paruch, Kamil and Bronowska, Agnieszka and Lep{\\v{s}}{\\'i}k, Martin and Hobza, Pavel",
        "Quantum mechanical scoring: structural and energetic insights into cyclin-dependent kinase 2 inhibition by pyrazolo[1,5-a]pyrimidines",
        "Current Computer-Aided Drug Design", "2013", "9", "118--129"),
    // PM7
    article!("Stewart_2012", "Stewart, James J. P.",
        "Optimization of parameters for semiempirical methods VI: more modifications to the NDDO approximations and re-optimization of parameters",
        "Journal of Molecular Modeling", "2013", "19", "1--32"),
    // RM1
    article!("Rocha_2006", "Rocha, Gerd B. and Freire, Ricardo O. and Simas, Alfredo M. and Stewart, James J. P.",
        "RM1: A reparameterization of AM1 for H, C, N, O, P, S, F, Cl, Br, and I",
        "Journal of Computational Chemistry", "2006", "27", "1101--1111"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let raw = MopacBibliography.raw("Stewart_2012").unwrap();
        assert!(raw.starts_with("@article{Stewart_2012,"));
        assert!(raw.contains("Journal of Molecular Modeling"));
        assert!(MopacBibliography.raw("Nobody_1900").is_none());
    }

    #[test]
    fn test_aliases_are_unique() {
        for (i, (alias, _)) in ENTRIES.iter().enumerate() {
            assert!(
                !ENTRIES[i + 1..].iter().any(|(other, _)| other == alias),
                "duplicate alias {}",
                alias
            );
        }
    }
}
