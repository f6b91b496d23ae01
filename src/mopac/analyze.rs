//! # 单点能结果分析
//!
//! 读取 .aux 解析得到的结果映射，生成文字报告和性质表，
//! 更新原子的电荷与自旋属性，写出 `atom_properties.csv`，
//! 并把请求的结果交给结果存储。
//!
//! ## 依赖关系
//! - 被 `mopac/vibrations.rs`, `commands/analyze.rs` 使用
//! - 使用 `mopac/orbitals.rs`, `mopac/store.rs`, `utils/text.rs`, `utils/units.rs`

use super::orbitals::frontier_orbitals;
use super::store::{RequestedResult, ResultStore, RESULT_METADATA};
use crate::config::{EnergyParameters, MozymeFollowUp};
use crate::error::{MopacStepError, Result};
use crate::models::{ColumnType, Configuration, ResultMapping};
use crate::utils::text::{format_paragraphs, indent, substitute, REPORT_WIDTH};
use crate::utils::units::UnitConverter;

use std::fs;
use std::path::{Path, PathBuf};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

/// MOZYME 正交性误差的报警阈值 (kJ/mol)
pub const ORTHONORMALITY_WARNING: f64 = 10.0;

pub const ATOM_PROPERTIES_FILE: &str = "atom_properties.csv";

/// 分析选项
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// 原子数不超过此值时在报告中列出原子表
    pub max_atoms_to_print: usize,
    /// 报告的基础缩进
    pub indent: String,
    /// 副产物文件的输出目录
    pub directory: PathBuf,
    /// 是否绘制红外光谱
    pub plot: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            max_atoms_to_print: 25,
            indent: String::new(),
            directory: PathBuf::from("."),
            plot: false,
        }
    }
}

/// 分析结果
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub report: String,
    pub warnings: Vec<String>,
    /// 写出的文件
    pub files: Vec<PathBuf>,
    /// 存入结果存储的条目数
    pub stored: usize,
}

#[derive(Debug, Clone, Tabled)]
struct PropertyRow {
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Units")]
    units: String,
}

/// 性质表
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    rows: Vec<PropertyRow>,
}

impl ReportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: &str, value: String, units: &str) {
        self.rows.push(PropertyRow {
            property: property.to_string(),
            value,
            units: units.to_string(),
        });
    }

    pub fn render(&self) -> String {
        Table::new(&self.rows)
            .with(Style::psql())
            .with(Modify::new(Columns::single(0)).with(Alignment::center()))
            .with(Modify::new(Columns::single(1)).with(Alignment::right()))
            .to_string()
    }
}

#[derive(Debug, Clone, Tabled)]
struct ChargeRow {
    #[tabled(rename = "Atom")]
    atom: usize,
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Charge")]
    charge: String,
}

#[derive(Debug, Clone, Tabled)]
struct ChargeSpinRow {
    #[tabled(rename = "Atom")]
    atom: usize,
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Charge")]
    charge: String,
    #[tabled(rename = "Spin")]
    spin: String,
}

/// 标题居中于表格之上
pub fn titled(title: &str, table: &str) -> String {
    let width = table
        .lines()
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0);
    let pad = width.saturating_sub(title.chars().count()) / 2;
    format!("{}{}\n{}", " ".repeat(pad), title, table)
}

/// 合并输出段：有 MOZYME 后续计算时第二段覆盖第一段
pub fn merge_sections(sections: &[ResultMapping], used_follow_up: bool) -> Result<ResultMapping> {
    let first = sections.first().ok_or(MopacStepError::NoOutputSections)?;
    match sections.get(1) {
        Some(second) if used_follow_up => Ok(first.merged(second)),
        _ => Ok(first.clone()),
    }
}

/// 逐原子自旋：优先 `ATOM_SPINS`，否则按 `AO_ATOMINDEX` 累加 `AO_SPINS`
pub fn atom_spins(data: &ResultMapping, n_atoms: usize) -> Result<Option<Vec<f64>>> {
    if let Some(spins) = data.floats("ATOM_SPINS") {
        return Ok(Some(spins));
    }

    let (Some(ao_spins), Some(index)) = (data.floats("AO_SPINS"), data.integers("AO_ATOMINDEX"))
    else {
        return Ok(None);
    };

    let mut spins = vec![0.0; n_atoms];
    for (spin, atom) in ao_spins.iter().zip(&index) {
        let slot = usize::try_from(*atom)
            .ok()
            .and_then(|a| a.checked_sub(1))
            .and_then(|a| spins.get_mut(a))
            .ok_or_else(|| {
                MopacStepError::Other(format!(
                    "AO_ATOMINDEX refers to atom {} but the structure has {} atoms",
                    atom, n_atoms
                ))
            })?;
        *slot += spin;
    }
    Ok(Some(spins))
}

/// 写出电荷（与自旋）CSV
pub fn write_atom_properties(
    path: &Path,
    symbols: &[String],
    charges: &[f64],
    spins: Option<&[f64]>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(MopacStepError::CsvError)?;

    match spins {
        Some(spins) => {
            wtr.write_record(["Atom", "Element", "Charge", "Spin"])
                .map_err(MopacStepError::CsvError)?;
            for (i, ((symbol, q), s)) in symbols.iter().zip(charges).zip(spins).enumerate() {
                wtr.write_record(&[
                    (i + 1).to_string(),
                    symbol.clone(),
                    format!("{:.3}", q),
                    format!("{:.3}", s),
                ])
                .map_err(MopacStepError::CsvError)?;
            }
        }
        None => {
            wtr.write_record(["Atom", "Element", "Charge"])
                .map_err(MopacStepError::CsvError)?;
            for (i, (symbol, q)) in symbols.iter().zip(charges).enumerate() {
                wtr.write_record(&[(i + 1).to_string(), symbol.clone(), format!("{:.2}", q)])
                    .map_err(MopacStepError::CsvError)?;
            }
        }
    }

    wtr.flush().map_err(|e| MopacStepError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

fn atom_table(symbols: &[String], charges: &[f64], spins: Option<&[f64]>) -> String {
    match spins {
        Some(spins) => {
            let rows: Vec<ChargeSpinRow> = symbols
                .iter()
                .zip(charges)
                .zip(spins)
                .enumerate()
                .map(|(i, ((symbol, q), s))| ChargeSpinRow {
                    atom: i + 1,
                    element: symbol.clone(),
                    charge: format!("{:.3}", q),
                    spin: format!("{:.3}", s),
                })
                .collect();
            titled(
                "Atomic charges and spins",
                &Table::new(&rows)
                    .with(Style::psql())
                    .with(Modify::new(Columns::new(0..2)).with(Alignment::center()))
                    .to_string(),
            )
        }
        None => {
            let rows: Vec<ChargeRow> = symbols
                .iter()
                .zip(charges)
                .enumerate()
                .map(|(i, (symbol, q))| ChargeRow {
                    atom: i + 1,
                    element: symbol.clone(),
                    charge: format!("{:.2}", q),
                })
                .collect();
            titled(
                "Atomic charges",
                &Table::new(&rows)
                    .with(Style::psql())
                    .with(Modify::new(Columns::new(0..2)).with(Alignment::center()))
                    .to_string(),
            )
        }
    }
}

fn cpu_time_text(sections: &[ResultMapping], used_follow_up: bool) -> Option<String> {
    let first = sections.first()?.float("CPU_TIME");
    if used_follow_up {
        let t0 = first?;
        match sections.get(1).and_then(|s| s.float("CPU_TIME")) {
            Some(t1) => Some(format!(
                "This MOZYME calculation took {:.2} s and the follow-up took {:.2} s.",
                t0, t1
            )),
            None => Some(format!("The MOZYME calculation took {:.2} s.", t0)),
        }
    } else {
        first.map(|t0| format!("This calculation took {:.2} s.", t0))
    }
}

/// 分析单点能输出
#[allow(clippy::too_many_arguments)]
pub fn analyze_energy(
    params: &EnergyParameters,
    sections: &[ResultMapping],
    configuration: &mut Configuration,
    options: &AnalysisOptions,
    units: &dyn UnitConverter,
    store: &mut dyn ResultStore,
    requested: &[RequestedResult],
) -> Result<Analysis> {
    let used_follow_up = params.has_mozyme_follow_up(configuration.n_atoms());
    let mut data = merge_sections(sections, used_follow_up)?;
    let mut table = ReportTable::new();
    let mut text = String::new();
    let mut warnings = Vec::new();

    if let Some(norm) = data.float("GRADIENT_NORM") {
        table.push("Gradient Norm", format!("{:.2}", norm), "kcal/mol/Å");
    }

    match data.text("POINT_GROUP") {
        Some(group) if !group.trim().is_empty() => {
            text.push_str("The molecule has {POINT_GROUP} symmetry.")
        }
        _ => text.push_str("The symmetry of the molecule was not determined."),
    }

    if let Some(hof) = data.float("HEAT_OF_FORMATION") {
        table.push("Enthalpy of Formation", format!("{:.2}", hof), "kcal/mol");

        let hof_kj = units.convert(hof, "kcal/mol", "kJ/mol")?;
        data.insert_float("Enthalpy of Formation", hof_kj);
        table.push("", format!("{:.2}", hof_kj), "kJ/mol");

        if let Some(mozyme_hof) = sections
            .first()
            .filter(|_| used_follow_up && sections.len() > 1)
            .and_then(|s| s.float("HEAT_OF_FORMATION"))
        {
            let mozyme_kj = units.convert(mozyme_hof, "kcal/mol", "kJ/mol")?;
            table.push("MOZYME Enthalpy of Formation", format!("{:.2}", mozyme_kj), "kJ/mol");

            let error = mozyme_kj - hof_kj;
            table.push("Orthonormality error in EoF", format!("{:.2}", error), "kJ/mol");

            if error.abs() > ORTHONORMALITY_WARNING {
                let mut warning = format!(
                    "Warning: The non-orthogonality of the localized orbitals led to an \
                     error in the enthalpy of formation of {:.2} kJ/mol. This is expected \
                     if there were many iterations of geometry optimization. Otherwise \
                     check the results carefully.",
                    error
                );
                if params.mozyme_follow_up == MozymeFollowUp::Exact {
                    warning.push_str(
                        " You followed up with an exact calculation. A large difference in \
                         the energy could indicate a problem with the localized molecular \
                         orbitals. Check the MOPAC output carefully!",
                    );
                }
                text.push_str("\n\n");
                text.push_str(&warning);
                warnings.push(warning);
            }
        }
    }

    if let Some(sz) = data.float("SPIN_COMPONENT") {
        table.push("Sz", format!("{:.2}", sz), "");
    }
    if let Some(s2) = data.float("TOTAL_SPIN") {
        table.push("S^2", format!("{:.2}", s2), "");
    }
    if let Some(ip) = data.float("IONIZATION_POTENTIAL") {
        table.push("Ionization Energy", format!("{:.2}", ip), "eV");
    }
    if let Some(dipole) = data.float("DIPOLE") {
        table.push("Dipole Moment", format!("{:.2}", dipole), "Debye");
    }

    if let Some(orbitals) = frontier_orbitals(&data) {
        data.insert_float("HOMO Energy", orbitals.homo);
        table.push("HOMO Energy", format!("{:.2}", orbitals.homo), "eV");
        if let (Some(lumo), Some(gap)) = (orbitals.lumo, orbitals.gap()) {
            data.insert_float("LUMO Energy", lumo);
            data.insert_float("HOMO-LUMO Gap", gap);
            table.push("LUMO Energy", format!("{:.2}", lumo), "eV");
            table.push("Gap", format!("{:.2}", gap), "eV");
        }
    }

    if let Some(area) = data.float("AREA") {
        table.push("COSMO Area", format!("{:.2}", area), "Å^2");
    }
    if let Some(volume) = data.float("VOLUME") {
        table.push("COSMO Volume", format!("{:.2}", volume), "Å^3");
    }

    let mut blocks = vec![titled("Results", &table.render())];
    let mut files = Vec::new();

    // 电荷与自旋
    let n_atoms = configuration.n_atoms();
    let spins = atom_spins(&data, n_atoms)?;
    if let Some(spins) = &spins {
        let atoms = &mut configuration.atoms;
        atoms.add_attribute("spin", ColumnType::Float, true);
        atoms.assign("spin", spins)?;
    }

    if let Some(charges) = data.floats("ATOM_CHARGES") {
        let atoms = &mut configuration.atoms;
        atoms.add_attribute("charge", ColumnType::Float, true);
        atoms.assign("charge", &charges)?;

        fs::create_dir_all(&options.directory).map_err(|e| MopacStepError::FileWriteError {
            path: options.directory.display().to_string(),
            source: e,
        })?;
        let path = options.directory.join(ATOM_PROPERTIES_FILE);
        let symbols = configuration.atoms.symbols();
        write_atom_properties(&path, symbols, &charges, spins.as_deref())?;
        files.push(path);

        if n_atoms <= options.max_atoms_to_print {
            blocks.push(atom_table(symbols, &charges, spins.as_deref()));
        }
    }

    let paragraph_indent = format!("{}    ", options.indent);
    let table_indent = format!("{}       ", options.indent);
    let text = substitute(&text, &data.scalar_strings());

    let mut report = format_paragraphs(&text, &paragraph_indent, REPORT_WIDTH);
    report.push_str("\n\n");
    report.push_str(&indent(&blocks.join("\n\n"), &table_indent));

    if let Some(cpu) = cpu_time_text(sections, used_follow_up && sections.len() > 1) {
        report.push_str("\n\n");
        report.push_str(&format_paragraphs(&cpu, &paragraph_indent, REPORT_WIDTH));
    }

    let stored = store.store_results(&data, RESULT_METADATA, requested, params.create_tables)?;

    Ok(Analysis {
        report,
        warnings,
        files,
        stored,
    })
}
