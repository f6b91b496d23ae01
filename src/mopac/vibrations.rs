//! # 振动分析
//!
//! 处理 `FORCE` 计算的输出：更新结构，写出 `optimized.xyz` 与
//! `vibrations.csv`，报告转动常数，可选绘制红外光谱，
//! 最后对同一组输出做单点能分析。热力学步骤同样使用此分析。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `mopac/analyze.rs`, `mopac/spectrum.rs`, `parsers/xyz.rs`

use super::analyze::{analyze_energy, merge_sections, titled, Analysis, AnalysisOptions};
use super::spectrum::{bands, generate_spectrum_plot};
use super::store::{RequestedResult, ResultStore};
use crate::config::{StructureHandling, VibrationParameters};
use crate::error::{MopacStepError, Result};
use crate::models::{ResultMapping, System};
use crate::parsers::xyz::write_xyz_file;
use crate::utils::text::{format_paragraphs, indent, REPORT_WIDTH};
use crate::utils::units::UnitConverter;

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

pub const OPTIMIZED_FILE: &str = "optimized.xyz";
pub const VIBRATIONS_FILE: &str = "vibrations.csv";
pub const SPECTRUM_FILE: &str = "vibrations.png";

/// 小于此值的主转动惯量视为零（线性分子少一个转动）
const MOMENT_THRESHOLD: f64 = 0.001;

#[derive(Debug, Clone, Tabled)]
struct RotationRow {
    #[tabled(rename = "Property")]
    property: String,
    #[tabled(rename = "1")]
    first: String,
    #[tabled(rename = "2")]
    second: String,
    #[tabled(rename = "3")]
    third: String,
    #[tabled(rename = "Units")]
    units: String,
}

impl RotationRow {
    fn new(property: &str, values: &[f64], precision: usize, units: &str) -> Self {
        let cell = |i: usize| {
            values
                .get(i)
                .map(|v| format!("{:.*}", precision, v))
                .unwrap_or_default()
        };
        RotationRow {
            property: property.to_string(),
            first: cell(0),
            second: cell(1),
            third: cell(2),
            units: units.to_string(),
        }
    }
}

/// 一个振动模式
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    pub frequency: f64,
    pub symmetry: String,
    pub transition_dipole: f64,
    pub travel: f64,
    pub reduced_mass: f64,
    pub effective_mass: f64,
}

/// 转动自由度数目
pub fn rotation_count(moments: &[f64]) -> usize {
    moments.iter().filter(|m| **m >= MOMENT_THRESHOLD).count()
}

/// 取出真正的振动模式：去掉 3 个平动与 `n_rot` 个转动
pub fn vibrational_modes(data: &ResultMapping) -> Vec<Mode> {
    let Some(frequencies) = data.floats("VIB._FREQ") else {
        return Vec::new();
    };
    let n_rot = data
        .floats("PRI_MOM_OF_I")
        .map(|m| rotation_count(&m))
        .unwrap_or(3);
    let n_vib = frequencies.len().saturating_sub(3 + n_rot);

    let symmetry = data
        .texts("NORMAL_MODE_SYMMETRY_LABELS")
        .unwrap_or_default();
    let column = |key: &str| data.floats(key).unwrap_or_default();
    let dipoles = column("VIB._T_DIP");
    let travel = column("VIB._TRAVEL");
    let reduced = column("VIB._RED_MASS");
    let effective = column("VIB._EFF_MASS");
    let at = |v: &[f64], i: usize| v.get(i).copied().unwrap_or(0.0);

    (0..n_vib)
        .map(|i| Mode {
            frequency: frequencies[i],
            symmetry: symmetry.get(i).cloned().unwrap_or_default(),
            transition_dipole: at(&dipoles, i),
            travel: at(&travel, i),
            reduced_mass: at(&reduced, i),
            effective_mass: at(&effective, i),
        })
        .collect()
}

/// `vibrations.csv` 的一行
#[derive(Debug, Serialize)]
struct ModeRecord {
    #[serde(rename = "Mode")]
    mode: usize,
    #[serde(rename = "Frequency (1/cm)")]
    frequency: String,
    #[serde(rename = "Symmetry")]
    symmetry: String,
    #[serde(rename = "Transition Dipole (e-)")]
    transition_dipole: String,
    #[serde(rename = "Travel (Å)")]
    travel: String,
    #[serde(rename = "Reduced Mass (amu)")]
    reduced_mass: String,
    #[serde(rename = "Effective Mass (amu)")]
    effective_mass: String,
}

/// 写出振动模式 CSV
pub fn write_vibrations(path: &Path, modes: &[Mode]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(MopacStepError::CsvError)?;

    for (i, mode) in modes.iter().enumerate() {
        wtr.serialize(ModeRecord {
            mode: i + 1,
            frequency: format!("{:.1}", mode.frequency),
            symmetry: mode.symmetry.clone(),
            transition_dipole: format!("{:.4}", mode.transition_dipole),
            travel: format!("{:.4}", mode.travel),
            reduced_mass: format!("{:.4}", mode.reduced_mass),
            effective_mass: format!("{:.4}", mode.effective_mass),
        })
        .map_err(MopacStepError::CsvError)?;
    }

    wtr.flush().map_err(|e| MopacStepError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

fn rotation_table(data: &ResultMapping) -> Option<String> {
    let mut rows = Vec::new();
    if let Some(moments) = data.floats("PRI_MOM_OF_I") {
        rows.push(RotationRow::new(
            "Moments of Inertia",
            &moments,
            2,
            "1.0E-40 g.cm^2",
        ));
    }
    if let Some(constants) = data.floats("ROTAT_CONSTS") {
        rows.push(RotationRow::new("Rotational Constants", &constants, 4, "1/cm"));
    }
    if rows.is_empty() {
        return None;
    }

    Some(titled(
        "Rotational Properties",
        &Table::new(&rows)
            .with(Style::psql())
            .with(Modify::new(Columns::single(0)).with(Alignment::center()))
            .to_string(),
    ))
}

/// 用输出中的定向坐标更新体系结构
fn update_structure(
    params: &VibrationParameters,
    data: &ResultMapping,
    system: &mut System,
) -> Result<bool> {
    let Some(xs) = data.floats("ORIENTATION_ATOM_X") else {
        return Ok(false);
    };

    if system.configuration().periodicity != 0 {
        return Err(MopacStepError::PeriodicNotSupported(
            "Vibrational analysis".to_string(),
        ));
    }

    let n_atoms = system.configuration().n_atoms();
    if xs.len() != 3 * n_atoms {
        return Err(MopacStepError::AttributeLength {
            name: "ORIENTATION_ATOM_X".to_string(),
            expected: 3 * n_atoms,
            found: xs.len(),
        });
    }
    let xyz: Vec<[f64; 3]> = xs.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

    if params.structure_handling == StructureHandling::NewConfiguration {
        system.create_configuration();
    }
    let number = system.configuration_number();
    let configuration = system.configuration_mut();
    configuration.atoms.set_coordinates(xyz)?;
    if let Some(name) = params
        .configuration_name
        .resolve(params.energy.hamiltonian, number)
    {
        configuration.name = name;
    }
    Ok(true)
}

/// 分析振动计算输出
pub fn analyze_vibrations(
    params: &VibrationParameters,
    sections: &[ResultMapping],
    system: &mut System,
    options: &AnalysisOptions,
    units: &dyn UnitConverter,
    store: &mut dyn ResultStore,
    requested: &[RequestedResult],
) -> Result<Analysis> {
    let n_atoms = system.configuration().n_atoms();
    let data = merge_sections(sections, params.energy.has_mozyme_follow_up(n_atoms))?;

    fs::create_dir_all(&options.directory).map_err(|e| MopacStepError::FileWriteError {
        path: options.directory.display().to_string(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    let mut paragraphs = Vec::new();

    if update_structure(params, &data, system)? {
        let path = options.directory.join(OPTIMIZED_FILE);
        write_xyz_file(&path, system.configuration())?;
        files.push(path);
        paragraphs.push(format!(
            "The structure was reoriented to the principal axes and will {}.",
            params.structure_handling
        ));
    }

    let modes = vibrational_modes(&data);
    if !modes.is_empty() {
        let path = options.directory.join(VIBRATIONS_FILE);
        write_vibrations(&path, &modes)?;
        files.push(path);

        let imaginary = modes.iter().filter(|m| m.frequency < 0.0).count();
        paragraphs.push(match imaginary {
            0 => format!("There are {} vibrational modes.", modes.len()),
            1 => format!(
                "There are {} vibrational modes, one of which is imaginary, \
                 so the structure is a transition state.",
                modes.len()
            ),
            n => format!(
                "There are {} vibrational modes, {} of which are imaginary, \
                 so the structure is not a minimum.",
                modes.len(),
                n
            ),
        });

        if options.plot {
            let frequencies: Vec<f64> = modes.iter().map(|m| m.frequency).collect();
            let dipoles: Vec<f64> = modes.iter().map(|m| m.transition_dipole).collect();
            let path = options.directory.join(SPECTRUM_FILE);
            generate_spectrum_plot(
                &bands(&frequencies, &dipoles),
                &path,
                &format!("IR Spectrum of {}", system.configuration().name),
            )?;
            files.push(path);
        }
    }

    if let Some(zpe) = data.float("ZERO_POINT_ENERGY") {
        paragraphs.push(format!("The zero point energy is {:.2} kcal/mol.", zpe));
    }

    let mut analysis = analyze_energy(
        &params.energy,
        sections,
        system.configuration_mut(),
        options,
        units,
        store,
        requested,
    )?;

    let paragraph_indent = format!("{}    ", options.indent);
    let table_indent = format!("{}       ", options.indent);
    let mut report = String::new();
    if !paragraphs.is_empty() {
        report.push_str(&format_paragraphs(
            &paragraphs.join("\n\n"),
            &paragraph_indent,
            REPORT_WIDTH,
        ));
        report.push_str("\n\n");
    }
    if let Some(table) = rotation_table(&data) {
        report.push_str(&indent(&table, &table_indent));
        report.push_str("\n\n");
    }
    report.push_str(&analysis.report);

    analysis.report = report;
    files.append(&mut analysis.files);
    analysis.files = files;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vibrations::ConfigurationName;
    use crate::config::EnergyParameters;
    use crate::models::{AtomTable, Configuration, ResultValue};
    use crate::mopac::store::WorkflowStore;
    use crate::utils::units::UnitTable;

    fn water() -> System {
        let mut atoms = AtomTable::new();
        atoms.push("O", [0.0, 0.0, 0.0]);
        atoms.push("H", [0.757, 0.586, 0.0]);
        atoms.push("H", [-0.757, 0.586, 0.0]);
        System::new("water", Configuration::new("water", atoms))
    }

    fn params(handling: StructureHandling, name: ConfigurationName) -> VibrationParameters {
        VibrationParameters {
            energy: EnergyParameters::default(),
            let_structure: false,
            structure_handling: handling,
            configuration_name: name,
        }
    }

    fn force_output() -> ResultMapping {
        let mut data = ResultMapping::new();
        data.insert(
            "ORIENTATION_ATOM_X",
            ResultValue::FloatArray(vec![0.0, 0.0, 0.1, 0.76, 0.0, -0.47, -0.76, 0.0, -0.47]),
        );
        data.insert("PRI_MOM_OF_I", ResultValue::FloatArray(vec![0.6, 1.2, 1.8]));
        data.insert("ROTAT_CONSTS", ResultValue::FloatArray(vec![27.0, 14.5, 9.4]));
        let mut freqs = vec![1600.0, 3700.0, 3800.0];
        freqs.extend([0.0; 6]);
        data.insert("VIB._FREQ", ResultValue::FloatArray(freqs));
        data.insert(
            "NORMAL_MODE_SYMMETRY_LABELS",
            ResultValue::TextArray(vec!["A1".into(), "A1".into(), "B2".into()]),
        );
        data.insert("VIB._T_DIP", ResultValue::FloatArray(vec![1.0, 0.2, 0.5]));
        data
    }

    #[test]
    fn test_rotation_count() {
        assert_eq!(rotation_count(&[0.0, 1.2, 1.2]), 2);
        assert_eq!(rotation_count(&[0.6, 1.2, 1.8]), 3);
    }

    #[test]
    fn test_vibrational_modes() {
        let mut data = ResultMapping::new();
        data.insert(
            "VIB._FREQ",
            ResultValue::FloatArray(vec![1600.0, 3700.0, 3800.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        );
        data.insert("PRI_MOM_OF_I", ResultValue::FloatArray(vec![0.6, 1.2, 1.8]));
        let modes = vibrational_modes(&data);
        assert_eq!(modes.len(), 3);
        assert_eq!(modes[0].frequency, 1600.0);
        assert_eq!(modes[2].symmetry, "");

        data.insert("PRI_MOM_OF_I", ResultValue::FloatArray(vec![0.0, 1.2, 1.2]));
        assert_eq!(vibrational_modes(&data).len(), 4);
    }

    #[test]
    fn test_new_configuration_named() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalysisOptions {
            directory: dir.path().to_path_buf(),
            ..AnalysisOptions::default()
        };
        let mut system = water();
        let mut store = WorkflowStore::new();
        let params = params(
            StructureHandling::NewConfiguration,
            ConfigurationName::Template("vibrations with <Hamiltonian>".to_string()),
        );

        let analysis = analyze_vibrations(
            &params,
            &[force_output()],
            &mut system,
            &options,
            &UnitTable,
            &mut store,
            &[],
        )
        .unwrap();

        assert_eq!(system.n_configurations(), 2);
        assert_eq!(system.configuration().name, "vibrations with PM7");
        assert_eq!(system.configuration().atoms.coordinates()[1], [0.76, 0.0, -0.47]);
        assert!(analysis.report.contains("Rotational Properties"));
        assert!(analysis.report.contains("There are 3 vibrational modes."));

        let text = fs::read_to_string(dir.path().join(VIBRATIONS_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Mode,Frequency (1/cm),Symmetry,Transition Dipole (e-),Travel (Å),\
             Reduced Mass (amu),Effective Mass (amu)"
        );
        assert_eq!(lines[3], "3,3800.0,B2,0.5000,0.0000,0.0000,0.0000");
        assert!(dir.path().join(OPTIMIZED_FILE).exists());
    }

    #[test]
    fn test_overwrite_keeps_single_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalysisOptions {
            directory: dir.path().to_path_buf(),
            ..AnalysisOptions::default()
        };
        let mut system = water();
        let mut store = WorkflowStore::new();
        let params = params(
            StructureHandling::Overwrite,
            ConfigurationName::ConfigurationNumber,
        );

        analyze_vibrations(
            &params,
            &[force_output()],
            &mut system,
            &options,
            &UnitTable,
            &mut store,
            &[],
        )
        .unwrap();
        assert_eq!(system.n_configurations(), 1);
        assert_eq!(system.configuration().name, "1");
    }

    #[test]
    fn test_periodic_rejected() {
        let mut system = water();
        system.configuration_mut().periodicity = 3;
        let mut store = WorkflowStore::new();
        let err = analyze_vibrations(
            &params(StructureHandling::Overwrite, ConfigurationName::KeepCurrent),
            &[force_output()],
            &mut system,
            &AnalysisOptions::default(),
            &UnitTable,
            &mut store,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, MopacStepError::PeriodicNotSupported(_)));
    }
}
