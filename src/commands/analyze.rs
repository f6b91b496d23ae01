//! # analyze 命令实现
//!
//! 解析 MOPAC 的 .aux 输出并分析。
//!
//! ## 功能
//! - 按运行顺序收集 .aux 文件（`input.aux`, `followup_1.aux`, ...）
//! - 调用单点能或振动分析，打印报告与警告
//! - 将请求的结果存为变量或表格
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 使用 `mopac/`, `parsers/`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use super::load_parameters;
use crate::cli::analyze::AnalyzeArgs;
use crate::config::StepParameters;
use crate::error::{MopacStepError, Result};
use crate::models::{ResultMapping, System};
use crate::mopac::{
    analyze_energy, analyze_vibrations, AnalysisOptions, RequestedResult, WorkflowStore,
};
use crate::parsers::aux::parse_aux_file;
use crate::parsers::xyz::parse_xyz_file;
use crate::utils::units::UnitTable;
use crate::utils::{output, progress};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const AUX_PATTERN: &str = "*.aux";

/// 运行顺序：`input.aux` 最先，随后按序号排列 `followup_N.aux`，其余按名称
fn run_order(path: &Path) -> (u8, usize, String) {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let stem = name.trim_end_matches(".aux");

    if stem == "input" {
        return (0, 0, name);
    }
    match stem
        .strip_prefix("followup_")
        .and_then(|n| n.parse::<usize>().ok())
    {
        Some(n) => (1, n, name),
        None => (2, 0, name),
    }
}

/// 在作业目录中查找 .aux 文件
pub fn collect_aux_files(job_dir: &Path) -> Result<Vec<PathBuf>> {
    if !job_dir.is_dir() {
        return Err(MopacStepError::DirectoryNotFound {
            path: job_dir.display().to_string(),
        });
    }

    let glob_pattern = glob::Pattern::new(AUX_PATTERN).map_err(|e| {
        MopacStepError::InvalidArgument(format!("Invalid pattern '{}': {}", AUX_PATTERN, e))
    })?;

    let mut files: Vec<PathBuf> = WalkDir::new(job_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|name| glob_pattern.matches(name))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort_by_key(|p| run_order(p));

    if files.is_empty() {
        return Err(MopacStepError::NoFilesFound {
            pattern: job_dir.join(AUX_PATTERN).display().to_string(),
        });
    }
    Ok(files)
}

/// 解析全部 .aux 文件
fn parse_sections(files: &[PathBuf]) -> Result<Vec<ResultMapping>> {
    let pb = progress::create_progress_bar(files.len() as u64, "Parsing");
    let mut sections = Vec::with_capacity(files.len());
    for file in files {
        pb.set_message(
            file.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string(),
        );
        sections.push(parse_aux_file(file)?);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(sections)
}

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    let step = load_parameters(&args.options, &[])?;
    output::print_header(&format!("Analyzing MOPAC {} step", step.kind()));

    let files = match &args.job_dir {
        Some(dir) => collect_aux_files(dir)?,
        None => args.aux.clone(),
    };
    for file in &files {
        if !file.exists() {
            return Err(MopacStepError::FileNotFound {
                path: file.display().to_string(),
            });
        }
    }
    output::print_info(&format!("Found {} .aux file(s)", files.len()));
    let sections = parse_sections(&files)?;

    let requested = args
        .results
        .iter()
        .map(|r| r.parse::<RequestedResult>())
        .collect::<Result<Vec<_>>>()?;

    let configuration = parse_xyz_file(&args.options.structure)?;
    let mut system = System::new(configuration.name.clone(), configuration);

    let directory = args
        .directory
        .clone()
        .or_else(|| args.job_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let options = AnalysisOptions {
        max_atoms_to_print: args.max_atoms_to_print,
        directory: directory.clone(),
        plot: args.plot,
        ..AnalysisOptions::default()
    };

    let mut store = WorkflowStore::new();
    let analysis = match &step {
        StepParameters::Energy(params) => analyze_energy(
            params,
            &sections,
            system.configuration_mut(),
            &options,
            &UnitTable,
            &mut store,
            &requested,
        )?,
        StepParameters::Ir(params) => analyze_vibrations(
            params,
            &sections,
            &mut system,
            &options,
            &UnitTable,
            &mut store,
            &requested,
        )?,
        StepParameters::Thermodynamics(params) => analyze_vibrations(
            &params.vibrations,
            &sections,
            &mut system,
            &options,
            &UnitTable,
            &mut store,
            &requested,
        )?,
    };

    println!("{}\n", analysis.report);

    for warning in &analysis.warnings {
        output::print_warning(warning);
    }
    for file in &analysis.files {
        output::print_success(&format!("Wrote {}", file.display()));
    }

    for (name, value) in store.variables() {
        output::print_info(&format!("{} = {}", name, value));
    }
    for path in store.write_tables(&directory)? {
        output::print_success(&format!("Wrote {}", path.display()));
    }

    output::print_done(&format!(
        "Analyzed {} section(s), stored {} result(s)",
        sections.len(),
        analysis.stored
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_aux_files_in_run_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["followup_10.aux", "followup_2.aux", "input.aux", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let files = collect_aux_files(dir.path()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["input.aux", "followup_2.aux", "followup_10.aux"]);
    }

    #[test]
    fn test_empty_job_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_aux_files(dir.path()).unwrap_err();
        assert!(matches!(err, MopacStepError::NoFilesFound { .. }));
    }
}
