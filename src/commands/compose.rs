//! # compose 命令实现
//!
//! 读取结构与步骤参数，写出 MOPAC 输入文件。
//!
//! ## 功能
//! - 打印步骤说明与每次运行的关键词
//! - 写出 `input.mop`，有后续计算时写出 `followup_N.mop`
//! - 列出登记的文献引用
//!
//! ## 依赖关系
//! - 使用 `cli/compose.rs` 定义的参数
//! - 使用 `mopac/`, `references/`, `parsers/xyz.rs`
//! - 使用 `utils/output.rs`

use super::load_parameters;
use crate::cli::compose::ComposeArgs;
use crate::error::{MopacStepError, Result};
use crate::mopac::{build_jobs, description_text, input_deck};
use crate::parsers::xyz::parse_xyz_file;
use crate::references::{MopacBibliography, References};
use crate::utils::output;

use std::fs;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// 引用表中的一行
#[derive(Debug, Clone, Tabled)]
struct CitationRow {
    #[tabled(rename = "Reference")]
    alias: String,
    #[tabled(rename = "Level")]
    level: u8,
    #[tabled(rename = "Cited")]
    count: usize,
    #[tabled(rename = "Note")]
    note: String,
}

/// 第 `index` 次运行的输入文件名
pub fn deck_name(index: usize) -> String {
    if index == 0 {
        "input.mop".to_string()
    } else {
        format!("followup_{}.mop", index)
    }
}

/// 执行 compose 命令
pub fn execute(args: ComposeArgs) -> Result<()> {
    let step = load_parameters(&args.options, &args.keywords)?;
    output::print_header(&format!("Composing MOPAC {} step", step.kind()));

    if !args.options.structure.exists() {
        return Err(MopacStepError::FileNotFound {
            path: args.options.structure.display().to_string(),
        });
    }
    let mut configuration = parse_xyz_file(&args.options.structure)?;
    configuration.charge = args.charge;
    configuration.spin_multiplicity = args.multiplicity;
    output::print_info(&format!(
        "Structure '{}': {} atoms ({})",
        configuration.name,
        configuration.n_atoms(),
        configuration.formula()
    ));

    let description = description_text(&step);
    println!("{}\n", description);

    let mut references = References::new();
    let jobs = build_jobs(
        &step,
        &configuration,
        args.step_index <= 1,
        &MopacBibliography,
        &mut references,
    )?;

    fs::create_dir_all(&args.output).map_err(|e| MopacStepError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let mut written: Vec<PathBuf> = Vec::new();
    for (i, job) in jobs.iter().enumerate() {
        let path = args.output.join(deck_name(i));
        fs::write(&path, input_deck(job, &configuration, &description)).map_err(|e| {
            MopacStepError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            }
        })?;
        output::print_success(&format!("{}: {}", path.display(), job.keywords.join(" ")));
        written.push(path);
    }

    if !references.is_empty() {
        let rows: Vec<CitationRow> = references
            .records()
            .map(|r| CitationRow {
                alias: r.alias.clone(),
                level: r.level,
                count: references.count(&r.alias),
                note: r.note.clone(),
            })
            .collect();
        println!("\n{}", Table::new(&rows).with(Style::psql()));
    }

    output::print_done(&format!("Wrote {} input file(s)", written.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_names() {
        assert_eq!(deck_name(0), "input.mop");
        assert_eq!(deck_name(1), "followup_1.mop");
    }
}
