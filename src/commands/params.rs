//! # params 命令实现
//!
//! 列出步骤的参数声明：名称、类型、缺省值与可选值。
//! 详细模式下附带可写入 `extra keywords` 的 MOPAC 关键词表。
//!
//! ## 依赖关系
//! - 使用 `cli/params.rs` 定义的参数
//! - 使用 `config/`, `mopac/keywords.rs`, `utils/text.rs`

use crate::cli::params::ParamsArgs;
use crate::config::{ParameterSet, ParameterSpec, StepKind};
use crate::error::Result;
use crate::mopac::keywords::{render, KeywordInfo, KEYWORDS};
use crate::utils::output;
use crate::utils::text::{wrap, REPORT_WIDTH};

use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
struct ParameterRow {
    #[tabled(rename = "Parameter")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Choices")]
    choices: String,
}

impl From<&ParameterSpec> for ParameterRow {
    fn from(spec: &ParameterSpec) -> Self {
        let default = if spec.default_units.is_empty() {
            spec.default.to_string()
        } else {
            format!("{} {}", spec.default, spec.default_units)
        };
        ParameterRow {
            name: spec.name.to_string(),
            kind: spec.kind.to_string(),
            default,
            choices: wrap(&spec.enumeration.join(", "), 40).join("\n"),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct KeywordRow {
    #[tabled(rename = "Keyword")]
    name: String,
    #[tabled(rename = "Written as")]
    written: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&KeywordInfo> for KeywordRow {
    fn from(info: &KeywordInfo) -> Self {
        let written = match info.format {
            Some(template) => render(template, info.name, "<value>"),
            None => info.name.to_string(),
        };
        KeywordRow {
            name: info.name.to_string(),
            written,
            description: info.description.to_string(),
        }
    }
}

/// 执行 params 命令
pub fn execute(args: ParamsArgs) -> Result<()> {
    let step = StepKind::from(args.step);
    let parameters = ParameterSet::for_step(step);
    output::print_header(&format!("Parameters of the {} step", step));

    let rows: Vec<ParameterRow> = parameters.specs().iter().map(ParameterRow::from).collect();
    println!("{}", Table::new(&rows).with(Style::psql()));

    if args.verbose {
        for spec in parameters.specs() {
            println!("\n{} {}", spec.name, spec.description);
            for line in wrap(spec.help_text, REPORT_WIDTH - 4) {
                println!("    {}", line);
            }
        }

        output::print_header("Known MOPAC keywords");
        let rows: Vec<KeywordRow> = KEYWORDS.iter().map(KeywordRow::from).collect();
        println!("{}", Table::new(&rows).with(Style::psql()));
    }
    Ok(())
}
