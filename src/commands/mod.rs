//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config/`, `mopac/`, `parsers/`, `utils/`
//! - 子模块: compose, analyze, params

pub mod analyze;
pub mod compose;
pub mod params;

use crate::cli::{Commands, StepOptions};
use crate::config::{ParameterSet, StepKind, StepParameters};
use crate::error::{MopacStepError, Result};
use std::collections::BTreeMap;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compose(args) => compose::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
        Commands::Params(args) => params::execute(args),
    }
}

/// 解析 `--var NAME=VALUE` 列表
fn parse_variables(vars: &[String]) -> Result<BTreeMap<String, String>> {
    vars.iter()
        .map(|v| {
            let (name, value) = v.split_once('=').ok_or_else(|| {
                MopacStepError::InvalidArgument(format!(
                    "Expected NAME=VALUE for a variable, got '{}'",
                    v
                ))
            })?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// 由命令行设定构造强类型步骤参数
fn load_parameters(options: &StepOptions, extra_keywords: &[String]) -> Result<StepParameters> {
    let step = StepKind::from(options.step);
    let mut parameters = ParameterSet::for_step(step);

    for assignment in &options.params {
        parameters.set_assignment(assignment)?;
    }
    if !extra_keywords.is_empty() {
        parameters.set_list("extra keywords", extra_keywords.to_vec())?;
    }

    let context = parse_variables(&options.vars)?;
    let values = parameters.current_values_to_dict(&context)?;
    StepParameters::from_values(step, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StepArg;
    use crate::config::Hamiltonian;
    use std::path::PathBuf;

    fn options(params: &[&str], vars: &[&str]) -> StepOptions {
        StepOptions {
            step: StepArg::Energy,
            structure: PathBuf::from("water.xyz"),
            params: params.iter().map(|s| s.to_string()).collect(),
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_variables_resolved() {
        let step = load_parameters(
            &options(&["hamiltonian=$method"], &["method=AM1"]),
            &["GNORM=0.1".to_string()],
        )
        .unwrap();
        assert_eq!(step.energy().hamiltonian, Hamiltonian::Am1);
        assert_eq!(step.energy().extra_keywords, vec!["GNORM=0.1"]);
    }

    #[test]
    fn test_undefined_variable() {
        let err = load_parameters(&options(&["hamiltonian=$method"], &[]), &[]).unwrap_err();
        assert!(matches!(err, MopacStepError::UndefinedVariable(_)));
    }

    #[test]
    fn test_bad_variable_syntax() {
        assert!(parse_variables(&["novalue".to_string()]).is_err());
    }
}
