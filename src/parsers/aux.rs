//! # MOPAC .aux 文件解析器
//!
//! ## .aux 格式说明
//! ```text
//!  START OF MOPAC FILE
//! #################################
//!  HEAT_OF_FORMATION:KCAL/MOL=-0.57798D+02
//!  POINT_GROUP="C2v"
//!  ATOM_CHARGES[0003]=
//!  -0.61330  0.30665  0.30665
//!  END OF MOPAC FILE
//! ```
//!
//! 每条记录为 `KEY[:UNITS][[N]]=value`。标量写在同一行；数组可以从同一行开始，
//! 延续到下一条记录之前。Fortran 的 `D` 指数按 `E` 处理，单位被丢弃，
//! 键名中的 `.` 保留（如 `VIB._FREQ`）。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `models/results.rs`, `regex`

use crate::error::{MopacStepError, Result};
use crate::models::{ResultMapping, ResultValue};

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn record_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([A-Z][A-Z0-9_.+\-]*)(?::([^=\[]*))?(?:\[(\d+)\])?\s*=(.*)$")
            .expect("valid aux record regex")
    })
}

/// 解析 .aux 文件
pub fn parse_aux_file(path: &Path) -> Result<ResultMapping> {
    let content = fs::read_to_string(path).map_err(|e| MopacStepError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_aux_content(&content, &path.display().to_string())
}

/// 一条尚未转换的记录
struct Record {
    key: String,
    is_array: bool,
    tokens: Vec<String>,
    quoted: Option<String>,
}

/// 从字符串内容解析 .aux 格式
pub fn parse_aux_content(content: &str, name: &str) -> Result<ResultMapping> {
    let mut records: Vec<Record> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("START OF MOPAC")
            || trimmed.starts_with("END OF MOPAC")
        {
            continue;
        }

        if let Some(caps) = record_pattern().captures(line) {
            let value = caps[4].trim();
            let quoted = value
                .strip_prefix('"')
                .map(|v| v.trim_end_matches('"').to_string());
            records.push(Record {
                key: caps[1].to_string(),
                is_array: caps.get(3).is_some(),
                tokens: if quoted.is_some() {
                    Vec::new()
                } else {
                    value.split_whitespace().map(str::to_string).collect()
                },
                quoted,
            });
        } else if let Some(record) = records.last_mut() {
            if record.quoted.is_none() {
                record
                    .tokens
                    .extend(trimmed.split_whitespace().map(str::to_string));
            }
        }
    }

    if records.is_empty() {
        return Err(MopacStepError::ParseError {
            format: "aux".to_string(),
            path: name.to_string(),
            reason: "No MOPAC results found".to_string(),
        });
    }

    let mut data = ResultMapping::new();
    for record in records {
        let value = match record.quoted {
            Some(text) => ResultValue::Text(text),
            None if record.is_array => array_value(&record.tokens),
            None => scalar_value(&record.tokens),
        };
        data.insert(record.key, value);
    }
    Ok(data)
}

/// Fortran 风格数字，如 `-0.57798D+02`
fn parse_number(token: &str) -> Option<f64> {
    token.replace(['D', 'd'], "E").parse().ok()
}

fn scalar_value(tokens: &[String]) -> ResultValue {
    match tokens {
        [single] => {
            if let Ok(i) = single.parse::<i64>() {
                ResultValue::Integer(i)
            } else if let Some(x) = parse_number(single) {
                ResultValue::Float(x)
            } else {
                ResultValue::Text(single.clone())
            }
        }
        _ => array_value(tokens),
    }
}

fn array_value(tokens: &[String]) -> ResultValue {
    if let Some(ints) = tokens
        .iter()
        .map(|t| t.parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()
    {
        return ResultValue::IntegerArray(ints);
    }
    if let Some(floats) = tokens
        .iter()
        .map(|t| parse_number(t))
        .collect::<Option<Vec<_>>>()
    {
        return ResultValue::FloatArray(floats);
    }
    ResultValue::TextArray(tokens.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#" START OF MOPAC FILE
####################################
#       Start of Input data        #
####################################
 AUX_VERSION=1
 MOPAC_VERSION="MOPAC2016"
 HEAT_OF_FORMATION:KCAL/MOL=-0.57798D+02
 POINT_GROUP="C2v"
 ATOM_EL[3]=
   O  H  H
 ATOM_CHARGES[00003]=
  -0.61330  0.30665
   0.30665
 AO_ATOMINDEX[6]= 1 1 1 1 2 3
 VIB._FREQ:1/CM[3]= 1.5D+03 3.6D+03
  3.7D+03
 CPU_TIME:SECONDS[1]= 0.05
 END OF MOPAC FILE
"#;

    #[test]
    fn test_parse_sample() {
        let data = parse_aux_content(SAMPLE, "sample").unwrap();

        assert_eq!(data.get("AUX_VERSION"), Some(&ResultValue::Integer(1)));
        assert_eq!(data.text("MOPAC_VERSION"), Some("MOPAC2016"));
        assert_eq!(data.text("POINT_GROUP"), Some("C2v"));
        assert!((data.float("HEAT_OF_FORMATION").unwrap() + 57.798).abs() < 1e-9);
        assert_eq!(
            data.texts("ATOM_EL").unwrap(),
            vec!["O".to_string(), "H".to_string(), "H".to_string()]
        );
        assert_eq!(
            data.floats("ATOM_CHARGES").unwrap(),
            vec![-0.61330, 0.30665, 0.30665]
        );
        assert_eq!(data.integers("AO_ATOMINDEX").unwrap(), vec![1, 1, 1, 1, 2, 3]);
        assert_eq!(data.floats("VIB._FREQ").unwrap(), vec![1500.0, 3600.0, 3700.0]);
        assert_eq!(data.float("CPU_TIME"), Some(0.05));
    }

    #[test]
    fn test_banner_only_is_error() {
        let err = parse_aux_content(" START OF MOPAC FILE\n####\n", "empty").unwrap_err();
        assert!(matches!(err, MopacStepError::ParseError { .. }));
    }
}
