//! # MOPAC 输入文件 (.mop)
//!
//! 格式：关键词行（过长时以 ` +` 续行），标题行，说明行，然后每个原子一行
//! `El  x 1  y 1  z 1`。
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs` 使用
//! - 使用 `mopac/compose.rs` 的 `MopacJob`

use super::compose::MopacJob;
use crate::models::Configuration;
use crate::utils::text::REPORT_WIDTH;

/// 辅助输出文件的关键词
pub const AUX_KEYWORD: &str = "AUX(MOS=10,PRECISION=9)";

/// 多重度对应的 MOPAC 关键词
pub fn multiplicity_keyword(multiplicity: u32) -> Option<&'static str> {
    match multiplicity {
        2 => Some("DOUBLET"),
        3 => Some("TRIPLET"),
        4 => Some("QUARTET"),
        5 => Some("QUINTET"),
        6 => Some("SEXTET"),
        7 => Some("SEPTET"),
        8 => Some("OCTET"),
        9 => Some("NONET"),
        _ => None,
    }
}

/// 写入文件的完整关键词
pub fn deck_keywords(job: &MopacJob, configuration: &Configuration) -> Vec<String> {
    let mut keywords = job.keywords.clone();
    keywords.push(AUX_KEYWORD.to_string());

    if configuration.charge != 0 {
        keywords.push(format!("CHARGE={}", configuration.charge));
    }
    if let Some(keyword) = multiplicity_keyword(configuration.spin_multiplicity) {
        keywords.push(keyword.to_string());
    }

    keywords
}

/// 关键词分行，每行不超过给定宽度
fn keyword_lines(keywords: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for keyword in keywords {
        if !current.is_empty() && current.len() + 1 + keyword.len() + 2 > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(keyword);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let n = lines.len();
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| if i + 1 < n { format!("{} +", line) } else { line })
        .collect()
}

/// 生成 .mop 文本
pub fn input_deck(job: &MopacJob, configuration: &Configuration, description: &str) -> String {
    let mut lines = keyword_lines(&deck_keywords(job, configuration), REPORT_WIDTH);

    lines.push(
        job.title
            .clone()
            .unwrap_or_else(|| configuration.name.clone()),
    );
    lines.push(description.split_whitespace().collect::<Vec<_>>().join(" "));

    for (symbol, [x, y, z]) in configuration
        .atoms
        .symbols()
        .iter()
        .zip(configuration.atoms.coordinates())
    {
        lines.push(format!(
            "{:<2} {:>15.8} 1 {:>15.8} 1 {:>15.8} 1",
            symbol, x, y, z
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AtomTable;

    fn water() -> Configuration {
        let mut atoms = AtomTable::new();
        atoms.push("O", [0.0, 0.0, 0.0]);
        atoms.push("H", [0.757, 0.586, 0.0]);
        atoms.push("H", [-0.757, 0.586, 0.0]);
        Configuration::new("water", atoms)
    }

    #[test]
    fn test_deck_layout() {
        let job = MopacJob::new(vec!["1SCF".to_string(), "PM7".to_string()]);
        let deck = input_deck(&job, &water(), "A single point\nenergy");
        let lines: Vec<&str> = deck.lines().collect();

        assert_eq!(lines[0], format!("1SCF PM7 {}", AUX_KEYWORD));
        assert_eq!(lines[1], "water");
        assert_eq!(lines[2], "A single point energy");
        assert_eq!(lines.len(), 6);
        assert!(lines[4].starts_with("H "));
        assert!(lines[4].contains("0.75700000 1"));
    }

    #[test]
    fn test_charge_and_multiplicity() {
        let mut configuration = water();
        configuration.charge = -1;
        configuration.spin_multiplicity = 2;
        let keywords = deck_keywords(&MopacJob::new(vec![]), &configuration);
        assert!(keywords.contains(&"CHARGE=-1".to_string()));
        assert!(keywords.contains(&"DOUBLET".to_string()));
    }

    #[test]
    fn test_long_keyword_line_continues() {
        let keywords: Vec<String> = (0..30).map(|i| format!("KEY{}", i)).collect();
        let lines = keyword_lines(&keywords, 40);
        assert!(lines.len() > 1);
        assert!(lines[0].ends_with(" +"));
        assert!(!lines.last().unwrap().ends_with('+'));
        assert!(lines.iter().all(|l| l.len() <= 40));
    }
}
