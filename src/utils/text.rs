//! # 文本排版工具
//!
//! 报告文本的换行、缩进与 `{name}` 占位符替换。
//!
//! ## 依赖关系
//! - 被 `mopac/description.rs`, `mopac/analyze.rs` 使用
//! - 使用 `regex` 匹配占位符

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// 报告正文的默认行宽
pub const REPORT_WIDTH: usize = 78;

fn placeholder() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("valid placeholder regex"))
}

/// 按词换行
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// 每个非空行加前缀
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 将 `{name}` 替换为对应值，未知占位符原样保留
pub fn substitute(template: &str, values: &BTreeMap<String, String>) -> String {
    placeholder()
        .replace_all(template, |caps: &regex::Captures| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// 段落换行并缩进（段落以空行分隔）
pub fn format_paragraphs(text: &str, prefix: &str, width: usize) -> String {
    let body_width = width.saturating_sub(prefix.chars().count()).max(20);
    text.split("\n\n")
        .map(|para| {
            wrap(para, body_width)
                .into_iter()
                .map(|line| format!("{}{}", prefix, line))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_long_text() {
        let result = wrap("the quick brown fox", 10);
        assert_eq!(result, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_substitute_known_and_unknown() {
        let mut values = BTreeMap::new();
        values.insert("POINT_GROUP".to_string(), "C2v".to_string());
        let text = substitute("The molecule has {POINT_GROUP} symmetry {x}.", &values);
        assert_eq!(text, "The molecule has C2v symmetry {x}.");
    }

    #[test]
    fn test_format_paragraphs_keeps_blank_line() {
        let text = format_paragraphs("one two\n\nthree", "  ", 80);
        assert_eq!(text, "  one two\n\n  three");
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb", "  "), "  a\n\n  b");
    }
}
