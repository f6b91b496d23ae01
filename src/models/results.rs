//! # MOPAC 计算结果数据模型
//!
//! 将 .aux 文件解析结果存为“大写键 → 值”的映射。
//! 每次运行出现的键各不相同，因此所有读取接口都返回 `Option`。
//!
//! ## 依赖关系
//! - 被 `parsers/aux.rs` 构造
//! - 被 `mopac/analyze.rs`, `mopac/vibrations.rs`, `mopac/store.rs` 使用

use std::collections::BTreeMap;

/// 单个结果值
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Float(f64),
    Integer(i64),
    Text(String),
    FloatArray(Vec<f64>),
    IntegerArray(Vec<i64>),
    TextArray(Vec<String>),
}

impl std::fmt::Display for ResultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultValue::Float(v) => write!(f, "{}", v),
            ResultValue::Integer(v) => write!(f, "{}", v),
            ResultValue::Text(v) => write!(f, "{}", v),
            ResultValue::FloatArray(v) => write!(f, "[{} values]", v.len()),
            ResultValue::IntegerArray(v) => write!(f, "[{} values]", v.len()),
            ResultValue::TextArray(v) => write!(f, "[{} values]", v.len()),
        }
    }
}

/// 结果映射
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMapping {
    values: BTreeMap<String, ResultValue>,
}

impl ResultMapping {
    pub fn new() -> Self {
        ResultMapping::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ResultValue) {
        self.values.insert(key.into(), value);
    }

    pub fn insert_float(&mut self, key: impl Into<String>, value: f64) {
        self.insert(key, ResultValue::Float(value));
    }

    pub fn get(&self, key: &str) -> Option<&ResultValue> {
        self.values.get(key)
    }

    /// 合并：`other` 中的键覆盖已有键
    pub fn merged(&self, other: &ResultMapping) -> ResultMapping {
        let mut values = self.values.clone();
        for (k, v) in &other.values {
            values.insert(k.clone(), v.clone());
        }
        ResultMapping { values }
    }

    /// 标量数值（单元素数组也视为标量）
    pub fn float(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            ResultValue::Float(v) => Some(*v),
            ResultValue::Integer(v) => Some(*v as f64),
            ResultValue::FloatArray(v) if v.len() == 1 => Some(v[0]),
            ResultValue::IntegerArray(v) if v.len() == 1 => Some(v[0] as f64),
            _ => None,
        }
    }

    /// 数值数组（标量视为单元素数组）
    pub fn floats(&self, key: &str) -> Option<Vec<f64>> {
        match self.values.get(key)? {
            ResultValue::Float(v) => Some(vec![*v]),
            ResultValue::Integer(v) => Some(vec![*v as f64]),
            ResultValue::FloatArray(v) => Some(v.clone()),
            ResultValue::IntegerArray(v) => Some(v.iter().map(|&i| i as f64).collect()),
            _ => None,
        }
    }

    pub fn integers(&self, key: &str) -> Option<Vec<i64>> {
        match self.values.get(key)? {
            ResultValue::Integer(v) => Some(vec![*v]),
            ResultValue::IntegerArray(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            ResultValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// 文本数组；数值数组按原样转为字符串
    pub fn texts(&self, key: &str) -> Option<Vec<String>> {
        match self.values.get(key)? {
            ResultValue::Text(v) => Some(vec![v.clone()]),
            ResultValue::TextArray(v) => Some(v.clone()),
            ResultValue::FloatArray(v) => Some(v.iter().map(|x| x.to_string()).collect()),
            ResultValue::IntegerArray(v) => Some(v.iter().map(|x| x.to_string()).collect()),
            other => Some(vec![other.to_string()]),
        }
    }

    /// 用于模板替换的字符串视图（仅标量）
    pub fn scalar_strings(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .filter_map(|(k, v)| match v {
                ResultValue::Float(_) | ResultValue::Integer(_) | ResultValue::Text(_) => {
                    Some((k.clone(), v.to_string()))
                }
                _ => None,
            })
            .collect()
    }
}
