//! # 统一错误处理模块
//!
//! 定义 mopac-step 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// mopac-step 统一错误类型
#[derive(Error, Debug)]
pub enum MopacStepError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Don't recognize {parameter} '{value}'")]
    UnknownOption { parameter: String, value: String },

    #[error("Invalid value '{value}' for parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 文献错误
    // ─────────────────────────────────────────────────────────────
    #[error("No bibliography entry for citation '{0}'")]
    UnknownCitation(String),

    // ─────────────────────────────────────────────────────────────
    // 结构错误
    // ─────────────────────────────────────────────────────────────
    #[error("Attribute '{name}' has {found} values but the structure has {expected} atoms")]
    AttributeLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Atom attribute '{0}' does not exist")]
    UnknownAttribute(String),

    #[error("{0} cannot yet handle periodic systems")]
    PeriodicNotSupported(String),

    // ─────────────────────────────────────────────────────────────
    // 结果错误
    // ─────────────────────────────────────────────────────────────
    #[error("Cannot convert {value} from '{from}' to '{to}'")]
    UnitConversion { value: f64, from: String, to: String },

    #[error("Unknown result '{0}'")]
    UnknownResult(String),

    #[error("Table '{0}' does not exist and creating tables is disabled")]
    UnknownTable(String),

    #[error("No output sections to analyze")]
    NoOutputSections,

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MopacStepError>;
