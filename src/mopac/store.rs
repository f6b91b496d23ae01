//! # 结果存储
//!
//! 将用户请求的结果写入工作流变量或表格。请求写作 `KEY=variable`
//! 或 `KEY=table/column`。数据中没有的键直接跳过。
//!
//! ## 依赖关系
//! - 被 `mopac/analyze.rs`, `commands/analyze.rs` 使用
//! - 使用 `models/results.rs`, `csv`

use crate::error::{MopacStepError, Result};
use crate::models::{ResultMapping, ResultValue};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 已知结果的说明
#[derive(Debug, Clone, Copy)]
pub struct ResultMetadata {
    pub key: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

const fn result(key: &'static str, description: &'static str, units: &'static str) -> ResultMetadata {
    ResultMetadata {
        key,
        description,
        units,
    }
}

pub const RESULT_METADATA: &[ResultMetadata] = &[
    result("HEAT_OF_FORMATION", "heat of formation", "kcal/mol"),
    result("Enthalpy of Formation", "enthalpy of formation", "kJ/mol"),
    result("TOTAL_ENERGY", "total energy", "eV"),
    result("ELECTRONIC_ENERGY", "electronic energy", "eV"),
    result("CORE_CORE_REPULSION", "core-core repulsion", "eV"),
    result("GRADIENT_NORM", "gradient norm", "kcal/mol/Å"),
    result("IONIZATION_POTENTIAL", "ionization energy", "eV"),
    result("DIPOLE", "dipole moment", "debye"),
    result("DIP_VEC", "dipole vector", "debye"),
    result("SPIN_COMPONENT", "Sz", ""),
    result("TOTAL_SPIN", "S^2", ""),
    result("HOMO Energy", "energy of the HOMO", "eV"),
    result("LUMO Energy", "energy of the LUMO", "eV"),
    result("HOMO-LUMO Gap", "HOMO-LUMO gap", "eV"),
    result("POINT_GROUP", "point group symmetry", ""),
    result("AREA", "COSMO surface area", "Å^2"),
    result("VOLUME", "COSMO volume", "Å^3"),
    result("ATOM_CHARGES", "atom charges", "e"),
    result("ATOM_SPINS", "atom spins", ""),
    result("CPU_TIME", "CPU time", "s"),
    result("ZERO_POINT_ENERGY", "zero point energy", "kcal/mol"),
    result("PRI_MOM_OF_I", "principal moments of inertia", "1.0E-40 g.cm^2"),
    result("ROTAT_CONSTS", "rotational constants", "1/cm"),
    result("VIB._FREQ", "vibrational frequencies", "1/cm"),
];

/// 查找结果说明
pub fn metadata(key: &str) -> Option<&'static ResultMetadata> {
    RESULT_METADATA.iter().find(|m| m.key == key)
}

/// 结果去向
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Variable(String),
    Table { table: String, column: String },
}

/// 一条存储请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedResult {
    pub key: String,
    pub target: StoreTarget,
}

impl FromStr for RequestedResult {
    type Err = MopacStepError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            MopacStepError::InvalidArgument(format!(
                "Expected KEY=variable or KEY=table/column, got '{}'",
                s
            ))
        };

        let (key, target) = s.split_once('=').ok_or_else(invalid)?;
        let (key, target) = (key.trim(), target.trim());
        if key.is_empty() || target.is_empty() {
            return Err(invalid());
        }
        if metadata(key).is_none() {
            return Err(MopacStepError::UnknownResult(key.to_string()));
        }

        let target = match target.split_once('/') {
            Some((table, column)) if !table.is_empty() && !column.is_empty() => {
                StoreTarget::Table {
                    table: table.to_string(),
                    column: column.to_string(),
                }
            }
            Some(_) => return Err(invalid()),
            None => StoreTarget::Variable(target.to_string()),
        };

        Ok(RequestedResult {
            key: key.to_string(),
            target,
        })
    }
}

/// 结果存储接口
pub trait ResultStore {
    /// 存储请求的结果，返回实际存储的数目
    fn store_results(
        &mut self,
        data: &ResultMapping,
        properties: &[ResultMetadata],
        requested: &[RequestedResult],
        create_tables: bool,
    ) -> Result<usize>;
}

/// 按行追加的表格
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
}

impl ResultTable {
    fn ensure_column(&mut self, column: &str) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }
    }

    /// 写成 CSV
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path).map_err(MopacStepError::CsvError)?;

        wtr.write_record(&self.columns)
            .map_err(MopacStepError::CsvError)?;
        for row in &self.rows {
            let record: Vec<&str> = self
                .columns
                .iter()
                .map(|c| row.get(c).map(String::as_str).unwrap_or(""))
                .collect();
            wtr.write_record(&record).map_err(MopacStepError::CsvError)?;
        }

        wtr.flush().map_err(|e| MopacStepError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }
}

/// 内置的变量与表格存储
#[derive(Debug, Clone, Default)]
pub struct WorkflowStore {
    variables: BTreeMap<String, ResultValue>,
    tables: BTreeMap<String, ResultTable>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先建立表格
    pub fn add_table(&mut self, name: &str) {
        self.tables.entry(name.to_string()).or_default();
    }

    pub fn variables(&self) -> &BTreeMap<String, ResultValue> {
        &self.variables
    }

    /// 将所有表格写成 `<name>.csv`
    pub fn write_tables(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for (name, table) in &self.tables {
            let path = directory.join(format!("{}.csv", name));
            table.write_csv(&path)?;
            paths.push(path);
        }
        Ok(paths)
    }
}

impl ResultStore for WorkflowStore {
    fn store_results(
        &mut self,
        data: &ResultMapping,
        properties: &[ResultMetadata],
        requested: &[RequestedResult],
        create_tables: bool,
    ) -> Result<usize> {
        // 先整体校验，出错时存储保持不变
        let mut accepted: Vec<(&RequestedResult, &ResultValue)> = Vec::new();
        for request in requested {
            if !properties.iter().any(|p| p.key == request.key) {
                return Err(MopacStepError::UnknownResult(request.key.clone()));
            }
            let Some(value) = data.get(&request.key) else {
                continue;
            };
            if let StoreTarget::Table { table, .. } = &request.target {
                if !create_tables && !self.tables.contains_key(table) {
                    return Err(MopacStepError::UnknownTable(table.clone()));
                }
            }
            accepted.push((request, value));
        }

        let mut new_rows: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (request, value) in &accepted {
            match &request.target {
                StoreTarget::Variable(name) => {
                    self.variables.insert(name.clone(), (*value).clone());
                }
                StoreTarget::Table { table, column } => {
                    new_rows
                        .entry(table.clone())
                        .or_default()
                        .insert(column.clone(), value.to_string());
                }
            }
        }

        // 同一次调用写入同一表格的结果放在同一行
        for (name, row) in new_rows {
            let table = self.tables.entry(name).or_default();
            for column in row.keys() {
                table.ensure_column(column);
            }
            table.rows.push(row);
        }

        Ok(accepted.len())
    }
}

#[cfg(test)]
impl WorkflowStore {
    pub fn variable(&self, name: &str) -> Option<&ResultValue> {
        self.variables.get(name)
    }

    pub fn table(&self, name: &str) -> Option<&ResultTable> {
        self.tables.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ResultMapping {
        let mut data = ResultMapping::new();
        data.insert_float("HEAT_OF_FORMATION", -57.8);
        data.insert_float("DIPOLE", 1.85);
        data
    }

    fn requests(list: &[&str]) -> Vec<RequestedResult> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_parse_requests() {
        let r: RequestedResult = "DIPOLE=mu".parse().unwrap();
        assert_eq!(r.target, StoreTarget::Variable("mu".to_string()));

        let r: RequestedResult = "DIPOLE=props/dipole".parse().unwrap();
        assert_eq!(
            r.target,
            StoreTarget::Table {
                table: "props".to_string(),
                column: "dipole".to_string()
            }
        );

        assert!("DIPOLE".parse::<RequestedResult>().is_err());
        assert!("NOT_A_RESULT=x".parse::<RequestedResult>().is_err());
        assert!("DIPOLE=props/".parse::<RequestedResult>().is_err());
    }

    #[test]
    fn test_store_variables_and_rows() {
        let mut store = WorkflowStore::new();
        let requested = requests(&[
            "HEAT_OF_FORMATION=hof",
            "HEAT_OF_FORMATION=props/hof",
            "DIPOLE=props/dipole",
            "AREA=area",
        ]);

        let n = store
            .store_results(&data(), RESULT_METADATA, &requested, true)
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(store.variable("hof"), Some(&ResultValue::Float(-57.8)));
        assert!(store.variable("area").is_none());

        let table = store.table("props").unwrap();
        assert_eq!(table.columns, vec!["dipole", "hof"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["dipole"], "1.85");
    }

    #[test]
    fn test_missing_table_without_create() {
        let mut store = WorkflowStore::new();
        let requested = requests(&["DIPOLE=props/dipole"]);
        let err = store
            .store_results(&data(), RESULT_METADATA, &requested, false)
            .unwrap_err();
        assert!(matches!(err, MopacStepError::UnknownTable(_)));

        store.add_table("props");
        assert_eq!(
            store
                .store_results(&data(), RESULT_METADATA, &requested, false)
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_failed_request_leaves_store_unchanged() {
        let mut store = WorkflowStore::new();
        let requested = requests(&["DIPOLE=mu", "HEAT_OF_FORMATION=props/hof"]);
        let err = store
            .store_results(&data(), RESULT_METADATA, &requested, false)
            .unwrap_err();
        assert!(matches!(err, MopacStepError::UnknownTable(_)));
        assert!(store.variable("mu").is_none());
        assert!(store.table("props").is_none());

        let known = &RESULT_METADATA[..1];
        let requested = requests(&["HEAT_OF_FORMATION=props/hof", "DIPOLE=mu"]);
        let err = store
            .store_results(&data(), known, &requested, true)
            .unwrap_err();
        assert!(matches!(err, MopacStepError::UnknownResult(_)));
        assert!(store.table("props").is_none());
        assert!(store.variables().is_empty());
    }

    #[test]
    fn test_write_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WorkflowStore::new();
        store
            .store_results(&data(), RESULT_METADATA, &requests(&["DIPOLE=props/mu"]), true)
            .unwrap();
        let paths = store.write_tables(dir.path()).unwrap();
        let text = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(text, "mu\n1.85\n");
    }
}
