//! # 前线轨道
//!
//! 由轨道占据数与本征值求 HOMO/LUMO。轨道按能量升序排列，
//! 最后一个占据数大于 0.1 的轨道为 HOMO，其后第一个为 LUMO。
//! 自旋非限制计算分别扫描 α、β 轨道：HOMO 取两者较高者，LUMO 取较低者。
//!
//! ## 依赖关系
//! - 被 `mopac/analyze.rs` 使用

use crate::models::ResultMapping;

/// 视为占据的最小占据数
pub const OCCUPIED_THRESHOLD: f64 = 0.1;

/// 前线轨道能量 (eV)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontierOrbitals {
    pub homo: f64,
    pub lumo: Option<f64>,
}

impl FrontierOrbitals {
    pub fn gap(&self) -> Option<f64> {
        self.lumo.map(|lumo| lumo - self.homo)
    }
}

/// 扫描一组轨道，返回 (HOMO, LUMO)
pub fn scan(occupancies: &[f64], energies: &[f64]) -> (Option<f64>, Option<f64>) {
    let mut homo = None;
    for (&occupancy, &energy) in occupancies.iter().zip(energies) {
        if occupancy > OCCUPIED_THRESHOLD {
            homo = Some(energy);
        } else {
            return (homo, Some(energy));
        }
    }
    (homo, None)
}

/// 从结果映射中求前线轨道；没有占据轨道时返回 `None`
pub fn frontier_orbitals(data: &ResultMapping) -> Option<FrontierOrbitals> {
    let (homo, lumo) = match (
        data.floats("MOLECULAR_ORBITAL_OCCUPANCIES"),
        data.floats("EIGENVALUES"),
    ) {
        (Some(occupancies), Some(energies)) => scan(&occupancies, &energies),
        _ => {
            let alpha = scan(
                &data.floats("ALPHA_MOLECULAR_ORBITAL_OCCUPANCIES")?,
                &data.floats("ALPHA_EIGENVALUES")?,
            );
            let beta = scan(
                &data.floats("BETA_MOLECULAR_ORBITAL_OCCUPANCIES")?,
                &data.floats("BETA_EIGENVALUES")?,
            );
            (max_option(alpha.0, beta.0), min_option(alpha.1, beta.1))
        }
    };

    homo.map(|homo| FrontierOrbitals { homo, lumo })
}

fn max_option(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn min_option(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultValue;

    fn mapping(pairs: &[(&str, Vec<f64>)]) -> ResultMapping {
        let mut data = ResultMapping::new();
        for (key, values) in pairs {
            data.insert(*key, ResultValue::FloatArray(values.clone()));
        }
        data
    }

    #[test]
    fn test_closed_shell() {
        let data = mapping(&[
            ("MOLECULAR_ORBITAL_OCCUPANCIES", vec![2.0, 2.0, 0.0, 0.0]),
            ("EIGENVALUES", vec![-10.0, -8.0, -1.0, 3.0]),
        ]);
        let orbitals = frontier_orbitals(&data).unwrap();
        assert_eq!(orbitals.homo, -8.0);
        assert_eq!(orbitals.lumo, Some(-1.0));
        assert_eq!(format!("{:.2}", orbitals.gap().unwrap()), "7.00");
    }

    #[test]
    fn test_all_occupied_has_no_lumo() {
        let (homo, lumo) = scan(&[2.0, 2.0], &[-10.0, -8.0]);
        assert_eq!(homo, Some(-8.0));
        assert_eq!(lumo, None);
    }

    #[test]
    fn test_unrestricted() {
        let data = mapping(&[
            ("ALPHA_MOLECULAR_ORBITAL_OCCUPANCIES", vec![1.0, 1.0, 0.0]),
            ("ALPHA_EIGENVALUES", vec![-12.0, -7.5, -0.5]),
            ("BETA_MOLECULAR_ORBITAL_OCCUPANCIES", vec![1.0, 0.0, 0.0]),
            ("BETA_EIGENVALUES", vec![-11.0, -2.0, 1.0]),
        ]);
        let orbitals = frontier_orbitals(&data).unwrap();
        assert_eq!(orbitals.homo, -7.5);
        assert_eq!(orbitals.lumo, Some(-2.0));
    }

    #[test]
    fn test_missing_orbitals() {
        assert!(frontier_orbitals(&ResultMapping::new()).is_none());
    }
}
