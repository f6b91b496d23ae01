//! # 红外光谱
//!
//! 振动模式的洛伦兹展宽与光谱图。强度取跃迁偶极的平方，归一化到 100。
//!
//! ## 依赖关系
//! - 被 `mopac/vibrations.rs` 调用
//! - 使用 `plotters` 渲染图表

use crate::error::{MopacStepError, Result};

use plotters::prelude::*;
use std::path::Path;

/// 展宽半高宽 (1/cm)
pub const DEFAULT_FWHM: f64 = 20.0;

/// 采样间隔 (1/cm)
pub const DEFAULT_STEP: f64 = 2.0;

/// 单个振动峰
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// 频率 (1/cm)
    pub frequency: f64,
    /// 相对强度
    pub intensity: f64,
}

/// 由频率与跃迁偶极得到峰列表；虚频不计入
pub fn bands(frequencies: &[f64], transition_dipoles: &[f64]) -> Vec<Band> {
    frequencies
        .iter()
        .zip(transition_dipoles)
        .filter(|(f, _)| **f > 0.0)
        .map(|(f, d)| Band {
            frequency: *f,
            intensity: d * d,
        })
        .collect()
}

/// 洛伦兹展宽，结果归一化到最大值 100
pub fn lorentzian_spectrum(
    bands: &[Band],
    x_min: f64,
    x_max: f64,
    step: f64,
    fwhm: f64,
) -> Vec<(f64, f64)> {
    let n_points = ((x_max - x_min) / step).ceil() as usize + 1;
    let mut spectrum: Vec<(f64, f64)> = (0..n_points)
        .map(|i| (x_min + i as f64 * step, 0.0))
        .collect();

    let gamma = fwhm / 2.0;
    for band in bands {
        for (x, y) in spectrum.iter_mut() {
            let delta = *x - band.frequency;
            *y += band.intensity * gamma * gamma / (delta * delta + gamma * gamma);
        }
    }

    let max_intensity = spectrum.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    if max_intensity > 0.0 {
        for (_, y) in spectrum.iter_mut() {
            *y = *y * 100.0 / max_intensity;
        }
    }

    spectrum
}

/// 生成光谱图，扩展名为 .svg 时输出 SVG，否则 PNG
pub fn generate_spectrum_plot(bands: &[Band], output_path: &Path, title: &str) -> Result<()> {
    let x_max = bands
        .iter()
        .map(|b| b.frequency)
        .fold(0.0_f64, f64::max)
        .max(1000.0);
    let x_max = (x_max / 500.0).ceil() * 500.0 + 200.0;
    let data = lorentzian_spectrum(bands, 0.0, x_max, DEFAULT_STEP, DEFAULT_FWHM);

    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (1000, 600)).into_drawing_area();
        draw_spectrum(&root, &data, title)?;
        root.present()
            .map_err(|e| MopacStepError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
        draw_spectrum(&root, &data, title)?;
        root.present()
            .map_err(|e| MopacStepError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 绘制光谱；波数轴按红外惯例从高到低
fn draw_spectrum<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &[(f64, f64)],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| MopacStepError::Other(format!("{:?}", e)))?;

    let x_max = data.last().map(|(x, _)| *x).unwrap_or(4000.0);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..110.0)
        .map_err(|e| MopacStepError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Wavenumber (1/cm)")
        .y_desc("Relative Intensity (%)")
        .x_label_formatter(&|x| format!("{:.0}", x_max - x))
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| MopacStepError::Other(format!("{:?}", e)))?;

    let line_color = RGBColor(204, 51, 0);
    chart
        .draw_series(LineSeries::new(
            data.iter().map(|(x, y)| (x_max - *x, *y)),
            line_color.stroke_width(2),
        ))
        .map_err(|e| MopacStepError::Other(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_skip_imaginary() {
        let b = bands(&[-100.0, 1600.0, 3700.0], &[1.0, 0.5, 2.0]);
        assert_eq!(b.len(), 2);
        assert_eq!(b[1].intensity, 4.0);
    }

    #[test]
    fn test_lorentzian_peak_normalized() {
        let b = vec![
            Band {
                frequency: 1000.0,
                intensity: 1.0,
            },
            Band {
                frequency: 2000.0,
                intensity: 0.5,
            },
        ];
        let spectrum = lorentzian_spectrum(&b, 0.0, 3000.0, 1.0, 20.0);

        let (x_peak, y_peak) = spectrum
            .iter()
            .copied()
            .fold((0.0, 0.0), |acc, p| if p.1 > acc.1 { p } else { acc });
        assert_eq!(x_peak, 1000.0);
        assert!((y_peak - 100.0).abs() < 1e-9);

        let half = spectrum.iter().find(|(x, _)| *x == 1010.0).unwrap().1;
        assert!((half - 50.0).abs() < 0.5);
    }
}
