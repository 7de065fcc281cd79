// crates/dv_config/src/normalization.rs

//! 无量纲归一化基准
//!
//! 求解器内部工作在无量纲单位下。本模块记录物理量到求解器单位的
//! 换算基准：温度 T0、数密度 n0、质量 m0，由此导出压强、截断速度、
//! 特征长度和特征时间。衰变速率等带时间量纲的输入需预先乘以 tau。

use serde::{Deserialize, Serialize};

/// 玻尔兹曼常数 [J/K]
pub const BOLTZMANN: f64 = 1.38e-23;

/// 归一化基准
///
/// 给定 (T0, n0, m0, l0) 后其余基准量全部可导出：
///
/// ```text
/// P0     = n0 * k * T0
/// e_cut  = sqrt(k * T0 / m0)
/// tau    = l0 / e_cut
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Normalization {
    /// 温度基准 [K]
    pub temperature: f64,
    /// 数密度基准 [1/m³]
    pub density: f64,
    /// 质量基准 [kg]
    pub mass: f64,
    /// 特征长度 [m]
    pub length: f64,
}

impl Normalization {
    /// 创建归一化基准
    pub fn new(temperature: f64, density: f64, mass: f64, length: f64) -> Self {
        Self {
            temperature,
            density,
            mass,
            length,
        }
    }

    /// 压强基准 [Pa]
    #[inline]
    pub fn pressure(&self) -> f64 {
        self.density * BOLTZMANN * self.temperature
    }

    /// 截断速度基准 [m/s]
    #[inline]
    pub fn cut_velocity(&self) -> f64 {
        (BOLTZMANN * self.temperature / self.mass).sqrt()
    }

    /// 特征时间 [s]
    #[inline]
    pub fn tau(&self) -> f64 {
        self.length / self.cut_velocity()
    }

    /// 物理温度 [K] 换算为无量纲温度
    #[inline]
    pub fn temperature_to_solver(&self, kelvin: f64) -> f64 {
        kelvin / self.temperature
    }

    /// 物理压强 [Pa] 换算为无量纲压强
    #[inline]
    pub fn pressure_to_solver(&self, pascal: f64) -> f64 {
        pascal / self.pressure()
    }

    /// 物理衰变速率 [1/s] 换算为无量纲速率
    ///
    /// 带时间量纲的输入一律乘以 tau。
    #[inline]
    pub fn rate_to_solver(&self, per_second: f64) -> f64 {
        per_second * self.tau()
    }

    /// 物理通量 [1/(m²·s)] 换算为无量纲通量
    #[inline]
    pub fn stream_to_solver(&self, flux: f64) -> f64 {
        flux / (self.density * self.cut_velocity())
    }
}

impl Default for Normalization {
    /// 原型装置的缺省基准（铯蒸汽，600 K）
    fn default() -> Self {
        Self {
            temperature: 600.0,
            density: 1.81e22,
            mass: 133.0 * 1.66e-27,
            length: 0.5 * 6e-4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_quantities() {
        let norm = Normalization::default();
        let p0 = norm.pressure();
        assert!((p0 - 1.81e22 * BOLTZMANN * 600.0).abs() / p0 < 1e-12);
        assert!(norm.cut_velocity() > 0.0);
        assert!(norm.tau() > 0.0);
    }

    #[test]
    fn test_temperature_roundtrip() {
        let norm = Normalization::default();
        let t = norm.temperature_to_solver(598.0);
        assert!((t - 598.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_rate_uses_tau() {
        let norm = Normalization::default();
        let rate = norm.rate_to_solver(2.0);
        assert!((rate - 2.0 * norm.tau()).abs() < 1e-20);
    }

    #[test]
    fn test_serde_roundtrip() {
        let norm = Normalization::default();
        let json = serde_json::to_string(&norm).unwrap();
        let parsed: Normalization = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, norm);
    }
}
