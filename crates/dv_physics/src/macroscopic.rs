// crates/dv_physics/src/macroscopic.rs

//! 宏观量提取
//!
//! 由分布函数的各阶矩得到密度、流量、温度、压强。求和用 Kahan
//! 补偿，求积权重统一为 Δv³。只有普通单元参与提取，ghost 与
//! 分区镜像单元返回 `None`。

use glam::DVec3;

use dv_foundation::{KahanSum, DENSITY_FLOOR};

use crate::grid::Grid;
use crate::state::DistributionState;
use crate::types::Gas;
use crate::velocity::VelocityGrid;

/// 单个单元单种气体的宏观量
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Macroscopic {
    /// 数密度 n = Σ f · Δv³
    pub density: f64,
    /// 流量 Σ p f · Δv³ / m
    pub stream: DVec3,
    /// 温度（密度为零时为零）
    pub temperature: f64,
    /// 压强 P = n T
    pub pressure: f64,
    /// 热流（当前恒为零，占位）
    pub heat_flux: DVec3,
}

/// 宏观量提取器
pub struct MacroscopicExtractor<'a> {
    velocity: &'a VelocityGrid,
    gases: &'a [Gas],
}

impl<'a> MacroscopicExtractor<'a> {
    /// 创建提取器
    pub fn new(velocity: &'a VelocityGrid, gases: &'a [Gas]) -> Self {
        Self { velocity, gases }
    }

    /// 单个单元的全部组分宏观量，非普通单元返回 `None`
    pub fn extract_cell(
        &self,
        grid: &Grid,
        state: &DistributionState,
        ci: usize,
    ) -> Option<Vec<Macroscopic>> {
        if !grid.cell(ci).is_extractable() {
            return None;
        }
        Some(
            (0..self.gases.len())
                .map(|gi| self.extract_gas(state.values(gi, ci), gi))
                .collect(),
        )
    }

    /// 全网格提取，按稠密下标排列
    pub fn extract_all(
        &self,
        grid: &Grid,
        state: &DistributionState,
    ) -> Vec<Option<Vec<Macroscopic>>> {
        (0..grid.cell_count())
            .map(|ci| self.extract_cell(grid, state, ci))
            .collect()
    }

    /// 单种气体在一个单元上的矩
    pub fn extract_gas(&self, values: &[f64], gi: usize) -> Macroscopic {
        let mass = self.gases[gi].mass;
        let dv3 = self.velocity.delta_volume();

        let mut density_sum = KahanSum::new();
        let mut stream_sum = [KahanSum::new(), KahanSum::new(), KahanSum::new()];
        for (ii, &f) in values.iter().enumerate() {
            let p = self.velocity.sample(ii);
            density_sum.add(f);
            stream_sum[0].add(p.x * f);
            stream_sum[1].add(p.y * f);
            stream_sum[2].add(p.z * f);
        }
        let density = density_sum.value() * dv3;
        let stream = DVec3::new(
            stream_sum[0].value(),
            stream_sum[1].value(),
            stream_sum[2].value(),
        ) * (dv3 / mass);

        if density <= DENSITY_FLOOR {
            return Macroscopic {
                density,
                stream,
                ..Macroscopic::default()
            };
        }

        let average = stream / density;
        let mut temp_sum = KahanSum::new();
        for (ii, &f) in values.iter().enumerate() {
            let u = self.velocity.sample(ii) / mass - average;
            temp_sum.add(mass * u.length_squared() * f);
        }
        let temperature = temp_sum.value() * dv3 / density / 3.0;

        Macroscopic {
            density,
            stream,
            temperature,
            pressure: density * temperature,
            heat_flux: DVec3::ZERO,
        }
    }
}
