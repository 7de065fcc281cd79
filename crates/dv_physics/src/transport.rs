// crates/dv_physics/src/transport.rs

//! 输运步：逐轴算子分裂扫描
//!
//! 每个空间轴一次扫描，分三个子相位：
//!
//! 1. 边界子相位（串行）：Left/Right 单元执行边界策略。右侧策略
//!    会写入内侧 PreRight 单元的半步数组，串行保证无竞争。
//! 2. 半步子相位（可并行）：Normal 单元用限制器重构半步通量，
//!    只写自己的半步块。
//! 3. 全步子相位（可并行）：Normal/PreRight 单元做守恒更新，
//!    只写自己的分布块，半步数组只读。
//!
//! Courant 数 `y = dt / m * p / dx`：半步取绝对值，全步带符号。

use rayon::prelude::*;

use dv_foundation::{DvError, DvResult};

use crate::boundary::{self, BoundaryContext, Side};
use crate::grid::{CellClass, Grid};
use crate::numerics::{SlopeLimiter, Superbee};
use crate::state::DistributionState;
use crate::types::{Axis, Gas};
use crate::velocity::VelocityGrid;

/// 并行策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParallelStrategy {
    /// 始终串行
    Sequential,
    /// 始终并行
    Parallel,
    /// 按单元数自动选择
    #[default]
    Auto,
}

/// 输运步
#[derive(Debug, Clone)]
pub struct TransportStep {
    limiter: Superbee,
    strategy: ParallelStrategy,
    min_parallel_cells: usize,
}

impl TransportStep {
    /// 创建输运步
    pub fn new(strategy: ParallelStrategy, min_parallel_cells: usize) -> Self {
        Self {
            limiter: Superbee,
            strategy,
            min_parallel_cells,
        }
    }

    /// 本次扫描是否并行执行
    fn use_parallel(&self, cell_count: usize) -> bool {
        match self.strategy {
            ParallelStrategy::Sequential => false,
            ParallelStrategy::Parallel => true,
            ParallelStrategy::Auto => cell_count >= self.min_parallel_cells,
        }
    }

    /// 两个空间轴各扫描一次（先 X 后 Y）
    pub fn sweep(
        &self,
        grid: &Grid,
        state: &mut DistributionState,
        velocity: &VelocityGrid,
        gases: &[Gas],
        dt: f64,
    ) -> DvResult<()> {
        for axis in Axis::ALL {
            self.sweep_axis(grid, state, velocity, gases, dt, axis)?;
        }
        Ok(())
    }

    /// 沿单个空间轴扫描
    pub fn sweep_axis(
        &self,
        grid: &Grid,
        state: &mut DistributionState,
        velocity: &VelocityGrid,
        gases: &[Gas],
        dt: f64,
        axis: Axis,
    ) -> DvResult<()> {
        DvError::check_size("gas", state.gas_count(), gases.len())?;
        DvError::check_size("sample", state.sample_count(), velocity.len())?;
        DvError::check_size("cell", state.cell_count(), grid.cell_count())?;

        self.boundary_pass(grid, state, velocity, gases, dt, axis);

        let parallel = self.use_parallel(grid.cell_count());
        self.half_pass(grid, state, velocity, gases, dt, axis, parallel);
        self.value_pass(grid, state, velocity, gases, dt, axis, parallel);
        Ok(())
    }

    /// 边界子相位（串行，稠密下标顺序，结果确定）
    fn boundary_pass(
        &self,
        grid: &Grid,
        state: &mut DistributionState,
        velocity: &VelocityGrid,
        gases: &[Gas],
        dt: f64,
        axis: Axis,
    ) {
        let a = axis.index();
        let cells = grid.cells();

        for ci in 0..cells.len() {
            let cell = &cells[ci];
            let (side, n1, n2) = match cell.class[a] {
                CellClass::Left => {
                    let Some(n1) = cell.next[a] else { continue };
                    let Some(n2) = cells[n1].next[a] else { continue };
                    (Side::Left, n1, n2)
                }
                CellClass::Right => {
                    let Some(n1) = cell.prev[a] else { continue };
                    let Some(n2) = cells[n1].prev[a] else { continue };
                    (Side::Right, n1, n2)
                }
                _ => continue,
            };

            let step = axis.step(cell.step);
            for (gi, gas) in gases.iter().enumerate() {
                let spec = cell.physics.gas(gi).boundary;
                let ctx = BoundaryContext {
                    velocity,
                    limiter: &self.limiter,
                    mass: gas.mass,
                    timestep: dt,
                    axis: a,
                    step,
                    spec: &spec,
                };
                boundary::apply(&ctx, side, state.field_mut(gi), [ci, n1, n2]);
            }
        }
    }

    /// 半步子相位：Normal 单元的限制器重构
    #[allow(clippy::too_many_arguments)]
    fn half_pass(
        &self,
        grid: &Grid,
        state: &mut DistributionState,
        velocity: &VelocityGrid,
        gases: &[Gas],
        dt: f64,
        axis: Axis,
        parallel: bool,
    ) {
        let ns = velocity.len();
        let cells = grid.cells();

        for (gi, gas) in gases.iter().enumerate() {
            let field = state.field_mut(gi);
            let values: &[f64] = &field.values;
            let mass = gas.mass;

            if parallel {
                field.half.par_chunks_mut(ns).enumerate().for_each(|(ci, half)| {
                    half_kernel(&self.limiter, cells, velocity, axis, mass, dt, values, ci, half);
                });
            } else {
                for (ci, half) in field.half.chunks_mut(ns).enumerate() {
                    half_kernel(&self.limiter, cells, velocity, axis, mass, dt, values, ci, half);
                }
            }
        }
    }

    /// 全步子相位：Normal/PreRight 单元的守恒更新
    #[allow(clippy::too_many_arguments)]
    fn value_pass(
        &self,
        grid: &Grid,
        state: &mut DistributionState,
        velocity: &VelocityGrid,
        gases: &[Gas],
        dt: f64,
        axis: Axis,
        parallel: bool,
    ) {
        let ns = velocity.len();
        let cells = grid.cells();

        for (gi, gas) in gases.iter().enumerate() {
            let field = state.field_mut(gi);
            let half: &[f64] = &field.half;
            let mass = gas.mass;

            if parallel {
                field.values.par_chunks_mut(ns).enumerate().for_each(|(ci, values)| {
                    value_kernel(cells, velocity, axis, mass, dt, half, ci, values);
                });
            } else {
                for (ci, values) in field.values.chunks_mut(ns).enumerate() {
                    value_kernel(cells, velocity, axis, mass, dt, half, ci, values);
                }
            }
        }
    }
}

/// 单个 Normal 单元的半步重构
#[allow(clippy::too_many_arguments)]
fn half_kernel(
    limiter: &Superbee,
    cells: &[crate::grid::CellMeta],
    velocity: &VelocityGrid,
    axis: Axis,
    mass: f64,
    dt: f64,
    values: &[f64],
    ci: usize,
    half: &mut [f64],
) {
    let a = axis.index();
    let cell = &cells[ci];
    if cell.class[a] != CellClass::Normal {
        return;
    }
    let (Some(prev), Some(next)) = (cell.prev[a], cell.next[a]) else {
        return;
    };
    let Some(next2) = cells[next].next[a] else {
        return;
    };

    let ns = velocity.len();
    let step = axis.step(cell.step);
    let (sb, pb, nb, n2b) = (ci * ns, prev * ns, next * ns, next2 * ns);
    for ii in 0..ns {
        let pa = axis.component(velocity.sample(ii));
        let y = dt / mass * (pa / step).abs();
        half[ii] = if pa > 0.0 {
            values[sb + ii]
                + (1.0 - y) / 2.0
                    * limiter.limit(values[pb + ii], values[sb + ii], values[nb + ii])
        } else {
            values[nb + ii]
                - (1.0 - y) / 2.0
                    * limiter.limit(values[sb + ii], values[nb + ii], values[n2b + ii])
        };
    }
}

/// 单个 Normal/PreRight 单元的守恒更新
#[allow(clippy::too_many_arguments)]
fn value_kernel(
    cells: &[crate::grid::CellMeta],
    velocity: &VelocityGrid,
    axis: Axis,
    mass: f64,
    dt: f64,
    half: &[f64],
    ci: usize,
    values: &mut [f64],
) {
    let a = axis.index();
    let cell = &cells[ci];
    if !matches!(cell.class[a], CellClass::Normal | CellClass::PreRight) {
        return;
    }
    let Some(prev) = cell.prev[a] else {
        return;
    };

    let ns = velocity.len();
    let step = axis.step(cell.step);
    let (sb, pb) = (ci * ns, prev * ns);
    for ii in 0..ns {
        let pa = axis.component(velocity.sample(ii));
        let y = dt / mass * pa / step;
        values[ii] -= y * (half[sb + ii] - half[pb + ii]);
    }
}
