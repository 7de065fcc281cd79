// crates/dv_physics/src/reactions/decay.rs

//! 衰变链 A → B → C
//!
//! 逐采样点的显式一阶衰变：`delta = f_A * lambda * dt`，从 A 移到 B，
//! 再从 B 移到 C。稳定性前提 `lambda * dt < 1` 已在配置验证中
//! 致命化，这里不做钳制。两步之和逐采样点守恒。

use dv_foundation::DvResult;

use crate::grid::Grid;
use crate::state::DistributionState;
use crate::types::BetaChain;

/// 衰变步
#[derive(Debug, Clone, Default)]
pub struct DecayStep {
    chains: Vec<BetaChain>,
}

impl DecayStep {
    /// 由衰变链列表创建
    pub fn new(chains: Vec<BetaChain>) -> Self {
        Self { chains }
    }

    /// 是否没有配置衰变链
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// 对全部活动单元执行一个时间步的衰变
    pub fn apply(&self, grid: &Grid, state: &mut DistributionState, timestep: f64) -> DvResult<()> {
        for chain in &self.chains {
            decay_pair(grid, state, chain.gas_a, chain.gas_b, chain.lambda1, timestep)?;
            decay_pair(grid, state, chain.gas_b, chain.gas_c, chain.lambda2, timestep)?;
        }
        Ok(())
    }
}

fn decay_pair(
    grid: &Grid,
    state: &mut DistributionState,
    from: usize,
    to: usize,
    lambda: f64,
    timestep: f64,
) -> DvResult<()> {
    let ns = state.sample_count();
    let (fa, fb) = state.fields_pair_mut(from, to)?;
    for (ci, _) in grid.active_cells() {
        let base = ci * ns;
        for ii in base..base + ns {
            let delta = fa.values[ii] * lambda * timestep;
            fa.values[ii] -= delta;
            fb.values[ii] += delta;
        }
    }
    Ok(())
}
