// crates/dv_physics/src/reactions/collision.rs

//! 二元碰撞积分接口
//!
//! 碰撞算子本身是不透明的外部引擎：求解器负责初始化、为每个
//! 气体对生成采样参数、并逐单元送入分布数组，引擎内部如何采样
//! 碰撞球面不在本层关心范围内。

use dv_foundation::{DvError, DvResult};

use crate::grid::Grid;
use crate::state::DistributionState;
use crate::types::Gas;
use crate::velocity::VelocityGrid;

/// 每个气体对每次迭代的碰撞采样数
pub const DEFAULT_SAMPLES_PER_PAIR: usize = 50_000;

/// 分子间势模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PotentialModel {
    /// 硬球势
    #[default]
    HardSphere,
}

/// 碰撞积分的对称性假设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymmetryMode {
    /// 无对称性
    #[default]
    None,
}

/// 单个气体对的碰撞采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSetup {
    /// 时间步长
    pub timestep: f64,
    /// 采样数
    pub samples: usize,
    /// 两种气体的速度网格半径（每轴半分辨率）
    pub grid_radius: usize,
    /// 截断距离
    pub cutoff_distance: f64,
    /// 气体 0 的分子质量
    pub mass_a: f64,
    /// 气体 1 的分子质量
    pub mass_b: f64,
    /// 气体 0 的分子直径
    pub diameter_a: f64,
    /// 气体 1 的分子直径
    pub diameter_b: f64,
}

impl CollisionSetup {
    /// 由速度网格与气体对生成采样参数
    pub fn for_pair(velocity: &VelocityGrid, mass_a: f64, mass_b: f64, timestep: f64) -> Self {
        Self {
            timestep,
            samples: DEFAULT_SAMPLES_PER_PAIR,
            grid_radius: velocity.collision_radius(),
            cutoff_distance: velocity.collision_cutoff(),
            mass_a,
            mass_b,
            diameter_a: 1.0,
            diameter_b: 1.0,
        }
    }
}

/// 外部碰撞积分引擎
///
/// 引擎失败通过 `DvError::Collision` 上抛并中止迭代，不做静默跳过。
pub trait CollisionEngine: Send {
    /// 一次性初始化（势模型与对称性）
    fn initialize(&mut self, potential: PotentialModel, symmetry: SymmetryMode) -> DvResult<()>;

    /// 为一个气体对生成本次迭代的碰撞采样
    fn begin_pair(&mut self, setup: &CollisionSetup) -> DvResult<()>;

    /// 同种气体的自碰撞，原位改写单元分布
    fn apply_same(&self, values: &mut [f64]) -> DvResult<()>;

    /// 异种气体对的碰撞，原位改写两种分布
    fn apply_pair(&self, values_a: &mut [f64], values_b: &mut [f64]) -> DvResult<()>;
}

/// 按组分数生成碰撞对调度
///
/// 组分 0 为主气体：单组分只有自碰撞，多组分追加主气体与
/// 组分 1、2 的交叉碰撞，最多三对。
pub fn pair_schedule(gas_count: usize) -> Vec<(usize, usize)> {
    match gas_count {
        0 => Vec::new(),
        1 => vec![(0, 0)],
        2 => vec![(0, 0), (0, 1)],
        _ => vec![(0, 0), (0, 1), (0, 2)],
    }
}

/// 碰撞步：引擎加调度
pub struct CollisionStep {
    engine: Box<dyn CollisionEngine>,
}

impl CollisionStep {
    /// 包装引擎并完成一次性初始化
    pub fn new(mut engine: Box<dyn CollisionEngine>) -> DvResult<Self> {
        engine.initialize(PotentialModel::default(), SymmetryMode::default())?;
        Ok(Self { engine })
    }

    /// 对全部活动单元执行本次迭代的碰撞
    pub fn apply(
        &mut self,
        grid: &Grid,
        state: &mut DistributionState,
        velocity: &VelocityGrid,
        gases: &[Gas],
        timestep: f64,
    ) -> DvResult<()> {
        let ns = velocity.len();
        for (gi0, gi1) in pair_schedule(gases.len()) {
            if gi1 >= gases.len() {
                return Err(DvError::index_out_of_bounds("gas", gi1, gases.len()));
            }
            let setup =
                CollisionSetup::for_pair(velocity, gases[gi0].mass, gases[gi1].mass, timestep);
            self.engine.begin_pair(&setup)?;

            if gi0 == gi1 {
                for (ci, _) in grid.active_cells() {
                    self.engine.apply_same(state.values_mut(gi0, ci))?;
                }
            } else {
                let (fa, fb) = state.fields_pair_mut(gi0, gi1)?;
                for (ci, _) in grid.active_cells() {
                    let base = ci * ns;
                    self.engine.apply_pair(
                        &mut fa.values[base..base + ns],
                        &mut fb.values[base..base + ns],
                    )?;
                }
            }
        }
        Ok(())
    }
}
