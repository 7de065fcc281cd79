// crates/dv_physics/src/solver.rs

//! 求解器编排
//!
//! 固定步数的迭代循环，每步依次执行：输运（X 轴、Y 轴各一次
//! 扫描）、碰撞积分（若启用）、衰变链、范围巡检、分区同步。
//! 巡检只告警不修正，负值是数值异常的征兆而不是可恢复的状态。

use log::{debug, info, warn};

use dv_config::SolverConfig;
use dv_foundation::{DvError, DvResult};

use crate::grid::Grid;
use crate::macroscopic::{Macroscopic, MacroscopicExtractor};
use crate::reactions::{CollisionEngine, CollisionStep, DecayStep};
use crate::state::DistributionState;
use crate::sync::PartitionExchange;
use crate::transport::{ParallelStrategy, TransportStep};
use crate::types::{BetaChain, Gas};
use crate::velocity::VelocityGrid;

/// 动理学求解器
pub struct Solver {
    config: SolverConfig,
    velocity: VelocityGrid,
    gases: Vec<Gas>,
    grid: Grid,
    state: DistributionState,
    transport: TransportStep,
    collisions: Option<CollisionStep>,
    decay: DecayStep,
    exchange: Box<dyn PartitionExchange>,
    iteration: usize,
}

impl Solver {
    /// 组装求解器
    ///
    /// 配置验证与拓扑验证都在这里完成：迭代循环内不再出现配置类
    /// 错误。启用碰撞积分但未提供引擎视为配置错误。
    pub fn new(
        config: SolverConfig,
        grid: Grid,
        state: DistributionState,
        collision_engine: Option<Box<dyn CollisionEngine>>,
        exchange: Box<dyn PartitionExchange>,
    ) -> DvResult<Self> {
        config
            .validate()
            .map_err(|e| DvError::config(e.to_string()))?;

        let velocity = VelocityGrid::new(&config.velocity_grid)?;
        DvError::check_size("gas", config.gas_count(), state.gas_count())?;
        DvError::check_size("cell", grid.cell_count(), state.cell_count())?;
        DvError::check_size("sample", velocity.len(), state.sample_count())?;
        grid.validate_topology()?;

        let gases: Vec<Gas> = config.gases.iter().map(Gas::from).collect();

        let collisions = match (config.use_collision_integral, collision_engine) {
            (true, Some(engine)) => Some(CollisionStep::new(engine)?),
            (true, None) => {
                return Err(DvError::config("启用了碰撞积分但未提供碰撞引擎"));
            }
            (false, Some(_)) => {
                warn!("提供了碰撞引擎但配置未启用碰撞积分，引擎被忽略");
                None
            }
            (false, None) => None,
        };

        let decay = DecayStep::new(config.beta_chains.iter().map(BetaChain::from).collect());
        let transport = TransportStep::new(ParallelStrategy::Auto, config.min_parallel_cells);

        Ok(Self {
            config,
            velocity,
            gases,
            grid,
            state,
            transport,
            collisions,
            decay,
            exchange,
            iteration: 0,
        })
    }

    /// 改用指定并行策略
    pub fn with_strategy(mut self, strategy: ParallelStrategy) -> Self {
        self.transport = TransportStep::new(strategy, self.config.min_parallel_cells);
        self
    }

    /// 网格
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 分布状态
    #[inline]
    pub fn state(&self) -> &DistributionState {
        &self.state
    }

    /// 速度网格
    #[inline]
    pub fn velocity(&self) -> &VelocityGrid {
        &self.velocity
    }

    /// 已完成的迭代数
    #[inline]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// 执行一次迭代
    pub fn step(&mut self) -> DvResult<()> {
        let dt = self.config.timestep;

        self.transport
            .sweep(&self.grid, &mut self.state, &self.velocity, &self.gases, dt)?;

        if let Some(collisions) = &mut self.collisions {
            collisions.apply(&self.grid, &mut self.state, &self.velocity, &self.gases, dt)?;
        }

        self.decay.apply(&self.grid, &mut self.state, dt)?;

        let violations = self.check_cells();
        if violations > 0 {
            warn!("迭代 {} 出现 {} 个负值采样点", self.iteration, violations);
        }

        if self.exchange.partition_count() > 1 {
            self.exchange.exchange(&self.grid, &mut self.state)?;
        }

        self.iteration += 1;
        Ok(())
    }

    /// 跑完配置的全部迭代
    pub fn run(&mut self) -> DvResult<()> {
        let max = self.config.max_iterations;
        if self.exchange.is_master() {
            info!(
                "开始求解: {} 个单元, {} 种气体, {} 个采样点, {} 次迭代",
                self.grid.cell_count(),
                self.gases.len(),
                self.velocity.len(),
                max
            );
        }

        let report_every = self.config.report_interval.max(1);
        for it in 0..max {
            self.step()?;
            // 缺省 report_interval = 1，主分区逐迭代输出进度
            if self.exchange.is_master() && (it + 1) % report_every == 0 {
                info!("迭代 {}/{} ({}%)", it + 1, max, (it + 1) * 100 / max);
            }
        }

        if self.exchange.is_master() {
            info!("求解完成，共 {} 次迭代", self.iteration);
        }
        Ok(())
    }

    /// 巡检分布与半步数组的负值，返回负值采样点总数
    ///
    /// 只诊断不修正。逐单元的细节在 warn 级别输出一行摘要，
    /// 含首个越界采样点的下标。
    pub fn check_cells(&self) -> usize {
        let mut total = 0;

        for (ci, cell) in self.grid.active_cells() {
            for gi in 0..self.gases.len() {
                let values = self.state.values(gi, ci);
                let half = self.state.half(gi, ci);

                match negative_summary(values, half) {
                    Some(bad) => {
                        total += bad.count;
                        warn!(
                            "单元 ({}, {}) [{:?}/{:?}] 气体 {}: {} 个负值，首个采样点 {}，最小 {:e}",
                            cell.coord.0,
                            cell.coord.1,
                            cell.class[0],
                            cell.class[1],
                            gi,
                            bad.count,
                            bad.first_sample,
                            bad.worst
                        );
                    }
                    None => {
                        debug!(
                            "单元 ({}, {}) 气体 {} 巡检通过",
                            cell.coord.0, cell.coord.1, gi
                        );
                    }
                }
            }
        }
        total
    }

    /// 提取全网格宏观量，非普通单元为 `None`
    pub fn macroscopic(&self) -> Vec<Option<Vec<Macroscopic>>> {
        MacroscopicExtractor::new(&self.velocity, &self.gases).extract_all(&self.grid, &self.state)
    }
}

/// 单个单元单种气体的负值摘要
struct NegativeSummary {
    /// 负值采样点总数（分布与半步分别计数）
    count: usize,
    /// 首个出现负值的采样点下标
    first_sample: usize,
    /// 最小（最负）的值
    worst: f64,
}

fn negative_summary(values: &[f64], half: &[f64]) -> Option<NegativeSummary> {
    let mut count = 0;
    let mut first_sample = 0;
    let mut worst = 0.0_f64;

    for (ii, (&v, &h)) in values.iter().zip(half).enumerate() {
        for x in [v, h] {
            if x < 0.0 {
                if count == 0 {
                    first_sample = ii;
                }
                count += 1;
                worst = worst.min(x);
            }
        }
    }

    (count > 0).then_some(NegativeSummary {
        count,
        first_sample,
        worst,
    })
}
