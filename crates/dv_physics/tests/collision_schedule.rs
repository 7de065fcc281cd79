// crates/dv_physics/tests/collision_schedule.rs

//! 碰撞引擎接线
//!
//! 用计数引擎验证调度契约：初始化一次、每次迭代每个气体对生成
//! 一次采样、逐活动单元送入分布数组。引擎错误立即中止迭代。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::DVec2;

use dv_config::{GasConfig, SolverConfig};
use dv_physics::{
    CollisionEngine, CollisionSetup, DistributionState, Gas, Grid, GridBuilder, NullExchange,
    PotentialModel, Solver, SymmetryMode, VelocityGrid,
};
use dv_foundation::{DvError, DvResult};

#[derive(Default)]
struct Counters {
    initialized: AtomicUsize,
    pairs_begun: AtomicUsize,
    same_calls: AtomicUsize,
    cross_calls: AtomicUsize,
}

/// 只计数、不改写分布的引擎
struct CountingEngine {
    counters: Arc<Counters>,
    last_setup: std::sync::Mutex<Option<CollisionSetup>>,
}

impl CollisionEngine for CountingEngine {
    fn initialize(&mut self, _potential: PotentialModel, _symmetry: SymmetryMode) -> DvResult<()> {
        self.counters.initialized.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn begin_pair(&mut self, setup: &CollisionSetup) -> DvResult<()> {
        self.counters.pairs_begun.fetch_add(1, Ordering::Relaxed);
        *self.last_setup.lock().unwrap() = Some(*setup);
        Ok(())
    }

    fn apply_same(&self, _values: &mut [f64]) -> DvResult<()> {
        self.counters.same_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn apply_pair(&self, _values_a: &mut [f64], _values_b: &mut [f64]) -> DvResult<()> {
        self.counters.cross_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// 在 begin_pair 阶段失败的引擎
struct FailingEngine;

impl CollisionEngine for FailingEngine {
    fn initialize(&mut self, _potential: PotentialModel, _symmetry: SymmetryMode) -> DvResult<()> {
        Ok(())
    }

    fn begin_pair(&mut self, _setup: &CollisionSetup) -> DvResult<()> {
        Err(DvError::collision("采样生成失败"))
    }

    fn apply_same(&self, _values: &mut [f64]) -> DvResult<()> {
        Ok(())
    }

    fn apply_pair(&self, _values_a: &mut [f64], _values_b: &mut [f64]) -> DvResult<()> {
        Ok(())
    }
}

fn config(gas_count: usize) -> SolverConfig {
    let mut config = SolverConfig::default();
    config.velocity_grid.resolution = 4;
    config.timestep = 0.05;
    config.max_iterations = 2;
    config.use_collision_integral = true;
    config.gases = (0..gas_count)
        .map(|gi| GasConfig {
            mass: 1.0 + gi as f64,
        })
        .collect();
    config
}

fn build_box(config: &SolverConfig) -> (Grid, DistributionState) {
    let velocity = VelocityGrid::new(&config.velocity_grid).unwrap();
    let gases: Vec<Gas> = config.gases.iter().map(Gas::from).collect();
    let mut builder = GridBuilder::new(5, 4, gases.len(), DVec2::ONE);
    builder.add_gas_box((0, 0), (5, 4), |_, _| {});
    builder.build(&gases, &velocity).unwrap()
}

#[test]
fn three_gas_schedule_runs_three_pairs_per_iteration() {
    let config = config(3);
    let (grid, state) = build_box(&config);
    let active_cells = grid.cells().len(); // 单分区无镜像单元，全部活动

    let counters = Arc::new(Counters::default());
    let engine = CountingEngine {
        counters: counters.clone(),
        last_setup: std::sync::Mutex::new(None),
    };

    let mut solver =
        Solver::new(config, grid, state, Some(Box::new(engine)), Box::new(NullExchange)).unwrap();
    solver.run().unwrap();

    assert_eq!(counters.initialized.load(Ordering::Relaxed), 1);
    // 每次迭代 (0,0), (0,1), (0,2) 三对
    assert_eq!(counters.pairs_begun.load(Ordering::Relaxed), 3 * 2);
    // 自碰撞每迭代每单元一次
    assert_eq!(counters.same_calls.load(Ordering::Relaxed), active_cells * 2);
    // 交叉碰撞每迭代每单元两对
    assert_eq!(
        counters.cross_calls.load(Ordering::Relaxed),
        active_cells * 2 * 2
    );
}

#[test]
fn single_gas_schedule_is_self_collision_only() {
    let config = config(1);
    let (grid, state) = build_box(&config);

    let counters = Arc::new(Counters::default());
    let engine = CountingEngine {
        counters: counters.clone(),
        last_setup: std::sync::Mutex::new(None),
    };

    let mut solver =
        Solver::new(config, grid, state, Some(Box::new(engine)), Box::new(NullExchange)).unwrap();
    solver.step().unwrap();

    assert_eq!(counters.pairs_begun.load(Ordering::Relaxed), 1);
    assert_eq!(counters.cross_calls.load(Ordering::Relaxed), 0);
}

#[test]
fn setup_carries_velocity_grid_parameters() {
    let config = config(2);
    let (grid, state) = build_box(&config);

    let counters = Arc::new(Counters::default());
    let engine = CountingEngine {
        counters: counters.clone(),
        last_setup: std::sync::Mutex::new(None),
    };
    // 引擎被求解器吞掉之前抓一个共享句柄
    let setup_probe = Arc::new(std::sync::Mutex::new(None::<CollisionSetup>));

    struct ProbeEngine {
        inner: CountingEngine,
        probe: Arc<std::sync::Mutex<Option<CollisionSetup>>>,
    }
    impl CollisionEngine for ProbeEngine {
        fn initialize(
            &mut self,
            potential: PotentialModel,
            symmetry: SymmetryMode,
        ) -> DvResult<()> {
            self.inner.initialize(potential, symmetry)
        }
        fn begin_pair(&mut self, setup: &CollisionSetup) -> DvResult<()> {
            *self.probe.lock().unwrap() = Some(*setup);
            self.inner.begin_pair(setup)
        }
        fn apply_same(&self, values: &mut [f64]) -> DvResult<()> {
            self.inner.apply_same(values)
        }
        fn apply_pair(&self, a: &mut [f64], b: &mut [f64]) -> DvResult<()> {
            self.inner.apply_pair(a, b)
        }
    }

    let engine = ProbeEngine {
        inner: engine,
        probe: setup_probe.clone(),
    };

    let mut solver =
        Solver::new(config, grid, state, Some(Box::new(engine)), Box::new(NullExchange)).unwrap();
    solver.step().unwrap();

    let setup = setup_probe.lock().unwrap().expect("未生成采样参数");
    // resolution 4 -> 半径 2，截断距离 max / 2
    assert_eq!(setup.grid_radius, 2);
    assert!((setup.cutoff_distance - 4.8 / 2.0).abs() < 1e-14);
    // 最后一对是 (0, 1)
    assert_eq!(setup.mass_a, 1.0);
    assert_eq!(setup.mass_b, 2.0);
}

#[test]
fn engine_failure_aborts_iteration() {
    let config = config(1);
    let (grid, state) = build_box(&config);

    let mut solver = Solver::new(
        config,
        grid,
        state,
        Some(Box::new(FailingEngine)),
        Box::new(NullExchange),
    )
    .unwrap();

    assert!(solver.step().is_err());
}
