// crates/dv_physics/tests/transport_sweep.rs

//! 输运扫描的整体性质
//!
//! 平缓梯度、低 Courant 数下分布保持非负；并行与串行扫描逐位
//! 一致（相位内无跨单元写入，浮点求值顺序相同）。

use glam::DVec2;

use dv_config::SolverConfig;
use dv_physics::{
    DistributionState, Gas, Grid, GridBuilder, NullExchange, ParallelStrategy, Solver,
    VelocityGrid,
};

fn config() -> SolverConfig {
    let mut config = SolverConfig::default();
    config.velocity_grid.resolution = 6;
    config.timestep = 0.05;
    config.max_iterations = 5;
    config
}

/// 带平缓压强梯度的盒子
fn gradient_box(config: &SolverConfig, nx: usize, ny: usize) -> (Grid, DistributionState) {
    let velocity = VelocityGrid::new(&config.velocity_grid).unwrap();
    let gases: Vec<Gas> = config.gases.iter().map(Gas::from).collect();

    let mut builder = GridBuilder::new(nx, ny, 1, DVec2::ONE);
    builder.add_gas_box((0, 0), (nx, ny), |(x, _), seed| {
        let g = seed.physics.gas_mut(0);
        g.pressure = 1.0 + 0.05 * x as f64 / nx as f64;
    });
    builder.build(&gases, &velocity).unwrap()
}

#[test]
fn smooth_gradient_stays_non_negative() {
    let config = config();
    let (grid, state) = gradient_box(&config, 12, 5);
    let mut solver = Solver::new(config, grid, state, None, Box::new(NullExchange)).unwrap();
    solver.run().unwrap();

    assert_eq!(solver.check_cells(), 0, "出现负值采样点");
    assert!(solver
        .state()
        .field(0)
        .values
        .iter()
        .all(|&v| v >= 0.0));
}

#[test]
fn parallel_and_sequential_sweeps_agree_bitwise() {
    let config = config();

    let (grid_a, state_a) = gradient_box(&config, 12, 5);
    let mut sequential = Solver::new(config.clone(), grid_a, state_a, None, Box::new(NullExchange))
        .unwrap()
        .with_strategy(ParallelStrategy::Sequential);

    let (grid_b, state_b) = gradient_box(&config, 12, 5);
    let mut parallel = Solver::new(config, grid_b, state_b, None, Box::new(NullExchange))
        .unwrap()
        .with_strategy(ParallelStrategy::Parallel);

    for _ in 0..3 {
        sequential.step().unwrap();
        parallel.step().unwrap();
    }

    assert_eq!(
        sequential.state().field(0).values,
        parallel.state().field(0).values
    );
    assert_eq!(
        sequential.state().field(0).half,
        parallel.state().field(0).half
    );
}

#[test]
fn gradient_relaxes_toward_uniformity() {
    let mut config = config();
    config.max_iterations = 40;
    let (grid, state) = gradient_box(&config, 12, 5);

    let mut solver = Solver::new(config, grid, state, None, Box::new(NullExchange)).unwrap();

    let spread = |solver: &Solver| -> f64 {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for fields in solver.macroscopic().iter() {
            if let Some(per_gas) = fields {
                min = min.min(per_gas[0].density);
                max = max.max(per_gas[0].density);
            }
        }
        max - min
    };

    let before = spread(&solver);
    solver.run().unwrap();
    let after = spread(&solver);

    assert!(
        after < before,
        "密度差未随时间衰减: {} -> {}",
        before,
        after
    );
}
