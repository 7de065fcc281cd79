// crates/dvgas/src/main.rs

//! DVGas 命令行入口
//!
//! 用法：`dvgas [config.json]`。不给配置文件时使用缺省配置。
//! 算例是一个矩形气体盒（漫反射壁），迭代结束后打印中心单元的
//! 宏观量。日志级别由 `RUST_LOG` 控制，缺省 `info`。

use std::process::ExitCode;

use glam::DVec2;
use log::{error, info};

use dv_config::SolverConfig;
use dv_physics::{Gas, GridBuilder, NullExchange, Solver, VelocityGrid};

/// 缺省算例的网格尺寸（含 ghost 周圈）
const BOX_SIZE: (usize, usize) = (22, 12);

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => {
            info!("加载配置 {}", path);
            SolverConfig::from_file(&path)?
        }
        None => {
            info!("未指定配置文件，使用缺省配置");
            SolverConfig::default()
        }
    };

    let velocity = VelocityGrid::new(&config.velocity_grid)?;
    let gases: Vec<Gas> = config.gases.iter().map(Gas::from).collect();

    let (nx, ny) = BOX_SIZE;
    let mut builder = GridBuilder::new(nx, ny, gases.len(), DVec2::ONE);
    builder.add_gas_box((0, 0), (nx, ny), |_, _| {});
    let (grid, state) = builder.build(&gases, &velocity)?;

    let mut solver = Solver::new(config, grid, state, None, Box::new(NullExchange))?;
    solver.run()?;

    let center = solver
        .grid()
        .cell_at(nx / 2, ny / 2)
        .ok_or("中心单元不存在")?;
    if let Some(per_gas) = &solver.macroscopic()[center] {
        for (gi, m) in per_gas.iter().enumerate() {
            info!(
                "中心单元 气体 {}: n = {:.6}, T = {:.6}, P = {:.6}, 流量 = ({:.3e}, {:.3e}, {:.3e})",
                gi, m.density, m.temperature, m.pressure, m.stream.x, m.stream.y, m.stream.z
            );
        }
    }

    Ok(())
}
