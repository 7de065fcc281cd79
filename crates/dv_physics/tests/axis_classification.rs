// crates/dv_physics/tests/axis_classification.rs

//! 轴分类正确性
//!
//! 分类只由邻居链接的存在性决定：链长 1 全 Undefined，链长 2 是
//! Left/Right 对，链长 3 起中间出现 PreRight，链长 5 起出现 Normal。

use glam::DVec2;

use dv_config::VelocityGridConfig;
use dv_physics::{CellClass, Gas, Grid, GridBuilder, NodeSeed, VelocityGrid};

fn velocity() -> VelocityGrid {
    VelocityGrid::new(&VelocityGridConfig {
        resolution: 4,
        max_momentum: 4.8,
    })
    .unwrap()
}

/// 在 X 方向摆一条长度为 len 的单元链
fn build_chain(len: usize, locked: bool) -> Grid {
    let gases = vec![Gas { mass: 1.0 }];
    let mut builder = GridBuilder::new(len, 1, 1, DVec2::ONE);
    for x in 0..len {
        let mut seed = NodeSeed::normal(1, DVec2::ONE);
        seed.locked = [locked, false];
        builder.set(x, 0, seed);
    }
    let (grid, _) = builder.build(&gases, &velocity()).unwrap();
    grid
}

fn x_classes(grid: &Grid) -> Vec<CellClass> {
    grid.cells().iter().map(|c| c.class[0]).collect()
}

#[test]
fn isolated_cell_is_undefined() {
    let grid = build_chain(1, false);
    assert_eq!(x_classes(&grid), vec![CellClass::Undefined]);
    // 另一轴同样没有邻居
    assert_eq!(grid.cell(0).class[1], CellClass::Undefined);
}

#[test]
fn length_two_chain_is_left_right_pair() {
    let grid = build_chain(2, false);
    assert_eq!(x_classes(&grid), vec![CellClass::Left, CellClass::Right]);
    // 但长度不足以支撑边界策略的双内部邻居
    assert!(grid.validate_topology().is_err());
}

#[test]
fn length_three_chain_has_preright_core() {
    let grid = build_chain(3, false);
    assert_eq!(
        x_classes(&grid),
        vec![CellClass::Left, CellClass::PreRight, CellClass::Right]
    );
    assert!(grid.validate_topology().is_ok());
}

#[test]
fn length_five_chain_has_normal_interior() {
    let grid = build_chain(5, false);
    assert_eq!(
        x_classes(&grid),
        vec![
            CellClass::Left,
            CellClass::Normal,
            CellClass::Normal,
            CellClass::PreRight,
            CellClass::Right,
        ]
    );
}

#[test]
fn locked_axis_forces_undefined() {
    let grid = build_chain(5, true);
    assert!(x_classes(&grid)
        .iter()
        .all(|&c| c == CellClass::Undefined));
}
