// crates/dv_physics/src/grid/builder.rs

//! 网格构建器
//!
//! 坐标空间中摆放节点种子，`build` 一次性完成稠密化、邻居链接、
//! 轴分类与 Maxwell 平衡态初始化。`add_gas_box` 是摆放气体区域的
//! 便捷方法：矩形内部为普通单元，周圈为 ghost 边界载体。

use glam::DVec2;

use dv_foundation::{DvError, DvResult, KahanSum};

use crate::grid::cell::{CellClass, CellMeta};
use crate::grid::Grid;
use crate::state::DistributionState;
use crate::types::{CellKind, CellPhysics, Gas};
use crate::velocity::VelocityGrid;

/// 节点种子：构建期的单元描述
#[derive(Debug, Clone)]
pub struct NodeSeed {
    /// 单元种类
    pub kind: CellKind,
    /// 单元尺寸 (dx, dy)
    pub step: DVec2,
    /// 逐轴锁定标志
    pub locked: [bool; 2],
    /// 逐气体物理参数
    pub physics: CellPhysics,
}

impl NodeSeed {
    /// 普通单元种子
    pub fn normal(gas_count: usize, step: DVec2) -> Self {
        Self {
            kind: CellKind::Normal,
            step,
            locked: [false; 2],
            physics: CellPhysics::uniform(gas_count),
        }
    }

    /// Ghost 边界载体种子
    pub fn ghost(gas_count: usize, step: DVec2) -> Self {
        Self {
            kind: CellKind::Ghost,
            ..Self::normal(gas_count, step)
        }
    }
}

/// 网格构建器
#[derive(Debug, Clone)]
pub struct GridBuilder {
    size: (usize, usize),
    gas_count: usize,
    step: DVec2,
    nodes: Vec<Option<NodeSeed>>,
}

impl GridBuilder {
    /// 创建空构建器
    ///
    /// `step` 是 `add_gas_box` 所用的缺省单元尺寸，单独 `set` 的
    /// 节点可以携带自己的尺寸。
    pub fn new(nx: usize, ny: usize, gas_count: usize, step: DVec2) -> Self {
        Self {
            size: (nx, ny),
            gas_count,
            step,
            nodes: vec![None; nx * ny],
        }
    }

    /// 网格尺寸
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    /// 放置单个节点，越界坐标被忽略
    pub fn set(&mut self, x: usize, y: usize, seed: NodeSeed) {
        if x < self.size.0 && y < self.size.1 {
            self.nodes[y * self.size.0 + x] = Some(seed);
        }
    }

    /// 某坐标上的节点
    pub fn node(&self, x: usize, y: usize) -> Option<&NodeSeed> {
        self.nodes.get(y * self.size.0 + x)?.as_ref()
    }

    /// 某坐标上节点的可变引用
    pub fn node_mut(&mut self, x: usize, y: usize) -> Option<&mut NodeSeed> {
        self.nodes.get_mut(y * self.size.0 + x)?.as_mut()
    }

    /// 摆放一个矩形气体区域
    ///
    /// 矩形周圈为 ghost 单元，内部为普通单元。已有的普通单元不会
    /// 被 ghost 覆盖，相邻区域因此可以共享边而不产生内部边界。
    /// `configure` 对每个新摆放的节点调用一次，坐标为绝对坐标。
    pub fn add_gas_box<F>(&mut self, origin: (usize, usize), size: (usize, usize), mut configure: F)
    where
        F: FnMut((usize, usize), &mut NodeSeed),
    {
        let (x0, y0) = origin;
        let x1 = (x0 + size.0).min(self.size.0);
        let y1 = (y0 + size.1).min(self.size.1);

        for y in y0..y1 {
            for x in x0..x1 {
                let on_rim = x == x0 || x + 1 == x1 || y == y0 || y + 1 == y1;
                let slot = y * self.size.0 + x;

                if on_rim {
                    // 不把已有普通单元降级为 ghost
                    if matches!(
                        self.nodes[slot],
                        Some(NodeSeed {
                            kind: CellKind::Normal,
                            ..
                        })
                    ) {
                        continue;
                    }
                    let mut seed = NodeSeed::ghost(self.gas_count, self.step);
                    configure((x, y), &mut seed);
                    self.nodes[slot] = Some(seed);
                } else {
                    let mut seed = NodeSeed::normal(self.gas_count, self.step);
                    configure((x, y), &mut seed);
                    self.nodes[slot] = Some(seed);
                }
            }
        }
    }

    /// 构建网格并初始化分布状态
    ///
    /// 链接规则：相邻两个非普通单元（ghost 之间、ghost 与分区镜像
    /// 之间）不建立链接，避免把互不相关的边界载体串进同一条扫描轴。
    /// 初始化：每单元每气体按 (T, P) 生成 Maxwell 平衡态
    /// `f = n0 * exp(-|p|²/(2 m T))`，`n0 = P / T / (Σ w · Δv³)`。
    pub fn build(self, gases: &[Gas], velocity: &VelocityGrid) -> DvResult<(Grid, DistributionState)> {
        if gases.is_empty() {
            return Err(DvError::config("气体组分列表为空"));
        }
        DvError::check_size("gas", self.gas_count, gases.len())?;

        let (nx, ny) = self.size;
        let mut lookup = vec![None; nx * ny];
        let mut cells: Vec<CellMeta> = Vec::new();

        for y in 0..ny {
            for x in 0..nx {
                if let Some(seed) = &self.nodes[y * nx + x] {
                    if seed.physics.gas_count() != gases.len() {
                        return Err(DvError::size_mismatch(
                            "cell_physics",
                            gases.len(),
                            seed.physics.gas_count(),
                        ));
                    }
                    lookup[y * nx + x] = Some(cells.len());
                    cells.push(CellMeta {
                        coord: (x, y),
                        kind: seed.kind,
                        step: seed.step,
                        locked: seed.locked,
                        physics: seed.physics.clone(),
                        prev: [None; 2],
                        next: [None; 2],
                        class: [CellClass::Undefined; 2],
                    });
                }
            }
        }

        // 邻居链接
        let at = |x: usize, y: usize| -> Option<usize> {
            if x >= nx || y >= ny {
                None
            } else {
                lookup[y * nx + x]
            }
        };
        let kinds: Vec<CellKind> = cells.iter().map(|c| c.kind).collect();
        for i in 0..cells.len() {
            let (x, y) = cells[i].coord;
            let mine = kinds[i];
            let link = |j: Option<usize>| -> Option<usize> {
                let j = j?;
                // 互为非普通单元时断链
                if mine != CellKind::Normal && kinds[j] != CellKind::Normal {
                    None
                } else {
                    Some(j)
                }
            };
            cells[i].prev[0] = link(x.checked_sub(1).and_then(|px| at(px, y)));
            cells[i].next[0] = link(at(x + 1, y));
            cells[i].prev[1] = link(y.checked_sub(1).and_then(|py| at(x, py)));
            cells[i].next[1] = link(at(x, y + 1));
        }

        let mut grid = Grid::from_parts(self.size, lookup, cells);
        grid.classify_cells();

        let mut state =
            DistributionState::new(gases.len(), grid.cell_count(), velocity.len());
        for ci in 0..grid.cell_count() {
            let cell = grid.cell(ci);
            for (gi, gas) in gases.iter().enumerate() {
                let params = cell.physics.gas(gi);
                if params.temperature <= 0.0 {
                    return Err(DvError::config(format!(
                        "单元 ({}, {}) 气体 {} 的初始温度 {} 必须为正",
                        cell.coord.0, cell.coord.1, gi, params.temperature
                    )));
                }
                if params.pressure < 0.0 {
                    return Err(DvError::config(format!(
                        "单元 ({}, {}) 气体 {} 的初始压强 {} 不能为负",
                        cell.coord.0, cell.coord.1, gi, params.pressure
                    )));
                }

                let values = state.values_mut(gi, ci);
                let mut weight_sum = KahanSum::new();
                for (ii, &p) in velocity.samples().iter().enumerate() {
                    let w = VelocityGrid::maxwell_weight(gas.mass, params.temperature, p);
                    values[ii] = w;
                    weight_sum.add(w);
                }
                let n0 = params.pressure
                    / params.temperature
                    / (weight_sum.value() * velocity.delta_volume());
                for v in values.iter_mut() {
                    *v *= n0;
                }
            }
        }

        Ok((grid, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_config::VelocityGridConfig;

    fn small_velocity() -> VelocityGrid {
        VelocityGrid::new(&VelocityGridConfig {
            resolution: 4,
            max_momentum: 4.8,
        })
        .unwrap()
    }

    fn one_gas() -> Vec<Gas> {
        vec![Gas { mass: 1.0 }]
    }

    #[test]
    fn test_gas_box_layout() {
        let mut builder = GridBuilder::new(6, 5, 1, DVec2::ONE);
        builder.add_gas_box((0, 0), (6, 5), |_, _| {});
        let (grid, _) = builder.build(&one_gas(), &small_velocity()).unwrap();

        assert_eq!(grid.cell_count(), 30);
        // 周圈为 ghost
        let rim = grid.cell_at(0, 0).unwrap();
        assert_eq!(grid.cell(rim).kind, CellKind::Ghost);
        // 内部为普通单元
        let inner = grid.cell_at(2, 2).unwrap();
        assert_eq!(grid.cell(inner).kind, CellKind::Normal);
    }

    #[test]
    fn test_mutual_ghost_links_cut() {
        let mut builder = GridBuilder::new(4, 3, 1, DVec2::ONE);
        builder.add_gas_box((0, 0), (4, 3), |_, _| {});
        let (grid, _) = builder.build(&one_gas(), &small_velocity()).unwrap();

        // 角上的 ghost 与两侧 ghost 互不链接
        let corner = grid.cell_at(0, 0).unwrap();
        assert_eq!(grid.cell(corner).prev, [None; 2]);
        assert_eq!(grid.cell(corner).next, [None; 2]);

        // 边上的 ghost 只链接内部方向
        let edge = grid.cell_at(1, 0).unwrap();
        assert_eq!(grid.cell(edge).next[0], None);
        assert!(grid.cell(edge).next[1].is_some());
    }

    #[test]
    fn test_maxwell_init_density() {
        let velocity = small_velocity();
        let mut builder = GridBuilder::new(3, 3, 1, DVec2::ONE);
        builder.add_gas_box((0, 0), (3, 3), |_, seed| {
            let g = seed.physics.gas_mut(0);
            g.temperature = 1.0;
            g.pressure = 2.0;
        });
        let (grid, state) = builder.build(&one_gas(), &velocity).unwrap();

        let center = grid.cell_at(1, 1).unwrap();
        let density: f64 =
            state.values(0, center).iter().sum::<f64>() * velocity.delta_volume();
        // n = P / T
        assert!((density - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_vacuum_pressure_gives_zero_state() {
        let velocity = small_velocity();
        let mut builder = GridBuilder::new(3, 3, 1, DVec2::ONE);
        builder.add_gas_box((0, 0), (3, 3), |_, seed| {
            seed.physics.gas_mut(0).pressure = 0.0;
        });
        let (_, state) = builder.build(&one_gas(), &velocity).unwrap();
        assert!(state.field(0).values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let velocity = small_velocity();
        let mut builder = GridBuilder::new(3, 3, 1, DVec2::ONE);
        builder.add_gas_box((0, 0), (3, 3), |_, seed| {
            seed.physics.gas_mut(0).temperature = 0.0;
        });
        assert!(builder.build(&one_gas(), &velocity).is_err());
    }
}
