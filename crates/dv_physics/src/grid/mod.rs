// crates/dv_physics/src/grid/mod.rs

//! 结构网格
//!
//! 二维结构网格的稀疏存储：`lookup` 把网格坐标映射到稠密单元下标，
//! 不存在的坐标（网格外或未放置单元）映射到 `None`。拓扑在构建后
//! 不再变化。

pub mod builder;
pub mod cell;

pub use builder::{GridBuilder, NodeSeed};
pub use cell::{CellClass, CellMeta};

use dv_foundation::{DvError, DvResult};

/// 二维结构网格
#[derive(Debug, Clone)]
pub struct Grid {
    size: (usize, usize),
    lookup: Vec<Option<usize>>,
    cells: Vec<CellMeta>,
}

impl Grid {
    pub(crate) fn from_parts(
        size: (usize, usize),
        lookup: Vec<Option<usize>>,
        cells: Vec<CellMeta>,
    ) -> Self {
        Self {
            size,
            lookup,
            cells,
        }
    }

    /// 网格尺寸 (nx, ny)
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    /// 稠密单元数量
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// 全部单元元数据，按稠密下标排列
    #[inline]
    pub fn cells(&self) -> &[CellMeta] {
        &self.cells
    }

    /// 按稠密下标取单元
    #[inline]
    pub fn cell(&self, i: usize) -> &CellMeta {
        &self.cells[i]
    }

    /// 按网格坐标查找稠密下标
    #[inline]
    pub fn cell_at(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        self.lookup[y * self.size.0 + x]
    }

    /// 参与本地计算的单元（排除分区镜像）
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, &CellMeta)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_active())
    }

    /// 由链接存在性计算全部轴分类
    ///
    /// 静态拓扑下只需在迭代循环开始前调用一次。分区镜像单元
    /// 不参与本地扫描，分类保持 Undefined。
    pub fn classify_cells(&mut self) {
        for i in 0..self.cells.len() {
            let classes = if self.cells[i].is_active() {
                [self.compute_class(i, 0), self.compute_class(i, 1)]
            } else {
                [CellClass::Undefined; 2]
            };
            self.cells[i].class = classes;
        }
    }

    fn compute_class(&self, i: usize, axis: usize) -> CellClass {
        let cell = &self.cells[i];
        if cell.locked[axis] {
            return CellClass::Undefined;
        }
        match (cell.prev[axis], cell.next[axis]) {
            (None, None) => CellClass::Undefined,
            (None, Some(_)) => CellClass::Left,
            (Some(_), None) => CellClass::Right,
            (Some(_), Some(n)) => {
                if self.cells[n].next[axis].is_some() {
                    CellClass::Normal
                } else {
                    CellClass::PreRight
                }
            }
        }
    }

    /// 验证扫描所需的拓扑完整性
    ///
    /// 边界策略需要两个内部邻居做外推与限制器重构，长度不足的
    /// 轴在这里致命化，而不是在并行扫描中途发现。
    pub fn validate_topology(&self) -> DvResult<()> {
        for cell in &self.cells {
            if !cell.is_active() {
                continue;
            }
            for axis in 0..2 {
                match cell.class[axis] {
                    CellClass::Left => {
                        let next = cell.next[axis].and_then(|n| self.cells[n].next[axis]);
                        if next.is_none() {
                            return Err(DvError::invalid_grid(format!(
                                "单元 ({}, {}) 沿轴 {} 为左边界，但该轴长度不足 3",
                                cell.coord.0, cell.coord.1, axis
                            )));
                        }
                    }
                    CellClass::Right => {
                        let prev = cell.prev[axis].and_then(|p| self.cells[p].prev[axis]);
                        if prev.is_none() {
                            return Err(DvError::invalid_grid(format!(
                                "单元 ({}, {}) 沿轴 {} 为右边界，但该轴长度不足 3",
                                cell.coord.0, cell.coord.1, axis
                            )));
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
