// crates/dv_physics/src/grid/cell.rs

//! 单元元数据与轴分类
//!
//! 拓扑（邻居链接）在构建期固定，轴分类由链接的存在性唯一决定，
//! 迭代循环开始前计算一次，之后只读。

use glam::DVec2;

use crate::types::{CellKind, CellPhysics};

/// 单元沿某空间轴的分类
///
/// 分类决定该单元在半步/全步相位中执行哪种更新：
///
/// | 分类       | 半步           | 全步                     |
/// |-----------|----------------|--------------------------|
/// | Undefined | 跳过           | 跳过                      |
/// | Left      | 边界策略        | 无（边界策略内完成）        |
/// | Normal    | 限制器重构      | 标准守恒更新               |
/// | PreRight  | 无（由右邻写入） | 标准守恒更新               |
/// | Right     | 边界策略        | 无（边界策略内完成）        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellClass {
    /// 沿该轴无邻居或该轴被锁定，不参与该轴扫描
    #[default]
    Undefined,
    /// 左边界（只有后继邻居）
    Left,
    /// 内部单元（前驱、后继、后继之后继均存在）
    Normal,
    /// 右边界前一个单元（后继存在但无后继之后继）
    PreRight,
    /// 右边界（只有前驱邻居）
    Right,
}

/// 单元元数据
///
/// 链接以稠密单元下标表示，`None` 表示该方向无邻居。
#[derive(Debug, Clone)]
pub struct CellMeta {
    /// 网格坐标 (x, y)
    pub coord: (usize, usize),
    /// 单元种类
    pub kind: CellKind,
    /// 单元尺寸 (dx, dy)
    pub step: DVec2,
    /// 逐轴锁定标志：锁定轴上强制 Undefined
    pub locked: [bool; 2],
    /// 逐气体物理参数
    pub physics: CellPhysics,
    /// 逐轴前驱链接
    pub prev: [Option<usize>; 2],
    /// 逐轴后继链接
    pub next: [Option<usize>; 2],
    /// 逐轴分类
    pub class: [CellClass; 2],
}

impl CellMeta {
    /// 是否参与本地计算相位
    #[inline]
    pub fn is_active(&self) -> bool {
        self.kind.is_active()
    }

    /// 是否参与宏观量提取
    #[inline]
    pub fn is_extractable(&self) -> bool {
        self.kind == CellKind::Normal
    }
}
