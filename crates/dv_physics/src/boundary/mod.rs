// crates/dv_physics/src/boundary/mod.rs

//! 边界条件
//!
//! 四族边界条件（漫反射/定压/镜面/定流量），各有左右两个变体。
//! 策略是纯函数：输入边界单元与两个内部邻居的下标、气体与边界
//! 参数，输出写入该气体的场数组。右侧变体会改写内侧邻居（PreRight
//! 单元）的半步数组，因此边界子相位必须串行执行。

pub mod policies;

use glam::DVec3;

use crate::numerics::SlopeLimiter;
use crate::state::GasField;
use crate::types::BoundarySpec;
use crate::velocity::VelocityGrid;

/// 边界在扫描轴上的侧别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// 左边界：只有后继邻居
    Left,
    /// 右边界：只有前驱邻居
    Right,
}

/// 边界策略的只读输入
pub struct BoundaryContext<'a> {
    /// 共享速度网格
    pub velocity: &'a VelocityGrid,
    /// 半步重构用限制器
    pub limiter: &'a dyn SlopeLimiter,
    /// 当前气体的分子质量
    pub mass: f64,
    /// 时间步长
    pub timestep: f64,
    /// 扫描轴（0=X, 1=Y）
    pub axis: usize,
    /// 边界单元沿扫描轴的尺寸
    pub step: f64,
    /// 当前气体在该单元上的边界参数
    pub spec: &'a BoundarySpec,
}

/// 取矢量沿轴的分量
#[inline]
pub(crate) fn component(v: DVec3, axis: usize) -> f64 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

/// 执行边界策略
///
/// `cells` 为稠密单元下标 `[边界, 内侧第一, 内侧第二]`，
/// 左边界时为 (self, next, next.next)，右边界时为
/// (self, prev, prev.prev)。
pub fn apply(ctx: &BoundaryContext, side: Side, field: &mut GasField, cells: [usize; 3]) {
    use crate::types::BoundaryKind::*;
    match (ctx.spec.kind, side) {
        (Diffuse, Side::Left) => policies::diffuse_left(ctx, field, cells),
        (Diffuse, Side::Right) => policies::diffuse_right(ctx, field, cells),
        (Pressure, Side::Left) => policies::pressure_left(ctx, field, cells),
        (Pressure, Side::Right) => policies::pressure_right(ctx, field, cells),
        (Mirror, Side::Left) => policies::mirror_left(ctx, field, cells),
        (Mirror, Side::Right) => policies::mirror_right(ctx, field, cells),
        (Flow, Side::Left) => policies::flow_left(ctx, field, cells),
        (Flow, Side::Right) => policies::flow_right(ctx, field, cells),
    }
}
