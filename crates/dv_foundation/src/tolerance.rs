// crates/dv_foundation/src/tolerance.rs

//! 共享数值阈值
//!
//! 集中管理各模块使用的判零阈值，避免魔法数散落。

/// 宏观密度的零判定阈值
///
/// 密度不高于该值的单元跳过温度/压强计算，避免除零。
pub const DENSITY_FLOOR: f64 = 0.0;

/// 边界压强的真空判定阈值
///
/// 规定压强不高于该值时，边界按真空处理（入流通量为零）。
pub const VACUUM_PRESSURE: f64 = 0.0;
