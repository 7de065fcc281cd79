// crates/dv_physics/src/numerics/limiter.rs

//! 斜率限制器
//!
//! 半步通量重构中的三点限制器。二阶重构在间断附近会产生过冲，
//! 限制器在局部极值处退化为一阶迎风，保持分布函数非负。

/// 三点斜率限制器
///
/// 输入为沿扫描方向连续三个单元的分布值 (x, y, z)，
/// 返回受限的斜率增量。
pub trait SlopeLimiter: Send + Sync {
    /// 计算受限斜率
    fn limit(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Superbee 型限制器
///
/// 局部极值（两侧差分异号或为零）处返回零；否则返回
/// `sgn(z-y) * max(0, min(2|y-x|, |z-y|, |y-x|, 2|z-y|))`。
#[derive(Debug, Clone, Copy, Default)]
pub struct Superbee;

impl SlopeLimiter for Superbee {
    #[inline]
    fn limit(&self, x: f64, y: f64, z: f64) -> f64 {
        let left = y - x;
        let right = z - y;
        if right * left <= 0.0 {
            return 0.0;
        }
        let magnitude = (2.0 * left.abs())
            .min(right.abs())
            .min(left.abs())
            .min(2.0 * right.abs())
            .max(0.0);
        right.signum() * magnitude
    }
}
