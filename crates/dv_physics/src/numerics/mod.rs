// crates/dv_physics/src/numerics/mod.rs

//! 数值格式
//!
//! 目前仅包含半步通量重构用的斜率限制器。

pub mod limiter;

pub use limiter::{SlopeLimiter, Superbee};
