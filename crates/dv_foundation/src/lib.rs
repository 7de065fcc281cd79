// crates/dv_foundation/src/lib.rs

//! DVGas Foundation Layer (Layer 1)
//!
//! 基础层，提供整个工作区共享的底层设施：
//!
//! - [`error`]: 统一错误类型 `DvError` / `DvResult`
//! - [`kahan`]: Kahan 补偿求和（速度空间矩积分用）
//! - [`tolerance`]: 共享判零阈值
//!
//! # 层级架构
//!
//! ```text
//! Layer 3: dv_physics    ─> 数值核心
//! Layer 2: dv_config     ─> SolverConfig
//! Layer 1: dv_foundation ─> DvError, KahanSum (本层)
//! ```
//!
//! 本层不依赖任何上层 crate，也不包含物理语义。

#![warn(missing_docs)]

pub mod error;
pub mod kahan;
pub mod tolerance;

pub use error::{DvError, DvResult};
pub use kahan::KahanSum;
pub use tolerance::{DENSITY_FLOOR, VACUUM_PRESSURE};
