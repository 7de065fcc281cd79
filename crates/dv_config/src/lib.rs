// crates/dv_config/src/lib.rs

//! DVGas Config Layer (Layer 2)
//!
//! 配置层，提供求解器配置的定义、序列化与校验。
//!
//! # 模块概览
//!
//! - [`solver_config`]: SolverConfig 求解器配置（全 f64）
//! - [`normalization`]: 无量纲归一化基准
//! - [`error`]: 配置错误类型
//!
//! # 设计原则
//!
//! 1. **全 f64 配置**: 所有数值使用 f64，便于 JSON 序列化
//! 2. **先校验后运行**: `validate()` 在迭代循环开始前暴露所有
//!    配置不一致，运行期不再出现配置类致命错误
//! 3. **显式传递**: 配置对象构造一次后以引用传入各组件，
//!    不提供任何全局单例访问

#![warn(missing_docs)]

pub mod error;
pub mod normalization;
pub mod solver_config;

pub use error::ConfigError;
pub use normalization::Normalization;
pub use solver_config::{
    BetaChainConfig, GasConfig, SolverConfig, VelocityGridConfig,
};
