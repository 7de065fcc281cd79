// crates/dv_physics/src/lib.rs

//! 物理求解器模块
//!
//! 提供离散速度动理学（Boltzmann 型）输运方程的数值求解，包括：
//! - 速度网格 (velocity) - 共享动量采样、镜面反射索引
//! - 核心类型定义 (types) - 气体、边界条件、单元物理参数
//! - 状态管理 (state) - SoA 布局的分布函数与半步通量
//! - 网格 (grid) - 单元链接、轴分类、构建器
//! - 数值格式 (numerics) - 斜率限制器
//! - 边界条件 (boundary) - 漫反射/定压/镜面/定流量 四族
//! - 输运步 (transport) - 半步通量 + 全步更新的逐轴扫描
//! - 反应步 (reactions) - 碰撞积分接口、衰变链
//! - 宏观量提取 (macroscopic) - 密度/流量/温度/压强
//! - 编排器 (solver) - 迭代循环与分区同步
//!
//! # 相位模型
//!
//! 每次迭代内各相位（半步、全步、碰撞、衰变、提取）之间是屏障语义：
//! 相位内所有活动单元的计算相互独立，可以用 rayon 并行；
//! 唯一的跨单元写入是边界半步对相邻单元 half 数组的联合更新，
//! 它被限制在串行的边界子相位中。

#![warn(missing_docs)]

pub mod boundary;
pub mod grid;
pub mod macroscopic;
pub mod numerics;
pub mod reactions;
pub mod solver;
pub mod state;
pub mod sync;
pub mod transport;
pub mod types;
pub mod velocity;

pub use grid::{CellClass, CellMeta, Grid, GridBuilder, NodeSeed};
pub use macroscopic::{Macroscopic, MacroscopicExtractor};
pub use reactions::{
    CollisionEngine, CollisionSetup, CollisionStep, DecayStep, PotentialModel, SymmetryMode,
};
pub use solver::Solver;
pub use state::DistributionState;
pub use sync::{NullExchange, PartitionExchange};
pub use transport::{ParallelStrategy, TransportStep};
pub use types::{
    Axis, BetaChain, BoundaryKind, BoundarySpec, CellKind, CellPhysics, Gas, GasNodeParams,
};
pub use velocity::VelocityGrid;
