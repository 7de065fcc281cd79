// crates/dv_physics/src/reactions/mod.rs

//! 反应步
//!
//! 输运之后、下一次迭代之前作用在逐单元分布上的两类反应：
//! 外部引擎驱动的二元碰撞积分，以及 A→B→C 衰变链。

pub mod collision;
pub mod decay;

pub use collision::{
    pair_schedule, CollisionEngine, CollisionSetup, CollisionStep, PotentialModel, SymmetryMode,
};
pub use decay::DecayStep;
