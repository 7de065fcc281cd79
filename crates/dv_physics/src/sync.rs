// crates/dv_physics/src/sync.rs

//! 分区同步
//!
//! 多分区运行时，分区边缘的镜像单元（ParallelGhost）由远端分区
//! 写入。同步是迭代末尾的屏障语义：实现负责把本地边缘单元的分布
//! 发给邻居分区，并用收到的数据覆盖本地镜像单元。单分区实现为
//! 空操作。

use dv_foundation::DvResult;

use crate::grid::Grid;
use crate::state::DistributionState;

/// 分区同步接口
pub trait PartitionExchange: Send {
    /// 分区总数
    fn partition_count(&self) -> usize;

    /// 是否为主分区（进度日志只在主分区输出）
    fn is_master(&self) -> bool;

    /// 交换分区边缘数据，返回前保证镜像单元已更新
    fn exchange(&mut self, grid: &Grid, state: &mut DistributionState) -> DvResult<()>;
}

/// 单分区空实现
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExchange;

impl PartitionExchange for NullExchange {
    fn partition_count(&self) -> usize {
        1
    }

    fn is_master(&self) -> bool {
        true
    }

    fn exchange(&mut self, _grid: &Grid, _state: &mut DistributionState) -> DvResult<()> {
        Ok(())
    }
}
