// crates/dv_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `DvError` 枚举和 `DvResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，配置相关错误在 dv_config 中定义
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **分级处理**: 配置/拓扑错误是致命的，数值越界只记录不中断
//!
//! # 示例
//!
//! ```
//! use dv_foundation::error::{DvError, DvResult};
//!
//! fn check_resolution(n: usize) -> DvResult<()> {
//!     if n == 0 {
//!         return Err(DvError::config("速度网格分辨率不能为零"));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// 统一结果类型
pub type DvResult<T> = Result<T, DvError>;

/// DVGas 错误类型
///
/// 核心错误类型，用于整个项目。配置解析相关的错误在 `dv_config` 中扩展。
#[derive(Error, Debug)]
pub enum DvError {
    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 无效网格拓扑
    ///
    /// 构造期不变量被破坏（如 Normal 单元缺少邻居链接），属于致命错误。
    #[error("网格拓扑错误: {message}")]
    InvalidGrid {
        /// 具体错误信息
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 碰撞积分引擎错误
    #[error("碰撞积分引擎错误: {message}")]
    Collision {
        /// 引擎侧的错误说明
        message: String,
    },

    /// 分区同步错误
    #[error("分区同步错误: {message}")]
    Exchange {
        /// 交换层的错误说明
        message: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl DvError {
    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 网格拓扑错误
    pub fn invalid_grid(message: impl Into<String>) -> Self {
        Self::InvalidGrid {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 碰撞积分引擎错误
    pub fn collision(message: impl Into<String>) -> Self {
        Self::Collision {
            message: message.into(),
        }
    }

    /// 分区同步错误
    pub fn exchange(message: impl Into<String>) -> Self {
        Self::Exchange {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl DvError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> DvResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查值是否在范围内
    #[inline]
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> DvResult<()> {
        if value < min || value > max {
            Err(Self::out_of_range(field, value, min, max))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> DvResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}

// ========================================================================
// 测试
// ========================================================================
