// crates/dv_physics/src/types.rs

//! 核心类型定义
//!
//! 气体组分、空间轴、单元种类与单元物理参数。这些类型在网格构建时
//! 固定，迭代期间只读。

use glam::{DVec2, DVec3};

use dv_config::{BetaChainConfig, GasConfig};

/// 空间轴（二维结构网格）
///
/// 速度空间始终是三维的，输运扫描只沿 X/Y 两个空间轴进行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X 轴
    X,
    /// Y 轴
    Y,
}

impl Axis {
    /// 两个空间轴，按扫描顺序排列
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// 轴下标（X=0, Y=1）
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// 取动量矢量沿本轴的分量
    #[inline]
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// 取单元尺寸沿本轴的分量
    #[inline]
    pub fn step(self, step: DVec2) -> f64 {
        match self {
            Axis::X => step.x,
            Axis::Y => step.y,
        }
    }
}

/// 气体组分
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gas {
    /// 无量纲分子质量
    pub mass: f64,
}

impl From<&GasConfig> for Gas {
    fn from(config: &GasConfig) -> Self {
        Self { mass: config.mass }
    }
}

/// 衰变链 A → B → C
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaChain {
    /// 组分 A 的气体索引
    pub gas_a: usize,
    /// 组分 B 的气体索引
    pub gas_b: usize,
    /// 组分 C 的气体索引
    pub gas_c: usize,
    /// A→B 衰变速率（无量纲）
    pub lambda1: f64,
    /// B→C 衰变速率（无量纲）
    pub lambda2: f64,
}

impl From<&BetaChainConfig> for BetaChain {
    fn from(config: &BetaChainConfig) -> Self {
        Self {
            gas_a: config.gas_a,
            gas_b: config.gas_b,
            gas_c: config.gas_c,
            lambda1: config.lambda1,
            lambda2: config.lambda2,
        }
    }
}

/// 单元种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// 普通计算单元，参与所有相位与宏观量提取
    #[default]
    Normal,
    /// 边界数据载体（ghost），参与半步/全步相位但不参与提取
    Ghost,
    /// 分区边缘的远端镜像，值由分区同步写入，本地一律跳过
    ParallelGhost,
}

impl CellKind {
    /// 是否参与本地计算相位
    #[inline]
    pub fn is_active(self) -> bool {
        !matches!(self, CellKind::ParallelGhost)
    }
}

/// 边界条件族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryKind {
    /// 漫反射壁：入射通量按壁温 Maxwell 分布重新发射，净质量通量为零
    #[default]
    Diffuse,
    /// 定压入口：按目标压强/温度/漂移速度发射，压强为零时退化为真空
    Pressure,
    /// 镜面反射：逐采样点沿法向反号
    Mirror,
    /// 定流量入口：发射通量归一到目标动量通量
    Flow,
}

/// 单个气体组分在某单元上的边界参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySpec {
    /// 边界条件族
    pub kind: BoundaryKind,
    /// 壁面/入口温度
    pub temperature: f64,
    /// 入口压强（仅 Pressure 使用；0 表示真空）
    pub pressure: f64,
    /// 目标流量矢量（Pressure 用作漂移，Flow 用作动量通量目标）
    pub flow: DVec3,
}

impl Default for BoundarySpec {
    fn default() -> Self {
        Self {
            kind: BoundaryKind::Diffuse,
            temperature: 1.0,
            pressure: 1.0,
            flow: DVec3::ZERO,
        }
    }
}

/// 单个气体组分在某单元上的物理参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasNodeParams {
    /// 初始温度（Maxwell 初始化用）
    pub temperature: f64,
    /// 初始压强（Maxwell 初始化用）
    pub pressure: f64,
    /// 边界参数（仅当单元被分类为 Left/Right 时生效）
    pub boundary: BoundarySpec,
}

impl Default for GasNodeParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            pressure: 1.0,
            boundary: BoundarySpec::default(),
        }
    }
}

/// 单元的全部物理参数（逐气体组分）
#[derive(Debug, Clone, PartialEq)]
pub struct CellPhysics {
    gases: Vec<GasNodeParams>,
}

impl CellPhysics {
    /// 按组分数创建缺省参数
    pub fn uniform(gas_count: usize) -> Self {
        Self {
            gases: vec![GasNodeParams::default(); gas_count],
        }
    }

    /// 组分数量
    #[inline]
    pub fn gas_count(&self) -> usize {
        self.gases.len()
    }

    /// 某组分的参数
    #[inline]
    pub fn gas(&self, gi: usize) -> &GasNodeParams {
        &self.gases[gi]
    }

    /// 某组分参数的可变引用（构建期使用）
    #[inline]
    pub fn gas_mut(&mut self, gi: usize) -> &mut GasNodeParams {
        &mut self.gases[gi]
    }
}
