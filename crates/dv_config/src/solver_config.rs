// crates/dv_config/src/solver_config.rs

//! SolverConfig - 求解器配置（全 f64）
//!
//! 定义求解器的所有配置参数。所有数值使用 f64 存储以便 JSON 序列化。
//! `validate()` 在迭代循环开始前执行，配置不一致在此处全部致命化，
//! 运行期不再出现配置类错误。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::normalization::Normalization;

/// 求解器配置（全 f64）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 无量纲时间步长
    #[serde(default = "default_timestep")]
    pub timestep: f64,

    /// 最大迭代次数（固定步数，无收敛提前退出）
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// 速度网格配置
    #[serde(default)]
    pub velocity_grid: VelocityGridConfig,

    /// 气体组分列表（至少一种）
    #[serde(default = "default_gases")]
    pub gases: Vec<GasConfig>,

    /// 是否启用二元碰撞积分
    #[serde(default)]
    pub use_collision_integral: bool,

    /// 衰变链列表（可为空）
    #[serde(default)]
    pub beta_chains: Vec<BetaChainConfig>,

    /// 归一化基准
    #[serde(default)]
    pub normalization: Normalization,

    /// 并行阈值：活动单元数低于该值时转为串行扫描
    #[serde(default = "default_min_parallel_cells")]
    pub min_parallel_cells: usize,

    /// 进度日志间隔（迭代数）：主分区每隔该步数输出一次进度
    #[serde(default = "default_report_interval")]
    pub report_interval: usize,
}

fn default_timestep() -> f64 {
    0.01
}
fn default_max_iterations() -> usize {
    1000
}
fn default_gases() -> Vec<GasConfig> {
    vec![GasConfig { mass: 1.0 }]
}
fn default_min_parallel_cells() -> usize {
    256
}
fn default_report_interval() -> usize {
    1
}

/// 速度网格配置
///
/// 速度空间为以原点为中心的立方格，每轴 `resolution` 个采样点，
/// 动量分量截断于 `[-max_momentum, +max_momentum]`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VelocityGridConfig {
    /// 每轴采样点数（必须为正偶数，保证镜面反射下采样点成对）
    pub resolution: usize,
    /// 动量截断半径
    pub max_momentum: f64,
}

impl Default for VelocityGridConfig {
    fn default() -> Self {
        Self {
            resolution: 20,
            max_momentum: 4.8,
        }
    }
}

/// 单种气体的配置
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GasConfig {
    /// 无量纲分子质量
    pub mass: f64,
}

/// 衰变链配置
///
/// 有序三元组 (A, B, C)：A 以速率 `lambda1` 衰变为 B，
/// B 以速率 `lambda2` 衰变为 C。速率为无量纲（已乘 tau）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BetaChainConfig {
    /// 组分 A 的气体索引
    pub gas_a: usize,
    /// 组分 B 的气体索引
    pub gas_b: usize,
    /// 组分 C 的气体索引
    pub gas_c: usize,
    /// A→B 衰变速率
    pub lambda1: f64,
    /// B→C 衰变速率
    pub lambda2: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timestep: default_timestep(),
            max_iterations: default_max_iterations(),
            velocity_grid: VelocityGridConfig::default(),
            gases: default_gases(),
            use_collision_integral: false,
            beta_chains: Vec::new(),
            normalization: Normalization::default(),
            min_parallel_cells: default_min_parallel_cells(),
            report_interval: default_report_interval(),
        }
    }
}

impl SolverConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;

        let config: SolverConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    ///
    /// 包含衰变稳定性前提 `lambda * dt < 1` 的检查：该前提在运行期
    /// 不做任何钳制，只在此处致命化。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timestep <= 0.0 {
            return Err(ConfigError::invalid(
                "timestep",
                self.timestep,
                "时间步长必须为正",
            ));
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::invalid(
                "max_iterations",
                self.max_iterations,
                "迭代次数必须为正",
            ));
        }

        if self.velocity_grid.resolution == 0 {
            return Err(ConfigError::invalid(
                "velocity_grid.resolution",
                self.velocity_grid.resolution,
                "速度网格分辨率不能为零",
            ));
        }
        if self.velocity_grid.resolution % 2 != 0 {
            return Err(ConfigError::invalid(
                "velocity_grid.resolution",
                self.velocity_grid.resolution,
                "分辨率必须为偶数，镜面边界要求采样点关于原点成对",
            ));
        }
        if self.velocity_grid.max_momentum <= 0.0 {
            return Err(ConfigError::invalid(
                "velocity_grid.max_momentum",
                self.velocity_grid.max_momentum,
                "动量截断半径必须为正",
            ));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::invalid(
                "report_interval",
                self.report_interval,
                "进度日志间隔必须为正",
            ));
        }

        if self.gases.is_empty() {
            return Err(ConfigError::Missing("gases".to_string()));
        }
        for (gi, gas) in self.gases.iter().enumerate() {
            if gas.mass <= 0.0 {
                return Err(ConfigError::invalid(
                    "gases.mass",
                    gas.mass,
                    format!("气体 {} 的质量必须为正", gi),
                ));
            }
        }

        for (ci, chain) in self.beta_chains.iter().enumerate() {
            for (name, gi) in [
                ("gas_a", chain.gas_a),
                ("gas_b", chain.gas_b),
                ("gas_c", chain.gas_c),
            ] {
                if gi >= self.gases.len() {
                    return Err(ConfigError::invalid(
                        "beta_chains",
                        gi,
                        format!("衰变链 {} 的 {} 超出气体数量 {}", ci, name, self.gases.len()),
                    ));
                }
            }
            if chain.gas_a == chain.gas_b || chain.gas_b == chain.gas_c {
                return Err(ConfigError::invalid(
                    "beta_chains",
                    ci,
                    "衰变链的相邻组分必须互不相同",
                ));
            }
            for (name, lambda) in [("lambda1", chain.lambda1), ("lambda2", chain.lambda2)] {
                if lambda < 0.0 {
                    return Err(ConfigError::invalid(
                        "beta_chains",
                        lambda,
                        format!("衰变链 {} 的 {} 不能为负", ci, name),
                    ));
                }
                // 稳定性前提：步内衰减量不得超过现存量
                if lambda * self.timestep >= 1.0 {
                    return Err(ConfigError::invalid(
                        "beta_chains",
                        lambda,
                        format!(
                            "衰变链 {} 的 {} 违反稳定性前提 lambda*dt < 1 (dt = {})",
                            ci, name, self.timestep
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// 气体组分数量
    #[inline]
    pub fn gas_count(&self) -> usize {
        self.gases.len()
    }
}
