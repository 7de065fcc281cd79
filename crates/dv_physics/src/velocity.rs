// crates/dv_physics/src/velocity.rs

//! 速度网格
//!
//! 所有单元、所有气体组分共享同一套三维动量采样：以原点为中心的
//! 立方格，每轴 `resolution` 个点，分量截断于 `[-max, +max]`。
//! 采样点不含零分量（半格偏移），因此每个采样点沿任意轴都有唯一的
//! 镜像采样点，反射索引是严格的对合。

use glam::DVec3;

use dv_config::VelocityGridConfig;
use dv_foundation::{DvError, DvResult};

/// 共享动量采样网格
#[derive(Debug, Clone)]
pub struct VelocityGrid {
    resolution: usize,
    max_momentum: f64,
    /// 逐轴坐标，按构造保证 coords[n-1-k] == -coords[k] 位级相等
    coords: Vec<f64>,
    samples: Vec<DVec3>,
    delta: f64,
}

impl VelocityGrid {
    /// 由配置构建速度网格
    ///
    /// 分辨率必须为正偶数（配置层已验证，此处再做防御性检查）。
    pub fn new(config: &VelocityGridConfig) -> DvResult<Self> {
        let n = config.resolution;
        if n == 0 || n % 2 != 0 {
            return Err(DvError::config(format!(
                "速度网格分辨率必须为正偶数，当前为 {}",
                n
            )));
        }
        if config.max_momentum <= 0.0 {
            return Err(DvError::config(format!(
                "动量截断半径必须为正，当前为 {}",
                config.max_momentum
            )));
        }

        let delta = 2.0 * config.max_momentum / n as f64;

        // 只计算正半轴，负半轴取严格相反数，保证镜像坐标位级对称
        let mut coords = vec![0.0; n];
        for j in 0..n / 2 {
            let c = delta * (j as f64 + 0.5);
            coords[n / 2 + j] = c;
            coords[n / 2 - 1 - j] = -c;
        }

        let mut samples = Vec::with_capacity(n * n * n);
        for iz in 0..n {
            for iy in 0..n {
                for ix in 0..n {
                    samples.push(DVec3::new(coords[ix], coords[iy], coords[iz]));
                }
            }
        }

        Ok(Self {
            resolution: n,
            max_momentum: config.max_momentum,
            coords,
            samples,
            delta,
        })
    }

    /// 每轴采样点数
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// 动量截断半径
    #[inline]
    pub fn max_momentum(&self) -> f64 {
        self.max_momentum
    }

    /// 采样点总数（resolution 的立方）
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// 采样点总数是否为零（构造成功后恒为假）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 全部采样点
    #[inline]
    pub fn samples(&self) -> &[DVec3] {
        &self.samples
    }

    /// 第 ii 个采样点
    #[inline]
    pub fn sample(&self, ii: usize) -> DVec3 {
        self.samples[ii]
    }

    /// 相邻采样点间距
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// 求积体元 delta^3（所有矩与归一化求和共用）
    #[inline]
    pub fn delta_volume(&self) -> f64 {
        self.delta * self.delta * self.delta
    }

    /// 逐轴坐标
    #[inline]
    pub fn axis_coords(&self) -> &[f64] {
        &self.coords
    }

    /// 沿某空间轴翻转采样点下标（镜面反射查找）
    ///
    /// 对合性质：`reverse_index(reverse_index(ii, a), a) == ii`，
    /// 且镜像采样点与原采样点的动量模长位级相等。
    #[inline]
    pub fn reverse_index(&self, ii: usize, axis: usize) -> usize {
        let n = self.resolution;
        let ix = ii % n;
        let iy = (ii / n) % n;
        let iz = ii / (n * n);
        match axis {
            0 => (iz * n + iy) * n + (n - 1 - ix),
            1 => (iz * n + (n - 1 - iy)) * n + ix,
            _ => ((n - 1 - iz) * n + iy) * n + ix,
        }
    }

    /// Maxwell 权重 exp(-|p|² / (2 m T))
    #[inline]
    pub fn maxwell_weight(mass: f64, temperature: f64, momentum: DVec3) -> f64 {
        (-momentum.length_squared() / (2.0 * mass * temperature)).exp()
    }

    /// 碰撞积分的采样半径（每轴半分辨率）
    #[inline]
    pub fn collision_radius(&self) -> usize {
        self.resolution / 2
    }

    /// 碰撞积分的截断距离
    #[inline]
    pub fn collision_cutoff(&self) -> f64 {
        self.max_momentum / (self.resolution / 2) as f64
    }
}
