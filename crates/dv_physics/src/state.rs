// crates/dv_physics/src/state.rs

//! 分布函数状态（SoA 布局）
//!
//! 每种气体两块连续平铺数组：全步分布 `values` 与半步通量 `half`，
//! 均按 `cell * sample_count + sample` 索引。平铺布局使 rayon 按
//! 单元分块（`par_chunks_mut`）时天然无别名。

use dv_foundation::{DvError, DvResult};

/// 单种气体的场数据
#[derive(Debug, Clone)]
pub struct GasField {
    /// 全步分布函数
    pub values: Vec<f64>,
    /// 半步通量（每轴扫描前由半步相位重写）
    pub half: Vec<f64>,
}

impl GasField {
    fn zeroed(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
            half: vec![0.0; len],
        }
    }
}

/// 全部气体的分布状态
#[derive(Debug, Clone)]
pub struct DistributionState {
    cell_count: usize,
    sample_count: usize,
    fields: Vec<GasField>,
}

impl DistributionState {
    /// 创建全零状态
    pub fn new(gas_count: usize, cell_count: usize, sample_count: usize) -> Self {
        let len = cell_count * sample_count;
        Self {
            cell_count,
            sample_count,
            fields: (0..gas_count).map(|_| GasField::zeroed(len)).collect(),
        }
    }

    /// 气体组分数量
    #[inline]
    pub fn gas_count(&self) -> usize {
        self.fields.len()
    }

    /// 单元数量
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// 每单元采样点数量
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// 单元在平铺数组中的起始偏移
    #[inline]
    pub fn base(&self, cell: usize) -> usize {
        cell * self.sample_count
    }

    /// 某气体的场数据
    #[inline]
    pub fn field(&self, gi: usize) -> &GasField {
        &self.fields[gi]
    }

    /// 某气体场数据的可变引用
    #[inline]
    pub fn field_mut(&mut self, gi: usize) -> &mut GasField {
        &mut self.fields[gi]
    }

    /// 某气体在某单元的分布切片
    #[inline]
    pub fn values(&self, gi: usize, cell: usize) -> &[f64] {
        let base = self.base(cell);
        &self.fields[gi].values[base..base + self.sample_count]
    }

    /// 某气体在某单元的分布切片（可变）
    #[inline]
    pub fn values_mut(&mut self, gi: usize, cell: usize) -> &mut [f64] {
        let base = self.base(cell);
        let ns = self.sample_count;
        &mut self.fields[gi].values[base..base + ns]
    }

    /// 某气体在某单元的半步切片
    #[inline]
    pub fn half(&self, gi: usize, cell: usize) -> &[f64] {
        let base = self.base(cell);
        &self.fields[gi].half[base..base + self.sample_count]
    }

    /// 两种不同气体场的分离可变借用
    ///
    /// 衰变链与异种碰撞对需要同时改写两种气体的分布。
    pub fn fields_pair_mut(&mut self, a: usize, b: usize) -> DvResult<(&mut GasField, &mut GasField)> {
        if a == b {
            return Err(DvError::internal(format!("气体对借用要求不同组分，得到 ({}, {})", a, b)));
        }
        let count = self.fields.len();
        if a >= count || b >= count {
            return Err(DvError::index_out_of_bounds("gas", a.max(b), count));
        }
        if a < b {
            let (lo, hi) = self.fields.split_at_mut(b);
            Ok((&mut lo[a], &mut hi[0]))
        } else {
            let (lo, hi) = self.fields.split_at_mut(a);
            Ok((&mut hi[0], &mut lo[b]))
        }
    }
}
