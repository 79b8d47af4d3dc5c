// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/model/mod.rs - 模型接口定义
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

mod tensor_file;

pub use tensor_file::{TensorFileBackend, TensorFileError};

use image::RgbImage;

/// 检测网络一次前向传播的原始输出。
///
/// 平铺的浮点序列，逻辑上是 `rows × dims` 的表，
/// `dims = 5 + 类别数`。对核心流水线只读。
#[derive(Debug, Clone)]
pub struct RawScoreTensor {
  pub data: Vec<f32>,
  pub rows: usize,
  pub dims: usize,
}

impl RawScoreTensor {
  pub fn element_count(&self) -> usize {
    self.data.len()
  }
}

/// 推理后端。
///
/// 前向传播本身是不透明的外部协作方，本库只消费其输出张量。
/// 输入为信箱填充后的方形画布；后端自行负责缩放到网络输入尺寸。
pub trait Network {
  type Error: std::error::Error + Send + Sync + 'static;

  fn forward(&mut self, canvas: &RgbImage) -> Result<RawScoreTensor, Self::Error>;
}
