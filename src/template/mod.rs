// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/template/mod.rs - 模板匹配类型
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

mod kernel;
mod locator;

pub use kernel::{CorrelationKernel, ImageprocKernel, KernelError};
pub use locator::locate;

use std::path::Path;
use image::GrayImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
  #[error("无法加载模板图案: {0}")]
  Missing(#[from] image::ImageError),
  #[error("未知的匹配方法: {0}")]
  UnknownMethod(String),
}

/// 度量的极性：差异型得分越低越相似，相似型得分越高越相似。
///
/// 阈值比较方向由极性决定，派生自方法本身，调用方不再各自判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
  Difference,
  Similarity,
}

/// 六种相关性度量方法，与常见的模板匹配实现一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
  Sqdiff,
  SqdiffNormed,
  Ccorr,
  CcorrNormed,
  Ccoeff,
  CcoeffNormed,
}

impl MatchMethod {
  pub fn polarity(&self) -> Polarity {
    match self {
      MatchMethod::Sqdiff | MatchMethod::SqdiffNormed => Polarity::Difference,
      MatchMethod::Ccorr
      | MatchMethod::CcorrNormed
      | MatchMethod::Ccoeff
      | MatchMethod::CcoeffNormed => Polarity::Similarity,
    }
  }

  /// 得分是否归一化到单位区间
  pub fn normed(&self) -> bool {
    matches!(
      self,
      MatchMethod::SqdiffNormed | MatchMethod::CcorrNormed | MatchMethod::CcoeffNormed
    )
  }

  pub fn name(&self) -> &'static str {
    match self {
      MatchMethod::Sqdiff => "TM_SQDIFF",
      MatchMethod::SqdiffNormed => "TM_SQDIFF_NORMED",
      MatchMethod::Ccorr => "TM_CCORR",
      MatchMethod::CcorrNormed => "TM_CCORR_NORMED",
      MatchMethod::Ccoeff => "TM_CCOEFF",
      MatchMethod::CcoeffNormed => "TM_CCOEFF_NORMED",
    }
  }

  pub fn from_name(name: &str) -> Result<Self, TemplateError> {
    match name {
      "TM_SQDIFF" => Ok(MatchMethod::Sqdiff),
      "TM_SQDIFF_NORMED" => Ok(MatchMethod::SqdiffNormed),
      "TM_CCORR" => Ok(MatchMethod::Ccorr),
      "TM_CCORR_NORMED" => Ok(MatchMethod::CcorrNormed),
      "TM_CCOEFF" => Ok(MatchMethod::Ccoeff),
      "TM_CCOEFF_NORMED" => Ok(MatchMethod::CcoeffNormed),
      other => Err(TemplateError::UnknownMethod(other.to_string())),
    }
  }
}

impl std::fmt::Display for MatchMethod {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

/// 一次运行前加载、运行期间不可变的模板图案。
#[derive(Debug, Clone)]
pub struct TemplatePattern {
  pub label: String,
  pub image: GrayImage,
  pub method: MatchMethod,
  pub threshold: f32,
}

impl TemplatePattern {
  /// 从磁盘加载灰度图案
  pub fn load(
    path: impl AsRef<Path>,
    label: impl Into<String>,
    method: MatchMethod,
    threshold: f32,
  ) -> Result<Self, TemplateError> {
    let image = image::open(path)?.to_luma8();
    Ok(Self {
      label: label.into(),
      image,
      method,
      threshold,
    })
  }
}

/// 外部相关性核产出的得分矩阵。
///
/// 行优先平铺，尺寸为 `(图宽 - 模板宽 + 1) × (图高 - 模板高 + 1)`。
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
  data: Vec<f32>,
  width: u32,
  height: u32,
}

impl ScoreMatrix {
  /// 长度不符时返回 None
  pub fn new(data: Vec<f32>, width: u32, height: u32) -> Option<Self> {
    if data.len() != (width as usize) * (height as usize) {
      return None;
    }
    Some(Self {
      data,
      width,
      height,
    })
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn get(&self, x: u32, y: u32) -> f32 {
    self.data[(y as usize) * (self.width as usize) + (x as usize)]
  }
}
