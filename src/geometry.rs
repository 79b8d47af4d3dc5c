// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/geometry.rs - 几何变换与坐标缩放
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

use image::RgbImage;
use thiserror::Error;

use crate::detector::{Candidate, Detection, PixelBox};

#[derive(Error, Debug)]
pub enum GeometryError {
  #[error("无效帧: 宽 {width} 高 {height}")]
  InvalidFrame { width: u32, height: u32 },
}

/// 一帧的缩放因子，由信箱填充步骤导出。
///
/// 不变量: `padded_size == max(original_width, original_height)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleFactor {
  /// 方形画布边长
  pub padded_size: u32,
  /// 原始帧宽度
  pub original_width: u32,
  /// 原始帧高度
  pub original_height: u32,
}

impl ScaleFactor {
  /// 检测器空间坐标映射回原始帧空间所需的缩放比
  pub fn ratio(&self, input_side: u32) -> f32 {
    self.padded_size as f32 / input_side as f32
  }
}

/// 把任意尺寸的帧填充为方形画布。
///
/// 画布边长取宽高较大者，原图拷贝到左上角，其余部分填零。
/// 宽高相等时填充等价于拷贝。空帧直接报错，该帧不产生任何输出。
pub fn letterbox(image: &RgbImage) -> Result<(RgbImage, ScaleFactor), GeometryError> {
  let (width, height) = image.dimensions();
  if width == 0 || height == 0 {
    return Err(GeometryError::InvalidFrame { width, height });
  }

  let side = width.max(height);
  let scale = ScaleFactor {
    padded_size: side,
    original_width: width,
    original_height: height,
  };

  if width == height {
    return Ok((image.clone(), scale));
  }

  let mut canvas = RgbImage::new(side, side);
  image::imageops::replace(&mut canvas, image, 0, 0);
  Ok((canvas, scale))
}

/// 把抑制后的候选框从检测器空间映射回原始帧空间。
///
/// 取整策略固定为: 左上角坐标先钳到 0 再向零截断，宽高直接向零截断。
/// 因此每条边最多偏差一个像素；越过帧右/下边界的框是允许的结果，
/// 裁剪交由下游消费方处理。
pub fn rescale(candidate: &Candidate, scale: &ScaleFactor, input_side: u32) -> Detection {
  let ratio = scale.ratio(input_side);
  Detection {
    class_id: candidate.class_id,
    confidence: candidate.confidence,
    bbox: PixelBox {
      x: (candidate.bbox.x * ratio).max(0.0) as u32,
      y: (candidate.bbox.y * ratio).max(0.0) as u32,
      width: (candidate.bbox.width * ratio).max(0.0) as u32,
      height: (candidate.bbox.height * ratio).max(0.0) as u32,
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::detector::BBox;

  #[test]
  fn letterbox_pads_to_longer_side() {
    let image = RgbImage::new(640, 480);
    let (canvas, scale) = letterbox(&image).unwrap();
    assert_eq!(canvas.dimensions(), (640, 640));
    assert_eq!(scale.padded_size, 640);
    assert_eq!(scale.original_width, 640);
    assert_eq!(scale.original_height, 480);
  }

  #[test]
  fn letterbox_copies_pixels_into_top_left() {
    let mut image = RgbImage::new(4, 2);
    image.put_pixel(3, 1, image::Rgb([200, 100, 50]));
    let (canvas, _) = letterbox(&image).unwrap();
    assert_eq!(canvas.get_pixel(3, 1), &image::Rgb([200, 100, 50]));
    // 填充区保持为零
    assert_eq!(canvas.get_pixel(0, 3), &image::Rgb([0, 0, 0]));
  }

  #[test]
  fn letterbox_square_frame_is_noop() {
    let image = RgbImage::new(64, 64);
    let (canvas, scale) = letterbox(&image).unwrap();
    assert_eq!(canvas.dimensions(), (64, 64));
    assert_eq!(scale.ratio(64), 1.0);
  }

  #[test]
  fn letterbox_rejects_empty_frame() {
    let image = RgbImage::new(0, 0);
    assert!(matches!(
      letterbox(&image),
      Err(GeometryError::InvalidFrame { .. })
    ));
  }

  #[test]
  fn rescale_identity_under_unit_ratio() {
    // 方形帧且画布边长等于检测器输入边长时，框映射回自身
    let scale = ScaleFactor {
      padded_size: 640,
      original_width: 640,
      original_height: 640,
    };
    let candidate = Candidate {
      class_id: 1,
      confidence: 0.8,
      bbox: BBox {
        x: 300.0,
        y: 300.0,
        width: 40.0,
        height: 40.0,
      },
    };
    let detection = rescale(&candidate, &scale, 640);
    assert_eq!(detection.bbox.x, 300);
    assert_eq!(detection.bbox.y, 300);
    assert_eq!(detection.bbox.width, 40);
    assert_eq!(detection.bbox.height, 40);
  }

  #[test]
  fn rescale_clamps_negative_corner_to_zero() {
    let scale = ScaleFactor {
      padded_size: 1280,
      original_width: 1280,
      original_height: 720,
    };
    let candidate = Candidate {
      class_id: 0,
      confidence: 0.5,
      bbox: BBox {
        x: -3.0,
        y: 1.0,
        width: 10.0,
        height: 10.0,
      },
    };
    let detection = rescale(&candidate, &scale, 640);
    assert_eq!(detection.bbox.x, 0);
    assert_eq!(detection.bbox.y, 2);
    assert_eq!(detection.bbox.width, 20);
  }
}
