// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/detector/mod.rs - 检测结果类型
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

mod decoder;
mod nms;

pub use decoder::{DecodeError, decode};
pub use nms::suppress;

/// 检测器空间中的边界框（左上角 + 宽高，浮点坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl BBox {
  pub fn area(&self) -> f32 {
    self.width * self.height
  }
}

/// 原始帧空间中的边界框（整数像素坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

/// 解码得到的未过滤候选，仅存活于单帧处理期间
#[derive(Debug, Clone)]
pub struct Candidate {
  pub class_id: usize,
  pub confidence: f32,
  pub bbox: BBox,
}

/// 抑制并缩放后的检测结果，对外可报告的单位
#[derive(Debug, Clone)]
pub struct Detection {
  pub class_id: usize,
  pub confidence: f32,
  pub bbox: PixelBox,
}

/// 两个边界框的交并比
pub fn iou(a: &BBox, b: &BBox) -> f32 {
  let x1 = a.x.max(b.x);
  let y1 = a.y.max(b.y);
  let x2 = (a.x + a.width).min(b.x + b.width);
  let y2 = (a.y + a.height).min(b.y + b.height);

  let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
  let union = a.area() + b.area() - intersection;

  if union > 0.0 { intersection / union } else { 0.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn iou_of_disjoint_boxes_is_zero() {
    let a = BBox {
      x: 0.0,
      y: 0.0,
      width: 10.0,
      height: 10.0,
    };
    let b = BBox {
      x: 20.0,
      y: 20.0,
      width: 10.0,
      height: 10.0,
    };
    assert_eq!(iou(&a, &b), 0.0);
  }

  #[test]
  fn iou_of_identical_boxes_is_one() {
    let a = BBox {
      x: 5.0,
      y: 5.0,
      width: 8.0,
      height: 8.0,
    };
    assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
  }

  #[test]
  fn iou_of_half_overlap() {
    let a = BBox {
      x: 0.0,
      y: 0.0,
      width: 10.0,
      height: 10.0,
    };
    let b = BBox {
      x: 5.0,
      y: 0.0,
      width: 10.0,
      height: 10.0,
    };
    // 交 50，并 150
    assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
  }
}
