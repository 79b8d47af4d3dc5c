// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/frame.rs - 帧定义
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

use image::{GrayImage, RgbImage};

/// 一帧图像。
///
/// 序号在一次运行内单调递增，帧一旦交给流水线就不再修改。
#[derive(Debug, Clone)]
pub struct Frame {
  /// RGB 像素数据
  pub image: RgbImage,
  /// 帧序号
  pub index: u64,
  /// 时间戳（毫秒）
  pub timestamp_ms: u64,
}

impl Frame {
  pub fn new(image: RgbImage, index: u64) -> Self {
    Self {
      image,
      index,
      timestamp_ms: 0,
    }
  }

  pub fn width(&self) -> u32 {
    self.image.width()
  }

  pub fn height(&self) -> u32 {
    self.image.height()
  }

  /// 帧是否为空（任一边长为 0）
  pub fn is_empty(&self) -> bool {
    self.image.width() == 0 || self.image.height() == 0
  }

  /// 转为灰度图，供模板匹配路径使用
  pub fn to_gray(&self) -> GrayImage {
    image::imageops::grayscale(&self.image)
  }
}
