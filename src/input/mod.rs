// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/input/mod.rs - 输入源模块
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

mod frame_dir_source;
mod image_source;

pub use frame_dir_source::FrameDirSource;
pub use image_source::ImageSource;

use anyhow::{Result, bail};

use crate::frame::Frame;

/// 输入源类型
pub enum FrameSourceType {
  /// 单张图片
  Image,
  /// 逐帧图片目录（预先抽帧的视频）
  FrameDir,
}

/// 帧来源：有限、有序的帧序列，迭代结束即流结束。
pub trait FrameSource: Iterator<Item = Result<Frame>> {
  /// 获取输入源类型
  fn source_type(&self) -> FrameSourceType;

  /// 获取帧宽度
  fn width(&self) -> u32;

  /// 获取帧高度
  fn height(&self) -> u32;

  /// 获取帧率（如果适用）
  fn fps(&self) -> Option<f64>;
}

/// 从路径创建输入源。
///
/// 目录视为逐帧图片序列；图片扩展名视为单帧输入。
/// 视频文件请先抽帧为图片目录，解码不在本库范围内。
pub fn create_frame_source(source: &str) -> Result<Box<dyn FrameSource>> {
  let path = std::path::Path::new(source);
  if path.is_dir() {
    return Ok(Box::new(FrameDirSource::new(path)?));
  }

  let lower = source.to_lowercase();
  if lower.ends_with(".jpg")
    || lower.ends_with(".jpeg")
    || lower.ends_with(".png")
    || lower.ends_with(".bmp")
  {
    return Ok(Box::new(ImageSource::new(source)?));
  }

  bail!("无法识别的输入源: {} (视频请先抽帧为图片目录)", source)
}
