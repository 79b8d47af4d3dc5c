// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/input/frame_dir_source.rs - 帧目录输入源
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

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::ImageReader;
use tracing::info;

use super::{FrameSource, FrameSourceType};
use crate::frame::Frame;

const FRAME_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// 逐帧图片目录输入源。
///
/// 视频预先抽帧为按文件名排序的图片序列，逐个解码成帧，
/// 帧序号即排序后的位置。帧按需加载，不会整段视频驻留内存。
pub struct FrameDirSource {
  /// 排序后的帧文件
  files: Vec<PathBuf>,
  /// 下一帧的位置
  cursor: usize,
  /// 帧宽度（取自首帧）
  width: u32,
  /// 帧高度（取自首帧）
  height: u32,
}

impl FrameDirSource {
  /// 创建一个新的帧目录输入源
  pub fn new(dir: &Path) -> Result<Self> {
    let entries = std::fs::read_dir(dir)
      .with_context(|| format!("无法读取帧目录: {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
      .filter_map(|entry| entry.ok().map(|e| e.path()))
      .filter(|path| {
        path
          .extension()
          .and_then(|ext| ext.to_str())
          .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
      })
      .collect();
    files.sort();

    if files.is_empty() {
      bail!("帧目录中没有图片: {}", dir.display());
    }

    let (width, height) = ImageReader::open(&files[0])
      .with_context(|| format!("无法打开首帧: {}", files[0].display()))?
      .into_dimensions()
      .with_context(|| format!("无法读取首帧尺寸: {}", files[0].display()))?;

    info!("帧目录载入 {} 帧, 尺寸 {}x{}", files.len(), width, height);

    Ok(Self {
      files,
      cursor: 0,
      width,
      height,
    })
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

impl Iterator for FrameDirSource {
  type Item = Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    let path = self.files.get(self.cursor)?;
    let index = self.cursor as u64;
    self.cursor += 1;

    let result = ImageReader::open(path)
      .with_context(|| format!("无法打开帧文件: {}", path.display()))
      .and_then(|reader| {
        reader
          .decode()
          .with_context(|| format!("无法解码帧文件: {}", path.display()))
      })
      .map(|image| Frame::new(image.to_rgb8(), index));

    Some(result)
  }
}

impl FrameSource for FrameDirSource {
  fn source_type(&self) -> FrameSourceType {
    FrameSourceType::FrameDir
  }

  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }

  fn fps(&self) -> Option<f64> {
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::RgbImage;

  #[test]
  fn frames_come_back_in_name_order() {
    let dir = std::env::temp_dir().join("shuzhuan-frame-dir-test");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for (name, value) in [("f_002.png", 20u8), ("f_000.png", 0), ("f_001.png", 10)] {
      let mut image = RgbImage::new(2, 2);
      image.put_pixel(0, 0, image::Rgb([value, 0, 0]));
      image.save(dir.join(name)).unwrap();
    }

    let source = FrameDirSource::new(&dir).unwrap();
    assert_eq!(source.len(), 3);
    assert_eq!(source.width(), 2);

    let frames: Vec<Frame> = source.map(|f| f.unwrap()).collect();
    assert_eq!(frames.len(), 3);
    for (i, frame) in frames.iter().enumerate() {
      assert_eq!(frame.index, i as u64);
      assert_eq!(frame.image.get_pixel(0, 0)[0], (i as u8) * 10);
    }
  }

  #[test]
  fn directory_without_images_is_rejected() {
    let dir = std::env::temp_dir().join("shuzhuan-frame-dir-empty");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    assert!(FrameDirSource::new(&dir).is_err());
  }
}
