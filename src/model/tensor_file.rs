// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/model/tensor_file.rs - 张量转储回放后端
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
use thiserror::Error;
use tracing::{debug, info};

use image::RgbImage;

use crate::model::{Network, RawScoreTensor};

#[derive(Error, Debug)]
pub enum TensorFileError {
  #[error("无法读取张量目录: {0}")]
  Missing(std::io::Error),
  #[error("张量目录为空: {0}")]
  EmptyDirectory(PathBuf),
  #[error("张量文件读取失败: {path}: {source}")]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("张量文件 {path} 大小不匹配: 期望 {expected} 个元素, 实际 {actual}")]
  SizeMismatch {
    path: PathBuf,
    expected: usize,
    actual: usize,
  },
  #[error("张量文件已耗尽, 第 {0} 帧之后没有更多输出")]
  Exhausted(usize),
}

/// 回放离线推理产生的逐帧张量转储。
///
/// 目录下每个 `.bin` 文件是一帧的前向输出，小端 `f32` 平铺存储，
/// 按文件名排序与帧顺序对应。画布像素在这里被忽略——
/// 真正的前向传播已在外部完成。
pub struct TensorFileBackend {
  files: Vec<PathBuf>,
  cursor: usize,
  rows: usize,
  dims: usize,
}

impl TensorFileBackend {
  pub fn new(dir: impl AsRef<Path>, rows: usize, dims: usize) -> Result<Self, TensorFileError> {
    let entries = std::fs::read_dir(dir.as_ref()).map_err(TensorFileError::Missing)?;

    let mut files: Vec<PathBuf> = entries
      .filter_map(|entry| entry.ok().map(|e| e.path()))
      .filter(|path| path.extension().is_some_and(|ext| ext == "bin"))
      .collect();
    files.sort();

    if files.is_empty() {
      return Err(TensorFileError::EmptyDirectory(dir.as_ref().to_path_buf()));
    }

    info!("张量目录载入 {} 个转储文件", files.len());
    Ok(Self {
      files,
      cursor: 0,
      rows,
      dims,
    })
  }

  pub fn remaining(&self) -> usize {
    self.files.len() - self.cursor
  }

  fn read_tensor(&self, path: &Path) -> Result<RawScoreTensor, TensorFileError> {
    let bytes = std::fs::read(path).map_err(|source| TensorFileError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let expected = self.rows * self.dims;
    if bytes.len() != expected * size_of::<f32>() {
      return Err(TensorFileError::SizeMismatch {
        path: path.to_path_buf(),
        expected,
        actual: bytes.len() / size_of::<f32>(),
      });
    }

    let data = bytes
      .chunks_exact(size_of::<f32>())
      .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
      .collect();

    Ok(RawScoreTensor {
      data,
      rows: self.rows,
      dims: self.dims,
    })
  }
}

impl Network for TensorFileBackend {
  type Error = TensorFileError;

  fn forward(&mut self, _canvas: &RgbImage) -> Result<RawScoreTensor, Self::Error> {
    let path = self
      .files
      .get(self.cursor)
      .ok_or(TensorFileError::Exhausted(self.cursor))?;
    debug!("回放张量: {}", path.display());
    let tensor = self.read_tensor(path)?;
    self.cursor += 1;
    Ok(tensor)
  }
}
