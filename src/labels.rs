// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/labels.rs - 类别标签表
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

use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LabelError {
  #[error("无法读取标签文件: {0}")]
  Missing(#[from] std::io::Error),
  #[error("标签文件为空")]
  Empty,
}

/// 有序的类别标签表，下标即类别编号。
#[derive(Debug, Clone)]
pub struct ClassLabels {
  labels: Vec<String>,
}

impl ClassLabels {
  /// 从文本文件加载，每行一个标签，空行忽略。
  pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelError> {
    let content = std::fs::read_to_string(path)?;
    let labels: Vec<String> = content
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(str::to_string)
      .collect();
    Self::from_vec(labels)
  }

  pub fn from_vec(labels: Vec<String>) -> Result<Self, LabelError> {
    if labels.is_empty() {
      return Err(LabelError::Empty);
    }
    Ok(Self { labels })
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  pub fn name(&self, class_id: usize) -> &str {
    self
      .labels
      .get(class_id)
      .map(String::as_str)
      .unwrap_or("unknown")
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.labels.iter().map(String::as_str)
  }

  /// 启动时打印该网络可识别的目标清单
  pub fn announce(&self) {
    info!("该网络可识别以下 {} 类目标:", self.len());
    for (id, name) in self.iter().enumerate() {
      info!("  [{}] {}", id, name);
    }
  }
}
