// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/record/mod.rs - 运行记录
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

mod json_record;
mod text_record;

pub use json_record::JsonRecorder;
pub use text_record::TextRecorder;

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
  #[error("记录文件写入失败: {0}")]
  Io(#[from] std::io::Error),
  #[error("记录序列化失败: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// 单帧的类别直方图，下标即类别编号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHistogram {
  counts: Vec<u32>,
}

impl ClassHistogram {
  pub fn new(num_classes: usize) -> Self {
    Self {
      counts: vec![0; num_classes],
    }
  }

  pub fn bump(&mut self, class_id: usize) {
    debug_assert!(class_id < self.counts.len());
    if let Some(count) = self.counts.get_mut(class_id) {
      *count += 1;
    }
  }

  pub fn counts(&self) -> &[u32] {
    &self.counts
  }

  pub fn total(&self) -> u32 {
    self.counts.iter().sum()
  }
}

/// 一帧的外部可见结果。
///
/// 帧内错误被隔离在这里：出错的帧记为零检测并带上错误说明，
/// 运行本身继续。
#[derive(Debug, Clone)]
pub struct FrameRecord {
  pub frame_index: u64,
  pub detections: usize,
  pub elapsed_micros: u64,
  pub error: Option<String>,
}

impl FrameRecord {
  pub fn ok(frame_index: u64, detections: usize, elapsed_micros: u64) -> Self {
    Self {
      frame_index,
      detections,
      elapsed_micros,
      error: None,
    }
  }

  pub fn failed(frame_index: u64, elapsed_micros: u64, error: String) -> Self {
    Self {
      frame_index,
      detections: 0,
      elapsed_micros,
      error: Some(error),
    }
  }
}

/// 整个运行期间只追加的帧记录表。
#[derive(Debug, Default)]
pub struct RunMetrics {
  records: Vec<FrameRecord>,
}

impl RunMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, record: FrameRecord) {
    self.records.push(record);
  }

  pub fn records(&self) -> &[FrameRecord] {
    &self.records
  }

  pub fn processed(&self) -> u64 {
    self.records.iter().filter(|r| r.error.is_none()).count() as u64
  }

  pub fn skipped(&self) -> u64 {
    self.records.iter().filter(|r| r.error.is_some()).count() as u64
  }
}

/// 结果落地端。
///
/// 约定：只追加、按帧序号顺序、每帧一条，绝不丢弃或乱序；
/// 逐帧写出，运行结束时统一冲刷。
pub trait Recorder {
  fn record(&mut self, record: &FrameRecord) -> Result<(), RecordError>;
  fn finish(&mut self, metrics: &RunMetrics) -> Result<(), RecordError>;
}

impl<R: Recorder + ?Sized> Recorder for &mut R {
  fn record(&mut self, record: &FrameRecord) -> Result<(), RecordError> {
    (**self).record(record)
  }

  fn finish(&mut self, metrics: &RunMetrics) -> Result<(), RecordError> {
    (**self).finish(metrics)
  }
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
  fn record(&mut self, record: &FrameRecord) -> Result<(), RecordError> {
    (**self).record(record)
  }

  fn finish(&mut self, metrics: &RunMetrics) -> Result<(), RecordError> {
    (**self).finish(metrics)
  }
}

/// 留存在内存中的记录端，测试与下游内嵌使用
#[derive(Debug, Default)]
pub struct MemoryRecorder {
  pub records: Vec<FrameRecord>,
}

impl MemoryRecorder {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Recorder for MemoryRecorder {
  fn record(&mut self, record: &FrameRecord) -> Result<(), RecordError> {
    self.records.push(record.clone());
    Ok(())
  }

  fn finish(&mut self, _metrics: &RunMetrics) -> Result<(), RecordError> {
    Ok(())
  }
}

/// 按扩展名选择记录端：`.json` 走结构化输出，其余按文本行写出
pub fn create_recorder(path: &str) -> Result<Box<dyn Recorder>, RecordError> {
  if path.to_lowercase().ends_with(".json") {
    Ok(Box::new(JsonRecorder::create(Path::new(path))?))
  } else {
    Ok(Box::new(TextRecorder::create(Path::new(path))?))
  }
}
