// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/record/text_record.rs - 文本行记录输出
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

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::record::{FrameRecord, RecordError, Recorder, RunMetrics};

/// 制表符分隔的逐帧文本记录。
///
/// 行格式沿用既有的数据文件约定:
/// `{数量}\tidentified objects in frame\t{帧号}\tusing\t{微秒}\tμs`，
/// 跳过的帧额外带上 `skipped: {原因}` 字段。
pub struct TextRecorder {
  writer: BufWriter<File>,
}

impl TextRecorder {
  pub fn create(path: &Path) -> Result<Self, RecordError> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }
    let writer = BufWriter::new(File::create(path)?);
    Ok(Self { writer })
  }
}

impl Recorder for TextRecorder {
  fn record(&mut self, record: &FrameRecord) -> Result<(), RecordError> {
    match &record.error {
      None => writeln!(
        self.writer,
        "{}\tidentified objects in frame\t{}\tusing\t{}\tμs",
        record.detections, record.frame_index, record.elapsed_micros
      )?,
      Some(reason) => writeln!(
        self.writer,
        "{}\tidentified objects in frame\t{}\tusing\t{}\tμs\tskipped: {}",
        record.detections, record.frame_index, record.elapsed_micros, reason
      )?,
    }
    Ok(())
  }

  fn finish(&mut self, metrics: &RunMetrics) -> Result<(), RecordError> {
    writeln!(
      self.writer,
      "# processed {} frames, skipped {}",
      metrics.processed(),
      metrics.skipped()
    )?;
    self.writer.flush()?;
    Ok(())
  }
}
