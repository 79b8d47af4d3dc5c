// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/record/json_record.rs - JSON 记录输出
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

use chrono::Utc;
use serde_json::json;

use crate::record::{FrameRecord, RecordError, Recorder, RunMetrics};

/// 结构化记录输出，整个运行写成一个 JSON 文档。
///
/// 帧记录逐条累积，`finish` 时一次性落盘。
pub struct JsonRecorder {
  path: PathBuf,
  frames: Vec<serde_json::Value>,
}

impl JsonRecorder {
  pub fn create(path: &Path) -> Result<Self, RecordError> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }
    Ok(Self {
      path: path.to_path_buf(),
      frames: Vec::new(),
    })
  }
}

impl Recorder for JsonRecorder {
  fn record(&mut self, record: &FrameRecord) -> Result<(), RecordError> {
    self.frames.push(json!({
      "frame_index": record.frame_index,
      "detections": record.detections,
      "elapsed_micros": record.elapsed_micros,
      "error": record.error,
    }));
    Ok(())
  }

  fn finish(&mut self, metrics: &RunMetrics) -> Result<(), RecordError> {
    let document = json!({
      "generated_at": Utc::now().to_rfc3339(),
      "processed": metrics.processed(),
      "skipped": metrics.skipped(),
      "frames": self.frames,
    });
    std::fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn document_contains_all_frames_and_summary() {
    let dir = std::env::temp_dir().join("shuzhuan-json-record-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("data.json");

    let mut metrics = RunMetrics::new();
    let mut recorder = JsonRecorder::create(&path).unwrap();
    for record in [
      FrameRecord::ok(0, 2, 100),
      FrameRecord::failed(1, 5, "张量损坏".to_string()),
    ] {
      recorder.record(&record).unwrap();
      metrics.push(record);
    }
    recorder.finish(&metrics).unwrap();

    let document: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["processed"], 1);
    assert_eq!(document["skipped"], 1);
    assert_eq!(document["frames"].as_array().unwrap().len(), 2);
    assert_eq!(document["frames"][0]["detections"], 2);
    assert_eq!(document["frames"][1]["error"], "张量损坏");
  }
}
