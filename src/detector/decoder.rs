// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/detector/decoder.rs - 原始张量候选解码
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

use thiserror::Error;
use tracing::debug;

use crate::config::DetectConfig;
use crate::detector::{BBox, Candidate};
use crate::model::RawScoreTensor;

/// 每行前五列: cx, cy, w, h, objectness；其后为各类别分数
const BOX_COLUMNS: usize = 5;
const OBJECTNESS_COLUMN: usize = 4;

#[derive(Error, Debug)]
pub enum DecodeError {
  #[error("张量元素数量不匹配: 期望 {expected}, 实际 {actual}")]
  MalformedTensor { expected: usize, actual: usize },
  #[error("张量行宽与类别数量不匹配: 期望 {expected}, 实际 {actual}")]
  LayoutMismatch { expected: usize, actual: usize },
}

/// 按固定行布局遍历原始张量，提取置信度达标的候选。
///
/// 行布局 `[cx, cy, w, h, objectness, class_0 .. class_{n-1}]`，
/// 坐标均位于检测器输入空间。行数与行宽来自配置，长度不变量在
/// 入口处校验一次，之后全部走安全的切片索引。
///
/// 候选置信度取 objectness；类别取分数最高者，相同分数取编号较小者。
/// 遍历按行序进行，因此后续抑制的平局裁决是可复现的。
pub fn decode(
  tensor: &RawScoreTensor,
  num_classes: usize,
  config: &DetectConfig,
) -> Result<Vec<Candidate>, DecodeError> {
  let dims = BOX_COLUMNS + num_classes;
  if tensor.dims != dims {
    return Err(DecodeError::LayoutMismatch {
      expected: dims,
      actual: tensor.dims,
    });
  }

  let expected = config.rows * dims;
  if tensor.rows != config.rows || tensor.data.len() != expected {
    return Err(DecodeError::MalformedTensor {
      expected,
      actual: tensor.data.len(),
    });
  }

  let mut candidates = Vec::new();

  for row in 0..config.rows {
    let cells = &tensor.data[row * dims..(row + 1) * dims];

    let objectness = cells[OBJECTNESS_COLUMN];
    if objectness < config.confidence_floor {
      continue;
    }

    let mut best_score = f32::MIN;
    let mut best_class = 0usize;
    for (class_id, &score) in cells[BOX_COLUMNS..].iter().enumerate() {
      if score > best_score {
        best_score = score;
        best_class = class_id;
      }
    }
    if best_score <= config.class_score_floor {
      continue;
    }

    let (cx, cy, width, height) = (cells[0], cells[1], cells[2], cells[3]);
    candidates.push(Candidate {
      class_id: best_class,
      confidence: objectness,
      bbox: BBox {
        x: cx - 0.5 * width,
        y: cy - 0.5 * height,
        width,
        height,
      },
    });
  }

  debug!("解码得到 {} 个候选", candidates.len());
  Ok(candidates)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tensor_of_rows(rows: Vec<Vec<f32>>, num_classes: usize) -> RawScoreTensor {
    let dims = BOX_COLUMNS + num_classes;
    let count = rows.len();
    let data: Vec<f32> = rows.into_iter().flatten().collect();
    assert_eq!(data.len(), count * dims);
    RawScoreTensor {
      data,
      rows: count,
      dims,
    }
  }

  fn config_with_rows(rows: usize) -> DetectConfig {
    DetectConfig {
      rows,
      ..DetectConfig::default()
    }
  }

  #[test]
  fn emits_candidate_with_objectness_as_confidence() {
    let tensor = tensor_of_rows(
      vec![vec![100.0, 80.0, 20.0, 10.0, 0.9, 0.1, 0.8, 0.3]],
      3,
    );
    let candidates = decode(&tensor, 3, &config_with_rows(1)).unwrap();
    assert_eq!(candidates.len(), 1);
    let c = &candidates[0];
    assert_eq!(c.class_id, 1);
    assert_eq!(c.confidence, 0.9);
    // 中心点转左上角
    assert_eq!(c.bbox.x, 90.0);
    assert_eq!(c.bbox.y, 75.0);
    assert_eq!(c.bbox.width, 20.0);
    assert_eq!(c.bbox.height, 10.0);
  }

  #[test]
  fn rows_below_confidence_floor_are_skipped() {
    let tensor = tensor_of_rows(
      vec![
        vec![10.0, 10.0, 4.0, 4.0, 0.39, 0.9, 0.1],
        vec![20.0, 20.0, 4.0, 4.0, 0.41, 0.9, 0.1],
      ],
      2,
    );
    let candidates = decode(&tensor, 2, &config_with_rows(2)).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].bbox.x, 18.0);
  }

  #[test]
  fn class_tie_breaks_to_lowest_id() {
    let tensor = tensor_of_rows(vec![vec![10.0, 10.0, 4.0, 4.0, 0.8, 0.7, 0.7, 0.2]], 3);
    let candidates = decode(&tensor, 3, &config_with_rows(1)).unwrap();
    assert_eq!(candidates[0].class_id, 0);
  }

  #[test]
  fn class_score_at_floor_is_skipped() {
    let config = DetectConfig {
      rows: 1,
      class_score_floor: 0.5,
      ..DetectConfig::default()
    };
    // 最高类别分数恰好等于下限，应当被丢弃
    let tensor = tensor_of_rows(vec![vec![10.0, 10.0, 4.0, 4.0, 0.8, 0.5, 0.3]], 2);
    assert!(decode(&tensor, 2, &config).unwrap().is_empty());
  }

  #[test]
  fn every_candidate_respects_bounds() {
    let num_classes = 4;
    let config = config_with_rows(16);
    let mut rows = Vec::new();
    for i in 0..16u32 {
      let mut row = vec![i as f32, i as f32, 8.0, 8.0, (i as f32) / 16.0];
      for c in 0..num_classes {
        row.push(if c == (i as usize % num_classes) { 0.9 } else { 0.1 });
      }
      rows.push(row);
    }
    let tensor = tensor_of_rows(rows, num_classes);
    let candidates = decode(&tensor, num_classes, &config).unwrap();
    assert!(!candidates.is_empty());
    for c in &candidates {
      assert!(c.class_id < num_classes);
      assert!(c.confidence >= config.confidence_floor);
    }
  }

  #[test]
  fn truncated_tensor_is_rejected() {
    let tensor = RawScoreTensor {
      data: vec![0.0; 13],
      rows: 2,
      dims: 7,
    };
    assert!(matches!(
      decode(&tensor, 2, &config_with_rows(2)),
      Err(DecodeError::MalformedTensor { expected: 14, actual: 13 })
    ));
  }

  #[test]
  fn dims_not_matching_classes_is_rejected() {
    let tensor = tensor_of_rows(vec![vec![0.0; 9]], 4);
    assert!(matches!(
      decode(&tensor, 3, &config_with_rows(1)),
      Err(DecodeError::LayoutMismatch { .. })
    ));
  }

  #[test]
  fn all_objectness_below_floor_yields_nothing() {
    // 25200 行、4 类、objectness 全部 0.1，默认下限 0.4
    let num_classes = 4;
    let dims = BOX_COLUMNS + num_classes;
    let rows = 25200;
    let mut data = vec![0.0f32; rows * dims];
    for row in 0..rows {
      data[row * dims + OBJECTNESS_COLUMN] = 0.1;
    }
    let tensor = RawScoreTensor { data, rows, dims };
    let candidates = decode(&tensor, num_classes, &config_with_rows(rows)).unwrap();
    assert!(candidates.is_empty());
  }
}
