// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/detector/nms.rs - 重复检测抑制
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

use tracing::debug;

use crate::detector::{Candidate, iou};

/// 贪心重复抑制。
///
/// 候选按置信度降序排序（稳定排序，置信度相同时保留解码顺序），
/// 依次选出当前最高者，丢弃其余与之 IoU 严格大于阈值的候选。
/// 默认跨类别抑制；`per_class` 为真时只在同类别之间抑制。
///
/// 输出按置信度降序；对自身输出再跑一遍不会改变任何内容，
/// 因为存活候选两两之间的 IoU 都不超过阈值。
pub fn suppress(mut candidates: Vec<Candidate>, iou_threshold: f32, per_class: bool) -> Vec<Candidate> {
  candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

  let mut kept = Vec::new();
  while !candidates.is_empty() {
    let best = candidates.remove(0);
    candidates.retain(|other| {
      if per_class && other.class_id != best.class_id {
        return true;
      }
      iou(&best.bbox, &other.bbox) <= iou_threshold
    });
    kept.push(best);
  }

  debug!("抑制后剩余 {} 个检测", kept.len());
  kept
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::detector::BBox;

  fn candidate(class_id: usize, confidence: f32, x: f32) -> Candidate {
    Candidate {
      class_id,
      confidence,
      bbox: BBox {
        x,
        y: 0.0,
        width: 10.0,
        height: 10.0,
      },
    }
  }

  #[test]
  fn overlapping_candidates_collapse_to_best() {
    // 同一物体的三个近重复框，两两 IoU 大于阈值
    let candidates = vec![
      candidate(2, 0.85, 1.0),
      candidate(2, 0.9, 0.0),
      candidate(2, 0.3, 2.0),
    ];
    let kept = suppress(candidates, 0.4, false);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].confidence, 0.9);
    assert_eq!(kept[0].class_id, 2);
  }

  #[test]
  fn distant_candidates_all_survive() {
    let candidates = vec![
      candidate(0, 0.9, 0.0),
      candidate(1, 0.8, 100.0),
      candidate(0, 0.7, 200.0),
    ];
    let kept = suppress(candidates, 0.4, false);
    assert_eq!(kept.len(), 3);
    // 输出按置信度降序
    assert_eq!(kept[0].confidence, 0.9);
    assert_eq!(kept[1].confidence, 0.8);
    assert_eq!(kept[2].confidence, 0.7);
  }

  #[test]
  fn cross_class_overlap_is_suppressed_by_default() {
    let candidates = vec![candidate(0, 0.9, 0.0), candidate(1, 0.8, 1.0)];
    let kept = suppress(candidates, 0.4, false);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].class_id, 0);
  }

  #[test]
  fn per_class_mode_keeps_overlapping_other_classes() {
    let candidates = vec![candidate(0, 0.9, 0.0), candidate(1, 0.8, 1.0)];
    let kept = suppress(candidates, 0.4, true);
    assert_eq!(kept.len(), 2);
  }

  #[test]
  fn suppression_is_idempotent() {
    let candidates = vec![
      candidate(0, 0.9, 0.0),
      candidate(0, 0.85, 2.0),
      candidate(1, 0.8, 50.0),
      candidate(2, 0.7, 51.0),
      candidate(0, 0.6, 120.0),
    ];
    let once = suppress(candidates, 0.4, false);
    let twice = suppress(once.clone(), 0.4, false);
    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(&twice) {
      assert_eq!(a.class_id, b.class_id);
      assert_eq!(a.confidence, b.confidence);
      assert_eq!(a.bbox, b.bbox);
    }
  }

  #[test]
  fn output_count_is_bounded_by_input() {
    let candidates: Vec<_> = (0..20).map(|i| candidate(0, 0.5, i as f32)).collect();
    let kept = suppress(candidates, 0.4, false);
    assert!(!kept.is_empty());
    assert!(kept.len() <= 20);
  }

  #[test]
  fn empty_input_yields_empty_output() {
    assert!(suppress(Vec::new(), 0.4, false).is_empty());
  }
}
