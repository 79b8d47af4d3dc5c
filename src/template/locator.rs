// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/template/locator.rs - 得分矩阵阈值定位
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

use crate::template::{MatchMethod, Polarity, ScoreMatrix};

/// 枚举得分矩阵中所有通过阈值检验的像素位置。
///
/// 比较方向由度量极性决定：差异型度量取阈值及以下，
/// 相似型度量取阈值及以上，两个方向都包含恰好等于阈值的得分。
///
/// 注意这里不做任何聚类：同一个物体的相关峰往往横跨多个相邻像素，
/// 会产生多个命中点。保持原始命中计数是既有约定，
/// 已知的局限，不要悄悄加聚类改变报告数字。
pub fn locate(scores: &ScoreMatrix, method: MatchMethod, threshold: f32) -> Vec<(u32, u32)> {
  let mut hits = Vec::new();
  for y in 0..scores.height() {
    for x in 0..scores.width() {
      let score = scores.get(x, y);
      let matched = match method.polarity() {
        Polarity::Difference => score <= threshold,
        Polarity::Similarity => score >= threshold,
      };
      if matched {
        hits.push((x, y));
      }
    }
  }
  hits
}

#[cfg(test)]
mod tests {
  use super::*;

  fn matrix(data: Vec<f32>, width: u32, height: u32) -> ScoreMatrix {
    ScoreMatrix::new(data, width, height).unwrap()
  }

  #[test]
  fn single_peak_yields_single_hit() {
    // 3x3 矩阵中只有一个像素达到 0.9 阈值
    let mut data = vec![0.1f32; 9];
    data[4] = 0.95;
    let scores = matrix(data, 3, 3);
    let hits = locate(&scores, MatchMethod::CcoeffNormed, 0.9);
    assert_eq!(hits, vec![(1, 1)]);
  }

  #[test]
  fn similarity_threshold_is_inclusive() {
    let scores = matrix(vec![0.9, 0.8999], 2, 1);
    let hits = locate(&scores, MatchMethod::CcorrNormed, 0.9);
    assert_eq!(hits, vec![(0, 0)]);
  }

  #[test]
  fn difference_threshold_is_inclusive_downward() {
    // 差异型度量：恰好等于阈值算命中，高一点则不算
    let scores = matrix(vec![0.2, 0.2001], 2, 1);
    let hits = locate(&scores, MatchMethod::SqdiffNormed, 0.2);
    assert_eq!(hits, vec![(0, 0)]);
  }

  #[test]
  fn adjacent_pixels_above_threshold_all_count() {
    let scores = matrix(vec![0.95, 0.92, 0.1, 0.91, 0.1, 0.1], 3, 2);
    let hits = locate(&scores, MatchMethod::CcoeffNormed, 0.9);
    assert_eq!(hits, vec![(0, 0), (1, 0), (0, 1)]);
  }

  #[test]
  fn no_hits_below_threshold() {
    let scores = matrix(vec![0.5; 12], 4, 3);
    assert!(locate(&scores, MatchMethod::Ccoeff, 0.9).is_empty());
  }
}
