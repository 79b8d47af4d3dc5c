// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/config.rs - 流水线参数配置
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

use crate::template::MatchMethod;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("阈值 {name} 超出范围 [0, 1]: {value}")]
  ThresholdOutOfRange { name: &'static str, value: f32 },
  #[error("阈值 {name} 不是有效数值: {value}")]
  ThresholdNotFinite { name: &'static str, value: f32 },
  #[error("检测器输入边长不能为 0")]
  ZeroInputSide,
  #[error("张量行数不能为 0")]
  ZeroRows,
  #[error("类别数量不能为 0")]
  ZeroClasses,
}

/// 网络检测路径的配置。
///
/// 张量布局（行数与每行宽度）由外部检测器决定，必须显式给出，
/// 绝不从张量内容反推。
#[derive(Debug, Clone)]
pub struct DetectConfig {
  /// 目标置信度下限（objectness 阈值）
  pub confidence_floor: f32,
  /// 类别分数下限（0 表示接受任何类别）
  pub class_score_floor: f32,
  /// 重复抑制的 IoU 阈值
  pub iou_threshold: f32,
  /// 是否按类别分组抑制（默认跨类别）
  pub per_class_suppression: bool,
  /// 检测器方形输入边长
  pub input_side: u32,
  /// 原始张量的行数
  pub rows: usize,
}

impl Default for DetectConfig {
  fn default() -> Self {
    Self {
      confidence_floor: 0.4,
      class_score_floor: 0.0,
      iou_threshold: 0.4,
      per_class_suppression: false,
      input_side: 640,
      rows: 25200,
    }
  }
}

impl DetectConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    check_unit_range("confidence_floor", self.confidence_floor)?;
    check_unit_range("class_score_floor", self.class_score_floor)?;
    check_unit_range("iou_threshold", self.iou_threshold)?;
    if self.input_side == 0 {
      return Err(ConfigError::ZeroInputSide);
    }
    if self.rows == 0 {
      return Err(ConfigError::ZeroRows);
    }
    Ok(())
  }
}

/// 模板匹配路径的配置。
#[derive(Debug, Clone)]
pub struct TemplateConfig {
  /// 相关性得分阈值
  pub threshold: f32,
  /// 相关性度量方法
  pub method: MatchMethod,
}

impl Default for TemplateConfig {
  fn default() -> Self {
    Self {
      threshold: 0.9,
      method: MatchMethod::CcoeffNormed,
    }
  }
}

impl TemplateConfig {
  /// 归一化度量的得分落在单位区间内，此时阈值也必须落在其中；
  /// 未归一化的度量只要求阈值为非负有效数值。
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.threshold.is_finite() {
      return Err(ConfigError::ThresholdNotFinite {
        name: "template_threshold",
        value: self.threshold,
      });
    }
    let out_of_range = if self.method.normed() {
      !(0.0..=1.0).contains(&self.threshold)
    } else {
      self.threshold < 0.0
    };
    if out_of_range {
      return Err(ConfigError::ThresholdOutOfRange {
        name: "template_threshold",
        value: self.threshold,
      });
    }
    Ok(())
  }
}

fn check_unit_range(name: &'static str, value: f32) -> Result<(), ConfigError> {
  if !value.is_finite() {
    return Err(ConfigError::ThresholdNotFinite { name, value });
  }
  if !(0.0..=1.0).contains(&value) {
    return Err(ConfigError::ThresholdOutOfRange { name, value });
  }
  Ok(())
}
