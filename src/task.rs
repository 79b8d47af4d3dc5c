// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/task.rs - 运行任务
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

use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{DetectConfig, TemplateConfig};
use crate::detector::{Detection, decode, suppress};
use crate::frame::Frame;
use crate::geometry::{letterbox, rescale};
use crate::labels::ClassLabels;
use crate::model::Network;
use crate::record::{ClassHistogram, FrameRecord, Recorder, RunMetrics};
use crate::template::{CorrelationKernel, TemplatePattern, locate};

/// 一次运行的汇总结果。
///
/// 帧记录按到达顺序排列，这是对下游的硬保证；
/// 直方图表与成功处理的帧一一对应。
#[derive(Debug, Default)]
pub struct RunReport {
  pub metrics: RunMetrics,
  pub histograms: Vec<ClassHistogram>,
}

impl RunReport {
  pub fn processed(&self) -> u64 {
    self.metrics.processed()
  }

  pub fn skipped(&self) -> u64 {
    self.metrics.skipped()
  }
}

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<RunReport, Self::Error>;
}

/// 网络检测路径: 逐帧 信箱填充 → 解码 → 抑制 → 缩放 → 直方图 → 记录。
///
/// 帧内错误（空帧、坏张量）被隔离为带错误说明的零检测记录，
/// 运行继续处理后续帧；帧序号原样保留，跳帧在序列里留下缺口。
pub struct NetworkCountTask {
  config: DetectConfig,
  labels: ClassLabels,
}

impl NetworkCountTask {
  pub fn new(config: DetectConfig, labels: ClassLabels) -> Self {
    Self { config, labels }
  }

  fn process_frame<M: Network>(
    &self,
    frame: &Frame,
    model: &mut M,
  ) -> Result<Vec<Detection>, String> {
    let (canvas, scale) = letterbox(&frame.image).map_err(|e| e.to_string())?;
    let tensor = model.forward(&canvas).map_err(|e| e.to_string())?;
    let candidates =
      decode(&tensor, self.labels.len(), &self.config).map_err(|e| e.to_string())?;
    let kept = suppress(
      candidates,
      self.config.iou_threshold,
      self.config.per_class_suppression,
    );
    Ok(
      kept
        .iter()
        .map(|candidate| rescale(candidate, &scale, self.config.input_side))
        .collect(),
    )
  }
}

impl<I, M, O> Task<I, M, O> for NetworkCountTask
where
  I: Iterator<Item = Result<Frame>>,
  M: Network,
  O: Recorder,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, mut model: M, mut output: O) -> Result<RunReport, Self::Error> {
    info!("开始网络计数任务...");
    let mut report = RunReport::default();

    for item in input {
      let now = Instant::now();

      let frame = match item {
        Ok(frame) => frame,
        Err(e) => {
          // 源端坏帧同样只影响当前位置
          let index = report.metrics.records().len() as u64;
          warn!("第 {} 帧读取失败: {}", index, e);
          let record = FrameRecord::failed(index, elapsed_micros(&now), e.to_string());
          output.record(&record)?;
          report.metrics.push(record);
          continue;
        }
      };

      let record = match self.process_frame(&frame, &mut model) {
        Ok(detections) => {
          let mut histogram = ClassHistogram::new(self.labels.len());
          for detection in &detections {
            histogram.bump(detection.class_id);
          }
          info!(
            "第 {} 帧共识别到 {} 个目标",
            frame.index,
            detections.len()
          );
          report.histograms.push(histogram);
          FrameRecord::ok(frame.index, detections.len(), elapsed_micros(&now))
        }
        Err(reason) => {
          warn!("第 {} 帧跳过: {}", frame.index, reason);
          FrameRecord::failed(frame.index, elapsed_micros(&now), reason)
        }
      };

      output.record(&record)?;
      report.metrics.push(record);
    }

    output.finish(&report.metrics)?;
    info!(
      "任务完成: 处理 {} 帧, 跳过 {} 帧",
      report.processed(),
      report.skipped()
    );
    Ok(report)
  }
}

/// 模板匹配路径: 逐帧灰度化 → 相关性得分 → 阈值命中枚举 → 记录。
///
/// 命中点数直接作为该帧的目标数——单一图案、不做聚类，
/// 与既有约定保持一致。
pub struct TemplateCountTask {
  config: TemplateConfig,
  pattern: TemplatePattern,
}

impl TemplateCountTask {
  pub fn new(config: TemplateConfig, pattern: TemplatePattern) -> Self {
    Self { config, pattern }
  }
}

impl<I, K, O> Task<I, K, O> for TemplateCountTask
where
  I: Iterator<Item = Result<Frame>>,
  K: CorrelationKernel,
  O: Recorder,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, model: K, mut output: O) -> Result<RunReport, Self::Error> {
    info!("开始模板计数任务: 图案 {}", self.pattern.label);
    let mut report = RunReport::default();

    for item in input {
      let now = Instant::now();

      let frame = match item {
        Ok(frame) => frame,
        Err(e) => {
          let index = report.metrics.records().len() as u64;
          warn!("第 {} 帧读取失败: {}", index, e);
          let record = FrameRecord::failed(index, elapsed_micros(&now), e.to_string());
          output.record(&record)?;
          report.metrics.push(record);
          continue;
        }
      };

      let record = if frame.is_empty() {
        warn!("第 {} 帧为空, 跳过", frame.index);
        FrameRecord::failed(frame.index, elapsed_micros(&now), "无效帧".to_string())
      } else {
        match model.score_map(&frame.to_gray(), &self.pattern) {
          Ok(scores) => {
            let hits = locate(&scores, self.pattern.method, self.config.threshold);
            info!(
              "第 {} 帧 {} 命中 {} 处",
              frame.index,
              self.pattern.label,
              hits.len()
            );
            FrameRecord::ok(frame.index, hits.len(), elapsed_micros(&now))
          }
          Err(e) => {
            warn!("第 {} 帧跳过: {}", frame.index, e);
            FrameRecord::failed(frame.index, elapsed_micros(&now), e.to_string())
          }
        }
      };

      output.record(&record)?;
      report.metrics.push(record);
    }

    output.finish(&report.metrics)?;
    info!(
      "任务完成: 处理 {} 帧, 跳过 {} 帧",
      report.processed(),
      report.skipped()
    );
    Ok(report)
  }
}

fn elapsed_micros(start: &Instant) -> u64 {
  start.elapsed().as_micros().min(u64::MAX as u128) as u64
}
