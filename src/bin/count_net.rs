// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/bin/count_net.rs - 网络计数主程序
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

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use shuzhuan::{
  config::DetectConfig,
  input::create_frame_source,
  labels::ClassLabels,
  model::TensorFileBackend,
  record::create_recorder,
  task::{NetworkCountTask, Task},
};

/// 网络检测路径参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源（逐帧图片目录或单张图片）
  #[arg(long, value_name = "SOURCE")]
  pub input: String,

  /// 张量转储目录（外部推理逐帧输出, 小端 f32 `.bin` 文件）
  #[arg(long, value_name = "DIR")]
  pub tensors: String,

  /// 类别标签文件（每行一个标签）
  #[arg(long, value_name = "FILE")]
  pub labels: String,

  /// 记录文件路径（`.json` 为结构化输出, 其余为文本行）
  #[arg(long, default_value = "runs/data.txt", value_name = "FILE")]
  pub record: String,

  /// 目标置信度下限 (0.0 - 1.0)
  #[arg(long, default_value = "0.4", value_name = "THRESHOLD")]
  pub confidence: f32,

  /// 类别分数下限 (0.0 - 1.0, 0 表示接受任何类别)
  #[arg(long, default_value = "0.0", value_name = "THRESHOLD")]
  pub class_score: f32,

  /// 重复抑制 IoU 阈值 (0.0 - 1.0)
  #[arg(long, default_value = "0.4", value_name = "THRESHOLD")]
  pub nms_threshold: f32,

  /// 检测器方形输入边长
  #[arg(long, default_value = "640", value_name = "SIDE")]
  pub input_side: u32,

  /// 原始张量行数
  #[arg(long, default_value = "25200", value_name = "ROWS")]
  pub rows: usize,

  /// 按类别分组抑制（默认跨类别）
  #[arg(long)]
  pub per_class: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("张量目录: {}", args.tensors);
  info!("记录文件: {}", args.record);

  let config = DetectConfig {
    confidence_floor: args.confidence,
    class_score_floor: args.class_score,
    iou_threshold: args.nms_threshold,
    per_class_suppression: args.per_class,
    input_side: args.input_side,
    rows: args.rows,
  };
  config.validate().context("参数配置无效")?;

  let labels = ClassLabels::load(&args.labels)
    .with_context(|| format!("无法加载标签文件: {}", args.labels))?;
  labels.announce();

  let source = create_frame_source(&args.input)?;
  let backend = TensorFileBackend::new(&args.tensors, args.rows, labels.len() + 5)
    .with_context(|| format!("无法打开张量目录: {}", args.tensors))?;
  let recorder = create_recorder(&args.record).context("无法创建记录文件")?;

  let task = NetworkCountTask::new(config, labels.clone());
  let report = task.run_task(source, backend, recorder)?;

  // 跨帧的每类合计，供下游报表使用
  let mut totals = vec![0u64; labels.len()];
  for histogram in &report.histograms {
    for (class_id, &count) in histogram.counts().iter().enumerate() {
      totals[class_id] += count as u64;
    }
  }
  for (class_id, total) in totals.iter().enumerate() {
    info!("类别 [{}] {}: 共 {} 个", class_id, labels.name(class_id), total);
  }

  info!(
    "运行结束: 处理 {} 帧, 跳过 {} 帧, 记录写入 {}",
    report.processed(),
    report.skipped(),
    args.record
  );

  Ok(())
}
