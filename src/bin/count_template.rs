// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/bin/count_template.rs - 模板计数主程序
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

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use shuzhuan::{
  config::TemplateConfig,
  input::create_frame_source,
  record::create_recorder,
  task::{Task, TemplateCountTask},
  template::{CorrelationKernel, ImageprocKernel, MatchMethod, TemplatePattern},
};

/// 模板匹配路径参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源（逐帧图片目录或单张图片）
  #[arg(long, value_name = "SOURCE")]
  pub input: String,

  /// 灰度模板图案文件
  #[arg(long, value_name = "FILE")]
  pub pattern: String,

  /// 图案标签名
  #[arg(long, default_value = "empty_block", value_name = "NAME")]
  pub label: String,

  /// 匹配方法 (TM_SQDIFF, TM_SQDIFF_NORMED, TM_CCORR,
  /// TM_CCORR_NORMED, TM_CCOEFF, TM_CCOEFF_NORMED)
  #[arg(long, default_value = "TM_CCORR_NORMED", value_name = "METHOD")]
  pub method: String,

  /// 相关性得分阈值
  #[arg(long, default_value = "0.9", value_name = "THRESHOLD")]
  pub threshold: f32,

  /// 记录文件路径（`.json` 为结构化输出, 其余为文本行）
  #[arg(long, default_value = "runs/tm_data.txt", value_name = "FILE")]
  pub record: String,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  let method = MatchMethod::from_name(&args.method)?;
  let config = TemplateConfig {
    threshold: args.threshold,
    method,
  };
  config.validate().context("参数配置无效")?;

  let kernel = ImageprocKernel;
  if !kernel.supports(method) {
    bail!("计算核不支持匹配方法 {}", method);
  }

  info!("输入来源: {}", args.input);
  info!("模板图案: {} ({})", args.pattern, args.label);
  info!("匹配方法: {}, 阈值: {}", method, args.threshold);

  let pattern = TemplatePattern::load(&args.pattern, &args.label, method, args.threshold)
    .with_context(|| format!("无法加载模板图案: {}", args.pattern))?;
  let source = create_frame_source(&args.input)?;
  let recorder = create_recorder(&args.record).context("无法创建记录文件")?;

  let task = TemplateCountTask::new(config, pattern);
  let report = task.run_task(source, kernel, recorder)?;

  info!(
    "运行结束: 处理 {} 帧, 跳过 {} 帧, 记录写入 {}",
    report.processed(),
    report.skipped(),
    args.record
  );

  Ok(())
}
