// 该文件是 Shuzhuan （数砖） 项目的一部分。
// src/template/kernel.rs - 相关性计算核适配
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

use image::GrayImage;
use imageproc::template_matching::{MatchTemplateMethod, match_template};
use thiserror::Error;

use crate::template::{MatchMethod, ScoreMatrix, TemplatePattern};

#[derive(Error, Debug)]
pub enum KernelError {
  #[error("该计算核不支持匹配方法 {0}")]
  UnsupportedMethod(MatchMethod),
  #[error("模板 ({tw}x{th}) 大于搜索图像 ({iw}x{ih})")]
  PatternTooLarge { tw: u32, th: u32, iw: u32, ih: u32 },
  #[error("得分矩阵尺寸异常")]
  BadScoreShape,
}

/// 相关性得分的计算核。
///
/// 得分计算本身是外部协作方，流水线只消费得分矩阵；
/// 这里的 trait 是两者之间的接缝。
pub trait CorrelationKernel {
  fn score_map(
    &self,
    image: &GrayImage,
    pattern: &TemplatePattern,
  ) -> Result<ScoreMatrix, KernelError>;

  /// 预检方法是否受支持，供启动阶段尽早失败
  fn supports(&self, method: MatchMethod) -> bool;
}

/// 基于 imageproc 的计算核。
///
/// imageproc 只实现平方差与互相关两族；COEFF 族（去均值互相关）
/// 没有对应实现，启动时即报不支持，而不是换一种度量悄悄凑数。
pub struct ImageprocKernel;

fn map_method(method: MatchMethod) -> Result<MatchTemplateMethod, KernelError> {
  match method {
    MatchMethod::Sqdiff => Ok(MatchTemplateMethod::SumOfSquaredErrors),
    MatchMethod::SqdiffNormed => Ok(MatchTemplateMethod::SumOfSquaredErrorsNormalized),
    MatchMethod::Ccorr => Ok(MatchTemplateMethod::CrossCorrelation),
    MatchMethod::CcorrNormed => Ok(MatchTemplateMethod::CrossCorrelationNormalized),
    MatchMethod::Ccoeff | MatchMethod::CcoeffNormed => {
      Err(KernelError::UnsupportedMethod(method))
    }
  }
}

impl CorrelationKernel for ImageprocKernel {
  fn score_map(
    &self,
    image: &GrayImage,
    pattern: &TemplatePattern,
  ) -> Result<ScoreMatrix, KernelError> {
    let (iw, ih) = image.dimensions();
    let (tw, th) = pattern.image.dimensions();
    if tw > iw || th > ih {
      return Err(KernelError::PatternTooLarge { tw, th, iw, ih });
    }

    let method = map_method(pattern.method)?;
    let result = match_template(image, &pattern.image, method);
    let (width, height) = result.dimensions();
    ScoreMatrix::new(result.into_raw(), width, height).ok_or(KernelError::BadScoreShape)
  }

  fn supports(&self, method: MatchMethod) -> bool {
    map_method(method).is_ok()
  }
}
