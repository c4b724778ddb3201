// 该文件是 Gewu （格物致知） 项目的一部分。
// src/output/console.rs - 控制台文本输出
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
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DetectItem, DetectResult, WithLabel},
  output::Render,
};

/// 把检测结果逐行打印到标准输出的渲染器
pub struct ConsoleOutput;

#[derive(Error, Debug)]
pub enum ConsoleOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

impl FromUrlWithScheme for ConsoleOutput {
  const SCHEME: &'static str = "console";
}

impl FromUrl for ConsoleOutput {
  type Error = ConsoleOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ConsoleOutputError::SchemeMismatch(format!(
        "期望输出方式 '{}', 实际输出方式 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(ConsoleOutput)
  }
}

/// 一条检测结果的文本形式，如 `person - 87%`
fn format_detection<T: WithLabel>(item: &DetectItem<T>) -> String {
  format!(
    "{} - {}%",
    item.kind.to_label_str(),
    (item.score * 100.0).round() as i64
  )
}

impl<F, T: WithLabel> Render<F, DetectResult<T>> for ConsoleOutput {
  type Error = ConsoleOutputError;

  fn render_result(&self, _frame: &F, result: &DetectResult<T>) -> Result<(), Self::Error> {
    info!("检测到 {} 个物体", result.len());
    for item in result.items.iter() {
      println!("{}", format_detection(item));
      debug!("检测框: {:?}", item.bbox);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::CocoLabel;

  #[test]
  fn test_format_detection() {
    let item = DetectItem {
      kind: CocoLabel::Person,
      score: 0.8716,
      bbox: [0.1, 0.2, 0.3, 0.4],
    };
    assert_eq!(format_detection(&item), "person - 87%");
  }

  #[test]
  fn test_format_detection_rounds_half_up() {
    let item = DetectItem {
      kind: CocoLabel::Cat,
      score: 0.875,
      bbox: [0.0, 0.0, 1.0, 1.0],
    };
    assert_eq!(format_detection(&item), "cat - 88%");
  }

  #[test]
  fn test_from_url_scheme() {
    let url = Url::parse("console://stdout").unwrap();
    assert!(ConsoleOutput::from_url(&url).is_ok());

    let url = Url::parse("image:///tmp/a.png").unwrap();
    assert!(matches!(
      ConsoleOutput::from_url(&url),
      Err(ConsoleOutputError::SchemeMismatch(_))
    ));
  }
}
