// 该文件是 Gewu （格物致知） 项目的一部分。
// src/output/json_record.rs - 检测记录输出
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

use std::path::Path;

use chrono::Utc;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DetectResult, WithLabel},
  output::Render,
};

/// 把检测结果保存为 JSON 记录文件的渲染器
pub struct JsonRecordOutput {
  path: String,
}

#[derive(Error, Debug)]
pub enum JsonRecordOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

impl FromUrlWithScheme for JsonRecordOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonRecordOutput {
  type Error = JsonRecordOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(JsonRecordOutputError::SchemeMismatch(format!(
        "期望输出方式 '{}', 实际输出方式 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(JsonRecordOutput {
      path: url.path().to_string(),
    })
  }
}

impl JsonRecordOutput {
  fn record<T: WithLabel>(&self, result: &DetectResult<T>) -> serde_json::Value {
    let mut detections = Vec::new();
    for item in result.items.iter() {
      detections.push(serde_json::json!({
        "class": item.kind.to_label_str(),
        "class_id": item.kind.to_label_id(),
        "score": item.score,
        "bbox": item.bbox,
      }));
    }

    serde_json::json!({
      "time": Utc::now().to_rfc3339(),
      "count": result.len(),
      "detections": detections,
    })
  }
}

impl<F, T: WithLabel> Render<F, DetectResult<T>> for JsonRecordOutput {
  type Error = JsonRecordOutputError;

  fn render_result(&self, _frame: &F, result: &DetectResult<T>) -> Result<(), Self::Error> {
    if let Some(parent) = Path::new(&self.path).parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let record = self.record(result);
    std::fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;

    warn!("保存检测记录到文件: {}", self.path);

    Ok(())
  }
}
