// 该文件是 Gewu （格物致知） 项目的一部分。
// src/bin/benchmark_repack.rs - 像素重排基准测试
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

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use url::Url;

use gewu::{FromUrl, input::ImageFileInput};
use tracing::{info, warn};

/// 跳过前几次迭代，避免冷缓存影响平均值
const WARMUP_TIMES: usize = 2;

/// Gewu 像素重排基准测试参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 输入来源
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 重排迭代次数
  #[arg(long, default_value_t = 1000)]
  pub iterations: usize,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("输入来源: {}", args.input);
  info!("重排迭代次数: {}", args.iterations);

  let image = ImageFileInput::from_url(&args.input)?
    .into_image()
    .ok_or_else(|| anyhow::anyhow!("没有输入帧"))?;
  info!(
    "图像尺寸: {}x{}, 每像素 {} 通道",
    image.width(),
    image.height(),
    image.channels()
  );

  let mut times = Vec::with_capacity(args.iterations);
  for i in 0..args.iterations {
    let now = std::time::Instant::now();
    let frame = image.to_nhwc_frame()?;
    let elapsed = now.elapsed();
    std::hint::black_box(frame);
    info!("({})重排完成，耗时: {:.2?}", i, elapsed);
    times.push(elapsed);
  }

  if times.len() > WARMUP_TIMES {
    let measured = times.len() - WARMUP_TIMES;
    warn!(
      "平均重排时间: {:.2?}",
      times.iter().skip(WARMUP_TIMES).sum::<Duration>() / measured as u32
    );
  }

  Ok(())
}
