// 该文件是 Gewu （格物致知） 项目的一部分。
// tests/pipeline_test.rs - 管线集成测试
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

use std::path::PathBuf;

use url::Url;

use gewu::{
  FromUrl,
  frame::{AsNhwcFrame, RgbNhwcFrame},
  input::ImageFileInput,
  model::{CocoLabel, DetectItem, DetectResult, Model},
  output::{OutputError, OutputWrapper},
  task::{OneShotTask, Task},
};

/// 固定输出两条检测结果的模型替身
struct StubModel;

impl Model for StubModel {
  type Input = RgbNhwcFrame;
  type Output = DetectResult<CocoLabel>;
  type Error = std::convert::Infallible;

  fn infer(&mut self, _input: &RgbNhwcFrame) -> Result<Self::Output, Self::Error> {
    Ok(DetectResult {
      items: vec![
        DetectItem {
          kind: CocoLabel::Person,
          score: 0.875,
          bbox: [0.1, 0.1, 0.4, 0.9],
        },
        DetectItem {
          kind: CocoLabel::Dog,
          score: 0.75,
          bbox: [0.5, 0.6, 0.9, 1.0],
        },
      ]
      .into_boxed_slice(),
    })
  }
}

fn temp_path(name: &str) -> PathBuf {
  std::env::temp_dir().join(format!("gewu-pipeline-{}-{}", std::process::id(), name))
}

/// 写一张 2x2 的 RGBA 测试图片，返回其路径
///
/// 四个像素的 RGB 值各不相同，alpha 亦不同，便于验证重排结果。
fn write_test_png(name: &str) -> PathBuf {
  let pixels: Vec<u8> = vec![
    10, 20, 30, 255, // 左上
    40, 50, 60, 128, // 右上
    70, 80, 90, 64, // 左下
    100, 110, 120, 0, // 右下
  ];
  let image = image::RgbaImage::from_raw(2, 2, pixels).unwrap();

  let path = temp_path(name);
  image.save_with_format(&path, image::ImageFormat::Png).unwrap();
  path
}

fn image_url(path: &PathBuf) -> Url {
  Url::parse(&format!("image://{}", path.display())).unwrap()
}

#[test]
fn test_image_input_repacks_rgba_to_rgb() {
  let path = write_test_png("repack.png");

  let input = ImageFileInput::from_url(&image_url(&path)).unwrap();
  assert_eq!(input.dimensions(), Some((2, 2)));

  let mut frames = input.into_frames();
  let frame = frames.next().unwrap().unwrap();
  // alpha 通道剥除，RGB 原样保留，行主序不变
  assert_eq!(
    frame.as_nhwc(),
    &[10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120]
  );
  assert_eq!(frame.shape(), [2, 2, 3]);
  assert!(frames.next().is_none());

  std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_pipeline_writes_json_record() {
  let image_path = write_test_png("record.png");
  let record_path = temp_path("record.json");

  let input = ImageFileInput::from_url(&image_url(&image_path)).unwrap();
  let output =
    OutputWrapper::from_url(&Url::parse(&format!("json://{}", record_path.display())).unwrap())
      .unwrap();

  OneShotTask
    .run_task(input.into_frames(), StubModel, output)
    .unwrap();

  let content = std::fs::read_to_string(&record_path).unwrap();
  let record: serde_json::Value = serde_json::from_str(&content).unwrap();
  assert_eq!(record["count"], 2);
  assert_eq!(record["detections"][0]["class"], "person");
  assert_eq!(record["detections"][0]["score"].as_f64(), Some(0.875));
  assert_eq!(record["detections"][1]["class"], "dog");

  std::fs::remove_file(&image_path).unwrap();
  std::fs::remove_file(&record_path).unwrap();
}

#[test]
fn test_pipeline_renders_to_console() {
  let image_path = write_test_png("console.png");

  let input = ImageFileInput::from_url(&image_url(&image_path)).unwrap();
  let output = OutputWrapper::from_url(&Url::parse("console://stdout").unwrap()).unwrap();

  OneShotTask
    .run_task(input.into_frames(), StubModel, output)
    .unwrap();

  std::fs::remove_file(&image_path).unwrap();
}

#[test]
fn test_output_rejects_unknown_scheme() {
  let url = Url::parse("rtsp://localhost/stream").unwrap();
  assert!(matches!(
    OutputWrapper::from_url(&url),
    Err(OutputError::SchemeMismatch)
  ));
}
