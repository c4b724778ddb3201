// 该文件是 Gewu （格物致知） 项目的一部分。
// src/model/ssd.rs - 模型定义
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

use ndarray::Array4;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
  FromUrl,
  frame::AsNhwcFrame,
  model::{CocoLabel, DetectItem, DetectResult, Model},
};

const SSD_NUM_INPUTS: usize = 1;
const SSD_BOX_COORDS: usize = 4;
const SSD_DEFAULT_SCORE_THRESH: f32 = 0.5;
const SSD_DEFAULT_MAX_BOXES: usize = 20;
const SSD_DEFAULT_INTRA_THREADS: usize = 4;

/// 检测图各张量的名称
#[derive(Debug, Clone)]
struct SsdTensorNames {
  input: String,
  boxes: String,
  scores: String,
  classes: String,
  count: Option<String>,
}

pub struct SsdMobilenet<Frame> {
  session: Session,
  names: SsdTensorNames,
  score_thresh: f32,
  max_boxes: usize,
  _phantom: std::marker::PhantomData<Frame>,
}

#[derive(Error, Debug)]
pub enum SsdMobilenetError {
  #[error("模型加载错误: {0}")]
  ModelLoadError(ort::Error),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
  #[error("推理运行时错误: {0}")]
  OrtError(ort::Error),
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
  #[error("输入张量形状错误: {0}")]
  InputShapeError(String),
}

impl From<ort::Error> for SsdMobilenetError {
  fn from(err: ort::Error) -> Self {
    SsdMobilenetError::OrtError(err)
  }
}

impl SsdMobilenetError {
  pub fn invalid(msg: &str) -> Self {
    SsdMobilenetError::ModelInvalid(msg.to_string())
  }
}

pub struct SsdMobilenetBuilder {
  model_path: String,
  input_name: Option<String>,
  boxes_name: Option<String>,
  scores_name: Option<String>,
  classes_name: Option<String>,
  score_thresh: f32,
  max_boxes: usize,
  intra_threads: usize,
}

const SSD_SCHEME: &str = "ssd";

impl FromUrl for SsdMobilenetBuilder {
  type Error = SsdMobilenetError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != SSD_SCHEME {
      return Err(SsdMobilenetError::ModelPathError(format!(
        "模型路径必须使用 {} 方案",
        SSD_SCHEME
      )));
    }

    let mut builder = SsdMobilenetBuilder {
      model_path: url.path().to_string(),
      input_name: None,
      boxes_name: None,
      scores_name: None,
      classes_name: None,
      score_thresh: SSD_DEFAULT_SCORE_THRESH,
      max_boxes: SSD_DEFAULT_MAX_BOXES,
      intra_threads: SSD_DEFAULT_INTRA_THREADS,
    };

    for (key, value) in url.query_pairs() {
      match key.as_ref() {
        "input" => builder.input_name = Some(value.into_owned()),
        "boxes" => builder.boxes_name = Some(value.into_owned()),
        "scores" => builder.scores_name = Some(value.into_owned()),
        "classes" => builder.classes_name = Some(value.into_owned()),
        _ => warn!("未知的模型参数: {}", key),
      }
    }

    Ok(builder)
  }
}

impl SsdMobilenetBuilder {
  pub fn score_threshold(mut self, thresh: f32) -> Self {
    self.score_thresh = thresh;
    self
  }

  pub fn max_boxes(mut self, max_boxes: usize) -> Self {
    self.max_boxes = max_boxes;
    self
  }

  pub fn intra_threads(mut self, threads: usize) -> Self {
    self.intra_threads = threads;
    self
  }

  pub fn build<Frame>(self) -> Result<SsdMobilenet<Frame>, SsdMobilenetError> {
    info!("加载模型文件: {}", self.model_path);
    let session = Session::builder()?
      .with_optimization_level(GraphOptimizationLevel::Level3)?
      .with_intra_threads(self.intra_threads)?
      .commit_from_file(&self.model_path)
      .map_err(SsdMobilenetError::ModelLoadError)?;
    info!("模型加载完成");

    debug!("模型输入: {:?}", session.inputs);
    debug!("模型输出: {:?}", session.outputs);

    let num_inputs = session.inputs.len();
    if num_inputs != SSD_NUM_INPUTS {
      error!(
        "预期模型输入数量为 {}, 实际为 {}",
        SSD_NUM_INPUTS, num_inputs
      );
      return Err(SsdMobilenetError::ModelInvalid(format!(
        "预期模型输入数量为 {}, 实际为 {}",
        SSD_NUM_INPUTS, num_inputs
      )));
    }

    let input = match self.input_name {
      Some(name) => name,
      None => session
        .inputs
        .first()
        .map(|i| i.name.clone())
        .ok_or_else(|| SsdMobilenetError::invalid("模型没有输入张量"))?,
    };

    let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
    debug!("模型输出数量: {}", output_names.len());

    let boxes = resolve_output_name(&output_names, self.boxes_name, "box")?;
    let scores = resolve_output_name(&output_names, self.scores_name, "score")?;
    let classes = resolve_output_name(&output_names, self.classes_name, "class")?;
    let count = find_count_name(&output_names);

    let names = SsdTensorNames {
      input,
      boxes,
      scores,
      classes,
      count,
    };
    debug!("检测图张量名称: {:?}", names);

    let _phantom = std::marker::PhantomData::<Frame>;
    Ok(SsdMobilenet {
      session,
      names,
      score_thresh: self.score_thresh,
      max_boxes: self.max_boxes,
      _phantom,
    })
  }
}

/// 根据名称子串匹配检测图的输出张量
/// 显式指定的名称直接校验；未指定时按子串搜索
fn resolve_output_name(
  names: &[String],
  explicit: Option<String>,
  keyword: &str,
) -> Result<String, SsdMobilenetError> {
  if let Some(name) = explicit {
    if names.iter().any(|n| *n == name) {
      return Ok(name);
    }
    error!("模型中没有名为 {} 的输出张量", name);
    return Err(SsdMobilenetError::ModelInvalid(format!(
      "模型中没有名为 {} 的输出张量, 可用输出: {:?}",
      name, names
    )));
  }

  names
    .iter()
    .find(|n| n.to_ascii_lowercase().contains(keyword))
    .cloned()
    .ok_or_else(|| {
      error!("没有输出张量的名称包含 {}", keyword);
      SsdMobilenetError::ModelInvalid(format!(
        "没有输出张量的名称包含 {}, 可用输出: {:?}",
        keyword, names
      ))
    })
}

/// 查找可选的检测数量输出，名称匹配不区分大小写
fn find_count_name(names: &[String]) -> Option<String> {
  names
    .iter()
    .find(|n| n.to_ascii_lowercase().contains("num"))
    .cloned()
}

/// 把检测图输出整理为检测记录
///
/// 检测图已在图内完成框解码与非极大值抑制，得分按降序排列；
/// 框坐标为归一化的 [y_min, x_min, y_max, x_max]。
fn collect_detections(
  boxes: &[f32],
  scores: &[f32],
  classes: &[f32],
  count: usize,
  score_thresh: f32,
) -> Vec<DetectItem<CocoLabel>> {
  let count = count
    .min(scores.len())
    .min(classes.len())
    .min(boxes.len() / SSD_BOX_COORDS);

  let mut items = Vec::new();
  for idx in 0..count {
    let score = scores[idx];
    if score <= score_thresh {
      continue;
    }

    let class_id = classes[idx] as u32;
    let kind = match CocoLabel::from_ssd_class_id(class_id) {
      Some(kind) => kind,
      None => {
        warn!("跳过未知的类别 id: {}", class_id);
        continue;
      }
    };

    let ymin = boxes[idx * SSD_BOX_COORDS];
    let xmin = boxes[idx * SSD_BOX_COORDS + 1];
    let ymax = boxes[idx * SSD_BOX_COORDS + 2];
    let xmax = boxes[idx * SSD_BOX_COORDS + 3];

    items.push(DetectItem {
      kind,
      score,
      bbox: [xmin, ymin, xmax, ymax],
    });
  }

  items
}

impl<Frame: AsNhwcFrame> Model for SsdMobilenet<Frame> {
  type Input = Frame;
  type Output = DetectResult<CocoLabel>;
  type Error = SsdMobilenetError;

  fn infer(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let [height, width, channels] = input.shape();

    debug!("设置模型输入: {}x{}x{}", height, width, channels);
    let array = Array4::from_shape_vec((1, height, width, channels), input.as_nhwc().to_vec())
      .map_err(|e| SsdMobilenetError::InputShapeError(e.to_string()))?;
    let tensor = Tensor::from_array(array)?;

    debug!("执行模型推理");
    let outputs = self
      .session
      .run(ort::inputs![self.names.input.as_str() => tensor])?;

    debug!("获取模型输出");
    let (boxes_shape, boxes_data) = outputs
      .get(self.names.boxes.as_str())
      .ok_or_else(|| SsdMobilenetError::invalid("缺少检测框输出"))?
      .try_extract_tensor::<f32>()?;
    let (scores_shape, scores_data) = outputs
      .get(self.names.scores.as_str())
      .ok_or_else(|| SsdMobilenetError::invalid("缺少检测得分输出"))?
      .try_extract_tensor::<f32>()?;
    let (_, classes_data) = outputs
      .get(self.names.classes.as_str())
      .ok_or_else(|| SsdMobilenetError::invalid("缺少检测类别输出"))?
      .try_extract_tensor::<f32>()?;
    debug!(
      "检测框形状: {:?}, 检测得分形状: {:?}",
      boxes_shape, scores_shape
    );

    let detected = match &self.names.count {
      Some(name) => {
        let (_, count_data) = outputs
          .get(name.as_str())
          .ok_or_else(|| SsdMobilenetError::invalid("缺少检测数量输出"))?
          .try_extract_tensor::<f32>()?;
        count_data
          .first()
          .map(|&c| c as usize)
          .unwrap_or(scores_data.len())
      }
      None => scores_data.len(),
    };

    debug!("后处理模型输出");
    let items = collect_detections(
      boxes_data,
      scores_data,
      classes_data,
      detected.min(self.max_boxes),
      self.score_thresh,
    );

    debug!("检测到 {} 个物体", items.len());
    debug!("检测结果: {:?}", items);

    Ok(DetectResult {
      items: items.into_boxed_slice(),
    })
  }
}
