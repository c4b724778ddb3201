// 该文件是 Gewu （格物致知） 项目的一部分。
// src/task.rs - 任务组合
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

use tracing::info;

use crate::{model::Model, output::Render};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 单帧任务：取一帧、推理一次、渲染一次
pub struct OneShotTask;

impl<
  F,
  D,
  IE: std::error::Error + Sync + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<F, IE>>,
  M: Model<Input = F, Output = D, Error = ME>,
  O: Render<F, D, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, mut model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入帧"))??;
    info!("输入帧获取成功，开始推理...");
    let now = std::time::Instant::now();
    let result = model.infer(&frame)?;
    info!("推理完成，耗时: {:.2?}", now.elapsed());
    let now = std::time::Instant::now();
    output.render_result(&frame, &result)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;
  use std::rc::Rc;

  use super::*;
  use crate::frame::{FrameError, RgbNhwcFrame};
  use crate::model::{CocoLabel, DetectItem, DetectResult};

  struct FixedModel;

  impl Model for FixedModel {
    type Input = RgbNhwcFrame;
    type Output = DetectResult<CocoLabel>;
    type Error = std::convert::Infallible;

    fn infer(&mut self, _input: &RgbNhwcFrame) -> Result<Self::Output, Self::Error> {
      Ok(DetectResult {
        items: vec![DetectItem {
          kind: CocoLabel::Person,
          score: 0.9,
          bbox: [0.1, 0.1, 0.6, 0.9],
        }]
        .into_boxed_slice(),
      })
    }
  }

  struct CountingOutput {
    rendered: Rc<Cell<usize>>,
  }

  impl Render<RgbNhwcFrame, DetectResult<CocoLabel>> for CountingOutput {
    type Error = std::convert::Infallible;

    fn render_result(
      &self,
      _frame: &RgbNhwcFrame,
      result: &DetectResult<CocoLabel>,
    ) -> Result<(), Self::Error> {
      self.rendered.set(self.rendered.get() + result.len());
      Ok(())
    }
  }

  fn sample_frame() -> RgbNhwcFrame {
    RgbNhwcFrame::from_interleaved(2, 1, &[1, 2, 3, 255, 4, 5, 6, 255], 4).unwrap()
  }

  #[test]
  fn test_one_shot_runs_single_frame() {
    let rendered = Rc::new(Cell::new(0));
    let output = CountingOutput {
      rendered: rendered.clone(),
    };
    let frames = vec![Ok::<_, FrameError>(sample_frame())].into_iter();

    OneShotTask.run_task(frames, FixedModel, output).unwrap();
    assert_eq!(rendered.get(), 1);
  }

  #[test]
  fn test_one_shot_fails_without_frames() {
    let output = CountingOutput {
      rendered: Rc::new(Cell::new(0)),
    };
    let frames = Vec::<Result<RgbNhwcFrame, FrameError>>::new().into_iter();

    assert!(OneShotTask.run_task(frames, FixedModel, output).is_err());
  }

  #[test]
  fn test_one_shot_propagates_frame_errors() {
    let rendered = Rc::new(Cell::new(0));
    let output = CountingOutput {
      rendered: rendered.clone(),
    };
    let frames = vec![Err::<RgbNhwcFrame, _>(FrameError::InvalidDimensions {
      width: 2,
      height: 2,
      channels: 4,
      expected: 16,
      actual: 15,
    })]
    .into_iter();

    assert!(OneShotTask.run_task(frames, FixedModel, output).is_err());
    assert_eq!(rendered.get(), 0);
  }
}
