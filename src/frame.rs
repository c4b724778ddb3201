// 该文件是 Gewu （格物致知） 项目的一部分。
// src/frame.rs - 帧定义与像素重排
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

pub const RGB_CHANNELS: usize = 3;
pub const RGBA_CHANNELS: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
  #[error(
    "无效的图像尺寸: {width}x{height}, 每像素 {channels} 通道, 期望长度 {expected}, 实际长度 {actual}"
  )]
  InvalidDimensions {
    width: u32,
    height: u32,
    channels: usize,
    expected: usize,
    actual: usize,
  },
}

fn check_dimensions(
  width: u32,
  height: u32,
  channels: usize,
  actual: usize,
) -> Result<(), FrameError> {
  // 乘积溢出按无效尺寸处理
  let expected = (width as usize)
    .checked_mul(height as usize)
    .and_then(|pixels| pixels.checked_mul(channels));
  if width == 0 || height == 0 || channels < RGB_CHANNELS || expected != Some(actual) {
    return Err(FrameError::InvalidDimensions {
      width,
      height,
      channels,
      expected: expected.unwrap_or(usize::MAX),
      actual,
    });
  }
  Ok(())
}

/// 将交错多通道像素缓冲重排为紧凑的 RGB 缓冲
///
/// 每个像素取其前三个通道，行主序不变，数值原样透传：
/// 输出下标 `3*p + c` 来自输入下标 `channels_per_pixel*p + c`。
/// 典型输入是解码器输出的 RGBA 布局（`channels_per_pixel == 4`），
/// 此时即剥除 alpha 通道；`channels_per_pixel == 3` 时为原样拷贝。
pub fn repack_rgb(
  width: u32,
  height: u32,
  channel_data: &[u8],
  channels_per_pixel: usize,
) -> Result<Vec<u8>, FrameError> {
  check_dimensions(width, height, channels_per_pixel, channel_data.len())?;

  let pixels = (width as usize) * (height as usize);
  let mut rgb = vec![0u8; pixels * RGB_CHANNELS];
  for (dst, src) in rgb
    .chunks_exact_mut(RGB_CHANNELS)
    .zip(channel_data.chunks_exact(channels_per_pixel))
  {
    dst[0] = src[0];
    dst[1] = src[1];
    dst[2] = src[2];
  }

  Ok(rgb)
}

/// 外部解码器产生的交错多通道 8 位像素缓冲
///
/// 每个像素的通道值连续存放（例如 R,G,B,A），构造时校验
/// `data.len() == width * height * channels`。
#[derive(Debug, Clone)]
pub struct DecodedImage {
  width: u32,
  height: u32,
  channels: usize,
  data: Vec<u8>,
}

impl DecodedImage {
  pub fn new(
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
  ) -> Result<Self, FrameError> {
    check_dimensions(width, height, channels, data.len())?;
    Ok(Self {
      width,
      height,
      channels,
      data,
    })
  }

  /// 以默认的 RGBA 四通道布局构造
  pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FrameError> {
    Self::new(width, height, RGBA_CHANNELS, data)
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn channels(&self) -> usize {
    self.channels
  }

  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// 重排为 NHWC 布局的 RGB 帧
  pub fn to_nhwc_frame(&self) -> Result<RgbNhwcFrame, FrameError> {
    RgbNhwcFrame::from_interleaved(self.width, self.height, &self.data, self.channels)
  }
}

/// NHWC 布局的 RGB 张量缓冲
///
/// 形状为 `[height, width, 3]`，创建后不再修改；
/// 模型层补上批次维后直接作为推理输入。
#[derive(Debug, Clone)]
pub struct RgbNhwcFrame {
  width: u32,
  height: u32,
  data: Box<[u8]>,
}

impl RgbNhwcFrame {
  /// 从交错多通道缓冲重排构造
  pub fn from_interleaved(
    width: u32,
    height: u32,
    channel_data: &[u8],
    channels_per_pixel: usize,
  ) -> Result<Self, FrameError> {
    let data = repack_rgb(width, height, channel_data, channels_per_pixel)?;
    Ok(Self {
      width,
      height,
      data: data.into_boxed_slice(),
    })
  }

  pub fn width(&self) -> usize {
    self.width as usize
  }

  pub fn height(&self) -> usize {
    self.height as usize
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }
}

impl TryFrom<&DecodedImage> for RgbNhwcFrame {
  type Error = FrameError;

  fn try_from(image: &DecodedImage) -> Result<Self, Self::Error> {
    image.to_nhwc_frame()
  }
}

/// NHWC 帧的借用视图，模型层以此为输入边界
pub trait AsNhwcFrame {
  /// 展平的 NHWC 字节序列
  fn as_nhwc(&self) -> &[u8];
  /// 形状元数据 `[height, width, channels]`
  fn shape(&self) -> [usize; 3];
}

impl AsNhwcFrame for RgbNhwcFrame {
  fn as_nhwc(&self) -> &[u8] {
    &self.data
  }

  fn shape(&self) -> [usize; 3] {
    [self.height as usize, self.width as usize, RGB_CHANNELS]
  }
}
