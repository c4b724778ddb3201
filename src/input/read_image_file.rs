// 该文件是 Gewu （格物致知） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use crate::{
  FromUrl,
  frame::{DecodedImage, FrameError, RgbNhwcFrame},
};

use thiserror::Error;
use tracing::{debug, error};
use url::Url;

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(image::ImageError),
  #[error("Frame error: {0}")]
  FrameError(FrameError),
}

impl From<std::io::Error> for ImageFileInputError {
  fn from(err: std::io::Error) -> Self {
    ImageFileInputError::IoError(err)
  }
}

impl From<image::ImageError> for ImageFileInputError {
  fn from(err: image::ImageError) -> Self {
    ImageFileInputError::ImageLoadError(err)
  }
}

impl From<FrameError> for ImageFileInputError {
  fn from(err: FrameError) -> Self {
    ImageFileInputError::FrameError(err)
  }
}

const READ_IMAGE_FILE_SCHEME: &str = "image";

/// 图像文件输入源
///
/// 读取文件的原始字节并解码为 RGBA 交错缓冲；
/// 像素重排推迟到帧迭代时进行。
pub struct ImageFileInput {
  image: Option<DecodedImage>,
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != READ_IMAGE_FILE_SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        READ_IMAGE_FILE_SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    let path = url.path();
    let raw = std::fs::read(path)?;
    debug!("读取图片文件 {} ({} 字节)", path, raw.len());

    let decoded = image::load_from_memory(&raw)?.into_rgba8();
    let (width, height) = decoded.dimensions();
    debug!("解码完成: {}x{} RGBA", width, height);

    let image = DecodedImage::rgba(width, height, decoded.into_raw())?;

    Ok(ImageFileInput { image: Some(image) })
  }
}

impl ImageFileInput {
  /// 解码图像的尺寸（宽, 高）
  pub fn dimensions(&self) -> Option<(u32, u32)> {
    self
      .image
      .as_ref()
      .map(|image| (image.width(), image.height()))
  }

  /// 取出解码后的交错像素缓冲
  pub fn into_image(self) -> Option<DecodedImage> {
    self.image
  }

  /// 转为单帧迭代器，产出重排后的 RGB 帧
  pub fn into_frames(self) -> ImageFileFrames {
    ImageFileFrames { inner: self }
  }
}

pub struct ImageFileFrames {
  inner: ImageFileInput,
}

impl Iterator for ImageFileFrames {
  type Item = Result<RgbNhwcFrame, FrameError>;

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.image.take().map(|decoded| decoded.to_nhwc_frame())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rejects_wrong_scheme() {
    let url = Url::parse("file:///tmp/some.jpg").unwrap();
    assert!(matches!(
      ImageFileInput::from_url(&url),
      Err(ImageFileInputError::SchemaMismatch)
    ));
  }

  #[test]
  fn test_missing_file_is_io_error() {
    let url = Url::parse("image:///no/such/picture.jpg").unwrap();
    assert!(matches!(
      ImageFileInput::from_url(&url),
      Err(ImageFileInputError::IoError(_))
    ));
  }
}
