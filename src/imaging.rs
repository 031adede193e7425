//! JPEG recompression for uploaded problem screenshots.
//!
//! The clients send screenshots as base64 in whatever format the OS grabbed
//! (usually PNG). We re-encode everything to JPEG at a fixed quality before
//! attaching it to the completion request: the upstream payload shrinks a
//! lot and text stays perfectly legible. No resizing, no format negotiation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

/// Quality used for every re-encode.
pub const JPEG_QUALITY: u8 = 86;

#[derive(Debug, Error)]
pub enum ImageError {
  #[error("image data is not valid base64: {0}")]
  Base64(#[from] base64::DecodeError),
  #[error("could not decode image bytes: {0}")]
  Decode(#[source] image::ImageError),
  #[error("jpeg encoding failed: {0}")]
  Encode(#[source] image::ImageError),
}

/// Decode one base64-encoded image, re-encode it as JPEG at
/// [`JPEG_QUALITY`], and return the result base64-encoded again.
pub fn recompress_jpeg(base64_image: &str) -> Result<String, ImageError> {
  let bytes = BASE64.decode(base64_image.trim())?;
  let decoded = image::load_from_memory(&bytes).map_err(ImageError::Decode)?;
  // JPEG carries no alpha channel; flatten to RGB before encoding.
  let rgb = decoded.to_rgb8();
  let mut out = Vec::new();
  JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
    .encode_image(&rgb)
    .map_err(ImageError::Encode)?;
  Ok(BASE64.encode(&out))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  fn tiny_png_base64() -> String {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 40, 40, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
      .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
      .expect("png encode");
    BASE64.encode(&buf)
  }

  #[test]
  fn valid_png_comes_back_as_jpeg() {
    let out = recompress_jpeg(&tiny_png_base64()).expect("recompress");
    assert!(!out.is_empty());

    let bytes = BASE64.decode(&out).expect("output is base64");
    assert_eq!(image::guess_format(&bytes).expect("guessable"), image::ImageFormat::Jpeg);
    image::load_from_memory(&bytes).expect("output decodes as an image");
  }

  #[test]
  fn garbage_bytes_fail_with_decode_error() {
    let garbage = BASE64.encode(b"definitely not an image");
    assert!(matches!(recompress_jpeg(&garbage), Err(ImageError::Decode(_))));
  }

  #[test]
  fn non_base64_input_fails_with_base64_error() {
    assert!(matches!(recompress_jpeg("!!not-base64!!"), Err(ImageError::Base64(_))));
  }
}
