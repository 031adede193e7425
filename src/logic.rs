//! Request flows behind the HTTP handlers.
//!
//! This includes:
//!   - Fan-out/fan-in JPEG recompression of every screenshot in a request
//!   - The optional scratch-dir dump of compressed images
//!   - The upstream completion calls and their error collapse

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future;
use tracing::{debug, instrument, warn};

use crate::domain::{ProblemDescription, Solution};
use crate::error::ApiError;
use crate::imaging;
use crate::state::AppState;

/// Extraction flow: compress all images concurrently (order preserved),
/// optionally dump them for debugging, then ask the vision model for the
/// structured problem.
#[instrument(level = "info", skip(state, images), fields(image_count = images.len(), %language))]
pub async fn extract_problem(
  state: &AppState,
  images: &[String],
  language: &str,
) -> Result<ProblemDescription, ApiError> {
  let compressed = compress_all(images).await?;
  dump_compressed_images(state, &compressed);

  state
    .openai
    .extract_problem(&state.prompts, &compressed)
    .await
    .map_err(ApiError::extraction)
}

/// Generation flow: single text completion against the solver model.
#[instrument(level = "info", skip(state, problem), fields(%language, difficulty = %problem.difficulty))]
pub async fn generate_solution(
  state: &AppState,
  problem: &ProblemDescription,
  language: &str,
) -> Result<Solution, ApiError> {
  state
    .openai
    .generate_solution(&state.prompts, problem, language)
    .await
    .map_err(ApiError::generation)
}

/// Recompress every image on the blocking pool and wait for all of them.
/// Results come back in input order; the first failure fails the request
/// with no partial results.
async fn compress_all(images: &[String]) -> Result<Vec<String>, ApiError> {
  let handles: Vec<_> = images
    .iter()
    .cloned()
    .map(|b64| tokio::task::spawn_blocking(move || imaging::recompress_jpeg(&b64)))
    .collect();

  let joined = future::try_join_all(handles)
    .await
    .map_err(ApiError::extraction)?;

  joined
    .into_iter()
    .enumerate()
    .map(|(idx, res)| {
      res.map_err(|e| ApiError::InvalidRequest(format!("imageDataList[{idx}]: {e}")))
    })
    .collect()
}

/// Fire-and-forget dump of the compressed JPEGs into the configured scratch
/// directory, named by position and wall-clock. Purely for debugging; any
/// failure is logged and ignored.
fn dump_compressed_images(state: &AppState, images_b64: &[String]) {
  let Some(dir) = state.settings.image_dump_dir.clone() else {
    return;
  };
  let images: Vec<String> = images_b64.to_vec();

  tokio::spawn(async move {
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
      warn!(target: "snapsolve", dir = %dir.display(), error = %e, "could not create image dump dir");
      return;
    }
    let stamp = chrono::Utc::now().timestamp_millis();
    for (idx, b64) in images.iter().enumerate() {
      let Ok(bytes) = BASE64.decode(b64) else { continue };
      let path = dir.join(format!("image_{idx}_{stamp}.jpeg"));
      match tokio::fs::write(&path, &bytes).await {
        Ok(()) => debug!(target: "snapsolve", path = %path.display(), "dumped compressed image"),
        Err(e) => {
          warn!(target: "snapsolve", path = %path.display(), error = %e, "failed to write debug image")
        }
      }
    }
  });
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  fn png_base64(side: u32) -> String {
    let img = image::RgbaImage::from_pixel(side, side, image::Rgba([10, 120, 240, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
      .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
      .expect("png encode");
    BASE64.encode(&buf)
  }

  #[tokio::test]
  async fn compress_all_preserves_order_and_count() {
    let inputs = vec![png_base64(4), png_base64(16), png_base64(8)];
    let out = compress_all(&inputs).await.expect("all valid");
    assert_eq!(out.len(), 3);
    // Outputs must be JPEGs lining up with their inputs by position.
    let dims: Vec<u32> = out
      .iter()
      .map(|b64| {
        let bytes = BASE64.decode(b64).expect("base64");
        assert_eq!(image::guess_format(&bytes).expect("format"), image::ImageFormat::Jpeg);
        image::load_from_memory(&bytes).expect("decodable").width()
      })
      .collect();
    assert_eq!(dims, vec![4, 16, 8]);
  }

  #[tokio::test]
  async fn one_bad_image_fails_the_whole_batch() {
    let inputs = vec![png_base64(4), BASE64.encode(b"not an image")];
    let err = compress_all(&inputs).await.unwrap_err();
    let ApiError::InvalidRequest(message) = err else {
      panic!("expected InvalidRequest");
    };
    assert!(message.contains("imageDataList[1]"), "{message}");
  }
}
