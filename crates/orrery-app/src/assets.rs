//! Background texture decoding.
//!
//! Image files are decoded to RGBA8 on a small pool of worker threads. The
//! window drains finished decodes at the start of each frame and swaps them
//! into their texture slots, so a slot only ever changes between frames.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} has zero width or height")]
    Empty { path: PathBuf },
}

/// A texture to decode, keyed by its texture slot.
#[derive(Debug, Clone)]
pub struct DecodeRequest {
    pub key: String,
    pub path: PathBuf,
}

/// Decoded pixels ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedTexture {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// The outcome of one request.
#[derive(Debug)]
pub struct DecodeResult {
    pub key: String,
    pub texture: Result<DecodedTexture, AssetError>,
}

/// Read and decode an image file to tightly packed RGBA8.
pub fn decode_texture(path: &Path) -> Result<DecodedTexture, AssetError> {
    let image = image::open(path)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(DecodedTexture {
        rgba: image.into_raw(),
        width,
        height,
    })
}

/// Worker pool that turns [`DecodeRequest`]s into [`DecodeResult`]s.
pub struct TextureLoader {
    request_sender: Option<crossbeam_channel::Sender<DecodeRequest>>,
    result_receiver: crossbeam_channel::Receiver<DecodeResult>,
    worker_handles: Vec<JoinHandle<()>>,
    pending: usize,
}

impl TextureLoader {
    /// Spawn `worker_count` decode threads (at least one).
    pub fn new(worker_count: usize) -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<DecodeRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let worker_handles = (0..worker_count.max(1))
            .map(|_| {
                let rx = request_rx.clone();
                let tx = result_tx.clone();
                std::thread::spawn(move || {
                    while let Ok(request) = rx.recv() {
                        debug!(key = %request.key, path = %request.path.display(), "Decoding texture");
                        let texture = decode_texture(&request.path);
                        if tx
                            .send(DecodeResult {
                                key: request.key,
                                texture,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                })
            })
            .collect();

        Self {
            request_sender: Some(request_tx),
            result_receiver: result_rx,
            worker_handles,
            pending: 0,
        }
    }

    /// Queue a decode. Returns `false` once the loader has shut down.
    pub fn request(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> bool {
        let Some(sender) = &self.request_sender else {
            return false;
        };
        let request = DecodeRequest {
            key: key.into(),
            path: path.into(),
        };
        if sender.send(request).is_err() {
            return false;
        }
        self.pending += 1;
        true
    }

    /// Every result finished since the last call. Never blocks.
    pub fn drain(&mut self) -> Vec<DecodeResult> {
        let results: Vec<_> = self.result_receiver.try_iter().collect();
        self.pending = self.pending.saturating_sub(results.len());
        results
    }

    /// Requests queued or decoding.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn shutdown(&mut self) {
        self.request_sender.take();
        for handle in self.worker_handles.drain(..) {
            if handle.join().is_err() {
                warn!("Texture decode worker panicked");
            }
        }
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        image.save(&path).unwrap();
        path
    }

    fn drain_until(loader: &mut TextureLoader, count: usize) -> Vec<DecodeResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        while results.len() < count {
            results.extend(loader.drain());
            assert!(
                start.elapsed() < Duration::from_secs(10),
                "timed out waiting for decodes"
            );
            std::thread::sleep(Duration::from_millis(5));
        }
        results
    }

    #[test]
    fn test_decode_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "earth.png", 4, 2);
        let decoded = decode_texture(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.rgba.len(), 4 * 2 * 4);
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_texture(&dir.path().join("pluto.jpg")).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("pluto.jpg"));
    }

    #[test]
    fn test_loader_delivers_results() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_png(dir.path(), "moon.png", 8, 8);
        let mut loader = TextureLoader::new(2);

        assert!(loader.request("moon", good));
        assert!(loader.request("sun", dir.path().join("missing.jpg")));
        assert_eq!(loader.pending(), 2);

        let mut results = drain_until(&mut loader, 2);
        results.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(results[0].key, "moon");
        assert!(results[0].texture.is_ok());
        assert_eq!(results[1].key, "sun");
        assert!(results[1].texture.is_err());
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_request_after_shutdown_fails() {
        let mut loader = TextureLoader::new(1);
        loader.shutdown();
        assert!(!loader.request("earth", "earth.jpg"));
        assert!(loader.drain().is_empty());
    }
}
