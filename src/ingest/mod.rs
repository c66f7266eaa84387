//! コーデ画像の取り込み
//!
//! ファイルごとのデコード・圧縮は rayon のスレッドで並列に行い、
//! 結果はチャネル経由で1か所（呼び出し側）だけが状態に書き込む。

pub mod compress;

pub use compress::{compress_image, CompressOptions, CompressedImage};

use crate::error::{Result, WizardError};
use compress::{detect_mime_type, is_image_mime};
use gift_wizard_common::{OutfitImage, RawFile};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 1ファイルの処理結果
#[derive(Debug, Clone)]
pub enum IngestEvent {
    Added(OutfitImage),
    /// 画像でないファイル（黙って除外）
    SkippedNonImage(String),
    /// 画像だがデコード/圧縮に失敗
    Failed { file_name: String, reason: String },
}

/// 取り込みの集計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub added: usize,
    pub skipped_non_images: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl IngestReport {
    pub fn record(&mut self, event: &IngestEvent) {
        match event {
            IngestEvent::Added(_) => self.added += 1,
            IngestEvent::SkippedNonImage(name) => self.skipped_non_images.push(name.clone()),
            IngestEvent::Failed { file_name, reason } => {
                self.failed.push((file_name.clone(), reason.clone()))
            }
        }
    }
}

/// 引数のパスを候補ファイルに展開（フォルダは直下のみ、名前順）
pub fn collect_candidates(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(WizardError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            let mut entries: Vec<PathBuf> = WalkDir::new(path)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 画像ファイルなら中身とMIMEタイプを返す（画像でなければ None）
pub fn read_image_file(path: &Path) -> Result<Option<(Vec<u8>, &'static str)>> {
    let bytes = std::fs::read(path)?;
    match detect_mime_type(path, &bytes) {
        Some(mime) if is_image_mime(mime) => Ok(Some((bytes, mime))),
        _ => Ok(None),
    }
}

/// 圧縮後の保存先（拡張子は .jpg）
pub fn compressed_output_path(output_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    output_dir.join(format!("{}.jpg", stem))
}

/// 1ファイルを読み込んで圧縮（rayonスレッド上で実行）
pub fn process_file(path: &Path, options: &CompressOptions) -> IngestEvent {
    let file_name = file_name_of(path);

    let (bytes, mime_type) = match read_image_file(path) {
        Ok(Some(found)) => found,
        Ok(None) => {
            debug!(file = %file_name, "Skipping non-image file");
            return IngestEvent::SkippedNonImage(file_name);
        }
        Err(e) => {
            warn!(file = %file_name, error = %e, "Failed to read file");
            return IngestEvent::Failed {
                file_name,
                reason: e.to_string(),
            };
        }
    };

    match compress_image(&bytes, options) {
        Ok(compressed) => {
            debug!(
                file = %file_name,
                from = ?compressed.original_size,
                to = ?compressed.size,
                bytes = compressed.jpeg.len(),
                "Compressed outfit image"
            );
            IngestEvent::Added(OutfitImage {
                raw_file: RawFile {
                    path: path.display().to_string(),
                    mime_type: mime_type.to_string(),
                    size: bytes.len() as u64,
                },
                preview_data_uri: compressed.data_uri(),
                file_name,
            })
        }
        Err(e) => {
            warn!(file = %file_name, error = %e, "Failed to compress image");
            IngestEvent::Failed {
                file_name,
                reason: e.to_string(),
            }
        }
    }
}

/// ファイルごとに並列処理を開始し、完了順に結果を流す。
/// 全ファイルの処理が終わるとチャネルが閉じる。
pub fn spawn_ingest(
    files: Vec<PathBuf>,
    options: CompressOptions,
) -> mpsc::UnboundedReceiver<IngestEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    for path in files {
        let tx = tx.clone();
        rayon::spawn(move || {
            let event = process_file(&path, &options);
            // 受信側が先に破棄された場合は捨てる
            let _ = tx.send(event);
        });
    }

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::fs;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        ImageBuffer::from_pixel(width, height, Rgb([200u8, 100, 50]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    #[test]
    fn test_collect_candidates_not_found() {
        let result = collect_candidates(&[PathBuf::from("/nonexistent/outfit.jpg")]);
        assert!(matches!(result, Err(WizardError::FileNotFound(_))));
    }

    #[test]
    fn test_collect_candidates_sorted_and_shallow() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("c.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("b.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("d.jpg"), b"x").unwrap();

        let files = collect_candidates(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name_of(p)).collect();
        assert_eq!(names, vec!["a.png", "b.txt", "c.jpg"]);
    }

    #[test]
    fn test_compressed_output_path() {
        let out = compressed_output_path(Path::new("/tmp/out"), Path::new("/photos/look.PNG"));
        assert_eq!(out, PathBuf::from("/tmp/out/look.jpg"));
    }

    #[test]
    fn test_process_file_outcomes() {
        let dir = TempDir::new().unwrap();
        let options = CompressOptions::default();

        let png = write_png(dir.path(), "look.png", 64, 48);
        match process_file(&png, &options) {
            IngestEvent::Added(image) => {
                assert_eq!(image.file_name, "look.png");
                assert_eq!(image.raw_file.mime_type, "image/png");
                assert!(image.preview_data_uri.starts_with("data:image/jpeg;base64,"));
            }
            other => panic!("unexpected: {:?}", other),
        }

        let text = dir.path().join("notes.txt");
        fs::write(&text, b"hello").unwrap();
        assert!(matches!(
            process_file(&text, &options),
            IngestEvent::SkippedNonImage(name) if name == "notes.txt"
        ));

        let broken = dir.path().join("broken.jpg");
        fs::write(&broken, b"definitely not a jpeg").unwrap();
        assert!(matches!(
            process_file(&broken, &options),
            IngestEvent::Failed { file_name, .. } if file_name == "broken.jpg"
        ));
    }

    #[tokio::test]
    async fn test_spawn_ingest_delivers_every_file() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write_png(dir.path(), "1.png", 30, 20),
            write_png(dir.path(), "2.png", 20, 30),
            write_png(dir.path(), "3.png", 10, 10),
        ];

        let mut rx = spawn_ingest(files, CompressOptions::default());
        let mut report = IngestReport::default();
        while let Some(event) = rx.recv().await {
            report.record(&event);
        }

        assert_eq!(report.added, 3);
        assert!(report.failed.is_empty());
    }
}
