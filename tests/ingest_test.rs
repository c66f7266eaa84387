//! 画像取り込みテスト
//!
//! フォルダ指定で画像・非画像・壊れた画像が混ざっている場合

use base64::{engine::general_purpose::STANDARD, Engine as _};
use gift_wizard::controller::WizardController;
use gift_wizard::ingest::CompressOptions;
use image::{GenericImageView, ImageBuffer, ImageFormat, Rgba};
use std::collections::HashMap;
use tempfile::tempdir;

fn dimensions_of(data_uri: &str) -> (u32, u32) {
    let encoded = data_uri.strip_prefix("data:image/jpeg;base64,").unwrap();
    let bytes = STANDARD.decode(encoded).unwrap();
    image::load_from_memory(&bytes).unwrap().dimensions()
}

#[tokio::test]
async fn test_ingest_mixed_folder() {
    let dir = tempdir().expect("Failed to create temp dir");

    ImageBuffer::from_pixel(1600, 1200, Rgba([10u8, 20, 30, 255]))
        .save_with_format(dir.path().join("large.png"), ImageFormat::Png)
        .unwrap();
    ImageBuffer::from_pixel(400, 300, Rgba([10u8, 20, 30, 128]))
        .save_with_format(dir.path().join("small.png"), ImageFormat::Png)
        .unwrap();
    ImageBuffer::from_pixel(900, 1800, Rgba([200u8, 20, 30, 255]))
        .save_with_format(dir.path().join("tall.png"), ImageFormat::Png)
        .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    std::fs::write(dir.path().join("broken.jpg"), b"\xFF\xD8\xFFgarbage").unwrap();

    let mut controller = WizardController::new();
    let report = controller
        .ingest(&[dir.path().to_path_buf()], CompressOptions::default())
        .await
        .unwrap();

    assert_eq!(report.added, 3);
    assert_eq!(report.skipped_non_images, vec!["notes.txt".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "broken.jpg");

    // 完了順で追加されるので名前で引く
    let images: HashMap<String, (u32, u32)> = controller
        .state()
        .form
        .outfit_images
        .iter()
        .map(|img| (img.file_name.clone(), dimensions_of(&img.preview_data_uri)))
        .collect();

    assert_eq!(images.len(), 3);
    assert_eq!(images["large.png"], (800, 600));
    assert_eq!(images["small.png"], (400, 300));
    assert_eq!(images["tall.png"], (300, 600));
}

#[tokio::test]
async fn test_ingest_appends_to_existing_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    for path in [&first, &second] {
        ImageBuffer::from_pixel(50, 50, Rgba([1u8, 2, 3, 255]))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    let mut controller = WizardController::new();
    controller
        .ingest(&[first], CompressOptions::default())
        .await
        .unwrap();
    controller
        .ingest(&[second], CompressOptions::default())
        .await
        .unwrap();

    let names: Vec<&str> = controller
        .state()
        .form
        .outfit_images
        .iter()
        .map(|img| img.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["first.png", "second.png"]);

    controller.remove_image(0);
    assert_eq!(controller.state().form.outfit_images[0].file_name, "second.png");
}

#[tokio::test]
async fn test_custom_bounds_from_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("wide.png");
    ImageBuffer::from_pixel(1000, 500, Rgba([1u8, 2, 3, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();

    let options = CompressOptions {
        max_width: 200,
        max_height: 200,
        quality: 50,
    };
    let mut controller = WizardController::new();
    controller.ingest(&[path], options).await.unwrap();

    let image = &controller.state().form.outfit_images[0];
    assert_eq!(dimensions_of(&image.preview_data_uri), (200, 100));
}
