mod common;

use assert_cmd::Command;
use common::{create_fake_image, create_rgb_image, create_temp_directory, create_transparent_png};
use image::GenericImageView;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("img-compressor").unwrap()
}

#[test]
fn test_cli_help() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_missing_image_argument() {
    cmd().assert().failure();
}

#[test]
fn test_nonexistent_file() {
    cmd()
        .arg("nonexistent.jpg")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_fake_image_fails_without_panic() {
    let temp_dir = create_temp_directory();
    let input = create_fake_image(temp_dir.path(), "test.jpg");

    cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_invalid_quality() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "photo.png", 8, 8);

    cmd()
        .arg(&input)
        .args(["--quality", "96"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quality value"));
}

#[test]
fn test_invalid_resize_ratio() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "photo.png", 8, 8);

    cmd().arg(&input).args(["-r", "0"]).assert().failure();
}

#[test]
fn test_compress_png_keeps_extension() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "photo.png", 64, 48);

    cmd()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Image shape: (64, 48)"))
        .stdout(predicate::str::contains("photo_compressed.png"))
        .stdout(predicate::str::contains("% of the original image size."))
        .stdout(predicate::str::contains("New image shape").not());

    let output = temp_dir.path().join("photo_compressed.png");
    assert_eq!(image::open(output).unwrap().dimensions(), (64, 48));
}

#[test]
fn test_ratio_resize_to_jpg() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "wide.png", 2000, 1000);

    cmd()
        .arg(&input)
        .args(["-j", "-r", "0.5", "-q", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New image shape: (1000, 500)"));

    let output = temp_dir.path().join("wide_compressed.jpg");
    assert_eq!(image::open(output).unwrap().dimensions(), (1000, 500));
    assert!(!temp_dir.path().join("wide_compressed.png").exists());
}

#[test]
fn test_ratio_wins_over_explicit_dimensions() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "photo.jpg", 100, 80);

    cmd()
        .arg(&input)
        .args(["-r", "0.5", "-w", "30", "-H", "20"])
        .assert()
        .success();

    let output = temp_dir.path().join("photo_compressed.jpg");
    assert_eq!(image::open(output).unwrap().dimensions(), (50, 40));
}

#[test]
fn test_explicit_dimensions_need_both() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "photo.jpg", 100, 80);

    cmd().arg(&input).args(["-w", "30"]).assert().success();

    let output = temp_dir.path().join("photo_compressed.jpg");
    assert_eq!(image::open(output).unwrap().dimensions(), (100, 80));
}

#[test]
fn test_transparent_png_is_not_converted() {
    let temp_dir = create_temp_directory();
    let input = create_transparent_png(temp_dir.path(), "logo.png", 32, 32);

    cmd().arg(&input).arg("--to-jpg").assert().success();

    assert!(temp_dir.path().join("logo_compressed.png").exists());
    assert!(!temp_dir.path().join("logo_compressed.jpg").exists());
}

#[test]
fn test_multiple_images_with_save_to() {
    let temp_dir = create_temp_directory();
    let first = create_rgb_image(temp_dir.path(), "first.png", 20, 20);
    let second = create_transparent_png(temp_dir.path(), "second.png", 20, 20);
    let save_to = temp_dir.path().join("compressed");

    cmd()
        .arg(&first)
        .arg(&second)
        .args(["-j", "--save-to"])
        .arg(&save_to)
        .assert()
        .success();

    // transparency only disables conversion for the image that has it
    assert!(save_to.join("first_compressed.jpg").exists());
    assert!(save_to.join("second_compressed.png").exists());
}

#[test]
fn test_failure_aborts_remaining_files() {
    let temp_dir = create_temp_directory();
    let broken = create_fake_image(temp_dir.path(), "broken.png");
    let good = create_rgb_image(temp_dir.path(), "good.png", 10, 10);

    cmd().arg(&broken).arg(&good).assert().failure();

    assert!(!temp_dir.path().join("good_compressed.png").exists());
}

#[test]
fn test_keep_going_processes_remaining_files() {
    let temp_dir = create_temp_directory();
    let broken = create_fake_image(temp_dir.path(), "broken.png");
    let good = create_rgb_image(temp_dir.path(), "good.png", 10, 10);

    cmd()
        .arg(&broken)
        .arg(&good)
        .arg("--keep-going")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 images failed"));

    assert!(temp_dir.path().join("good_compressed.png").exists());
}

#[test]
fn test_quiet_mode_prints_nothing() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "photo.png", 8, 8);

    cmd()
        .arg(&input)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_report_lines_in_order() {
    let temp_dir = create_temp_directory();
    let input = create_rgb_image(temp_dir.path(), "photo.png", 200, 100);

    let assert = cmd().arg(&input).args(["-r", "0.5"]).assert().success();
    assert.stdout(predicate::str::is_match(r"-?\d+\.\d{2}% of the original image size\.").unwrap());

    let output = cmd().arg(&input).args(["-r", "0.5"]).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();

    let labels = [
        "Image shape: (200, 100)",
        "Size before compression:",
        "New image shape: (100, 50)",
        "New file saved:",
        "Size after compression:",
        "Image size change:",
    ];
    let positions: Vec<usize> = labels
        .iter()
        .map(|label| stdout.find(label).unwrap_or_else(|| panic!("missing {label:?} in {stdout}")))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "out of order: {stdout}");

    let original = std::fs::metadata(&input).unwrap().len() as f64;
    let compressed = std::fs::metadata(temp_dir.path().join("photo_compressed.png")).unwrap().len() as f64;
    let expected = format!("{:.2}% of the original image size.", (compressed - original) / original * 100.0);
    assert!(stdout.contains(&expected), "expected {expected:?} in {stdout}");
}

#[test]
fn test_quality_zero_for_every_output_format() {
    let temp_dir = create_temp_directory();
    let mut inputs: Vec<_> = ["png", "jpg", "bmp", "gif", "tiff", "webp"]
        .iter()
        .map(|ext| create_rgb_image(temp_dir.path(), &format!("shot.{ext}"), 24, 16))
        .collect();

    // PNG content under an .avif name, so the output goes through the AVIF encoder
    let avif_input = temp_dir.path().join("shot.avif");
    image::RgbImage::from_pixel(24, 16, image::Rgb([10, 200, 30]))
        .save_with_format(&avif_input, image::ImageFormat::Png)
        .unwrap();
    inputs.push(avif_input);

    for input in &inputs {
        cmd().arg(input).args(["-q", "0"]).assert().success();

        let extension = input.extension().unwrap().to_str().unwrap();
        let output = temp_dir.path().join(format!("shot_compressed.{extension}"));
        assert!(output.exists(), "no output for {}", input.display());
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }
}
