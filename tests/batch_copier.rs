use std::fs;

use image::{GrayImage, Luma, Rgb, RgbImage};
use inception_prep::batch::{list_image_paths, BatchCopier, DEFAULT_IMAGE_FORMATS};
use inception_prep::{PrepError, TargetSize};

fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, 200, (y * 10) as u8])
    })
}

#[test]
fn reformat_creates_missing_output_folder() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("a.png");
    gradient_rgb(32, 20).save(&source).unwrap();

    let output_dir = temp.path().join("out").join("nested");
    assert!(!output_dir.exists());

    let size = TargetSize::new(16, 12).unwrap();
    let written = BatchCopier::reformat_and_copy(&source, size, &output_dir).unwrap();

    assert_eq!(written, output_dir.join("reform_incept_v3_a.png"));
    let output = image::open(&written).unwrap();
    assert_eq!((output.width(), output.height()), (16, 12));
    // 单通道灰度输出
    assert_eq!(output.color(), image::ColorType::L8);
}

#[test]
fn reformat_twice_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("scan.jpg");
    gradient_rgb(40, 40).save(&source).unwrap();
    let output_dir = temp.path().join("reformatted");
    let size = TargetSize::new(8, 8).unwrap();

    let first = BatchCopier::reformat_all(&[source.clone()], size, &output_dir).unwrap();
    let second = BatchCopier::reformat_all(&[source], size, &output_dir).unwrap();

    assert_eq!(first, second);
    let entries: Vec<_> = fs::read_dir(&output_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert!(output_dir.join("reform_incept_v3_scan.jpg").exists());
}

#[test]
fn grayscale_output_uses_first_channel() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("left_right.png");
    // 红色通道左暗右亮，绿色通道恒定
    let mut img = RgbImage::new(4, 4);
    for (x, _, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([if x < 2 { 10 } else { 250 }, 128, 0]);
    }
    img.save(&source).unwrap();

    let written =
        BatchCopier::reformat_and_copy(&source, TargetSize::new(4, 4).unwrap(), temp.path()).unwrap();
    let output = image::open(written).unwrap().to_luma8();
    assert_eq!(output.get_pixel(0, 0).0, [0]);
    assert_eq!(output.get_pixel(3, 3).0, [255]);
}

#[test]
fn all_zero_image_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("black.png");
    GrayImage::from_pixel(6, 6, Luma([0])).save(&source).unwrap();

    let err = BatchCopier::reformat_and_copy(&source, TargetSize::new(4, 4).unwrap(), temp.path())
        .unwrap_err();
    assert!(matches!(err, PrepError::DegenerateImage(_)));
}

#[test]
fn first_bad_file_aborts_the_batch() {
    let temp = tempfile::tempdir().unwrap();
    let input = temp.path().join("in");
    fs::create_dir_all(&input).unwrap();
    gradient_rgb(8, 8).save(input.join("a.png")).unwrap();
    fs::write(input.join("b.png"), b"not a png").unwrap();
    gradient_rgb(8, 8).save(input.join("c.png")).unwrap();

    let output_dir = temp.path().join("out");
    let paths = list_image_paths(&input, DEFAULT_IMAGE_FORMATS).unwrap();
    let result = BatchCopier::reformat_all(&paths, TargetSize::new(4, 4).unwrap(), &output_dir);

    assert!(result.is_err());
    assert!(output_dir.join("reform_incept_v3_a.png").exists());
    assert!(!output_dir.join("reform_incept_v3_c.png").exists());
}

#[test]
fn copy_keeps_pixels_and_prefixes_name() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("a.png");
    let original = gradient_rgb(5, 3);
    original.save(&source).unwrap();

    let output_dir = temp.path().join("copies");
    let written = BatchCopier::copy_all(&[source], &output_dir).unwrap();

    assert_eq!(written, vec![output_dir.join("copied a.png")]);
    let copied = image::open(&written[0]).unwrap().to_rgb8();
    assert_eq!(copied, original);
}

#[test]
fn broken_dicom_file_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("scan.dcm");
    fs::write(&source, b"definitely not DICOM").unwrap();

    let err = BatchCopier::reformat_all(&[source], TargetSize::default(), temp.path()).unwrap_err();
    assert!(matches!(err, PrepError::Dicom(_)));
}
