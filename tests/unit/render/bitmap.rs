use super::*;

fn checker(width: u32, height: u32) -> Bitmap {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let v = (y * width + x) as u8 + 1;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Bitmap::from_premul_rgba8(width, height, data).unwrap()
}

#[test]
fn from_premul_rejects_wrong_length() {
    let err = Bitmap::from_premul_rgba8(2, 2, vec![0; 15]).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn anchored_grow_keeps_pixels_in_place_and_pads_transparent() {
    let src = checker(2, 2);
    let out = src.anchored(4, 3);
    assert_eq!((out.width(), out.height()), (4, 3));
    assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
    assert_eq!(out.pixel(1, 1), src.pixel(1, 1));
    assert_eq!(out.pixel(2, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(0, 2), Some([0, 0, 0, 0]));
    assert_eq!(out.painted_pixels(), 4);
}

#[test]
fn anchored_shrink_crops_bottom_right() {
    let src = checker(3, 3);
    let out = src.anchored(2, 1);
    assert_eq!(out.data(), &src.data()[..8]);
}

#[test]
fn straight_alpha_conversion_premultiplies_and_restores() {
    let mut img = image::RgbaImage::new(2, 1);
    img.put_pixel(0, 0, image::Rgba([200, 100, 0, 128]));
    img.put_pixel(1, 0, image::Rgba([9, 9, 9, 0]));

    let bmp = Bitmap::from_rgba_image(&img);
    assert_eq!(bmp.pixel(0, 0), Some([100, 50, 0, 128]));
    assert_eq!(bmp.pixel(1, 0), Some([0, 0, 0, 0]));

    let back = bmp.to_rgba_image();
    let px = back.get_pixel(0, 0).0;
    assert!(px[0].abs_diff(200) <= 2 && px[1].abs_diff(100) <= 2, "{px:?}");
    assert_eq!(px[3], 128);
    assert_eq!(back.get_pixel(1, 0).0, [0, 0, 0, 0]);
}

#[test]
fn painted_bounds_tracks_non_transparent_pixels() {
    let mut bmp = Bitmap::transparent(5, 4);
    assert!(bmp.painted_bounds().is_none());
    let idx = (2 * 5 + 1) * 4;
    bmp.data_mut()[idx + 3] = 255;
    let idx = (3 * 5 + 4) * 4;
    bmp.data_mut()[idx + 3] = 10;
    assert_eq!(
        bmp.painted_bounds(),
        Some(PixelBounds {
            x0: 1,
            y0: 2,
            x1: 4,
            y1: 3
        })
    );
    assert_eq!(bmp.painted_pixels(), 2);
    assert_eq!(bmp.pixel(5, 0), None);
}

#[test]
fn png_save_and_open_preserve_opaque_pixels() {
    let dir = std::path::PathBuf::from("target").join("bitmap_png");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("checker.png");

    let src = checker(3, 2);
    src.save_png(&path).unwrap();
    let back = Bitmap::open(&path).unwrap();
    assert_eq!(back, src);
}
