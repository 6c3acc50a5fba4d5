use image::{Rgba, RgbaImage};
use tempfile::tempdir;

use text_to_stereogram::depth;
use text_to_stereogram::raster::{alpha, blue, green, red};

#[test]
fn loaded_maps_keep_their_channels_in_argb_order() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("depth.png");
    let mut img = RgbaImage::new(3, 2);
    img.put_pixel(0, 0, Rgba([11, 22, 33, 255]));
    img.put_pixel(2, 1, Rgba([200, 0, 0, 255]));
    img.save(&path).unwrap();

    let raster = depth::from_map(&path).unwrap();
    assert_eq!(raster.width(), 3);
    assert_eq!(raster.height(), 2);

    let px = raster.get(0, 0);
    assert_eq!(red(px), 11);
    assert_eq!(green(px), 22);
    assert_eq!(blue(px), 33);
    assert_eq!(alpha(px), 255);

    // The synthesizer only consults R; make sure it survives as-is.
    assert_eq!(red(raster.get(2, 1)), 200);
    assert_eq!(red(raster.get(1, 0)), 0);
}

#[test]
fn grayscale_maps_expand_into_the_red_channel() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("gray.png");
    let img = image::GrayImage::from_fn(4, 4, |x, _| image::Luma([(x * 60) as u8]));
    img.save(&path).unwrap();

    let raster = depth::from_map(&path).unwrap();
    for x in 0..4 {
        assert_eq!(red(raster.get(x, 0)), (x * 60) as u8);
    }
}
