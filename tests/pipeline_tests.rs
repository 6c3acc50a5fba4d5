use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use tempfile::tempdir;

use text_to_stereogram::config::{DepthSource, Settings};
use text_to_stereogram::{pipeline, Error};

fn settings(tile: PathBuf, map: PathBuf, width: u32, height: u32) -> Settings {
    Settings {
        width,
        height,
        tile_path: tile,
        output_path: None,
        cross_eyed: false,
        pattern_divisor: 2.0,
        depth: DepthSource::Map { path: map },
    }
}

fn write_tile(path: &PathBuf, side: u32) {
    let mut img = RgbaImage::new(side, side);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x * 7 + y) as u8, (y * 13) as u8, (x ^ y) as u8, 255]);
    }
    img.save(path).unwrap();
}

#[test]
fn map_mode_runs_end_to_end_and_is_deterministic() {
    let tmp = tempdir().unwrap();
    let tile_path = tmp.path().join("tile.png");
    let map_path = tmp.path().join("depth.png");
    write_tile(&tile_path, 16);
    let mut map = RgbaImage::new(32, 8);
    for (x, _, px) in map.enumerate_pixels_mut() {
        let v = if x > 16 { 180 } else { 0 };
        *px = Rgba([v, v, v, 255]);
    }
    map.save(&map_path).unwrap();

    let cfg = settings(tile_path, map_path, 64, 32);
    let first = pipeline::run(&cfg).unwrap();
    assert_eq!(first.width(), 64);
    assert_eq!(first.height(), 32);

    let second = pipeline::run(&cfg).unwrap();
    assert_eq!(first.pixels(), second.pixels());
}

#[test]
fn missing_tile_is_a_load_error() {
    let tmp = tempdir().unwrap();
    let map_path = tmp.path().join("depth.png");
    RgbaImage::new(4, 4).save(&map_path).unwrap();

    let cfg = settings(tmp.path().join("nope.png"), map_path, 64, 32);
    assert!(matches!(pipeline::run(&cfg), Err(Error::Load { .. })));
}

#[test]
fn missing_depth_map_is_a_load_error() {
    let tmp = tempdir().unwrap();
    let tile_path = tmp.path().join("tile.png");
    write_tile(&tile_path, 8);

    let cfg = settings(tile_path, tmp.path().join("nope.png"), 64, 32);
    assert!(matches!(pipeline::run(&cfg), Err(Error::Load { .. })));
}

#[test]
fn oversized_tile_is_a_format_error() {
    let tmp = tempdir().unwrap();
    let tile_path = tmp.path().join("tile.png");
    let map_path = tmp.path().join("depth.png");
    RgbaImage::new(65_537, 1).save(&tile_path).unwrap();
    RgbaImage::new(4, 4).save(&map_path).unwrap();

    let cfg = settings(tile_path, map_path, 70_000, 32);
    assert!(matches!(pipeline::run(&cfg), Err(Error::Format(_))));
}

#[test]
fn canvas_smaller_than_tile_is_a_format_error() {
    let tmp = tempdir().unwrap();
    let tile_path = tmp.path().join("tile.png");
    let map_path = tmp.path().join("depth.png");
    write_tile(&tile_path, 16);
    RgbaImage::new(4, 4).save(&map_path).unwrap();

    let cfg = settings(tile_path, map_path, 8, 32);
    assert!(matches!(pipeline::run(&cfg), Err(Error::Format(_))));
}

#[test]
fn saved_png_round_trips_through_the_image_loader() {
    let tmp = tempdir().unwrap();
    let tile_path = tmp.path().join("tile.png");
    let map_path = tmp.path().join("depth.png");
    let out_path = tmp.path().join("out.png");
    write_tile(&tile_path, 16);
    RgbaImage::new(8, 8).save(&map_path).unwrap();

    let cfg = settings(tile_path, map_path, 64, 32);
    let canvas = pipeline::run(&cfg).unwrap();
    pipeline::save_png(&canvas, &out_path).unwrap();

    let reloaded = image::open(&out_path).unwrap().to_rgba8();
    assert_eq!(reloaded, canvas.to_rgba_image());
}

#[test]
fn save_png_to_an_unwritable_path_is_an_encode_error() {
    let tmp = tempdir().unwrap();
    let tile_path = tmp.path().join("tile.png");
    let map_path = tmp.path().join("depth.png");
    write_tile(&tile_path, 8);
    RgbaImage::new(4, 4).save(&map_path).unwrap();

    let cfg = settings(tile_path, map_path, 32, 16);
    let canvas = pipeline::run(&cfg).unwrap();
    let bad = tmp.path().join("no-such-dir").join("out.png");
    assert!(matches!(
        pipeline::save_png(&canvas, &bad),
        Err(Error::Encode(_))
    ));
}
