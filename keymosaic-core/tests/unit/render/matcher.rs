use image::Rgb;

use super::*;
use crate::foundation::core::FrameIndex;
use crate::select::keyframes::SelectedFrame;

fn checker(w: u32, h: u32, a: [u8; 3], b: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| if (x + y) % 2 == 0 { Rgb(a) } else { Rgb(b) })
}

fn bank_of(images: Vec<RgbImage>, resolution: u32) -> KeyframeBank {
    let kfs: Vec<_> = images
        .into_iter()
        .enumerate()
        .map(|(i, image)| SelectedFrame {
            index: FrameIndex(i as u64),
            image,
        })
        .collect();
    KeyframeBank::build(&kfs, resolution, 2).unwrap()
}

#[test]
fn exact_duplicate_wins() {
    // resolution 1 keeps references at native size, so pixels survive the resize untouched.
    let target = checker(4, 4, [200, 10, 10], [10, 10, 200]);
    let bank = bank_of(
        vec![
            RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])),
            RgbImage::from_pixel(4, 4, Rgb([128, 128, 128])),
            target.clone(),
            checker(4, 4, [10, 200, 10], [200, 200, 10]),
        ],
        1,
    );
    let m = TileMatcher::default();
    assert_eq!(m.find_closest(&target, &bank).unwrap(), 2);
}

#[test]
fn ties_keep_earliest_index() {
    let bank = bank_of(
        vec![
            RgbImage::from_pixel(2, 2, Rgb([10, 10, 10])),
            RgbImage::from_pixel(2, 2, Rgb([30, 30, 30])),
            RgbImage::from_pixel(2, 2, Rgb([30, 30, 30])),
        ],
        1,
    );
    let cell = RgbImage::from_pixel(2, 2, Rgb([30, 30, 30]));
    assert_eq!(TileMatcher::default().find_closest(&cell, &bank).unwrap(), 1);

    // Equidistant from 10 and 30.
    let cell = RgbImage::from_pixel(2, 2, Rgb([20, 20, 20]));
    assert_eq!(TileMatcher::default().find_closest(&cell, &bank).unwrap(), 0);
}

#[test]
fn maximal_distance_everywhere_falls_back_to_index_zero() {
    let bank = bank_of(
        vec![
            RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])),
            RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])),
        ],
        1,
    );
    let cell = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
    assert_eq!(TileMatcher::default().find_closest(&cell, &bank).unwrap(), 0);
}

#[test]
fn clipped_cell_compares_top_left_of_reference() {
    // References differ only outside their top-left 1x1 pixel.
    let mut a = RgbImage::from_pixel(2, 2, Rgb([50, 50, 50]));
    a.put_pixel(0, 0, Rgb([0, 0, 0]));
    let mut b = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
    b.put_pixel(0, 0, Rgb([90, 90, 90]));
    let bank = bank_of(vec![a, b], 1);

    let cell = RgbImage::from_pixel(1, 1, Rgb([90, 90, 90]));
    assert_eq!(TileMatcher::default().find_closest(&cell, &bank).unwrap(), 1);
}

#[test]
fn region_of_frame_matches_like_a_copy() {
    let frame = RgbImage::from_fn(6, 6, |x, y| Rgb([(x * 40) as u8, (y * 40) as u8, 7]));
    let bank = bank_of(
        vec![
            RgbImage::from_pixel(6, 6, Rgb([0, 0, 0])),
            RgbImage::from_pixel(6, 6, Rgb([160, 160, 7])),
        ],
        2,
    );
    let m = TileMatcher::default();
    for cell in [Cell::new(0, 0, 3, 3), Cell::new(3, 3, 3, 3), Cell::new(4, 1, 2, 3)] {
        let copy = image::imageops::crop_imm(&frame, cell.x, cell.y, cell.width, cell.height)
            .to_image();
        assert_eq!(
            m.find_closest_in(&frame, cell, &bank).unwrap(),
            m.find_closest(&copy, &bank).unwrap()
        );
    }
    assert_eq!(m.find_closest_in(&frame, Cell::new(0, 0, 3, 3), &bank).unwrap(), 0);
    assert_eq!(m.find_closest_in(&frame, Cell::new(3, 3, 3, 3), &bank).unwrap(), 1);
}

#[test]
fn cell_larger_than_reference_is_invalid() {
    let bank = bank_of(vec![RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))], 2);
    assert_eq!(bank.step(), Extent::new(2, 2));
    let cell = RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]));
    assert!(matches!(
        TileMatcher::default().find_closest(&cell, &bank),
        Err(MosaicError::InvalidArgument(_))
    ));
}

#[test]
fn cell_outside_frame_is_invalid() {
    let bank = bank_of(vec![RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))], 1);
    let frame = RgbImage::new(4, 4);
    assert!(matches!(
        TileMatcher::default().find_closest_in(&frame, Cell::new(3, 0, 2, 2), &bank),
        Err(MosaicError::InvalidArgument(_))
    ));
}

#[test]
fn absolute_sum_sees_cancelling_channels() {
    let bank = bank_of(
        vec![
            RgbImage::from_pixel(2, 2, Rgb([100, 100, 100])),
            RgbImage::from_pixel(2, 2, Rgb([180, 100, 30])),
        ],
        1,
    );
    let cell = RgbImage::from_pixel(2, 2, Rgb([190, 100, 10]));
    // Signed: |90+0-90| = 0 vs |10+0-20| = 10, so the grey keyframe wins.
    let signed = TileMatcher::new(ChannelDistance::SignedSum);
    assert_eq!(signed.find_closest(&cell, &bank).unwrap(), 0);
    // Absolute: 180 vs 30.
    let absolute = TileMatcher::new(ChannelDistance::AbsoluteSum);
    assert_eq!(absolute.find_closest(&cell, &bank).unwrap(), 1);
}
