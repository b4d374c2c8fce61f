use image::Rgb;

use super::*;
use crate::io::sink::InMemorySink;
use crate::io::source::InMemoryFrames;
use crate::metric::sample::ChannelDistance;

fn solid(v: u8) -> RgbImage {
    RgbImage::from_pixel(10, 10, Rgb([v, v, v]))
}

fn ramp() -> Vec<RgbImage> {
    [0u8, 5, 40, 45, 120, 121, 122, 250, 10, 10]
        .into_iter()
        .map(solid)
        .collect()
}

struct FailingSink {
    fail_at: usize,
    calls: usize,
}

impl FrameSink for FailingSink {
    fn persist(&mut self, _index: FrameIndex, _image: &RgbImage) -> MosaicResult<()> {
        self.calls += 1;
        if self.calls > self.fail_at {
            return Err(MosaicError::Other(anyhow::anyhow!("disk full")));
        }
        Ok(())
    }
}

#[test]
fn identical_black_frames_select_only_first() {
    let frames = vec![solid(0), solid(0), solid(0)];
    let sel = KeyframeSelector::default();
    assert_eq!(sel.select_indices(&frames).unwrap(), vec![FrameIndex(0)]);
}

#[test]
fn black_then_white_selects_both() {
    let frames = vec![solid(0), solid(255)];
    let sel = KeyframeSelector::default();
    let picked = sel.select(&frames).unwrap();
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[1].index, FrameIndex(1));
    assert_eq!(picked[1].image, frames[1]);
}

#[test]
fn single_frame_yields_single_keyframe() {
    let sel = KeyframeSelector::default();
    assert_eq!(sel.select_indices(&[solid(7)]).unwrap(), vec![FrameIndex(0)]);
}

#[test]
fn empty_input_fails() {
    let sel = KeyframeSelector::default();
    assert!(matches!(sel.select_indices(&[]), Err(MosaicError::EmptyInput(_))));
    let mut sink = InMemorySink::new();
    assert!(matches!(
        sel.select_from_source(&InMemoryFrames::default(), &mut sink),
        Err(MosaicError::EmptyInput(_))
    ));
}

#[test]
fn comparison_is_against_last_selected_not_previous_frame() {
    // Each step is +20 (score 20 <= 24) but the drift from the last keyframe grows.
    let frames: Vec<_> = [0u8, 20, 40, 60, 80].into_iter().map(solid).collect();
    let sel = KeyframeSelector::default();
    assert_eq!(
        sel.select_indices(&frames).unwrap(),
        vec![FrameIndex(0), FrameIndex(2), FrameIndex(4)]
    );
}

#[test]
fn threshold_is_strict() {
    let frames = vec![solid(0), solid(24)];
    let at = KeyframeSelector::new(SampleMetric::default(), 24.0);
    assert_eq!(at.select_indices(&frames).unwrap().len(), 1);
    let below = KeyframeSelector::new(SampleMetric::default(), 23.9);
    assert_eq!(below.select_indices(&frames).unwrap().len(), 2);
}

#[test]
fn output_is_strictly_increasing_and_starts_at_zero() {
    let frames = ramp();
    for t in [0.0, 1.0, 4.0, 24.0, 80.0, 300.0] {
        let sel = KeyframeSelector::new(SampleMetric::default(), t);
        let idx = sel.select_indices(&frames).unwrap();
        assert_eq!(idx[0], FrameIndex(0));
        assert!(idx.windows(2).all(|w| w[0] < w[1]), "t={t}: {idx:?}");
    }
}

#[test]
fn selection_is_idempotent() {
    let frames = ramp();
    let sel = KeyframeSelector::default();
    let a = sel.select_indices(&frames).unwrap();
    let b = sel.select_indices(&frames).unwrap();
    assert_eq!(a, b);
}

#[test]
fn higher_threshold_never_selects_more() {
    let frames = ramp();
    let thresholds = [0.0, 0.5, 2.0, 10.0, 24.0, 40.0, 100.0, 255.0];
    let counts: Vec<usize> = thresholds
        .iter()
        .map(|&t| {
            KeyframeSelector::new(SampleMetric::default(), t)
                .select_indices(&frames)
                .unwrap()
                .len()
        })
        .collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
}

#[test]
fn distance_strategy_changes_what_counts_as_a_cut() {
    // Red up, blue down: signed deltas cancel.
    let a = RgbImage::from_pixel(10, 10, Rgb([100, 100, 100]));
    let b = RgbImage::from_pixel(10, 10, Rgb([200, 100, 0]));
    let frames = vec![a, b];

    let signed = KeyframeSelector::new(SampleMetric::new(30, ChannelDistance::SignedSum), 24.0);
    assert_eq!(signed.select_indices(&frames).unwrap().len(), 1);

    let abs = KeyframeSelector::new(SampleMetric::new(30, ChannelDistance::AbsoluteSum), 24.0);
    assert_eq!(abs.select_indices(&frames).unwrap().len(), 2);
}

#[test]
fn streaming_matches_slice_and_persists_by_keyframe_number() {
    let frames = ramp();
    let sel = KeyframeSelector::default();
    let expected = sel.select(&frames).unwrap();

    let source = InMemoryFrames::new(frames);
    let mut store = InMemorySink::new();
    let streamed = sel.select_from_source(&source, &mut store).unwrap();

    assert_eq!(streamed, expected);
    let numbers: Vec<_> = store.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(numbers, (0..expected.len() as u64).collect::<Vec<_>>());
    for ((_, persisted), kf) in store.frames().iter().zip(&expected) {
        assert_eq!(persisted, &kf.image);
    }
}

#[test]
fn store_failure_propagates_without_changing_selection() {
    let frames = ramp();
    let sel = KeyframeSelector::default();
    let expected = sel.select_indices(&frames).unwrap();
    assert!(expected.len() >= 2);

    let source = InMemoryFrames::new(frames);
    let mut failing = FailingSink {
        fail_at: 1,
        calls: 0,
    };
    let err = sel.select_from_source(&source, &mut failing).unwrap_err();
    assert!(err.to_string().contains("disk full"));
    assert_eq!(failing.calls, 2);

    let mut ok = InMemorySink::new();
    let again: Vec<_> = sel
        .select_from_source(&source, &mut ok)
        .unwrap()
        .into_iter()
        .map(|k| k.index)
        .collect();
    assert_eq!(again, expected);
}
