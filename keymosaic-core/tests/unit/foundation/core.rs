use super::*;

#[test]
fn frame_range_iterates_half_open() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert_eq!(
        r.iter().collect::<Vec<_>>(),
        vec![FrameIndex(2), FrameIndex(3), FrameIndex(4)]
    );
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    let err = FrameRange::new(FrameIndex(4), FrameIndex(3)).unwrap_err();
    assert!(matches!(err, MosaicError::OutOfRange { index: 4, len: 3 }));
    let empty = FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap();
    assert_eq!(empty.iter().count(), 0);
}

#[test]
fn extent_helpers() {
    let e = Extent::new(6, 4);
    assert_eq!(e.area(), 24);
    assert_eq!(e.scaled(2).unwrap(), Extent::new(12, 8));
    assert!(e.contains(Extent::new(6, 1)));
    assert!(!e.contains(Extent::new(7, 1)));
    assert!(Extent::new(0, 3).is_empty());
    assert_eq!(e.to_string(), "6x4");
}

#[test]
fn scaled_overflow_is_an_error() {
    let err = Extent::new(3, 1).scaled(u32::MAX / 2).unwrap_err();
    assert!(matches!(err, MosaicError::InvalidArgument(_)));
    assert_eq!(
        Extent::new(1, 1).scaled(u32::MAX).unwrap(),
        Extent::new(u32::MAX, u32::MAX)
    );
}
