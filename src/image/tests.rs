use super::*;
use Color as C;

fn mkframe<const W: usize, const H: usize>(data: [[Color; W]; H]) -> Frame {
    let data = data
        .into_iter()
        .flat_map(|row| row.into_iter())
        .flat_map(|col| col.0)
        .collect::<Vec<_>>();
    Frame::from_raw(Resolution::new(W as u32, H as u32), ChannelOrder::Rgb, data)
}

#[test]
fn flip_horizontal() {
    let mut frame = mkframe([
        [C::RED, C::GREEN, C::BLUE],
        [C::WHITE, C::BLACK, C::WHITE],
    ]);
    frame.flip_horizontal_in_place();

    assert_eq!(frame.get(0, 0), C::BLUE);
    assert_eq!(frame.get(1, 0), C::GREEN);
    assert_eq!(frame.get(2, 0), C::RED);
    assert_eq!(frame.get(1, 1), C::BLACK);
}

#[test]
fn channel_order_conversion() {
    let mut frame = Frame::from_raw(
        Resolution::new(1, 1),
        ChannelOrder::Bgr,
        vec![255, 0, 0], // blue-first data
    );
    assert_eq!(frame.get(0, 0), C::BLUE);

    frame.convert(ChannelOrder::Rgb);
    assert_eq!(frame.channel_order(), ChannelOrder::Rgb);
    assert_eq!(frame.get(0, 0), C::BLUE);

    // Converting to the current order leaves the data untouched.
    frame.convert(ChannelOrder::Rgb);
    assert_eq!(frame.get(0, 0), C::BLUE);
}

#[test]
fn put_respects_channel_order() {
    let mut frame = Frame::from_raw(Resolution::new(1, 1), ChannelOrder::Bgr, vec![0, 0, 0]);
    frame.put(0, 0, C::RED);
    assert_eq!(frame.get(0, 0), C::RED);

    frame.convert(ChannelOrder::Rgb);
    assert_eq!(frame.get(0, 0), C::RED);
}

#[test]
fn marker_is_clipped_at_the_border() {
    let mut frame = Frame::new(Resolution::new(4, 4));
    draw::marker(&mut frame, -10, -10);
    draw::marker(&mut frame, 0, 0).color(C::GREEN).size(3);
    assert_eq!(frame.get(0, 0), C::GREEN);
}

#[test]
fn resize_noop_keeps_contents() {
    let mut frame = mkframe([[C::RED, C::GREEN], [C::BLUE, C::WHITE]]);
    frame.resize(Resolution::new(2, 2));
    assert_eq!(frame.get(0, 0), C::RED);
    assert_eq!(frame.get(1, 1), C::WHITE);
}

#[test]
#[should_panic]
fn from_raw_rejects_wrong_buffer_size() {
    Frame::from_raw(Resolution::new(2, 2), ChannelOrder::Rgb, vec![0; 3]);
}
