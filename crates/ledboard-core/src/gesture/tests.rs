use proptest::prelude::*;

use super::*;
use crate::input::{InputEvent, KeyId};

const QUIET_MS: u64 = 10_000;

/// Feeds every edge in order, polling at each deadline that falls before the
/// next edge, then drains until the decoder is quiet.
fn decode(config: DecoderConfig, events: &[InputEvent]) -> Vec<(u64, Gesture)> {
    let mut decoder = GestureDecoder::new(config);
    let mut out = Vec::new();

    for event in events {
        drain_until(&mut decoder, event.at_ms, &mut out);
        if let Some(gesture) = decoder.on_event(*event) {
            out.push((event.at_ms, gesture));
        }
        while let Some(gesture) = decoder.poll(event.at_ms) {
            out.push((event.at_ms, gesture));
        }
    }

    let end = events.last().map_or(0, |event| event.at_ms) + QUIET_MS;
    drain_until(&mut decoder, end, &mut out);
    assert_eq!(decoder.next_deadline(), None, "decoder should be quiet");
    out
}

fn drain_until(decoder: &mut GestureDecoder, until: u64, out: &mut Vec<(u64, Gesture)>) {
    while let Some(deadline) = decoder.next_deadline() {
        if deadline > until {
            break;
        }
        while let Some(gesture) = decoder.poll(deadline) {
            out.push((deadline, gesture));
        }
    }
}

fn gestures(decoded: &[(u64, Gesture)]) -> Vec<Gesture> {
    decoded.iter().map(|(_, gesture)| *gesture).collect()
}

fn tap(at: u64, hold: u64) -> [InputEvent; 2] {
    [
        InputEvent::down(KeyId::Activate, at),
        InputEvent::up(KeyId::Activate, at + hold),
    ]
}

#[test]
fn single_tap_emits_single_press_when_window_closes() {
    let decoded = decode(DecoderConfig::default(), &tap(0, 100));
    assert_eq!(decoded, vec![(300, Gesture::SinglePress)]);
}

#[test]
fn two_taps_inside_window_emit_double_press() {
    let mut events = Vec::new();
    events.extend(tap(0, 50));
    events.extend(tap(100, 50));

    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(decoded, vec![(400, Gesture::DoublePress)]);
}

#[test]
fn five_taps_saturate_at_triple_press() {
    let mut events = Vec::new();
    for idx in 0..5 {
        events.extend(tap(idx * 150, 60));
    }
    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(gestures(&decoded), vec![Gesture::TriplePress]);
}

#[test]
fn taps_outside_window_are_separate_sessions() {
    let mut events = Vec::new();
    events.extend(tap(0, 50));
    events.extend(tap(800, 50));

    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(
        decoded,
        vec![(300, Gesture::SinglePress), (1_100, Gesture::SinglePress)]
    );
}

#[test]
fn long_hold_emits_exactly_one_long_press_on_release() {
    let decoded = decode(DecoderConfig::default(), &tap(0, 600));
    assert_eq!(decoded, vec![(650, Gesture::LongPress)]);
}

#[test]
fn long_press_on_threshold_fires_while_held() {
    let config = DecoderConfig::default().with_long_press_timing(LongPressTiming::OnThreshold);
    let decoded = decode(config, &tap(0, 2_000));
    assert_eq!(decoded, vec![(500, Gesture::LongPress)]);
}

#[test]
fn hold_just_under_threshold_is_a_single_press() {
    let decoded = decode(DecoderConfig::default(), &tap(0, 499));
    assert_eq!(gestures(&decoded), vec![Gesture::SinglePress]);
}

#[test]
fn hold_exactly_at_threshold_is_a_long_press() {
    let decoded = decode(DecoderConfig::default(), &tap(0, 500));
    assert_eq!(gestures(&decoded), vec![Gesture::LongPress]);
}

#[test]
fn long_press_discards_pending_taps() {
    let mut events = Vec::new();
    events.extend(tap(0, 60));
    events.extend(tap(150, 700));

    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(gestures(&decoded), vec![Gesture::LongPress]);
}

#[test]
fn finalize_waits_for_release_when_window_lapses_while_held() {
    let mut decoder = GestureDecoder::new(DecoderConfig::default());
    assert_eq!(decoder.on_event(InputEvent::down(KeyId::Activate, 0)), None);

    // Window closed at 300, but the key is still down.
    assert_eq!(decoder.poll(400), None);
    assert!(decoder.is_key_held());
    assert_eq!(decoder.session().key_down_at, Some(0));

    assert_eq!(decoder.on_event(InputEvent::up(KeyId::Activate, 450)), None);
    assert_eq!(decoder.poll(499), None);
    assert_eq!(decoder.poll(500), Some(Gesture::SinglePress));
    assert_eq!(decoder.next_deadline(), None);
}

#[test]
fn release_bounce_is_absorbed() {
    let events = [
        InputEvent::down(KeyId::Activate, 0),
        InputEvent::up(KeyId::Activate, 80),
        InputEvent::down(KeyId::Activate, 95),
        InputEvent::up(KeyId::Activate, 120),
    ];
    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(decoded, vec![(300, Gesture::SinglePress)]);
}

#[test]
fn repeated_down_while_held_is_ignored() {
    let events = [
        InputEvent::down(KeyId::Activate, 0),
        InputEvent::down(KeyId::Activate, 30),
        InputEvent::down(KeyId::Activate, 60),
        InputEvent::up(KeyId::Activate, 90),
    ];
    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(gestures(&decoded), vec![Gesture::SinglePress]);
}

#[test]
fn unmatched_release_is_ignored() {
    let decoded = decode(
        DecoderConfig::default(),
        &[InputEvent::up(KeyId::Activate, 10)],
    );
    assert!(decoded.is_empty());
}

#[test]
fn rotation_is_throttled_per_direction() {
    let events = [
        InputEvent::down(KeyId::RotateRight, 0),
        InputEvent::down(KeyId::RotateRight, 50),
        InputEvent::down(KeyId::RotateLeft, 60),
        InputEvent::down(KeyId::RotateLeft, 100),
        InputEvent::down(KeyId::RotateRight, 149),
        InputEvent::down(KeyId::RotateRight, 150),
    ];
    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(
        decoded,
        vec![
            (0, Gesture::RotateRight),
            (60, Gesture::RotateLeft),
            (150, Gesture::RotateRight),
        ]
    );
}

#[test]
fn default_rotate_throttle_is_150ms() {
    assert_eq!(DecoderConfig::default().rotate_throttle_ms, 150);
}

#[test]
fn rotations_exactly_one_throttle_apart_both_fire() {
    let events = [
        InputEvent::down(KeyId::RotateLeft, 0),
        InputEvent::down(KeyId::RotateLeft, 150),
    ];
    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(gestures(&decoded), vec![Gesture::RotateLeft, Gesture::RotateLeft]);

    let events = [
        InputEvent::down(KeyId::RotateLeft, 0),
        InputEvent::down(KeyId::RotateLeft, 149),
    ];
    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(gestures(&decoded), vec![Gesture::RotateLeft]);
}

#[test]
fn rotation_releases_and_quit_are_not_gestures() {
    let events = [
        InputEvent::up(KeyId::RotateLeft, 0),
        InputEvent::down(KeyId::Quit, 10),
        InputEvent::up(KeyId::Quit, 20),
    ];
    assert!(decode(DecoderConfig::default(), &events).is_empty());
}

#[test]
fn rotation_during_press_session_does_not_disturb_it() {
    let events = [
        InputEvent::down(KeyId::Activate, 0),
        InputEvent::down(KeyId::RotateLeft, 40),
        InputEvent::up(KeyId::Activate, 80),
    ];
    let decoded = decode(DecoderConfig::default(), &events);
    assert_eq!(
        decoded,
        vec![(40, Gesture::RotateLeft), (300, Gesture::SinglePress)]
    );
}

#[test]
fn deadline_tracks_the_current_phase() {
    let mut decoder = GestureDecoder::new(DecoderConfig::default());
    assert_eq!(decoder.next_deadline(), None);

    decoder.on_event(InputEvent::down(KeyId::Activate, 1_000));
    assert_eq!(decoder.next_deadline(), Some(1_500));

    decoder.on_event(InputEvent::up(KeyId::Activate, 1_100));
    assert_eq!(decoder.next_deadline(), Some(1_150));

    assert_eq!(decoder.poll(1_150), None);
    assert_eq!(decoder.next_deadline(), Some(1_300));
}

#[test]
fn gesture_set_membership() {
    let set = GestureSet::of(&[Gesture::DoublePress, Gesture::RotateLeft]);
    assert!(set.contains(Gesture::DoublePress));
    assert!(set.contains(Gesture::RotateLeft));
    assert!(!set.contains(Gesture::SinglePress));
    assert!(GestureSet::EMPTY.is_empty());
    assert!(GestureSet::ALL.contains(Gesture::LongPress));
    assert!(set.with(Gesture::LongPress).contains(Gesture::LongPress));
}

proptest! {
    #[test]
    fn any_short_tap_is_one_single_press(start in 0u64..100_000, hold in 1u64..500) {
        let decoded = decode(DecoderConfig::default(), &tap(start, hold));
        prop_assert_eq!(gestures(&decoded), vec![Gesture::SinglePress]);
    }

    #[test]
    fn any_long_hold_is_one_long_press(start in 0u64..100_000, hold in 500u64..5_000) {
        let decoded = decode(DecoderConfig::default(), &tap(start, hold));
        prop_assert_eq!(gestures(&decoded), vec![Gesture::LongPress]);
    }

    #[test]
    fn rapid_taps_collapse_to_tap_count_gesture(
        taps in prop::collection::vec((10u64..150, 60u64..140), 1..7)
    ) {
        let mut events = Vec::new();
        let mut at = 0u64;
        for (hold, gap) in &taps {
            events.extend(tap(at, *hold));
            at += hold + gap;
        }

        let expected = Gesture::from_tap_count(taps.len() as u8).unwrap();
        let decoded = decode(DecoderConfig::default(), &events);
        prop_assert_eq!(gestures(&decoded), vec![expected]);
    }

    #[test]
    fn rotation_emissions_respect_throttle(
        gaps in prop::collection::vec(0u64..400, 1..40)
    ) {
        let mut events = Vec::new();
        let mut at = 0u64;
        for gap in gaps {
            at += gap;
            events.push(InputEvent::down(KeyId::RotateLeft, at));
        }

        let decoded = decode(DecoderConfig::default(), &events);
        prop_assert!(!decoded.is_empty());
        for pair in decoded.windows(2) {
            prop_assert!(pair[1].0 - pair[0].0 >= 150);
        }
    }
}
