use pretty_assertions::assert_eq;
use rle_input::{parse_script, InputSource, Keys, ManualClock, RepeatGate, ScriptedInput};

/// Test a realistic session script end to end.
#[test]
fn test_session_script() {
    let polls = parse_script("right*4,zoom-out,down+right,back,home").unwrap();
    assert_eq!(
        polls,
        vec![
            Keys::RIGHT,
            Keys::RIGHT,
            Keys::RIGHT,
            Keys::RIGHT,
            Keys::ZOOM_OUT,
            Keys::DOWN | Keys::RIGHT,
            Keys::ZOOM_OUT,
            Keys::EXIT,
        ]
    );
}

#[test]
fn test_scripted_input_holds_exit() {
    let mut input: ScriptedInput = "up".parse().unwrap();
    assert_eq!(input.remaining(), 1);
    assert_eq!(input.poll(), Keys::UP);
    // Exhausted scripts keep asking to exit.
    assert_eq!(input.poll(), Keys::EXIT);
    assert_eq!(input.poll(), Keys::EXIT);
    assert_eq!(input.polled(), 3);
}

#[test]
fn test_boxed_source() {
    let mut input: Box<dyn InputSource> = Box::new(ScriptedInput::new([Keys::ZOOM_IN]));
    assert_eq!(input.poll(), Keys::ZOOM_IN);
}

#[test]
fn test_key_repeat_throttling() {
    let clock = ManualClock::new(0);
    let mut gate = RepeatGate::new(100); // 100ms delay

    // First press should go through
    assert_eq!(gate.filter(Keys::RIGHT, &clock), Keys::RIGHT);

    // Immediate repeat should be throttled
    clock.advance(40);
    assert_eq!(gate.filter(Keys::RIGHT, &clock), Keys::empty());

    // A different chord is a new press
    assert_eq!(gate.filter(Keys::RIGHT | Keys::DOWN, &clock), Keys::RIGHT | Keys::DOWN);

    // After the delay, the held chord repeats
    clock.advance(100);
    assert_eq!(gate.filter(Keys::RIGHT | Keys::DOWN, &clock), Keys::RIGHT | Keys::DOWN);
}

#[test]
fn test_exit_is_never_throttled() {
    let clock = ManualClock::new(0);
    let mut gate = RepeatGate::new(1_000);
    assert_eq!(gate.filter(Keys::EXIT, &clock), Keys::EXIT);
    assert_eq!(gate.filter(Keys::EXIT, &clock), Keys::EXIT);
    assert_eq!(gate.filter(Keys::EXIT | Keys::UP, &clock), Keys::EXIT | Keys::UP);
}
