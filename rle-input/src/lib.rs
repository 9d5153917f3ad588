//! rle-input: polled key snapshots for the viewer loop
//!
//! The viewer polls an [`InputSource`] once per iteration and receives the set
//! of keys currently held as [`Keys`]. Held keys repeat every poll, so a
//! [`RepeatGate`] paces them against a [`Clock`].
//!
//! [`ScriptedInput`] replays a textual key script, which is how the host
//! binary and tests drive a session without a keypad:
//!
//! ```
//! use rle_input::{InputSource, Keys, ScriptedInput};
//!
//! let mut input: ScriptedInput = "right*2,zoom-out,down+left".parse().unwrap();
//! assert_eq!(input.poll(), Keys::RIGHT);
//! assert_eq!(input.poll(), Keys::RIGHT);
//! assert_eq!(input.poll(), Keys::ZOOM_OUT);
//! assert_eq!(input.poll(), Keys::DOWN | Keys::LEFT);
//! assert_eq!(input.poll(), Keys::EXIT);
//! ```

mod clock;
mod keys;
mod repeat;
mod script;

use thiserror::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use keys::Keys;
pub use repeat::RepeatGate;
pub use script::{parse_script, ScriptedInput, MAX_SCRIPT_POLLS};

/// Errors raised while parsing key names and scripts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown key name: {0:?}")]
    UnknownKey(String),

    #[error("Invalid repeat count in step {0:?}")]
    BadRepeat(String),

    #[error("Empty step at position {0}")]
    EmptyStep(usize),
}

/// A device that reports which keys are held right now.
pub trait InputSource {
    /// Snapshot of the currently held keys.
    fn poll(&mut self) -> Keys;
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll(&mut self) -> Keys {
        (**self).poll()
    }
}
