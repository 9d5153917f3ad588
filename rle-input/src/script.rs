//! Scripted key input.
//!
//! A script is a comma-separated list of steps. Each step is one poll's key
//! snapshot: a `+`-joined chord, optionally followed by `*N` to hold it for
//! `N` polls. `idle` is an empty snapshot.
//!
//! ```text
//! right*4, zoom-out, down+right*2, idle, exit
//! ```

use crate::keys::Keys;
use crate::{InputError, InputSource};
use std::collections::VecDeque;
use std::str::FromStr;
use tracing::{debug, trace};

/// Most polls a script may expand to.
pub const MAX_SCRIPT_POLLS: usize = 1_000_000;

/// Expand a script into one snapshot per poll.
///
/// # Errors
///
/// Fails on an unknown key, an empty step, or a repeat count that is zero,
/// malformed or would take the script past [`MAX_SCRIPT_POLLS`].
pub fn parse_script(script: &str) -> Result<Vec<Keys>, InputError> {
    let mut polls = Vec::new();
    if script.trim().is_empty() {
        return Ok(polls);
    }

    for (position, step) in script.split(',').enumerate() {
        let step = step.trim();
        if step.is_empty() {
            return Err(InputError::EmptyStep(position));
        }
        let (chord, count) = match step.split_once('*') {
            Some((chord, count)) => {
                let count: usize = count
                    .trim()
                    .parse()
                    .map_err(|_| InputError::BadRepeat(step.to_string()))?;
                if count == 0 || count > MAX_SCRIPT_POLLS - polls.len() {
                    return Err(InputError::BadRepeat(step.to_string()));
                }
                (chord, count)
            }
            None => (step, 1),
        };
        let keys: Keys = chord.parse()?;
        polls.extend(std::iter::repeat(keys).take(count));
    }

    debug!("Parsed key script into {} polls", polls.len());
    Ok(polls)
}

/// Replays a fixed sequence of snapshots, then holds `EXIT`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<Keys>,
    polled: usize,
}

impl ScriptedInput {
    /// Replay `polls` in order.
    pub fn new(polls: impl IntoIterator<Item = Keys>) -> Self {
        Self {
            pending: polls.into_iter().collect(),
            polled: 0,
        }
    }

    /// Snapshots not yet returned.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Number of polls so far.
    pub fn polled(&self) -> usize {
        self.polled
    }
}

impl FromStr for ScriptedInput {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(parse_script(s)?))
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Keys {
        self.polled += 1;
        let keys = self.pending.pop_front().unwrap_or(Keys::EXIT);
        trace!("Poll {}: {}", self.polled, keys);
        keys
    }
}
