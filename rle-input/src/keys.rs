use crate::InputError;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Keys held during one poll.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Keys: u8 {
        const UP       = 1 << 0;
        const DOWN     = 1 << 1;
        const LEFT     = 1 << 2;
        const RIGHT    = 1 << 3;
        const ZOOM_IN  = 1 << 4; // "ok" on the keypad
        const ZOOM_OUT = 1 << 5; // "back" on the keypad
        const EXIT     = 1 << 6; // "home" on the keypad
    }
}

/// Canonical names, in display order.
const NAMES: [(&str, Keys); 7] = [
    ("up", Keys::UP),
    ("down", Keys::DOWN),
    ("left", Keys::LEFT),
    ("right", Keys::RIGHT),
    ("zoom-in", Keys::ZOOM_IN),
    ("zoom-out", Keys::ZOOM_OUT),
    ("exit", Keys::EXIT),
];

impl Keys {
    /// Pan direction as `(x, y)` steps; opposite keys cancel.
    pub fn pan_steps(self) -> (i32, i32) {
        let axis = |neg: Keys, pos: Keys| {
            i32::from(self.contains(pos)) - i32::from(self.contains(neg))
        };
        (axis(Keys::LEFT, Keys::RIGHT), axis(Keys::UP, Keys::DOWN))
    }

    /// True if any directional key is held.
    pub fn is_pan(self) -> bool {
        self.intersects(Keys::UP | Keys::DOWN | Keys::LEFT | Keys::RIGHT)
    }

    /// True if either zoom key is held.
    pub fn is_zoom(self) -> bool {
        self.intersects(Keys::ZOOM_IN | Keys::ZOOM_OUT)
    }

    /// Look up a single key by name. Keypad names (`ok`, `back`, `home`) are
    /// accepted as aliases.
    pub fn from_name(name: &str) -> Result<Keys, InputError> {
        let lower = name.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "ok" | "zoomin" | "zoom_in" => Keys::ZOOM_IN,
            "back" | "zoomout" | "zoom_out" => Keys::ZOOM_OUT,
            "home" | "quit" => Keys::EXIT,
            "idle" | "none" => Keys::empty(),
            other => NAMES
                .iter()
                .find(|(n, _)| *n == other)
                .map(|(_, k)| *k)
                .ok_or_else(|| InputError::UnknownKey(name.trim().to_string()))?,
        };
        Ok(key)
    }
}

impl FromStr for Keys {
    type Err = InputError;

    /// Parse a `+`-joined chord such as `down+right`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('+')
            .try_fold(Keys::empty(), |acc, name| Ok(acc | Keys::from_name(name)?))
    }
}

impl fmt::Display for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "idle");
        }
        let mut first = true;
        for (name, key) in NAMES {
            if self.contains(key) {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}
