//! What to spawn: the object catalog.
//!
//! Pointer spawns pick a random kind and a random symbol of that kind.
//! Keyboard spawns map letter and digit keys to the matching letter or
//! number and fall back to a random pick for every other key. Gamepad
//! buttons choose the kind by button index. Keyboard and gamepad inputs have
//! no coordinates, so the catalog also picks a spawn point inside the
//! viewport margin.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use smashpad_types::{ObjectKind, Position};

use crate::config::ViewportConfig;

const EMOJI: &[(&str, &str)] = &[
    ("🐶", "puppy"),
    ("🐱", "kitty"),
    ("🐸", "frog"),
    ("🐘", "elephant"),
    ("🦁", "lion"),
    ("🐧", "penguin"),
    ("🦋", "butterfly"),
    ("🐢", "turtle"),
    ("🍎", "apple"),
    ("🍌", "banana"),
    ("🚗", "car"),
    ("🚂", "train"),
    ("🚀", "rocket"),
    ("⭐", "star"),
    ("🌈", "rainbow"),
    ("🎈", "balloon"),
];

const SHAPES: &[(&str, &str)] = &[
    ("●", "circle"),
    ("■", "square"),
    ("▲", "triangle"),
    ("★", "star"),
    ("♥", "heart"),
    ("◆", "diamond"),
];

const COLOURS: &[&str] = &["red", "orange", "yellow", "green", "blue", "purple", "pink"];

const NUMBER_NAMES: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// One spawnable thing: what it is, how it looks, how it is spoken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Object kind.
    pub kind: ObjectKind,
    /// Glyph drawn on screen.
    pub symbol: String,
    /// Phrase handed to the speech port.
    pub name: String,
}

/// Random source of spawnable objects and spawn points.
#[derive(Debug, Clone)]
pub struct ObjectCatalog {
    rng: StdRng,
}

impl ObjectCatalog {
    /// A catalog with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A catalog seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Random object for a pointer spawn.
    pub fn for_pointer(&mut self) -> CatalogEntry {
        let kind = ObjectKind::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(ObjectKind::Emoji);
        self.of_kind(kind)
    }

    /// Object for a key press, identified by its physical key code
    /// (`KeyA`, `Digit4`, `Numpad7`, ...) or a single printable character.
    pub fn for_key(&mut self, code: &str) -> CatalogEntry {
        if let Some(letter) = letter_for_code(code) {
            return letter_entry(letter);
        }
        if let Some(digit) = digit_for_code(code) {
            return number_entry(digit);
        }
        self.for_pointer()
    }

    /// Object for a gamepad button: the button index picks the kind.
    pub fn for_gamepad(&mut self, button: u32) -> CatalogEntry {
        let slot = usize::try_from(button).unwrap_or(0) % ObjectKind::ALL.len();
        let kind = ObjectKind::ALL.get(slot).copied().unwrap_or(ObjectKind::Emoji);
        self.of_kind(kind)
    }

    /// Random object of a given kind.
    pub fn of_kind(&mut self, kind: ObjectKind) -> CatalogEntry {
        match kind {
            ObjectKind::Emoji => {
                let (symbol, name) = EMOJI
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(("🐶", "puppy"));
                CatalogEntry {
                    kind,
                    symbol: symbol.to_owned(),
                    name: name.to_owned(),
                }
            }
            ObjectKind::Shape => {
                let (symbol, shape) = SHAPES
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(("●", "circle"));
                let colour = COLOURS.choose(&mut self.rng).copied().unwrap_or("red");
                CatalogEntry {
                    kind,
                    symbol: symbol.to_owned(),
                    name: format!("{colour} {shape}"),
                }
            }
            ObjectKind::Letter => {
                let letter = char::from(self.rng.random_range(b'A'..=b'Z'));
                letter_entry(letter)
            }
            ObjectKind::Number => {
                let digit = self.rng.random_range(0..=9_u8);
                number_entry(digit)
            }
        }
    }

    /// Random point inside the viewport, `margin` pixels clear of each edge.
    pub fn random_position(&mut self, viewport: &ViewportConfig) -> Position {
        let span_x = (viewport.width - viewport.margin * 2.0).max(0.0);
        let span_y = (viewport.height - viewport.margin * 2.0).max(0.0);
        let fx: f64 = self.rng.random();
        let fy: f64 = self.rng.random();
        Position::new(
            span_x.mul_add(fx, viewport.margin),
            span_y.mul_add(fy, viewport.margin),
        )
    }
}

fn letter_for_code(code: &str) -> Option<char> {
    let raw = code.strip_prefix("Key").unwrap_or(code);
    let mut chars = raw.chars();
    let c = chars.next()?;
    (chars.next().is_none() && c.is_ascii_alphabetic()).then(|| c.to_ascii_uppercase())
}

fn digit_for_code(code: &str) -> Option<u8> {
    let raw = code
        .strip_prefix("Digit")
        .or_else(|| code.strip_prefix("Numpad"))
        .unwrap_or(code);
    let mut chars = raw.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    c.to_digit(10).and_then(|d| u8::try_from(d).ok())
}

fn letter_entry(letter: char) -> CatalogEntry {
    CatalogEntry {
        kind: ObjectKind::Letter,
        symbol: letter.to_string(),
        name: letter.to_string(),
    }
}

fn number_entry(digit: u8) -> CatalogEntry {
    let name = NUMBER_NAMES
        .get(usize::from(digit))
        .copied()
        .unwrap_or("number");
    CatalogEntry {
        kind: ObjectKind::Number,
        symbol: digit.to_string(),
        name: name.to_owned(),
    }
}
