//! # Command Parsing
//!
//! Turns lines of typed text into key presses for the terminal front-end.
//!
//! Each whitespace-separated token is either a named key (`up`, `esc`,
//! `enter`, ...) or a run of single-character keys, so `hhj` is three
//! presses. An empty line is a single `Enter`.

use crate::NargylResult;
use std::collections::VecDeque;
use std::io::BufRead;

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
}

/// Parses one token into the keys it stands for.
///
/// # Examples
///
/// ```
/// use nargyl::{parse_keys, Key};
///
/// assert_eq!(parse_keys("esc"), vec![Key::Escape]);
/// assert_eq!(parse_keys("gi"), vec![Key::Char('g'), Key::Char('i')]);
/// ```
pub fn parse_keys(token: &str) -> Vec<Key> {
    let named = match token.to_ascii_lowercase().as_str() {
        "up" => Some(Key::Up),
        "down" => Some(Key::Down),
        "left" => Some(Key::Left),
        "right" => Some(Key::Right),
        "esc" | "escape" => Some(Key::Escape),
        "enter" | "return" => Some(Key::Enter),
        _ => None,
    };
    match named {
        Some(key) => vec![key],
        None => token.chars().map(Key::Char).collect(),
    }
}

/// Menu option index for a letter key: `a` is 0, `z` is 25.
pub fn menu_index(key: Key) -> Option<usize> {
    match key {
        Key::Char(c) if c.is_ascii_lowercase() => Some((c as u8 - b'a') as usize),
        _ => None,
    }
}

/// Letter shown next to the option at `index`.
pub fn menu_letter(index: usize) -> Option<char> {
    if index < 26 {
        Some((b'a' + index as u8) as char)
    } else {
        None
    }
}

/// Buffered key source over a line reader.
pub struct KeyReader<R> {
    reader: R,
    pending: VecDeque<Key>,
}

impl<R: BufRead> KeyReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Next key press, reading another line when the buffer runs dry.
    /// Returns `None` at end of input.
    pub fn next_key(&mut self) -> NargylResult<Option<Key>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                self.pending.push_back(Key::Enter);
            }
            for token in tokens {
                self.pending.extend(parse_keys(token));
            }
        }
        Ok(self.pending.pop_front())
    }
}
