//! # Terminal Display
//!
//! An ASCII front-end over any line reader and writer.
//!
//! The map is drawn as text: `#` for walls and `.` for lit floor, with
//! remembered-but-unlit floor shown as `,`. Entities are drawn in list
//! order over the map, so later entities cover earlier ones.

use crate::{
    menu_index, menu_letter, xp_to_next_level, GameState, InputHandler, InputSource, KeyReader,
    MenuPresenter, NargylError, NargylResult, PlayerInput, Position, Renderer,
};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

/// Text front-end reading typed keys and writing whole frames.
pub struct TerminalDisplay<R, W> {
    keys: KeyReader<R>,
    out: W,
    handler: InputHandler,
    last_frame: Option<String>,
}

impl<R: BufRead, W: Write> TerminalDisplay<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            keys: KeyReader::new(reader),
            out: writer,
            handler: InputHandler::new(),
            last_frame: None,
        }
    }

    /// Consumes the display, returning the writer.
    pub fn into_writer(self) -> W {
        self.out
    }
}

/// The glyph drawn for a map tile, or `' '` if it was never seen.
fn tile_glyph(state: &GameState, pos: Position) -> char {
    let wall = state.map.blocks_sight(pos);
    if state.is_visible(pos) {
        if wall {
            '#'
        } else {
            '.'
        }
    } else if state.map.is_explored(pos) {
        if wall {
            '#'
        } else {
            ','
        }
    } else {
        ' '
    }
}

/// Renders a whole frame of map and status panel as text.
pub fn render_frame(state: &GameState) -> String {
    let width = state.map.width as usize;
    let height = state.map.height as usize;
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| tile_glyph(state, Position::new(x as i32, y as i32)))
                .collect()
        })
        .collect();

    for entity in &state.entities {
        let pos = entity.position;
        let shown = state.is_visible(pos) || (entity.always_visible && state.map.is_explored(pos));
        if !shown || entity.glyph == ' ' || !state.map.is_valid_position(pos) {
            continue;
        }
        rows[pos.y as usize][pos.x as usize] = entity.glyph;
    }

    let mut frame = String::with_capacity((width + 1) * (height + 10));
    for row in rows {
        frame.extend(row);
        frame.push('\n');
    }

    let player = state.player_id;
    let level = state.player().map_or(1, |p| p.level);
    let xp = state
        .player()
        .ok()
        .and_then(|p| p.fighter.as_ref())
        .map_or(0, |f| f.xp);
    let _ = writeln!(
        frame,
        "HP: {}/{}  XP: {}/{}  Level: {}  Dungeon level: {}",
        state.hp(player),
        state.max_hp(player),
        xp,
        xp_to_next_level(level),
        level,
        state.dungeon_level
    );
    let under = state.names_under_player();
    if !under.is_empty() {
        let _ = writeln!(frame, "Here: {}", under);
    }
    for message in state.messages.iter() {
        let _ = writeln!(frame, "{}", message.text);
    }
    frame
}

impl<R: BufRead, W: Write> Renderer for TerminalDisplay<R, W> {
    fn render(&mut self, state: &GameState) -> NargylResult<()> {
        let frame = render_frame(state);
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.last_frame = Some(frame);
        Ok(())
    }
}

impl<R: BufRead, W: Write> InputSource for TerminalDisplay<R, W> {
    fn poll_input(&mut self) -> NargylResult<Option<PlayerInput>> {
        match self.keys.next_key()? {
            Some(key) => Ok(self.handler.map_key(key)),
            // Input closed: leave the game so it gets saved
            None => Ok(Some(PlayerInput::Exit)),
        }
    }
}

impl<R: BufRead, W: Write> MenuPresenter for TerminalDisplay<R, W> {
    fn menu(
        &mut self,
        header: &str,
        options: &[String],
        width: usize,
    ) -> NargylResult<Option<usize>> {
        if options.len() > 26 {
            return Err(NargylError::InvalidAction(
                "Cannot have a menu with more than 26 options.".to_string(),
            ));
        }

        let mut text = String::new();
        for line in header.lines() {
            let _ = writeln!(text, "{:width$}", line, width = width);
        }
        if !options.is_empty() {
            text.push('\n');
        }
        for (index, option) in options.iter().enumerate() {
            let letter = menu_letter(index).unwrap_or('?');
            let _ = writeln!(text, "({}) {}", letter, option);
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        // The menu covers the map; draw it again afterwards
        self.last_frame = None;

        let key = self.keys.next_key()?.ok_or_else(|| {
            NargylError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while a menu was open",
            ))
        })?;
        Ok(menu_index(key).filter(|index| *index < options.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{monster, open_state};
    use crate::{Direction, Entity};
    use std::io::Cursor;

    fn display(input: &str) -> TerminalDisplay<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalDisplay::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_frame_draws_entities_over_tiles() {
        let mut state = open_state();
        state.add_entity(monster(Position::new(7, 5)));
        let frame = render_frame(&state);
        let rows: Vec<&str> = frame.lines().collect();
        assert_eq!(rows[5].chars().nth(5), Some('O'));
        assert_eq!(rows[5].chars().nth(7), Some('X'));
        assert_eq!(rows[5].chars().nth(6), Some('.'));
        assert_eq!(rows[0].chars().next(), Some('#'));
        assert!(frame.contains("HP: 100/100"));
    }

    #[test]
    fn test_remembered_tiles_and_markers() {
        let mut state = open_state();
        let stairs = state.add_entity(Entity::stairs(Position::new(9, 9)));
        state.send_to_back(stairs);
        state.add_entity(monster(Position::new(3, 3)));
        state.map.mark_explored(Position::new(9, 9));
        state.map.mark_explored(Position::new(3, 3));
        state.visible.clear();

        let frame = render_frame(&state);
        let rows: Vec<&str> = frame.lines().collect();
        assert_eq!(rows[9].chars().nth(9), Some('V'));
        assert_eq!(rows[3].chars().nth(3), Some(','));
        assert_eq!(rows[1].chars().nth(1), Some(' '));
    }

    #[test]
    fn test_render_skips_unchanged_frames() {
        let state = open_state();
        let mut display = display("");
        display.render(&state).unwrap();
        display.render(&state).unwrap();
        let written = String::from_utf8(display.into_writer()).unwrap();
        assert_eq!(written.matches("HP: 100/100").count(), 1);
    }

    #[test]
    fn test_poll_maps_keys_and_exits_at_end() {
        let mut display = display("l z\n");
        assert_eq!(
            display.poll_input().unwrap(),
            Some(PlayerInput::Move(Direction::East))
        );
        assert_eq!(display.poll_input().unwrap(), None);
        assert_eq!(display.poll_input().unwrap(), Some(PlayerInput::Exit));
    }

    #[test]
    fn test_menu_selection() {
        let options = vec!["Sword".to_string(), "Bow".to_string()];
        let mut display = display("b\nc\n");
        assert_eq!(display.menu("Pick", &options, 30).unwrap(), Some(1));
        assert_eq!(display.menu("Pick", &options, 30).unwrap(), None);
        assert!(display.menu("Pick", &options, 30).is_err());

        let written = String::from_utf8(display.into_writer()).unwrap();
        assert!(written.contains("(a) Sword"));
        assert!(written.contains("(b) Bow"));
    }

    #[test]
    fn test_menu_option_limit() {
        let options: Vec<String> = (0..27).map(|i| i.to_string()).collect();
        let mut display = display("a\n");
        assert!(display.menu("Too many", &options, 30).is_err());
    }
}
