//! # Input Module
//!
//! Player intents and the mapping from key presses to them.

pub mod commands;

pub use commands::*;

use crate::{Direction, NargylResult, PlayerAction};

/// What the player asked for with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    Move(Direction),
    RangedAttack,
    Descend,
    PickUp,
    /// Open the inventory to use an item
    Inventory,
    /// Open the inventory to drop an item
    Drop,
    CharacterInfo,
    /// Leave the game (saving it)
    Exit,
}

/// Collaborator that delivers player input.
pub trait InputSource {
    /// Returns the next input, or `None` if nothing usable was pressed.
    fn poll_input(&mut self) -> NargylResult<Option<PlayerInput>>;
}

/// Maps key presses to player inputs.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjklyubn)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use nargyl::{Direction, InputHandler, Key, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(
    ///     input_handler.map_key(Key::Char('l')),
    ///     Some(PlayerInput::Move(Direction::East))
    /// );
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// The input bound to a key, if any.
    pub fn map_key(&self, key: Key) -> Option<PlayerInput> {
        let input = match key {
            Key::Up => PlayerInput::Move(Direction::North),
            Key::Down => PlayerInput::Move(Direction::South),
            Key::Left => PlayerInput::Move(Direction::West),
            Key::Right => PlayerInput::Move(Direction::East),
            Key::Escape => PlayerInput::Exit,
            Key::Enter => return None,
            Key::Char(c) => return self.map_char(c),
        };
        Some(input)
    }

    fn map_char(&self, c: char) -> Option<PlayerInput> {
        if self.vi_keys_enabled {
            let direction = match c {
                'k' => Some(Direction::North),
                'j' => Some(Direction::South),
                'h' => Some(Direction::West),
                'l' => Some(Direction::East),
                'y' => Some(Direction::Northwest),
                'u' => Some(Direction::Northeast),
                'b' => Some(Direction::Southwest),
                'n' => Some(Direction::Southeast),
                _ => None,
            };
            if let Some(direction) = direction {
                return Some(PlayerInput::Move(direction));
            }
        }

        match c {
            'f' | ' ' => Some(PlayerInput::RangedAttack),
            'v' | '>' => Some(PlayerInput::Descend),
            'g' | ',' => Some(PlayerInput::PickUp),
            'i' => Some(PlayerInput::Inventory),
            'd' => Some(PlayerInput::Drop),
            'c' => Some(PlayerInput::CharacterInfo),
            'q' => Some(PlayerInput::Exit),
            _ => None,
        }
    }

    /// Converts an input to the action it performs directly.
    ///
    /// Inputs that open a menu or leave the game have no direct action.
    pub fn input_to_action(&self, input: PlayerInput) -> Option<PlayerAction> {
        match input {
            PlayerInput::Move(direction) => Some(PlayerAction::Move(direction)),
            PlayerInput::RangedAttack => Some(PlayerAction::RangedAttack),
            PlayerInput::Descend => Some(PlayerAction::Descend),
            PlayerInput::PickUp => Some(PlayerAction::PickUp),
            PlayerInput::Inventory
            | PlayerInput::Drop
            | PlayerInput::CharacterInfo
            | PlayerInput::Exit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.map_key(Key::Char('y')),
            Some(PlayerInput::Move(Direction::Northwest))
        );
        assert_eq!(
            handler.map_key(Key::Down),
            Some(PlayerInput::Move(Direction::South))
        );

        let arrows_only = InputHandler {
            vi_keys_enabled: false,
        };
        assert_eq!(arrows_only.map_key(Key::Char('h')), None);
        assert_eq!(
            arrows_only.map_key(Key::Left),
            Some(PlayerInput::Move(Direction::West))
        );
    }

    #[test]
    fn test_command_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.map_key(Key::Char('g')), Some(PlayerInput::PickUp));
        assert_eq!(handler.map_key(Key::Char('>')), Some(PlayerInput::Descend));
        assert_eq!(handler.map_key(Key::Char('f')), Some(PlayerInput::RangedAttack));
        assert_eq!(handler.map_key(Key::Escape), Some(PlayerInput::Exit));
        assert_eq!(handler.map_key(Key::Char('z')), None);
        assert_eq!(handler.map_key(Key::Enter), None);
    }

    #[test]
    fn test_menu_inputs_have_no_direct_action() {
        let handler = InputHandler::new();
        assert_eq!(handler.input_to_action(PlayerInput::Inventory), None);
        assert_eq!(handler.input_to_action(PlayerInput::Exit), None);
        assert_eq!(
            handler.input_to_action(PlayerInput::PickUp),
            Some(PlayerAction::PickUp)
        );
    }
}
