//! # Rendering Module
//!
//! Collaborator traits for drawing the game and presenting menus, plus a
//! plain-text terminal front-end.

pub mod display;

pub use display::*;

use crate::{GameState, InputSource, NargylResult};

/// Draws the current state of a game.
pub trait Renderer {
    fn render(&mut self, state: &GameState) -> NargylResult<()>;
}

/// Shows menus and waits for a choice.
pub trait MenuPresenter {
    /// Presents `options` under `header` and returns the chosen index, or
    /// `None` if the player picked nothing valid.
    fn menu(
        &mut self,
        header: &str,
        options: &[String],
        width: usize,
    ) -> NargylResult<Option<usize>>;

    /// A menu without options, dismissed by any key.
    fn message_box(&mut self, text: &str, width: usize) -> NargylResult<()> {
        self.menu(text, &[], width).map(|_| ())
    }
}

/// Everything the turn scheduler needs from the outside world.
pub trait Frontend: Renderer + MenuPresenter + InputSource {}

impl<T: Renderer + MenuPresenter + InputSource> Frontend for T {}
