//! # Scheduler Module
//!
//! The synchronous turn loop.
//!
//! One tick draws the game, offers any pending level-up, polls one input and
//! resolves at most one player action. When the action used up the player's
//! turn, every entity with an AI acts once, in entity-list order.

use crate::{
    config, seeded, take_turn, xp_to_next_level, ActionOutcome, DungeonGenerator, FieldOfView,
    Frontend, GameState, GameStatus, GenerationConfig, InputHandler, LevelUpChoice, MenuPresenter,
    NargylResult, PlayerAction, PlayerInput, RandomSource, RayCastFov, SaveData, SaveSlot,
};
use log::{debug, info};

const USE_HEADER: &str = "Press the key next to an item to use it, or any other to cancel.";
const DROP_HEADER: &str = "Press the key next to an item to drop it, or any other to cancel.";
const LEVEL_UP_HEADER: &str = "Level up! Choose a stat to raise:";

/// A running game: the state plus the collaborators that drive it.
pub struct Game {
    pub state: GameState,
    generator: DungeonGenerator,
    rng: Box<dyn RandomSource>,
    fov: Box<dyn FieldOfView>,
    input: InputHandler,
}

impl Game {
    /// Wraps an existing state and recomputes its field of view.
    pub fn new(
        state: GameState,
        config: GenerationConfig,
        rng: Box<dyn RandomSource>,
        fov: Box<dyn FieldOfView>,
    ) -> NargylResult<Self> {
        let mut game = Self {
            state,
            generator: DungeonGenerator::new(config),
            rng,
            fov,
            input: InputHandler::new(),
        };
        game.state.update_fov(game.fov.as_ref())?;
        Ok(game)
    }

    /// Starts a fresh game with the default collaborators.
    pub fn new_game(config: GenerationConfig) -> NargylResult<Self> {
        let mut rng: Box<dyn RandomSource> = Box::new(seeded(config.seed));
        let fov: Box<dyn FieldOfView> = Box::new(RayCastFov::new());
        let generator = DungeonGenerator::new(config);
        let state = GameState::new_game(&generator, rng.as_mut(), fov.as_ref())?;
        Ok(Self {
            state,
            generator,
            rng,
            fov,
            input: InputHandler::new(),
        })
    }

    /// Resumes a saved game with the default collaborators.
    pub fn from_save(data: SaveData, config: GenerationConfig) -> NargylResult<Self> {
        let rng = Box::new(seeded(config.seed));
        let state = data.restore()?;
        info!("Resuming game on dungeon level {}", state.dungeon_level);
        Self::new(state, config, rng, Box::new(RayCastFov::new()))
    }

    pub fn save(&self, slot: &dyn SaveSlot) -> NargylResult<()> {
        slot.save(&SaveData::capture(&self.state)?)
    }

    /// Resolves a player action and, if it took a turn, runs the AI pass.
    pub fn perform(&mut self, action: PlayerAction) -> NargylResult<ActionOutcome> {
        let outcome = self.state.resolve_action(
            action,
            &self.generator,
            self.rng.as_mut(),
            self.fov.as_ref(),
        )?;
        if outcome == ActionOutcome::TookTurn {
            self.state.update_fov(self.fov.as_ref())?;
            if self.state.status == GameStatus::Playing {
                self.run_ai_pass()?;
            }
        }
        Ok(outcome)
    }

    /// Gives every entity that has an AI one turn.
    ///
    /// Entities spawned during the pass first act on the next one. The pass
    /// stops as soon as the player dies. Projectiles that burst during the
    /// pass are removed from the level afterwards.
    pub fn run_ai_pass(&mut self) -> NargylResult<()> {
        let actors: Vec<_> = self
            .state
            .entities
            .iter()
            .filter(|entity| !self.state.is_player(entity.id))
            .filter_map(|entity| entity.ai.as_ref().map(|ai| (entity.id, ai.is_projectile())))
            .collect();
        debug!("AI pass over {} entities", actors.len());

        for &(id, _) in &actors {
            if self.state.status != GameStatus::Playing {
                break;
            }
            take_turn(&mut self.state, id, self.rng.as_mut())?;
        }

        let spent: Vec<_> = actors
            .into_iter()
            .filter(|&(id, projectile)| {
                projectile && self.state.entity(id).map_or(false, |entity| entity.ai.is_none())
            })
            .map(|(id, _)| id)
            .collect();
        if !spent.is_empty() {
            debug!("Removing {} spent projectiles", spent.len());
            self.state.entities.retain(|entity| !spent.contains(&entity.id));
        }
        Ok(())
    }

    /// Advances one pending level and asks for the stat to raise, asking
    /// again until a valid choice is made.
    pub fn check_level_up<M: MenuPresenter + ?Sized>(
        &mut self,
        menu: &mut M,
    ) -> NargylResult<bool> {
        if !self.state.level_up()? {
            return Ok(false);
        }
        let options: Vec<String> = LevelUpChoice::all()
            .iter()
            .map(|choice| choice.label().to_string())
            .collect();
        loop {
            let picked = menu
                .menu(LEVEL_UP_HEADER, &options, config::LEVEL_SCREEN_WIDTH)?
                .and_then(LevelUpChoice::from_index);
            if let Some(choice) = picked {
                self.state.apply_level_up_choice(choice)?;
                return Ok(true);
            }
        }
    }

    /// Lets the player pick an inventory item. `None` if cancelled or empty.
    fn choose_item<M: MenuPresenter + ?Sized>(
        &self,
        menu: &mut M,
        header: &str,
    ) -> NargylResult<Option<usize>> {
        if self.state.inventory.is_empty() {
            menu.menu(header, &["Inventory is empty".to_string()], config::INVENTORY_WIDTH)?;
            return Ok(None);
        }
        let options: Vec<String> = self
            .state
            .inventory
            .iter()
            .map(|item| item.name.clone())
            .collect();
        menu.menu(header, &options, config::INVENTORY_WIDTH)
    }

    /// Runs one iteration of the game loop.
    ///
    /// Order: render, resolve a pending level-up, then poll one input.
    /// `poll_input` blocks, so the frame and the level-up prompt come first.
    pub fn tick<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> NargylResult<ActionOutcome> {
        frontend.render(&self.state)?;
        let playing = self.state.status == GameStatus::Playing;
        if playing {
            self.check_level_up(frontend)?;
        }

        let Some(input) = frontend.poll_input()? else {
            return Ok(ActionOutcome::DidntTakeTurn);
        };
        if input == PlayerInput::Exit {
            return Ok(ActionOutcome::Exit);
        }
        if !playing {
            return Ok(ActionOutcome::DidntTakeTurn);
        }

        match input {
            PlayerInput::Inventory => match self.choose_item(frontend, USE_HEADER)? {
                Some(index) => self.perform(PlayerAction::UseItem(index)),
                None => Ok(ActionOutcome::DidntTakeTurn),
            },
            PlayerInput::Drop => match self.choose_item(frontend, DROP_HEADER)? {
                Some(index) => self.perform(PlayerAction::DropItem(index)),
                None => Ok(ActionOutcome::DidntTakeTurn),
            },
            PlayerInput::CharacterInfo => {
                let sheet = character_sheet(&self.state)?;
                frontend.message_box(&sheet, config::CHARACTER_SCREEN_WIDTH)?;
                Ok(ActionOutcome::DidntTakeTurn)
            }
            other => match self.input.input_to_action(other) {
                Some(action) => self.perform(action),
                None => Ok(ActionOutcome::DidntTakeTurn),
            },
        }
    }

    /// Plays until the player leaves, then saves to `slot`.
    ///
    /// The game is saved even when the loop ends with an error.
    pub fn run<F: Frontend + ?Sized>(
        &mut self,
        frontend: &mut F,
        slot: &dyn SaveSlot,
    ) -> NargylResult<()> {
        info!("Entering game loop on dungeon level {}", self.state.dungeon_level);
        let result = loop {
            match self.tick(frontend) {
                Ok(ActionOutcome::Exit) => break Ok(()),
                Ok(_) => {}
                Err(err) => break Err(err),
            }
        };
        self.save(slot)?;
        result
    }
}

/// The character screen text.
pub fn character_sheet(state: &GameState) -> NargylResult<String> {
    let player = state.player()?;
    let id = player.id;
    let xp = player.fighter.as_ref().map_or(0, |fighter| fighter.xp);
    Ok(format!(
        "Character Information\n\nLevel: {}\nExperience: {}\nExperience to level up: {}\n\n\
         Maximum HP: {}\nAttack: {}\nDefense: {}\nLife Steal: {}",
        player.level,
        xp,
        xp_to_next_level(player.level),
        state.max_hp(id),
        state.power(id),
        state.defense(id),
        state.life_steal(id),
    ))
}
