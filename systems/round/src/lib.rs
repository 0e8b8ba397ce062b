#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round controller that owns the cave, the player, and the input decoder.
//!
//! Each call to [`RoundController::tick`] decodes at most one command from a
//! raw sample, applies it, and renders the cave. Hazard and arrow resolution
//! drive the round through `Exploring → Resolving → Over`. All presentation
//! happens synchronously through the [`Presentation`] port, so no input is
//! polled while a cue is playing.

use std::time::Duration;

use log::{debug, info, warn};
use wumpus_core::{
    CellCoord, Command, Cue, Direction, Event, Hazard, InputSample, Outcome, Phase, Presentation,
    RandomSource, Scoreboard, SenseIndicators, MAX_BRIGHTNESS, PLAYER_FLASH_PERIOD,
};
use wumpus_system_input::{Config, Decoder};
use wumpus_world::{query, Spawn, World};

/// Position and state of the explorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    position: CellCoord,
    facing: Direction,
    alive: bool,
}

impl Player {
    fn spawned(spawn: Spawn) -> Self {
        Self {
            position: spawn.cell,
            facing: spawn.facing,
            alive: true,
        }
    }

    /// Cell the player stands on.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Direction of the last successful step; arrows fly this way.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Whether the player survived so far.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }
}

#[derive(Clone, Copy, Debug)]
struct Blink {
    lit: bool,
    last_toggle: Option<Duration>,
}

impl Default for Blink {
    fn default() -> Self {
        Self {
            lit: true,
            last_toggle: None,
        }
    }
}

impl Blink {
    fn update(&mut self, now: Duration) {
        match self.last_toggle {
            None => self.last_toggle = Some(now),
            Some(last) if now.saturating_sub(last) > PLAYER_FLASH_PERIOD => {
                self.lit = !self.lit;
                self.last_toggle = Some(now);
            }
            Some(_) => {}
        }
    }
}

/// Drives rounds from generation to outcome.
#[derive(Debug)]
pub struct RoundController<R> {
    rng: R,
    decoder: Decoder,
    world: World,
    player: Player,
    phase: Phase,
    outcome: Outcome,
    squeaked: bool,
    blink: Blink,
    scoreboard: Scoreboard,
}

impl<R: RandomSource> RoundController<R> {
    /// Creates a controller waiting for its first round.
    #[must_use]
    pub fn new(rng: R, config: Config) -> Self {
        let spawn = Spawn::at_corner(CellCoord::CORNERS[0]);
        Self {
            rng,
            decoder: Decoder::new(config),
            world: World::empty(spawn),
            player: Player::spawned(spawn),
            phase: Phase::Generating,
            outcome: Outcome::Unset,
            squeaked: false,
            blink: Blink::default(),
            scoreboard: Scoreboard::default(),
        }
    }

    /// Introduces and starts a round in a freshly generated cave.
    ///
    /// Everything but the scoreboard is discarded.
    pub fn start_round(&mut self, presentation: &mut impl Presentation, out: &mut Vec<Event>) {
        self.phase = Phase::Generating;
        presentation.play_cue(Cue::Intro);
        let world = World::generate(&mut self.rng);
        self.begin(world, presentation, out);
    }

    /// Introduces and starts a round in a prepared cave.
    pub fn start_round_in(
        &mut self,
        world: World,
        presentation: &mut impl Presentation,
        out: &mut Vec<Event>,
    ) {
        self.phase = Phase::Generating;
        presentation.play_cue(Cue::Intro);
        self.begin(world, presentation, out);
    }

    fn begin(&mut self, world: World, presentation: &mut impl Presentation, out: &mut Vec<Event>) {
        let spawn = query::spawn(&world);
        self.world = world;
        self.player = Player::spawned(spawn);
        self.decoder.reset();
        self.outcome = Outcome::Unset;
        self.squeaked = false;
        self.blink = Blink::default();
        self.phase = Phase::Exploring;

        info!("round started at {} facing {:?}", spawn.cell, spawn.facing);
        out.push(Event::RoundStarted {
            start: spawn.cell,
            facing: spawn.facing,
        });

        self.sense(presentation, out);
        self.render(presentation);
    }

    /// Processes one raw input sample and renders the result.
    ///
    /// Samples are ignored unless the round is being explored.
    pub fn tick(
        &mut self,
        sample: InputSample,
        presentation: &mut impl Presentation,
        out: &mut Vec<Event>,
    ) -> Phase {
        if self.phase != Phase::Exploring {
            return self.phase;
        }

        if let Some(command) = self.decoder.poll(sample) {
            self.apply(command, presentation, out);
        }

        if self.phase == Phase::Exploring {
            self.blink.update(sample.at);
            let senses = query::senses_at(&self.world, self.player.position);
            presentation.set_sense_indicators(senses.indicators());
            self.render(presentation);
        }

        self.phase
    }

    /// Applies a decoded command to the round.
    pub fn apply(
        &mut self,
        command: Command,
        presentation: &mut impl Presentation,
        out: &mut Vec<Event>,
    ) {
        if self.phase != Phase::Exploring {
            return;
        }

        let first = out.len();
        match command {
            Command::Move { direction } => self.step(direction, presentation, out),
            Command::Fire => self.fire(presentation, out),
        }

        for event in &out[first..] {
            debug!("{event:?}");
        }
    }

    fn step(
        &mut self,
        direction: Direction,
        presentation: &mut impl Presentation,
        out: &mut Vec<Event>,
    ) {
        let from = self.player.position;
        self.world.mark_visited(from);

        match from.step(direction) {
            Some(to) => {
                self.player.position = to;
                self.player.facing = direction;
                self.squeaked = false;
                out.push(Event::PlayerMoved { from, to });
            }
            None => out.push(Event::MoveBlocked {
                at: from,
                direction,
            }),
        }

        self.resolve_hazard(presentation, out);
    }

    fn resolve_hazard(&mut self, presentation: &mut impl Presentation, out: &mut Vec<Event>) {
        let cell = self.player.position;
        match query::hazard_at(&self.world, cell) {
            Hazard::Empty => self.sense(presentation, out),
            Hazard::Bat => {
                presentation.play_cue(Cue::BatCapture);
                let to = self.world.relocation_target(&mut self.rng);
                self.player.position = to;
                self.squeaked = false;
                out.push(Event::CarriedByBat { from: cell, to });
                self.sense(presentation, out);
            }
            Hazard::Pit => {
                presentation.play_cue(Cue::PitFall);
                out.push(Event::FellIntoPit { cell });
                self.conclude(Outcome::LostPit, presentation, out);
            }
            Hazard::Wumpus => {
                presentation.play_cue(Cue::WumpusAttack);
                out.push(Event::MetWumpus { cell });
                self.conclude(Outcome::LostWumpus, presentation, out);
            }
        }
    }

    fn sense(&mut self, presentation: &mut impl Presentation, out: &mut Vec<Event>) {
        let cell = self.player.position;
        let senses = query::senses_at(&self.world, cell);
        let indicators = senses.indicators();
        presentation.set_sense_indicators(indicators);
        out.push(Event::SensesUpdated { cell, indicators });

        if senses.sound && !self.squeaked {
            self.squeaked = true;
            presentation.play_cue(Cue::BatSqueak);
            out.push(Event::BatsHeard { cell });
        }
    }

    fn fire(&mut self, presentation: &mut impl Presentation, out: &mut Vec<Event>) {
        let from = self.player.position;
        let direction = self.player.facing;
        presentation.play_cue(Cue::ArrowFire);
        out.push(Event::ArrowFired { from, direction });

        // Shots into the wall cost nothing; the round carries on.
        let Some(target) = from.step(direction) else {
            warn!("arrow shot from {from} towards {direction:?} hit the cave wall");
            out.push(Event::ArrowWasted { from, direction });
            return;
        };

        if query::hazard_at(&self.world, target) == Hazard::Wumpus {
            presentation.play_cue(Cue::WumpusKill);
            out.push(Event::WumpusSlain { cell: target });
            self.conclude(Outcome::Won, presentation, out);
        } else {
            presentation.play_cue(Cue::ArrowMiss);
            out.push(Event::ArrowMissed { target });
            presentation.play_cue(Cue::WumpusAttack);
            self.conclude(Outcome::LostWumpus, presentation, out);
        }
    }

    fn conclude(
        &mut self,
        outcome: Outcome,
        presentation: &mut impl Presentation,
        out: &mut Vec<Event>,
    ) {
        self.phase = Phase::Resolving;
        self.outcome = outcome;
        if outcome.is_loss() {
            self.player.alive = false;
        }

        presentation.set_sense_indicators(SenseIndicators::OFF);
        if outcome == Outcome::Won {
            celebrate(presentation);
        }
        if let Some(text) = outcome.text() {
            presentation.print(text);
        }
        presentation.clear();
        presentation.draw();

        self.scoreboard.record(outcome);
        self.phase = Phase::Over;
        info!("round over: {outcome:?} ({})", self.scoreboard);
        out.push(Event::RoundOver { outcome });
    }

    fn render(&self, presentation: &mut impl Presentation) {
        presentation.clear();
        for (cell, seen) in query::visited(&self.world).iter() {
            if seen {
                presentation.plot(cell, true);
            }
        }
        presentation.plot(self.player.position, self.blink.lit);
        presentation.draw();
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome of the current round, `Unset` while undecided.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Current player state.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Cave of the current round.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Wins and losses across every round played so far.
    #[must_use]
    pub const fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }
}

fn celebrate(presentation: &mut impl Presentation) {
    presentation.play_cue(Cue::WinFanfare);
    for level in (0..=MAX_BRIGHTNESS).rev() {
        presentation.set_brightness(level);
    }
    for level in 0..=MAX_BRIGHTNESS {
        presentation.set_brightness(level);
    }
}
