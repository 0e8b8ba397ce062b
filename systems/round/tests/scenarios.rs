use std::{collections::VecDeque, ops::Range, time::Duration};

use wumpus_core::{
    CellCoord, Command, Cue, Direction, Event, Hazard, InputSample, Outcome, Phase,
    RandomSource, Scoreboard, SenseIndicators, MAX_BRIGHTNESS, TICK_INTERVAL,
};
use wumpus_rendering::RecordingPresentation;
use wumpus_system_input::Config;
use wumpus_system_round::RoundController;
use wumpus_world::{query, CaveRng, Spawn, World};

const CENTRE: u16 = InputSample::CENTRE;
const LOW: u16 = 1_000;
const HIGH: u16 = 64_000;

struct Scripted(VecDeque<u8>);

impl Scripted {
    fn new(values: &[u8]) -> Self {
        Self(values.iter().copied().collect())
    }
}

impl RandomSource for Scripted {
    fn range(&mut self, range: Range<u8>) -> u8 {
        let value = self.0.pop_front().expect("random script exhausted");
        assert!(range.contains(&value), "{value} outside {range:?}");
        value
    }
}

struct Rig<R> {
    controller: RoundController<R>,
    presentation: RecordingPresentation,
    events: Vec<Event>,
    clock: Duration,
}

impl<R: RandomSource> Rig<R> {
    fn new(rng: R, spawn: Spawn, layout: &[(CellCoord, Hazard)]) -> Self {
        let world = World::from_layout(spawn, layout).expect("valid layout");
        let mut rig = Self {
            controller: RoundController::new(rng, Config::default()),
            presentation: RecordingPresentation::new(),
            events: Vec::new(),
            clock: Duration::ZERO,
        };
        rig.controller
            .start_round_in(world, &mut rig.presentation, &mut rig.events);
        rig
    }

    fn tick(&mut self, x: u16, y: u16, button: bool) -> Phase {
        self.clock += TICK_INTERVAL;
        let sample = InputSample {
            x,
            y,
            button,
            at: self.clock,
        };
        self.controller
            .tick(sample, &mut self.presentation, &mut self.events)
    }

    fn walk(&mut self, directions: &[Direction]) {
        for &direction in directions {
            let (x, y) = deflection(direction);
            let _ = self.tick(x, y, false);
            let _ = self.tick(CENTRE, CENTRE, false);
        }
    }

    fn shoot(&mut self) {
        let _ = self.tick(CENTRE, CENTRE, false);
        let _ = self.tick(CENTRE, CENTRE, true);
        let _ = self.tick(CENTRE, CENTRE, true);
        let _ = self.tick(CENTRE, CENTRE, false);
    }

    fn apply(&mut self, command: Command) {
        self.controller
            .apply(command, &mut self.presentation, &mut self.events);
    }

    fn position(&self) -> CellCoord {
        self.controller.player().position()
    }

    fn count_cue(&self, wanted: Cue) -> usize {
        self.presentation
            .cues()
            .into_iter()
            .filter(|cue| *cue == wanted)
            .count()
    }
}

fn deflection(direction: Direction) -> (u16, u16) {
    match direction {
        Direction::Up => (CENTRE, HIGH),
        Direction::Down => (CENTRE, LOW),
        Direction::Left => (HIGH, CENTRE),
        Direction::Right => (LOW, CENTRE),
    }
}

fn spawn(x: u8, y: u8, facing: Direction) -> Spawn {
    Spawn {
        cell: CellCoord::new(x, y),
        facing,
    }
}

#[test]
fn shooting_the_wumpus_from_an_adjacent_cell_wins() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 0, Direction::Up),
        &[
            (CellCoord::new(5, 5), Hazard::Wumpus),
            (CellCoord::new(0, 7), Hazard::Pit),
            (CellCoord::new(7, 7), Hazard::Bat),
        ],
    );

    rig.walk(&[Direction::Right; 5]);
    rig.walk(&[Direction::Up; 4]);
    assert_eq!(rig.position(), CellCoord::new(5, 4));
    assert_eq!(rig.controller.player().facing(), Direction::Up);
    assert_eq!(rig.controller.phase(), Phase::Exploring);
    assert!(rig.presentation.indicators().wumpus_near);

    rig.shoot();

    assert_eq!(rig.controller.outcome(), Outcome::Won);
    assert_eq!(rig.controller.phase(), Phase::Over);
    assert!(rig.controller.player().is_alive());
    assert_eq!(
        rig.controller.scoreboard(),
        Scoreboard { won: 1, lost: 0 }
    );
    assert!(rig.events.contains(&Event::WumpusSlain {
        cell: CellCoord::new(5, 5)
    }));
    assert_eq!(
        rig.presentation.cues(),
        vec![Cue::Intro, Cue::ArrowFire, Cue::WumpusKill, Cue::WinFanfare]
    );
    assert_eq!(rig.presentation.printed(), vec!["You defeated the Wumpus!"]);
    assert_eq!(
        rig.presentation.brightness_levels().len(),
        2 * (usize::from(MAX_BRIGHTNESS) + 1)
    );
    assert_eq!(rig.presentation.indicators(), SenseIndicators::OFF);
    assert_eq!(rig.presentation.shown_frame().lit_count(), 0);
}

#[test]
fn stepping_into_a_pit_loses_the_round() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 0, Direction::Up),
        &[
            (CellCoord::new(1, 0), Hazard::Pit),
            (CellCoord::new(6, 6), Hazard::Wumpus),
        ],
    );
    assert!(rig.presentation.indicators().pit_near);

    rig.apply(Command::Move {
        direction: Direction::Right,
    });

    assert_eq!(rig.controller.outcome(), Outcome::LostPit);
    assert_eq!(rig.controller.phase(), Phase::Over);
    assert!(!rig.controller.player().is_alive());
    assert_eq!(rig.presentation.printed(), vec!["You fell to your death"]);
    assert_eq!(rig.presentation.indicators(), SenseIndicators::OFF);
    assert!(rig.events.contains(&Event::FellIntoPit {
        cell: CellCoord::new(1, 0)
    }));
    assert_eq!(
        rig.events.last(),
        Some(&Event::RoundOver {
            outcome: Outcome::LostPit
        })
    );
    assert_eq!(rig.count_cue(Cue::PitFall), 1);
    assert_eq!(
        rig.controller.scoreboard(),
        Scoreboard { won: 0, lost: 1 }
    );
}

#[test]
fn bats_carry_the_player_to_an_empty_cell() {
    let mut rig = Rig::new(
        Scripted::new(&[0, 1, 6, 6, 3, 4]),
        spawn(0, 0, Direction::Up),
        &[
            (CellCoord::new(0, 1), Hazard::Bat),
            (CellCoord::new(6, 6), Hazard::Pit),
            (CellCoord::new(7, 0), Hazard::Wumpus),
        ],
    );

    rig.walk(&[Direction::Up]);

    assert_eq!(rig.controller.phase(), Phase::Exploring);
    assert_eq!(rig.controller.outcome(), Outcome::Unset);
    assert_eq!(rig.position(), CellCoord::new(3, 4));
    assert_eq!(
        query::hazard_at(rig.controller.world(), rig.position()),
        Hazard::Empty
    );
    assert!(query::is_visited(
        rig.controller.world(),
        CellCoord::new(0, 0)
    ));
    assert!(rig.events.contains(&Event::CarriedByBat {
        from: CellCoord::new(0, 1),
        to: CellCoord::new(3, 4),
    }));
    assert_eq!(rig.count_cue(Cue::BatCapture), 1);
    assert!(rig.presentation.shown_frame().is_lit(CellCoord::new(0, 0)));
}

#[test]
fn arrow_into_the_wall_is_wasted_without_losing_the_round() {
    // Shots that leave the cave cannot miss, so they cannot lose the round.
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(7, 3, Direction::Right),
        &[
            (CellCoord::new(2, 2), Hazard::Wumpus),
            (CellCoord::new(4, 4), Hazard::Pit),
            (CellCoord::new(1, 6), Hazard::Bat),
        ],
    );

    rig.shoot();

    assert_eq!(rig.controller.phase(), Phase::Exploring);
    assert_eq!(rig.controller.outcome(), Outcome::Unset);
    assert!(rig.events.contains(&Event::ArrowWasted {
        from: CellCoord::new(7, 3),
        direction: Direction::Right,
    }));
    assert_eq!(rig.presentation.cues(), vec![Cue::Intro, Cue::ArrowFire]);
    assert!(rig.presentation.printed().is_empty());
}

#[test]
fn missing_the_wumpus_wakes_it() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 0, Direction::Up),
        &[(CellCoord::new(5, 5), Hazard::Wumpus)],
    );

    rig.apply(Command::Fire);

    assert_eq!(rig.controller.outcome(), Outcome::LostWumpus);
    assert_eq!(rig.controller.phase(), Phase::Over);
    assert!(!rig.controller.player().is_alive());
    assert!(rig.events.contains(&Event::ArrowMissed {
        target: CellCoord::new(0, 1)
    }));
    assert_eq!(
        rig.presentation.cues(),
        vec![Cue::Intro, Cue::ArrowFire, Cue::ArrowMiss, Cue::WumpusAttack]
    );
    assert_eq!(rig.presentation.printed(), vec!["The Wumpus killed you!"]);
}

#[test]
fn walking_into_the_wumpus_is_fatal() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 7, Direction::Down),
        &[(CellCoord::new(0, 6), Hazard::Wumpus)],
    );
    assert!(rig.presentation.indicators().wumpus_near);

    rig.walk(&[Direction::Down]);

    assert_eq!(rig.controller.outcome(), Outcome::LostWumpus);
    assert!(rig.events.contains(&Event::MetWumpus {
        cell: CellCoord::new(0, 6)
    }));
    assert_eq!(rig.count_cue(Cue::WumpusAttack), 1);
}

#[test]
fn walls_absorb_moves_without_turning_the_player() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 0, Direction::Up),
        &[(CellCoord::new(5, 5), Hazard::Wumpus)],
    );

    rig.walk(&[Direction::Left, Direction::Down]);

    assert_eq!(rig.position(), CellCoord::new(0, 0));
    assert_eq!(rig.controller.player().facing(), Direction::Up);
    assert_eq!(rig.controller.phase(), Phase::Exploring);
    assert!(rig.events.contains(&Event::MoveBlocked {
        at: CellCoord::new(0, 0),
        direction: Direction::Left,
    }));
    assert!(query::is_visited(
        rig.controller.world(),
        CellCoord::new(0, 0)
    ));
}

#[test]
fn arrows_fly_along_the_last_successful_step() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 0, Direction::Up),
        &[(CellCoord::new(2, 0), Hazard::Wumpus)],
    );

    rig.walk(&[Direction::Right, Direction::Down]);
    assert_eq!(rig.controller.player().facing(), Direction::Right);

    rig.shoot();
    assert_eq!(rig.controller.outcome(), Outcome::Won);
}

#[test]
fn bats_are_heard_once_per_cell_entry() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 0, Direction::Up),
        &[
            (CellCoord::new(2, 0), Hazard::Bat),
            (CellCoord::new(7, 7), Hazard::Wumpus),
        ],
    );
    assert_eq!(rig.count_cue(Cue::BatSqueak), 0);

    rig.walk(&[Direction::Right]);
    assert_eq!(rig.count_cue(Cue::BatSqueak), 1);

    rig.walk(&[Direction::Down]);
    assert_eq!(rig.count_cue(Cue::BatSqueak), 1, "bumping a wall is no new entry");

    rig.walk(&[Direction::Left, Direction::Right]);
    assert_eq!(rig.count_cue(Cue::BatSqueak), 2);
}

#[test]
fn rendering_shows_visited_cells_and_a_blinking_player() {
    let mut rig = Rig::new(
        Scripted::new(&[]),
        spawn(0, 0, Direction::Up),
        &[(CellCoord::new(7, 7), Hazard::Wumpus)],
    );
    assert!(rig.presentation.shown_frame().is_lit(CellCoord::new(0, 0)));

    rig.walk(&[Direction::Up, Direction::Up]);
    let frame = *rig.presentation.shown_frame();
    assert!(frame.is_lit(CellCoord::new(0, 0)));
    assert!(frame.is_lit(CellCoord::new(0, 1)));

    let before = rig.presentation.shown_frame().is_lit(CellCoord::new(0, 2));
    for _ in 0..5 {
        let _ = rig.tick(CENTRE, CENTRE, false);
    }
    let after = rig.presentation.shown_frame().is_lit(CellCoord::new(0, 2));
    assert_ne!(before, after, "player cell should blink");
}

#[test]
fn finished_rounds_ignore_input_until_restarted() {
    let layout = [(CellCoord::new(1, 0), Hazard::Pit), (CellCoord::new(5, 5), Hazard::Wumpus)];
    let mut rig = Rig::new(Scripted::new(&[]), spawn(0, 0, Direction::Up), &layout);
    rig.walk(&[Direction::Right]);
    assert_eq!(rig.controller.phase(), Phase::Over);

    let events_before = rig.events.len();
    assert_eq!(rig.tick(CENTRE, HIGH, false), Phase::Over);
    rig.apply(Command::Fire);
    assert_eq!(rig.events.len(), events_before);

    let world = World::from_layout(spawn(0, 0, Direction::Up), &layout).expect("valid layout");
    rig.controller
        .start_round_in(world, &mut rig.presentation, &mut rig.events);
    assert_eq!(rig.controller.phase(), Phase::Exploring);
    assert_eq!(rig.controller.outcome(), Outcome::Unset);
    assert!(rig.controller.player().is_alive());
    assert_eq!(rig.position(), CellCoord::new(0, 0));
    assert_eq!(query::visited(rig.controller.world()).count(true), 0);

    rig.walk(&[Direction::Up]);
    rig.shoot();
    assert_eq!(
        rig.controller.scoreboard(),
        Scoreboard { won: 0, lost: 2 }
    );
}

#[test]
fn generated_rounds_start_at_the_spawn_corner() {
    let mut controller = RoundController::new(CaveRng::seeded(11), Config::default());
    let mut presentation = RecordingPresentation::new();
    let mut events = Vec::new();
    assert_eq!(controller.phase(), Phase::Generating);

    controller.start_round(&mut presentation, &mut events);

    let spawn = query::spawn(controller.world());
    assert_eq!(controller.phase(), Phase::Exploring);
    assert_eq!(controller.player().position(), spawn.cell);
    assert_eq!(controller.player().facing(), spawn.facing);
    assert_eq!(
        events.first(),
        Some(&Event::RoundStarted {
            start: spawn.cell,
            facing: spawn.facing,
        })
    );
    assert_eq!(presentation.cues().first(), Some(&Cue::Intro));
}

#[test]
fn trigger_held_into_a_new_round_does_not_fire() {
    let layout = [(CellCoord::new(1, 0), Hazard::Pit), (CellCoord::new(5, 5), Hazard::Wumpus)];
    let mut rig = Rig::new(Scripted::new(&[]), spawn(0, 0, Direction::Up), &layout);
    let _ = rig.tick(CENTRE, CENTRE, true);
    let _ = rig.tick(CENTRE, CENTRE, true);
    assert_eq!(rig.controller.phase(), Phase::Exploring);
    assert_eq!(rig.count_cue(Cue::ArrowFire), 0);

    rig.shoot();
    assert_eq!(rig.count_cue(Cue::ArrowFire), 1);
}
