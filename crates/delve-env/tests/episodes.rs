//! End-to-end episodes over a scripted game.

use delve_core::{Action, Direction, GameStatus};
use delve_env::tasks::{memory_task, navigation_config};
use delve_env::{EnvError, PenaltyMode, StepStatus, TaskConfig, TaskEnv};
use delve_reward::{RewardManager, TriggerSpec};
use delve_test_utils::{room, ScriptedGame};

const WAIT: Action = Action(0);

fn quiet(cfg: TaskConfig) -> TaskConfig {
    TaskConfig {
        penalty_step: 0.0,
        ..cfg
    }
}

#[test]
fn memory_task_ends_on_squeak_with_zero_reward() {
    let game = ScriptedGame::new(room(5, 5, (2, 2)).turn(1).build())
        .then(room(5, 5, (2, 1)).turn(2).build())
        .then(room(5, 5, (2, 1)).turn(3).message("You hear a squeak.").build());
    let mut env = memory_task(game).unwrap();
    let obs = env.reset().unwrap();
    assert_eq!(obs.grid("chars_crop").unwrap().shape(), (5, 5));

    let first = env.step(WAIT).unwrap();
    assert_eq!((first.status, first.reward), (StepStatus::Running, 0.0));
    let second = env.step(WAIT).unwrap();
    assert_eq!(second.status, StepStatus::TaskSuccessful);
    assert_eq!(second.reward, 0.0);
}

#[test]
fn memory_task_pays_for_grid_bug_kill() {
    let game = ScriptedGame::new(room(5, 5, (2, 2)).turn(1).build())
        .then(room(5, 5, (2, 2)).turn(2).message("You kill the grid bug!").build());
    let mut env = memory_task(game).unwrap();
    env.reset().unwrap();
    let r = env.step(WAIT).unwrap();
    assert_eq!(r.status, StepStatus::TaskSuccessful);
    assert_eq!(r.reward, 1.0);
}

#[test]
fn goal_fallback_applies_when_triggers_cannot_terminate() {
    let mut manager = RewardManager::new();
    manager.add_trigger(
        TriggerSpec::location("fountain")
            .reward(0.5)
            .terminal_required(false)
            .build()
            .unwrap(),
    );
    let game = ScriptedGame::new(room(5, 5, (2, 2)).describe(3, 2, "fountain").turn(1).build())
        .then(room(5, 5, (3, 2)).turn(2).build())
        .then_with(room(5, 5, (4, 2)).turn(3).build(), GameStatus::GoalReached);
    let mut env = TaskEnv::new(game, quiet(navigation_config()), Some(manager)).unwrap();
    env.reset().unwrap();

    let onto_fountain = env.step(Action(1)).unwrap();
    assert_eq!(onto_fountain.status, StepStatus::Running);
    assert_eq!(onto_fountain.reward, 0.5);

    // The manager pays nothing here, and the game's goal still ends the
    // episode. No sparse reward is added when a manager is present.
    let at_goal = env.step(Action(1)).unwrap();
    assert_eq!(at_goal.status, StepStatus::TaskSuccessful);
    assert_eq!(at_goal.reward, 0.0);
}

#[test]
fn death_pays_reward_lose_without_manager() {
    let game = ScriptedGame::new(room(3, 3, (1, 1)).turn(1).build())
        .then_with(room(3, 3, (1, 1)).turn(2).build(), GameStatus::Died);
    let cfg = TaskConfig {
        reward_lose: -1.0,
        ..quiet(navigation_config())
    };
    let mut env = TaskEnv::new(game, cfg, None).unwrap();
    env.reset().unwrap();
    let r = env.step(WAIT).unwrap();
    assert_eq!((r.status, r.reward), (StepStatus::Death, -1.0));
    assert!(env.is_done());
}

#[test]
fn step_budget_aborts_episode() {
    let mut game = ScriptedGame::new(room(3, 3, (1, 1)).turn(0).build());
    for t in 1..=5 {
        game = game.then(room(3, 3, (1, 1)).turn(t).build());
    }
    let cfg = TaskConfig {
        max_episode_steps: 3,
        ..quiet(navigation_config())
    };
    let mut env = TaskEnv::new(game, cfg, None).unwrap();
    env.reset().unwrap();
    assert_eq!(env.step(WAIT).unwrap().status, StepStatus::Running);
    assert_eq!(env.step(WAIT).unwrap().status, StepStatus::Running);
    assert_eq!(env.step(WAIT).unwrap().status, StepStatus::Aborted);
    assert_eq!(env.steps(), 3);
    assert_eq!(env.step(WAIT).unwrap_err(), EnvError::EpisodeOver);

    // A new episode starts the budget over.
    env.reset().unwrap();
    assert_eq!(env.step(WAIT).unwrap().status, StepStatus::Running);
}

#[test]
fn frozen_clock_penalty_grows_linearly() {
    let frozen = room(3, 3, (1, 1)).turn(5).build();
    let game = ScriptedGame::new(frozen.clone())
        .then(frozen.clone())
        .then(frozen.clone())
        .then(room(3, 3, (1, 1)).turn(7).build());
    let cfg = TaskConfig {
        penalty_step: -0.25,
        penalty_time: -0.5,
        penalty_mode: PenaltyMode::Linear,
        ..navigation_config()
    };
    let mut env = TaskEnv::new(game, cfg, None).unwrap();
    env.reset().unwrap();
    assert_eq!(env.step(WAIT).unwrap().reward, -0.25);
    assert_eq!(env.step(WAIT).unwrap().reward, -0.5);
    // Two turns pass: the frozen count resets and time is charged.
    assert_eq!(env.step(WAIT).unwrap().reward, -1.0);
}

#[test]
fn sit_on_throne_needs_location_then_action() {
    const SIT: Action = Action(42);
    let mut manager = RewardManager::new();
    manager.add_trigger(
        TriggerSpec::location_action("throne", SIT)
            .terminal_sufficient(true)
            .build()
            .unwrap(),
    );
    let game = ScriptedGame::new(room(5, 5, (1, 2)).describe(2, 2, "opulent throne").turn(1).build())
        .then(room(5, 5, (2, 2)).turn(2).build())
        .then(room(5, 5, (2, 2)).turn(3).build())
        .then(room(5, 5, (2, 2)).turn(4).message("You sit on the opulent throne.").build());
    let mut env = TaskEnv::new(game, quiet(navigation_config()), Some(manager)).unwrap();
    env.reset().unwrap();
    assert_eq!(env.direction_of("throne").unwrap(), Some(Direction::East));

    assert_eq!(env.step(Action(1)).unwrap().status, StepStatus::Running);
    assert_eq!(env.step(WAIT).unwrap().status, StepStatus::Running);
    let sat = env.step(SIT).unwrap();
    assert_eq!(sat.status, StepStatus::TaskSuccessful);
    assert_eq!(sat.reward, 1.0);
}

#[test]
fn inventory_queries_follow_latest_snapshot() {
    let game = ScriptedGame::new(room(3, 3, (1, 1)).turn(1).build()).then(
        room(3, 3, (1, 1))
            .turn(2)
            .inventory_item(b'a', "a blessed +1 quarterstaff (weapon in hands)")
            .inventory_item(b'f', "an uncursed apple")
            .build(),
    );
    let mut env = TaskEnv::new(game, quiet(navigation_config()), None).unwrap();
    env.reset().unwrap();
    assert_eq!(env.key_in_inventory("apple").unwrap(), None);
    env.step(WAIT).unwrap();
    assert_eq!(env.key_in_inventory("apple").unwrap(), Some(b'f'));
}
