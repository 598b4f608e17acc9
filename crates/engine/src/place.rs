//! Placement planning
//!
//! Turns a target (rotation, x) into the action sequence that reaches it,
//! simulated on a clone so the caller can feed the actions through a
//! recording [`Session`](crate::Session). [`choose_placement`] scores every
//! reachable placement for headless autoplay.

use stackfall_core::types::{GameAction, GameMode, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
use stackfall_core::{Board, GameState, PieceState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    HoldUnavailable,
    RotationBlocked,
    XOutOfBounds,
    XBlocked,
    NotPlayable,
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            PlaceError::RotationBlocked
            | PlaceError::XOutOfBounds
            | PlaceError::XBlocked
            | PlaceError::NotPlayable
            | PlaceError::NoActive => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold requested when unavailable",
            PlaceError::RotationBlocked => "could not rotate to target rotation",
            PlaceError::XOutOfBounds => "target x would place piece out of bounds",
            PlaceError::XBlocked => "could not move to target x due to collision",
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoActive => "no active piece",
        }
    }
}

/// Actions that bring the active piece to `target_rot` at `target_x` and hard drop it
///
/// `state` is not modified.
pub fn plan_place(
    state: &GameState,
    target_x: i8,
    target_rot: Rotation,
    use_hold: bool,
) -> Result<Vec<GameAction>, PlaceError> {
    if state.mode() != GameMode::Drop {
        return Err(PlaceError::NotPlayable);
    }

    let mut sim = state.clone();
    let mut actions = Vec::new();

    if use_hold {
        if !sim.hold_swap() {
            return Err(PlaceError::HoldUnavailable);
        }
        actions.push(GameAction::Hold);
    }

    let Some(active0) = sim.active() else {
        return Err(PlaceError::NoActive);
    };

    // Try the shorter direction first; for 180 both are 2.
    let cur = active0.rotation.index() as i8;
    let tgt = target_rot.index() as i8;
    let cw = (tgt - cur).rem_euclid(4) as u8;
    let ccw = (cur - tgt).rem_euclid(4) as u8;
    let mut plans = [(GameAction::RotateCw, cw), (GameAction::RotateCcw, ccw)];
    if plans[1].1 < plans[0].1 {
        plans.swap(0, 1);
    }

    let before_rotation = sim.clone();
    let mut rotated = false;
    for (action, steps) in plans {
        sim = before_rotation.clone();
        let mut ok = true;
        for _ in 0..steps {
            if !matches!(sim.apply_action(action), Ok(true)) {
                ok = false;
                break;
            }
        }
        if ok {
            actions.extend(std::iter::repeat(action).take(steps as usize));
            rotated = true;
            break;
        }
    }
    if !rotated {
        return Err(PlaceError::RotationBlocked);
    }

    let Some(active) = sim.active() else {
        return Err(PlaceError::NoActive);
    };
    if active.rotation != target_rot {
        return Err(PlaceError::RotationBlocked);
    }

    let (min_dx, max_dx) = x_extent(&active);
    if target_x + min_dx < 0 || target_x + max_dx >= BOARD_WIDTH as i8 {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target_x - active.x;
    let step = if dx > 0 {
        GameAction::MoveRight
    } else {
        GameAction::MoveLeft
    };
    for _ in 0..dx.unsigned_abs() {
        if !matches!(sim.apply_action(step), Ok(true)) {
            return Err(PlaceError::XBlocked);
        }
        actions.push(step);
    }

    actions.push(GameAction::HardDrop);
    Ok(actions)
}

fn x_extent(piece: &PieceState) -> (i8, i8) {
    piece
        .minos()
        .iter()
        .fold((i8::MAX, i8::MIN), |(lo, hi), &(dx, _)| (lo.min(dx), hi.max(dx)))
}

/// Heuristic cost of a board: height, holes and bumpiness, lower is better
pub fn board_cost(board: &Board) -> i32 {
    let mut heights = [0i32; BOARD_WIDTH as usize];
    let mut holes = 0;
    for x in 0..BOARD_WIDTH as i8 {
        let mut seen_block = false;
        for y in 0..BOARD_HEIGHT as i8 {
            if board.is_occupied(x, y) {
                if !seen_block {
                    heights[x as usize] = BOARD_HEIGHT as i32 - y as i32;
                    seen_block = true;
                }
            } else if seen_block {
                holes += 1;
            }
        }
    }
    let aggregate: i32 = heights.iter().sum();
    let bumpiness: i32 = heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum();
    aggregate * 5 + holes * 35 + bumpiness * 2
}

/// Best reachable placement for the active piece as an action plan
pub fn choose_placement(state: &GameState) -> Option<Vec<GameAction>> {
    let mut best: Option<(i32, Vec<GameAction>)> = None;
    for r in 0..4 {
        let rotation = Rotation::from_index(r);
        for x in -2..BOARD_WIDTH as i8 {
            let Ok(plan) = plan_place(state, x, rotation, false) else {
                continue;
            };
            let mut sim = state.clone();
            for &action in &plan {
                if sim.apply_action(action).is_err() {
                    break;
                }
            }
            let mut cost = board_cost(sim.board());
            if sim.is_game_over() {
                cost += 100_000;
            }
            if best.as_ref().map_or(true, |(c, _)| cost < *c) {
                best = Some((cost, plan));
            }
        }
    }
    best.map(|(_, plan)| plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackfall_core::types::Block;

    #[test]
    fn place_rejected_when_paused() {
        let mut gs = GameState::new(1);
        gs.start();
        assert!(gs.pause());

        let a = gs.active().expect("expected active piece");
        let err = plan_place(&gs, a.x, a.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
    }

    #[test]
    fn place_rejected_when_x_out_of_bounds() {
        let mut gs = GameState::new(1);
        gs.start();

        let a = gs.active().expect("expected active piece");
        let err = plan_place(&gs, -50, a.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::XOutOfBounds);
        assert_eq!(err.code(), "invalid_place");
    }

    #[test]
    fn place_rejected_when_x_blocked_by_collision() {
        let mut gs = GameState::new(1);
        gs.start();

        let a = gs.active().expect("expected active piece");
        let (min_dx, max_dx) = x_extent(&a);
        let (delta_x, target_x) = if a.x + min_dx - 1 >= 0 {
            (-1i8, a.x - 1)
        } else if a.x + max_dx + 1 < BOARD_WIDTH as i8 {
            (1i8, a.x + 1)
        } else {
            panic!("cannot construct a simple blocked-move test for this spawn");
        };

        // Block exactly where the piece would be after shifting
        for (bx, by) in a.shifted(delta_x, 0).cells() {
            if !a.cells().any(|c| c == (bx, by)) {
                gs.board_mut().set(bx, by, Some(Block::Garbage));
            }
        }

        let err = plan_place(&gs, target_x, a.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::XBlocked);
    }

    #[test]
    fn plan_reaches_target_and_leaves_state_alone() {
        let mut gs = GameState::new(3);
        gs.start();
        let before = gs.active().unwrap();

        let plan = plan_place(&gs, 0, Rotation::East, false).unwrap();
        assert_eq!(gs.active(), Some(before));
        assert_eq!(plan.last(), Some(&GameAction::HardDrop));

        for action in plan {
            gs.apply_action(action).unwrap();
        }
        let locked = gs.last_lock().unwrap().piece;
        assert_eq!(locked.rotation, Rotation::East);
        assert_eq!(locked.x, 0);
    }

    #[test]
    fn choose_placement_keeps_board_flat() {
        let mut gs = GameState::new(21);
        gs.start();
        for _ in 0..10 {
            let plan = choose_placement(&gs).expect("placement");
            for action in plan {
                gs.apply_action(action).unwrap();
            }
            gs.tick(200).unwrap();
        }
        assert!(!gs.is_game_over());
        assert_eq!(gs.stats().pieces, 11);
    }
}
