use std::collections::VecDeque;

use color_eyre::eyre::{ensure, eyre, Result};
use flood_filler::{
    BattleSnake, Board, Decision, Direction, Game, Grid, MoveSelector, NestedGame, Position,
    Reason, Ruleset, SessionRegistry,
};
use itertools::Itertools;
use rand::{
    prelude::{IteratorRandom, SliceRandom},
    Rng,
};
use tracing::debug;

/// Games that nobody wins are cut off here
const MAX_TURNS: i32 = 500;

fn is_taken(g: &Game, p: &Position) -> bool {
    g.board.food.contains(p) || g.board.snakes.iter().any(|s| s.body.contains(p))
}

fn random_free_square<R: Rng>(rng: &mut R, g: &Game) -> Option<Position> {
    let width_range = (0..g.board.width as i32).collect_vec();
    let height_range = (0..g.board.height as i32).collect_vec();
    let ranges = [width_range, height_range];
    let multi = ranges.iter().multi_cartesian_product();
    multi
        .map(|pos| Position::new(*pos[0], *pos[1]))
        .filter(|p| !is_taken(g, p))
        .choose(rng)
}

fn random_snake<R: Rng>(rng: &mut R, id: &str, g: &Game) -> Option<BattleSnake> {
    let health = rng.gen_range(1..=100);
    let length: usize = rng.gen_range(3..20);

    let head = random_free_square(rng, g)?;

    let mut body: VecDeque<Position> = VecDeque::with_capacity(length);
    body.push_front(head);

    while body.len() < length {
        let last = *body.back()?;
        if let Some(next_body) = last
            .adjacent(g.board.width, g.board.height)
            .into_iter()
            .filter(|p| !body.contains(p) && !is_taken(g, p))
            .choose(rng)
        {
            body.push_back(next_body);
        } else {
            break;
        }
    }

    if body.len() < 3 {
        return None;
    }

    Some(BattleSnake {
        id: id.to_owned(),
        name: id.to_owned(),
        health,
        head,
        body,
        shout: None,
        squad: None,
    })
}

/// A board of random size with up to four randomly grown snakes and some food. The first snake
/// is the one we play.
pub fn random_game<R: Rng>(rng: &mut R, id: &str) -> Option<Game> {
    let mut game = Game {
        game: NestedGame {
            id: id.to_owned(),
            ruleset: Ruleset::default(),
            timeout: 500,
            map: None,
            source: None,
        },
        turn: 0,
        board: Board {
            width: rng.gen_range(3..=19),
            height: rng.gen_range(3..=19),
            food: vec![],
            hazards: vec![],
            snakes: vec![],
        },
        you: BattleSnake {
            id: String::new(),
            name: String::new(),
            health: 0,
            body: VecDeque::new(),
            head: Position::default(),
            shout: None,
            squad: None,
        },
    };

    let number_of_snakes = rng.gen_range(1..=4);

    for i in 0..number_of_snakes {
        if let Some(s) = random_snake(rng, &format!("{}", i), &game) {
            game.board.snakes.push(s);
        } else {
            break;
        }
    }

    let number_of_food = rng.gen_range(0..=10);
    for _ in 0..number_of_food {
        if let Some(food) = random_free_square(rng, &game) {
            game.board.food.push(food);
        }
    }

    game.you = game.board.snakes.first()?.clone();

    Some(game)
}

/// Everything a decision promises, checked against the board it was made on
pub fn check_decision(game: &Game, decision: &Decision) -> Result<()> {
    let risks = &decision.risks;

    ensure!(risks.iter().count() == 4, "risk map is missing directions");
    ensure!(
        risks.iter().all(|(_, score)| score.is_finite() && score >= 0.0),
        "risk map has a negative score: {}",
        risks
    );
    ensure!(
        decision.reason != Reason::NoSafeMoves,
        "some direction always has the lowest risk: {}",
        risks
    );
    ensure!(
        risks.get(decision.direction) == risks.lowest(),
        "chose {} over a safer move: {}",
        decision.direction,
        risks
    );

    match decision.reason {
        Reason::OnlySafeMove => {
            ensure!(
                risks.safest_moves() == vec![decision.direction],
                "{} was not the only safe move: {}",
                decision.direction,
                risks
            );
        }
        Reason::SeekingFood | Reason::OpenSpace => {
            let chosen = decision
                .chosen()
                .ok_or_else(|| eyre!("{} was never measured", decision.direction))?;
            ensure!(
                chosen.depth >= game.you.length() as u32,
                "{} only has room for {} of our {} segments",
                decision.direction,
                chosen.depth,
                game.you.length()
            );
        }
        Reason::NoSuitableSpace | Reason::NoSafeMoves => {}
    }

    Ok(())
}

/// A move for a snake we don't control that at least doesn't leave the board or hit a body
fn reasonable_move<R: Rng>(grid: &Grid, snake: &BattleSnake, rng: &mut R) -> Direction {
    Direction::all()
        .into_iter()
        .filter(|d| {
            let next = snake.head.step(*d);
            grid.contains(&next) && grid.obstacle(&next) == 0
        })
        .choose(rng)
        .or_else(|| Direction::all().choose(rng).copied())
        .unwrap_or(Direction::Up)
}

/// Moves every snake one turn under the standard rules: feeding, starvation, walls, bodies and
/// head-to-head collisions
pub fn advance(game: &mut Game, moves: &[(String, Direction)]) {
    for snake in game.board.snakes.iter_mut() {
        let Some((_, direction)) = moves.iter().find(|(id, _)| id == &snake.id) else {
            continue;
        };

        let head = snake.head.step(*direction);
        snake.body.push_front(head);
        snake.head = head;
        snake.body.pop_back();
        snake.health -= 1;

        if game.board.food.contains(&head) {
            snake.health = 100;
            if let Some(tail) = snake.tail().copied() {
                snake.body.push_back(tail);
            }
        }
    }

    game.board
        .food
        .retain(|f| !game.board.snakes.iter().any(|s| &s.head == f));

    let (width, height) = (game.board.width, game.board.height);
    let snakes = &game.board.snakes;
    let eliminated: Vec<String> = snakes
        .iter()
        .filter(|s| {
            !s.head.in_bounds(width, height)
                || s.health <= 0
                || snakes
                    .iter()
                    .any(|other| other.body.iter().skip(1).any(|p| *p == s.head))
                || snakes.iter().any(|other| {
                    other.id != s.id && other.head == s.head && other.length() >= s.length()
                })
        })
        .map(|s| s.id.clone())
        .collect();

    game.board.snakes.retain(|s| !eliminated.contains(&s.id));

    if let Some(you) = game.board.snakes.iter().find(|s| s.id == game.you.id) {
        game.you = you.clone();
    } else {
        game.you.health = 0;
    }

    game.turn += 1;
}

fn is_over(game: &Game, started_with: usize) -> bool {
    let you_alive = game.board.snakes.iter().any(|s| s.id == game.you.id);

    !you_alive || (started_with > 1 && game.board.snakes.len() <= 1) || game.turn >= MAX_TURNS
}

/// Plays `start` out to the end with our snake driven by `selector` and everyone else moving at
/// random, checking every decision along the way
pub fn play_out<R: Rng>(
    start: &Game,
    selector: &MoveSelector,
    registry: &SessionRegistry,
    rng: &mut R,
) -> Result<Game> {
    let mut game = start.clone();
    let game_id = game.game.id.clone();
    let you_id = game.you.id.clone();
    let started_with = game.board.snakes.len();

    registry.on_game_start(&game_id, &you_id, game.you.length());

    while !is_over(&game, started_with) {
        registry.on_turn(&game_id, &you_id, game.you.length(), game.turn);

        let decision = selector.decide(&game, rng);
        check_decision(&game, &decision).map_err(|e| {
            eyre!(
                "{}\n{}",
                e,
                serde_json::to_string(&game).unwrap_or_else(|_| format!("{:?}", game))
            )
        })?;

        let grid = Grid::from_game(&game);
        let moves: Vec<(String, Direction)> = game
            .board
            .snakes
            .iter()
            .map(|s| {
                let direction = if s.id == you_id {
                    decision.direction
                } else {
                    reasonable_move(&grid, s, rng)
                };
                (s.id.clone(), direction)
            })
            .collect();

        let head = game.you.head;
        advance(&mut game, &moves);

        if game.board.snakes.iter().any(|s| s.id == you_id) {
            ensure!(
                Direction::from_step(&head, &game.you.head) == Some(decision.direction),
                "we were told to go {} but went from {:?} to {:?}",
                decision.direction,
                head,
                game.you.head
            );
        }
    }

    let summary = registry
        .on_game_end(&game_id, &you_id, &game)
        .ok_or_else(|| eyre!("registry lost track of {}", game_id))?;
    debug!(game_id = %game_id, ?summary, "played out");

    Ok(game)
}
