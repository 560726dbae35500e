//! Rollout integration tests.

use ccg_search::board::{BoardBuilder, HeroPower};
use ccg_search::cards::CardRegistry;
use ccg_search::core::{GameRng, PlayerId};
use ccg_search::rollout::{
    play_out, BlendedPolicy, DefaultPolicy, ExpertPolicy, RandomPolicy, MAX_ACTIONS_PER_TURN,
};

fn policies() -> Vec<Box<dyn DefaultPolicy>> {
    vec![
        Box::new(RandomPolicy),
        Box::new(ExpertPolicy::default()),
        Box::new(BlendedPolicy::new(0.5)),
    ]
}

#[test]
fn test_empty_board_terminates() {
    for policy in policies() {
        let mut board = BoardBuilder::new().build();
        let mut rng = GameRng::new(3);

        play_out(&mut board, policy.as_ref(), &mut rng);

        assert!(board.is_game_over());
    }
}

#[test]
fn test_full_games_terminate_with_valid_scores() {
    let registry = CardRegistry::basic();
    for seed in 0..10 {
        for policy in policies() {
            let mut rng = GameRng::new(seed);
            let mut board = BoardBuilder::standard(
                &registry,
                [HeroPower::SteadyShot, HeroPower::LesserHeal],
                &mut rng,
            )
            .build();

            play_out(&mut board, policy.as_ref(), &mut rng);

            assert!(board.is_game_over());
            let first = board.score(0.97, PlayerId::FIRST).unwrap();
            let second = board.score(0.97, PlayerId::SECOND).unwrap();
            assert!((0.0..=1.0).contains(&first));
            assert!((0.0..=1.0).contains(&second));
            assert!(first == 0.0 || second == 0.0);
        }
    }
}

#[test]
fn test_produced_moves_apply_cleanly() {
    let registry = CardRegistry::basic();
    let mut rng = GameRng::new(99);
    let mut board = BoardBuilder::standard(
        &registry,
        [HeroPower::Fireblast, HeroPower::ArmorUp],
        &mut rng,
    )
    .build();
    let policy = BlendedPolicy::new(0.8);

    for _ in 0..20 {
        if board.is_game_over() {
            break;
        }
        let mv = policy.produce_move(&board, &mut rng);
        assert!(mv.len() <= MAX_ACTIONS_PER_TURN);
        assert_eq!(board.apply_moves(&mv, false), mv.len());
        if !board.is_game_over() {
            board.end_turn();
        }
    }
}
