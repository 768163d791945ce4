use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pot_ledger::chips::ChipCounts;
use pot_ledger::game::Game;
use pot_ledger::model::{ActionKind, Balances, Seat};
use pot_ledger::{Points, aggregate_net_totals, calculate_settlements};

fn roster(players: usize) -> Vec<Seat> {
    (0..players)
        .map(|i| Seat::new(format!("player-{i}"), 10_000))
        .collect()
}

/// Play `rounds` rounds where everyone bets one 5-chip, then pick a winner
/// by rotating through the table.
fn play_game(seats: &[Seat], rounds: u32, winner: usize) -> Game {
    let name = |i: usize| seats[i].name.as_str();
    let mut game = Game::new(seats, name(0), name(1 % seats.len()), name(0)).unwrap();
    let chips = ChipCounts::new().with(5, 1);

    for _ in 0..rounds {
        for seat in seats {
            game.record_action(&seat.name, ActionKind::Bet, &chips, false)
                .unwrap();
        }
        game.advance_round().unwrap();
    }
    game.set_winner(name(winner % seats.len())).unwrap();
    game
}

/// Debtor/creditor pairs of equal magnitude, so the totals sum to zero.
fn balanced_totals(pairs: usize) -> Balances {
    (0..pairs)
        .flat_map(|i| {
            let magnitude = Points::new((i as i64 % 7 + 1) * 10);
            [
                (format!("debtor-{i}"), -magnitude),
                (format!("creditor-{i}"), magnitude),
            ]
        })
        .collect()
}

fn bench_record_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_rounds");

    for (players, rounds) in [(2, 10), (6, 10), (9, 50)] {
        let label = format!("{players}p_{rounds}r");
        let seats = roster(players);
        group.bench_with_input(
            BenchmarkId::from_parameter(&label),
            &rounds,
            |b, &rounds| {
                b.iter(|| black_box(play_game(&seats, rounds, 0)));
            },
        );
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for games in [10usize, 100, 1_000] {
        let seats = roster(6);
        let played: Vec<Game> = (0..games).map(|g| play_game(&seats, 3, g)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(games), &played, |b, played| {
            b.iter(|| {
                let totals = aggregate_net_totals(played);
                black_box(calculate_settlements(&totals))
            });
        });
    }

    group.finish();
}

fn bench_settlement_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("settlement_sweep");

    for pairs in [10usize, 100, 1_000] {
        let totals = balanced_totals(pairs);
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &totals, |b, totals| {
            b.iter(|| black_box(calculate_settlements(totals)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_record_rounds,
    bench_session,
    bench_settlement_sweep,
);

criterion_main!(benches);
