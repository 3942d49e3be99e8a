//! Simulates a full tournament against an in-memory database: every
//! evaluator schedules and picks every round, then the final aggregate table
//! is printed.

use clap::Parser;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::MigrationHarness;
use gauntlet::{
    MIGRATIONS,
    seed::{SeedConfig, SeedManager},
    tournaments::{
        Tournament,
        evaluators::Evaluator,
        groups::{
            history::PairHistory, schedule_round_groups,
            swiss::count_violating_pairs,
        },
        picks::{PickForm, record_pick},
        standings::aggregate::Aggregate,
    },
};
use rand::seq::IteratorRandom;

#[derive(Parser)]
struct Args {
    #[arg(long, default_value_t = 12)]
    managers: usize,

    #[arg(long, default_value_t = 3)]
    evaluators: usize,

    #[arg(long, default_value_t = 3)]
    rounds: i64,

    #[arg(long, default_value_t = 4)]
    group_size: i64,
}

fn main() {
    tracing_subscriber::fmt().init();

    let args = Args::parse();

    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    conn.run_pending_migrations(MIGRATIONS).unwrap();

    let config = SeedConfig {
        title: "Simulated tournament".to_string(),
        rounds: args.rounds,
        group_size: args.group_size,
        evaluators: (0..args.evaluators)
            .map(|i| format!("Evaluator {i}"))
            .collect(),
        managers: (0..args.managers)
            .map(|i| SeedManager {
                name: format!("Manager {i:02}"),
                department: None,
                external_id: None,
            })
            .collect(),
    };

    let tournament_id =
        gauntlet::seed::seed_database(&config, &mut conn).unwrap();
    let tournament = Tournament::fetch(&tournament_id, &mut conn).unwrap();

    let mut rng = rand::rng();

    for evaluator in Evaluator::all(&mut conn).unwrap() {
        for round_index in 0..tournament.rounds {
            let groups = schedule_round_groups(
                &tournament,
                &evaluator.id,
                round_index,
                &mut conn,
            )
            .unwrap();

            let history = PairHistory::fetch(
                &tournament.id,
                &evaluator.id,
                round_index,
                &mut conn,
            )
            .unwrap();
            let partition: Vec<Vec<String>> = groups
                .iter()
                .map(|group| group.member_ids.clone())
                .collect();
            println!(
                "{} round {}: {} groups, {} repeat pairings",
                evaluator.name,
                round_index,
                groups.len(),
                count_violating_pairs(&partition, &history),
            );

            for group in &groups {
                if group.member_ids.len() < 3 {
                    // a remainder group too small to pick from
                    continue;
                }

                let mut members = group.member_ids.clone();
                let mut pick_random_member = |members: &mut Vec<String>| {
                    let idx = (0..members.len()).choose(&mut rng).unwrap();
                    members.swap_remove(idx)
                };

                let form = PickForm {
                    top1: pick_random_member(&mut members),
                    top2: pick_random_member(&mut members),
                    bottom1: pick_random_member(&mut members),
                    latency_ms: None,
                };

                record_pick(
                    &tournament,
                    &evaluator.id,
                    round_index,
                    group.group_index,
                    &form,
                    &mut conn,
                )
                .unwrap();
            }
        }
    }

    let aggregate = Aggregate::fetch(&tournament.id, &mut conn).unwrap();

    println!();
    println!(
        "{:<4} {:<12} {:>10} {:>10} {:>6} {:>8}",
        "#", "manager", "avg", "stability", "top1", "bottom1"
    );
    for (index, entry) in aggregate.entries.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:>10.2} {:>10.2} {:>6} {:>8}",
            index + 1,
            entry.name,
            entry.avg_points,
            entry.stability,
            entry.top1_total,
            entry.bottom1_total,
        );
    }
}
