use std::path::PathBuf;

use clap::Parser;
use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, Pool},
};
use diesel_migrations::MigrationHarness;
use gauntlet::{MIGRATIONS, config::create_app, seed::SeedConfig, state::DbPool};
use tokio::task::spawn_blocking;

#[derive(Parser)]
struct Args {
    /// SQLite database location. Falls back to `DATABASE_URL`, then to an
    /// in-memory database.
    #[arg(long)]
    database_url: Option<String>,

    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// TOML roster file to apply once at startup.
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let args = Args::parse();

    let db_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| ":memory:".to_string());

    let pool: DbPool = Pool::builder()
        .max_size(if db_url == ":memory:" { 1 } else { 10 })
        .build(ConnectionManager::<SqliteConnection>::new(db_url))
        .unwrap();

    {
        let pool = pool.clone();
        spawn_blocking(move || {
            let mut conn = pool.get().unwrap();
            conn.run_pending_migrations(MIGRATIONS).unwrap();
        })
        .await
        .unwrap();
    }

    if let Some(path) = args.seed {
        let config: SeedConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        let pool = pool.clone();
        let tournament_id = spawn_blocking(move || {
            let mut conn = pool.get().unwrap();
            gauntlet::seed::seed_database(&config, &mut conn)
        })
        .await
        .unwrap()
        .unwrap();

        tracing::info!(%tournament_id, "seeded tournament");
    }

    let app = create_app(pool);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
