use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub mod config;
pub mod schema;
pub mod seed;
pub mod state;
pub mod tournaments;
pub mod util_resp;

#[cfg(test)]
mod test;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();
