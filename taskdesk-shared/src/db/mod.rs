/// Persistence layer
///
/// - `pool`: PostgreSQL connection pool with health check and graceful close
/// - `migrations`: embedded schema migrations for `users` and `tasks`
///
/// The record types and their queries live in `crate::models`.

pub mod migrations;
pub mod pool;
