/// Database records and their queries
///
/// - `user`: registered users
/// - `task`: tasks, their lifecycle status, and ownership
///
/// Queries are associated functions taking any `sqlx::PgExecutor`, so a
/// handler can pass the pool directly or a transaction it holds open.

pub mod task;
pub mod user;
