/// API route handlers
///
/// Handlers are grouped by resource:
///
/// - `health`: welcome message and health check
/// - `users`: registration, login, user lookup
/// - `tasks`: task CRUD with ownership and lifecycle rules

pub mod health;
pub mod tasks;
pub mod users;
