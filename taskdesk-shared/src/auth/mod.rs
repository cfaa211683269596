/// Credential handling
///
/// Login is a credential lookup, not a session system: there are no tokens.
/// This module only covers how the stored `password` value is produced and
/// checked.

pub mod password;
