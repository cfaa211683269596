/// Tower middleware applied around the router
///
/// - `security`: security response headers

pub mod security;
