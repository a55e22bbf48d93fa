//! Turning raw source rows into [`ClientRecord`](crate::models::ClientRecord)s.
//!
//! - [`numeric`]: lenient parsing of pt-BR currency, comma decimals and integer ids.
//! - [`status`]: maps emoji markers and free text onto the closed
//!   [`Status`](crate::models::Status) set.
//! - [`record`]: entry point that assembles a full record, filling defaults for
//!   anything missing or unparseable.

pub mod numeric;
pub mod record;
pub mod status;
