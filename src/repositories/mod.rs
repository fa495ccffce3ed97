//! Point lookups, filtered scans, inserts and partial updates over the
//! entity tables. Every function runs a single statement (or a short read
//! sequence) on the connection it is handed; callers own transactions.

pub mod comments;
pub mod documents;
pub mod folders;
pub mod permissions;
pub mod users;
