mod chat;
mod connection;
mod search_hit;
mod source;
mod web;

pub use chat::*;
pub use connection::*;
pub use search_hit::*;
pub use source::*;
pub use web::*;
