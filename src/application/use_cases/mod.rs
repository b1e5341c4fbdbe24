mod add_chat_to_memory;
mod connect_sources;
mod create_source;
mod graph_context;
mod manage_sources;
mod manage_webs;
mod query_context;

pub use add_chat_to_memory::*;
pub use connect_sources::*;
pub use create_source::*;
pub use graph_context::*;
pub use manage_sources::*;
pub use manage_webs::*;
pub use query_context::*;
