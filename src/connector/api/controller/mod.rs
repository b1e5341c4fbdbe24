pub mod graph_controller;
pub mod search_controller;
pub mod source_controller;
pub mod status_controller;
pub mod web_controller;

pub use graph_controller::GraphController;
pub use search_controller::SearchController;
pub use source_controller::SourceController;
pub use status_controller::StatusController;
pub use web_controller::WebController;
