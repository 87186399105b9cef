//! Bus route assistant
//!
//! A user enters an origin and a destination; a generative-AI provider
//! suggests bus lines, fare, travel time and distance; the result is shown
//! in Bengali or English and remembered in a small local history.
//!
//! ```ignore
//! use std::sync::Arc;
//! use bus_route::app::Controller;
//! use bus_route::history::{FileStore, HistoryStore};
//! use bus_route::messages::Catalog;
//! use bus_route::route::Language;
//! use bus_route::suggest::{GeminiProvider, RouteOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut controller = Controller::new(
//!         RouteOrchestrator::new(Arc::new(GeminiProvider::from_env()?)),
//!         HistoryStore::open(Box::new(FileStore::new(".bus-route"))),
//!         Catalog::builtin()?,
//!         Language::Bn,
//!     );
//!     controller.submit("Dhaka", "Chittagong").await;
//!     println!("{}", controller.screen());
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod ast;
pub mod config;
pub mod history;
pub mod messages;
pub mod parser;
pub mod route;
pub mod suggest;


pub use app::{Controller, Screen, SearchState, SubmitOutcome, UserCommand};
pub use config::AppConfig;
pub use history::{FileStore, HistoryStore, KeyValueStore, MemoryStore};
pub use messages::Catalog;
pub use route::{BusDetail, Language, RouteSuggestion};
pub use suggest::{
    GeminiProvider, MockMode, MockProvider, RouteOrchestrator, SuggestError, SuggestionProvider,
};
