//! Service layer - client logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod controller;
mod demo;
pub mod logging;
mod query;
pub mod render;
mod session;

pub use controller::{PageKind, PageOutcome, RecipeSearchController, ToggleOutcome, TOGGLE_FAILED_MESSAGE};
pub use demo::{DemoService, DemoState, DEMO_STATE_FILE};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use query::{tokenize, SearchQueryBuilder};
pub use render::{RenderContext, ResultsRenderer, NO_RESULTS_MESSAGE};
pub use session::SessionService;
