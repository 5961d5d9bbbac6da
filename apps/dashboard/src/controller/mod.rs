//! Controller layer: UI events and the orchestration of API calls into page updates.

pub mod events;
pub mod orchestration;

pub use events::UiEvent;
pub use orchestration::ClientController;
