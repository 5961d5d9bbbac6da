//! UI layer: the page surface trait, list templates and the terminal page.

pub mod page;
pub mod templates;
pub mod terminal;

pub use page::{AuthTab, Page};
pub use templates::Templates;
pub use terminal::TerminalPage;
