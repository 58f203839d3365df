//! Core module - deed state, navigation and persistence

pub mod config;
pub mod draft;
pub mod session;
pub mod step;
pub mod wizard;
pub mod words;

pub use config::Config;
pub use draft::{DraftError, DraftStore, FileDraftStore, MemoryDraftStore};
pub use session::{DeedAction, DeedSession, SaveStatus};
pub use step::FormStep;
pub use wizard::WizardController;
pub use words::{amount_in_words, number_to_words};
