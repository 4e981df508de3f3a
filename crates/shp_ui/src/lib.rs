pub mod overlay;

pub use overlay::{GameUi, UiActions, UiScreen};
