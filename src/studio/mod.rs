//! スタジオ: 編集セッションと対話UI

pub mod interactive;
mod session;

pub use interactive::{run_studio, StudioOptions};
pub use session::StyleSession;
