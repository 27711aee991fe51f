pub mod section;
pub mod turn;

pub use section::{Section, SectionKind, SectionLifecycle};
pub use turn::{TurnController, TurnState};
