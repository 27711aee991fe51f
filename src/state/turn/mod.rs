mod controller;
mod registry;
mod state;
pub mod suppress;


pub use controller::TurnController;
pub use state::TurnState;
