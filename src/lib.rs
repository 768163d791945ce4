pub mod chips;
pub mod csv;
pub mod game;
pub mod model;
pub mod points;
pub mod script;
pub mod session;
pub mod settlement;

pub use game::Game;
pub use points::Points;
pub use session::Session;
pub use settlement::{aggregate_net_totals, calculate_settlements};
