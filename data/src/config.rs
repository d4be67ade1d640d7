pub mod state;
pub mod theme;
