pub mod board;
pub mod game;
pub mod generator;
pub mod record;
pub mod rules;
pub mod turn;
