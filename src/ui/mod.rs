pub mod board;
pub mod icons;

pub use board::{render_board, render_columns, render_notice, render_project};
