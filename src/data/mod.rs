pub mod geometry;
pub mod line_look;
