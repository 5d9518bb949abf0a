pub mod achievements;
pub mod chart;
pub mod goal;
pub mod header;
pub mod history;
pub mod statusbar;
pub mod streak;
