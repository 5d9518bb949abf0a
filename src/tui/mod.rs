pub mod app;
mod events;
mod theme;
mod widgets;
