pub mod stats_bar;
pub mod ticker;
pub mod timeline;
