pub mod card;
pub mod config;
pub mod duration;
pub mod feed;
pub mod layout;
pub mod locale;
pub mod metric;
pub mod model;
pub mod params;
pub mod patch;
pub mod relative_time;
pub mod snippet;
pub mod theme;
