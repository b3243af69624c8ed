pub mod calendar;
pub mod events;
pub mod stories;
pub mod story;
pub mod today;
