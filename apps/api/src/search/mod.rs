// Standard search suggestions for the navigation bar.

pub mod debounce;
pub mod handlers;
pub mod suggester;
