// Job and candidate matching by certification overlap.

pub mod compatibility;
pub mod handlers;
