// Gamification: XP, levels, streaks and badges, all derived from the progress snapshot.

pub mod badges;
pub mod deriver;
pub mod handlers;
pub mod streak;
