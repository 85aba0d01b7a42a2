use crate::models::AvatarId;
use std::ops::RangeInclusive;

pub const POINTS_PER_MINUTE: u32 = 2;
pub const STUDY_REWARD: u32 = 10;
pub const EARLY_STOP_PENALTY: u32 = 5;
pub const APP_BONUS: u32 = 20;
pub const POINTS_PER_AVATAR: u32 = 50;

pub const FREE_AVATARS: RangeInclusive<AvatarId> = 1..=3;
pub const FIRST_LOCKED_AVATAR: AvatarId = 4;
pub const LAST_AVATAR: AvatarId = 10;

const BONUS_APP_NAMES: [&str; 3] = ["wellness app", "this app", "this one"];

pub fn task_points(duration_minutes: u32) -> u32 {
    duration_minutes.saturating_mul(POINTS_PER_MINUTE)
}

pub fn after_early_stop(points: u32) -> u32 {
    points.saturating_sub(EARLY_STOP_PENALTY)
}

pub fn is_bonus_app(app_name: &str) -> bool {
    let lowered = app_name.to_lowercase();
    BONUS_APP_NAMES.contains(&lowered.as_str())
}

/// Locked avatar ids that a total of `points` is enough to reveal.
///
/// Every 50 points opens the next id starting at 4; the range is empty below
/// 50 points and never extends past the last avatar.
pub fn unlockable_range(points: u32) -> RangeInclusive<AvatarId> {
    let earned = points / POINTS_PER_AVATAR;
    let last = (FIRST_LOCKED_AVATAR - 1)
        .saturating_add(earned)
        .min(LAST_AVATAR);
    FIRST_LOCKED_AVATAR..=last
}

pub fn unlocked_avatars(points: u32) -> Vec<AvatarId> {
    FREE_AVATARS.chain(unlockable_range(points)).collect()
}
