use crate::client::ApiError;
use crate::models::{AvatarId, ChangeAvatarRequest, ProfileSnapshot, UpdateAppRequest};
use crate::rewards::{self, APP_BONUS, FREE_AVATARS};
use crate::view::{Frame, Tone, View};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Client-side mirror of the points total and avatar collection.
///
/// Totals always come from server answers; avatars are revealed as soon as
/// the latest known total covers their threshold.
#[derive(Debug, Clone)]
pub struct Reporter {
    points: u32,
    current_avatar: AvatarId,
    unlocked: BTreeSet<AvatarId>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self {
            points: 0,
            current_avatar: *FREE_AVATARS.start(),
            unlocked: FREE_AVATARS.collect(),
        }
    }
}

impl Reporter {
    pub fn from_profile(profile: &ProfileSnapshot) -> Self {
        let mut unlocked: BTreeSet<AvatarId> = FREE_AVATARS.collect();
        unlocked.extend(profile.unlocked_avatars.iter().copied());
        Self {
            points: profile.points,
            current_avatar: profile.avatar_id,
            unlocked,
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn current_avatar(&self) -> AvatarId {
        self.current_avatar
    }

    pub fn is_unlocked(&self, avatar: AvatarId) -> bool {
        self.unlocked.contains(&avatar)
    }

    pub fn record_points(&mut self, points: u32, view: &mut impl View) {
        self.points = points;
        view.render(Frame::Points(points));
    }

    /// Reveals every still-locked avatar that `points` is enough for and
    /// returns the ids revealed by this call.
    pub fn check_unlocks(&mut self, points: u32, view: &mut impl View) -> Vec<AvatarId> {
        let mut revealed = Vec::new();
        for avatar in rewards::unlockable_range(points) {
            if self.unlocked.insert(avatar) {
                info!(avatar, points, "avatar unlocked");
                view.render(Frame::AvatarUnlocked(avatar));
                view.render(Frame::message("🎉 New Avatar Unlocked!", Tone::Success));
                revealed.push(avatar);
            }
        }
        revealed
    }

    /// Only avatars shown as unlocked can be picked.
    pub fn select_avatar(&self, avatar: AvatarId) -> Option<ChangeAvatarRequest> {
        if !self.is_unlocked(avatar) {
            debug!(avatar, "avatar still locked, selection ignored");
            return None;
        }
        Some(ChangeAvatarRequest { avatar_id: avatar })
    }

    pub fn avatar_changed(
        &mut self,
        avatar: AvatarId,
        outcome: Result<(), &ApiError>,
        view: &mut impl View,
    ) {
        match outcome {
            Ok(()) => {
                self.current_avatar = avatar;
                view.render(Frame::CurrentAvatar(avatar));
                view.render(Frame::message("Avatar changed successfully!", Tone::Success));
            }
            Err(err) if err.is_rejection() => {
                warn!(avatar, "avatar change refused: {err}");
                view.render(Frame::message("Avatar not unlocked yet!", Tone::Error));
            }
            Err(err) => {
                warn!(avatar, "error changing avatar: {err}");
                view.render(Frame::message("Error changing avatar", Tone::Error));
            }
        }
    }

    /// Blank names are not sent.
    pub fn update_app(&self, app_name: &str) -> Option<UpdateAppRequest> {
        let app_name = app_name.trim();
        if app_name.is_empty() {
            return None;
        }
        Some(UpdateAppRequest {
            app_name: app_name.to_string(),
        })
    }

    pub fn app_updated(
        &mut self,
        app_name: &str,
        outcome: Result<u32, &ApiError>,
        view: &mut impl View,
    ) {
        match outcome {
            Ok(points) => {
                self.record_points(points, view);
                if rewards::is_bonus_app(app_name) {
                    view.render(Frame::message(
                        format!("Bonus +{APP_BONUS} points for choosing this wellness app!"),
                        Tone::Success,
                    ));
                } else {
                    view.render(Frame::message("App updated successfully!", Tone::Success));
                }
            }
            Err(err) if err.is_rejection() => {
                warn!(app_name, "most used app update refused: {err}");
            }
            Err(err) => {
                warn!(app_name, "error updating app: {err}");
                view.render(Frame::message("Error updating app", Tone::Error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked_frames(frames: &[Frame]) -> Vec<AvatarId> {
        frames
            .iter()
            .filter_map(|frame| match frame {
                Frame::AvatarUnlocked(avatar) => Some(*avatar),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_with_the_free_avatars() {
        let reporter = Reporter::default();
        let unlocked: Vec<AvatarId> = (1..=10).filter(|id| reporter.is_unlocked(*id)).collect();
        assert_eq!(unlocked, vec![1, 2, 3]);
        assert_eq!(reporter.current_avatar(), 1);
        assert_eq!(reporter.points(), 0);
    }

    #[test]
    fn one_hundred_forty_nine_points_reveal_four_and_five() {
        let mut reporter = Reporter::default();
        let mut frames = Vec::new();

        let revealed = reporter.check_unlocks(149, &mut frames);

        assert_eq!(revealed, vec![4, 5]);
        assert_eq!(unlocked_frames(&frames), vec![4, 5]);
        assert!(frames.contains(&Frame::message("🎉 New Avatar Unlocked!", Tone::Success)));
    }

    #[test]
    fn zero_points_reveal_nothing() {
        let mut reporter = Reporter::default();
        let mut frames = Vec::new();

        assert!(reporter.check_unlocks(0, &mut frames).is_empty());
        assert!(frames.is_empty());
    }

    #[test]
    fn unlock_check_is_idempotent() {
        let mut reporter = Reporter::default();
        let mut frames = Vec::new();
        reporter.check_unlocks(149, &mut frames);
        frames.clear();

        assert!(reporter.check_unlocks(149, &mut frames).is_empty());
        assert!(reporter.check_unlocks(60, &mut frames).is_empty());
        assert!(frames.is_empty());
        assert!(reporter.is_unlocked(5));
    }

    #[test]
    fn reveals_stop_at_the_last_avatar() {
        let mut reporter = Reporter::default();
        let mut frames = Vec::new();

        let revealed = reporter.check_unlocks(5000, &mut frames);

        assert_eq!(revealed, (4..=10).collect::<Vec<_>>());
    }

    #[test]
    fn profile_seeds_points_and_unlocks() {
        let reporter = Reporter::from_profile(&ProfileSnapshot {
            name: "Ada".into(),
            avatar_id: 4,
            points: 60,
            unlocked_avatars: vec![1, 2, 3, 4],
            most_used_app: String::new(),
            study_sessions: 0,
            total_wellness_time: 30,
        });

        assert_eq!(reporter.points(), 60);
        assert_eq!(reporter.current_avatar(), 4);
        assert!(reporter.is_unlocked(4));
        assert!(!reporter.is_unlocked(5));
    }

    #[test]
    fn locked_avatars_cannot_be_selected() {
        let reporter = Reporter::default();
        assert_eq!(reporter.select_avatar(7), None);
        assert_eq!(
            reporter.select_avatar(2),
            Some(ChangeAvatarRequest { avatar_id: 2 })
        );
    }

    #[test]
    fn avatar_change_outcomes_produce_messages() {
        let mut reporter = Reporter::default();
        let mut frames = Vec::new();

        reporter.avatar_changed(2, Ok(()), &mut frames);
        assert_eq!(reporter.current_avatar(), 2);
        assert_eq!(frames[0], Frame::CurrentAvatar(2));

        frames.clear();
        let refused = ApiError::Status {
            status: 400,
            message: "Avatar not unlocked".into(),
        };
        reporter.avatar_changed(3, Err(&refused), &mut frames);
        assert_eq!(reporter.current_avatar(), 2);
        assert_eq!(
            frames,
            vec![Frame::message("Avatar not unlocked yet!", Tone::Error)]
        );
    }

    #[test]
    fn blank_app_names_are_not_sent() {
        let reporter = Reporter::default();
        assert_eq!(reporter.update_app("   "), None);
        assert_eq!(
            reporter.update_app("  Wellness App "),
            Some(UpdateAppRequest {
                app_name: "Wellness App".into()
            })
        );
    }

    #[test]
    fn bonus_app_update_announces_the_bonus() {
        let mut reporter = Reporter::default();
        let mut frames = Vec::new();

        reporter.app_updated("this app", Ok(20), &mut frames);

        assert_eq!(reporter.points(), 20);
        assert_eq!(
            frames,
            vec![
                Frame::Points(20),
                Frame::message(
                    "Bonus +20 points for choosing this wellness app!",
                    Tone::Success
                ),
            ]
        );
    }

    #[test]
    fn refused_app_update_leaves_points_alone() {
        let mut reporter = Reporter::default();
        let mut frames = Vec::new();

        reporter.app_updated(
            "Maps",
            Err(&ApiError::Declined {
                path: "/update_most_used_app",
            }),
            &mut frames,
        );

        assert_eq!(reporter.points(), 0);
        assert!(frames.is_empty());
    }
}
