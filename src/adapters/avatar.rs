//! Avatar pickers. Implement AvatarPicker.

use crate::domain::AVATARS;
use crate::ports::AvatarPicker;
use rand::Rng;

/// Uniform pick over [`AVATARS`], independent on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAvatarPicker;

impl AvatarPicker for RandomAvatarPicker {
    fn pick(&self) -> &'static str {
        AVATARS[rand::thread_rng().gen_range(0..AVATARS.len())]
    }
}

/// Always returns the avatar at `index` (wrapped into range). For tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedAvatarPicker(pub usize);

impl AvatarPicker for FixedAvatarPicker {
    fn pick(&self) -> &'static str {
        AVATARS[self.0 % AVATARS.len()]
    }
}
