//! Reward engine.
//!
//! Maps action outcomes to scalar rewards for training and evaluating the
//! agent. The functions are stateless; the only state is the invalid-action
//! streak kept by `InvalidActionTracker`.

pub mod reward;
pub mod tracker;

pub use reward::{
    beer_reward, cigar_reward, handcuffs_reward, invalid_action_penalty, mag_glass_reward,
    shoot_reward,
};
pub use tracker::InvalidActionTracker;
