//! Presentation collaborator interfaces
//!
//! The sim never draws, sleeps or blocks. Presentation screens are modal
//! loops owned by the frontend; the orchestrating loop calls them between
//! ticks, so the simulation is suspended for exactly as long as a modal is
//! up. Input reaches the core only as decoded `TickInput` intents.

/// Modal presentation hooks the frontend provides
pub trait Presenter {
    /// Level-intro banner, shown at every level transition. Blocks until
    /// dismissed; the sim does not tick while it runs.
    fn level_intro(&mut self, level: u32);

    /// Game-over banner
    fn game_over(&mut self, score: u32, high_score: u32);
}

/// Presenter that skips all banners; useful headless and in tests
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn level_intro(&mut self, _level: u32) {}
    fn game_over(&mut self, _score: u32, _high_score: u32) {}
}
