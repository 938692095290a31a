//! Scroll-until-stable loop used to trigger lazy-loaded listings.
//!
//! A pass scrolls from the top of the page to the last measured height in
//! fixed increments. After each pass the height is measured again; the loop
//! stops once a pass produced no growth.

use crate::config::ScrollConfig;
use crate::error::FetchError;
use std::time::Duration;

/// A page that can be measured and scrolled
#[allow(async_fn_in_trait)]
pub trait ScrollSurface {
    /// Current scrollable height in pixels
    async fn scroll_height(&mut self) -> Result<u64, FetchError>;

    /// Scroll forward by `pixels`
    async fn scroll_by(&mut self, pixels: u64) -> Result<(), FetchError>;
}

/// Pauses between scroll steps
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Decision taken after re-measuring the page at the end of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    /// No new content appeared
    Converged,
    /// The page changed; scroll again up to this height
    Continue(u64),
}

/// Summary of a finished scroll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSummary {
    pub passes: u32,
    pub final_height: u64,
    /// False when `max_passes` was reached before the page stopped growing
    pub converged: bool,
}

pub fn next_height(current: u64, measured: u64) -> ScrollStep {
    if measured == current {
        ScrollStep::Converged
    } else {
        ScrollStep::Continue(measured)
    }
}

/// Number of increments needed to cover `height` (one per step start in `0..height`)
pub fn steps_for(height: u64, step_px: u64) -> u64 {
    height.div_ceil(step_px.max(1))
}

/// Scroll the page pass by pass until its height stops changing
pub async fn scroll_until_stable<S, P>(
    surface: &mut S,
    pacing: &ScrollConfig,
    sleeper: &P,
) -> Result<ScrollSummary, FetchError>
where
    S: ScrollSurface,
    P: Sleeper,
{
    let step_px = pacing.step_px.max(1);
    let mut height = surface.scroll_height().await?;
    let mut passes = 0;

    loop {
        let steps = steps_for(height, step_px);
        ::log::trace!("Scroll pass {} over {}px in {} steps", passes + 1, height, steps);

        for _ in 0..steps {
            surface.scroll_by(step_px).await?;
            sleeper.sleep(pacing.step_pause()).await;
        }

        // Let the last batch of lazy content render before measuring
        sleeper.sleep(pacing.settle()).await;
        passes += 1;

        let measured = surface.scroll_height().await?;
        match next_height(height, measured) {
            ScrollStep::Converged => {
                ::log::debug!("Page height settled at {}px after {} passes", height, passes);
                return Ok(ScrollSummary {
                    passes,
                    final_height: height,
                    converged: true,
                });
            }
            ScrollStep::Continue(new_height) => {
                ::log::debug!("Page height changed {}px -> {}px", height, new_height);
                height = new_height;
            }
        }

        if passes >= pacing.max_passes {
            ::log::warn!(
                "Page still growing after {} scroll passes, using current content",
                passes
            );
            return Ok(ScrollSummary {
                passes,
                final_height: height,
                converged: false,
            });
        }
    }
}
