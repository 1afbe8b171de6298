//! Time-stepped reveal of the GSP time series.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use dash_model::{Dataset, fields};

use crate::engine::FilteredView;
use crate::scale::{Extent, LinearScale, OrdinalColors, numeric_extent};
use crate::surface::{AxisShape, AxisSide, SeriesShape, Shape, Surface};
use crate::timer::{TimerId, TimerQueue};
use crate::view::{Geometry, RedrawOutcome};

/// Tick cadence and cursor step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub interval: Duration,
    pub step: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            step: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Play/pause animation over the year domain.
///
/// While playing, exactly one timer is registered in the [`TimerQueue`].
/// Each tick draws every state's series up to the cursor, then advances
/// the cursor by one step; the tick that draws the last year also cancels
/// the timer. Pausing keeps the cursor so play resumes from it, while play
/// after a completed run starts again from the first year.
#[derive(Debug)]
pub struct Animator<S> {
    dataset: Arc<Dataset>,
    surface: S,
    colors: OrdinalColors,
    config: AnimationConfig,
    scales: Option<(LinearScale, LinearScale)>,
    state: PlaybackState,
    cursor: Option<f64>,
    completed: bool,
    timer: Option<TimerId>,
}

impl<S: Surface> Animator<S> {
    /// Both axes are fixed from the whole dataset so the scale does not
    /// jump while the series grows.
    pub fn new(dataset: Arc<Dataset>, surface: S, config: AnimationConfig) -> Self {
        let geometry = Geometry::GSP_LINES;
        let scales = match (
            numeric_extent(&dataset.records, fields::CENSUS_YEAR),
            numeric_extent(&dataset.records, fields::GSP),
        ) {
            (Ok(years), Ok(gsp)) => Some((
                LinearScale::new(years, (0.0, geometry.width)),
                LinearScale::new(gsp.from_zero(), (geometry.height, 0.0)),
            )),
            _ => None,
        };
        Self {
            dataset,
            surface,
            colors: OrdinalColors::new(),
            config,
            scales,
            state: PlaybackState::Stopped,
            cursor: None,
            completed: false,
            timer: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn cursor(&self) -> Option<f64> {
        self.cursor
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Year domain, or `None` when the dataset has nothing to plot.
    pub fn domain(&self) -> Option<Extent> {
        self.scales.map(|(x, _)| x.domain)
    }

    /// Draws every series in full, as the panel looks before playback.
    pub fn render_full(&mut self) -> RedrawOutcome {
        match self.domain() {
            Some(domain) => self.draw_until(domain.max),
            None => {
                self.surface.clear();
                self.surface.present();
                RedrawOutcome::Cleared
            }
        }
    }

    /// Starts or resumes playback. Returns false if already playing or if
    /// there is nothing to animate.
    pub fn play(&mut self, timers: &mut TimerQueue) -> bool {
        if self.is_playing() {
            return false;
        }
        let Some(domain) = self.domain() else {
            debug!("animation has no year domain, play ignored");
            return false;
        };
        if !(self.config.step.is_finite() && self.config.step > 0.0) {
            warn!(step = self.config.step, "animation step must be positive, play ignored");
            return false;
        }
        if self.completed || self.cursor.is_none() {
            self.cursor = Some(domain.min);
            self.completed = false;
        }
        if let Some(stale) = self.timer.take() {
            timers.cancel(stale);
        }
        self.timer = Some(timers.schedule_every(self.config.interval));
        self.state = PlaybackState::Playing;
        info!(from = self.cursor, to = domain.max, "animation playing");
        true
    }

    /// Pauses playback, keeping the cursor.
    pub fn pause(&mut self, timers: &mut TimerQueue) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.cancel_timer(timers);
        self.state = PlaybackState::Stopped;
        info!(at = self.cursor, "animation paused");
        true
    }

    /// Play/Pause button handler; returns the label the button shows next.
    pub fn toggle(&mut self, timers: &mut TimerQueue) -> &'static str {
        if self.is_playing() {
            self.pause(timers);
        } else {
            self.play(timers);
        }
        if self.is_playing() { "Pause" } else { "Play" }
    }

    /// Stops playback and discards the cursor.
    pub fn stop(&mut self, timers: &mut TimerQueue) {
        self.cancel_timer(timers);
        self.state = PlaybackState::Stopped;
        self.cursor = None;
        self.completed = false;
    }

    /// Handles one timer tick. Ticks from any timer other than the current
    /// one are ignored and return `None`.
    pub fn on_tick(&mut self, id: TimerId, timers: &mut TimerQueue) -> Option<RedrawOutcome> {
        if !self.is_playing() || self.timer != Some(id) {
            return None;
        }
        let (Some(cursor), Some(domain)) = (self.cursor, self.domain()) else {
            self.stop(timers);
            return None;
        };
        let outcome = self.draw_until(cursor);
        let next = cursor + self.config.step;
        if next > domain.max {
            self.cancel_timer(timers);
            self.state = PlaybackState::Stopped;
            self.completed = true;
            info!(last = cursor, "animation completed");
        } else {
            self.cursor = Some(next);
        }
        Some(outcome)
    }

    fn cancel_timer(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
    }

    fn draw_until(&mut self, cursor: f64) -> RedrawOutcome {
        let Some((x, y)) = self.scales else {
            return RedrawOutcome::Cleared;
        };
        let dataset = Arc::clone(&self.dataset);
        let view = FilteredView::all(&dataset.records);

        self.surface.clear();
        self.surface.add(Shape::Axis(AxisShape::Linear {
            side: AxisSide::Bottom,
            scale: x,
        }));
        self.surface.add(Shape::Axis(AxisShape::Linear {
            side: AxisSide::Left,
            scale: y,
        }));
        let groups = view.group_by(fields::STATE);
        for group in &groups {
            let color = self.colors.color(&group.key);
            let points: Vec<(f64, f64)> = group
                .points(fields::CENSUS_YEAR, fields::GSP)
                .into_iter()
                .filter(|&(year, _)| year <= cursor)
                .collect();
            self.surface.add(Shape::Series(SeriesShape::new(
                &group.key, color, points, &x, &y,
            )));
        }
        self.surface.present();
        debug!(cursor, series = groups.len(), "animation frame");
        RedrawOutcome::Drawn {
            shapes: groups.len() + 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use dash_model::{DatasetKind, Record};

    fn gsp(years: std::ops::RangeInclusive<u32>) -> Arc<Dataset> {
        let records = years
            .flat_map(|year| {
                ["Ohio", "Utah"].map(|state| {
                    Record::new()
                        .with_text(fields::STATE, state)
                        .with_number(fields::CENSUS_YEAR, f64::from(year))
                        .with_number(fields::GSP, f64::from(year - 1990))
                })
            })
            .collect();
        Arc::new(Dataset::new(DatasetKind::Gsp.schema(), records))
    }

    fn run(animator: &mut Animator<RecordingSurface>, timers: &mut TimerQueue, ms: u64) {
        let until = timers.now() + Duration::from_millis(ms);
        while let Some(id) = timers.pop_due(until) {
            animator.on_tick(id, timers);
        }
        timers.settle(until);
    }

    #[test]
    fn pause_resumes_from_cursor() {
        let mut timers = TimerQueue::new();
        let mut animator =
            Animator::new(gsp(2000..=2005), RecordingSurface::new(), AnimationConfig::default());
        assert_eq!(animator.toggle(&mut timers), "Pause");
        run(&mut animator, &mut timers, 1_000);
        assert_eq!(animator.cursor(), Some(2002.0));

        assert_eq!(animator.toggle(&mut timers), "Play");
        assert_eq!(timers.active_count(), 0);
        run(&mut animator, &mut timers, 5_000);
        assert_eq!(animator.surface().frames(), 2);

        assert_eq!(animator.toggle(&mut timers), "Pause");
        run(&mut animator, &mut timers, 500);
        let ohio = animator
            .surface()
            .series()
            .find(|s| s.key == "Ohio")
            .expect("ohio");
        assert_eq!(ohio.points.last().map(|p| p.0), Some(2002.0));
    }

    #[test]
    fn replay_after_completion_restarts() {
        let mut timers = TimerQueue::new();
        let mut animator =
            Animator::new(gsp(2000..=2001), RecordingSurface::new(), AnimationConfig::default());
        animator.play(&mut timers);
        run(&mut animator, &mut timers, 10_000);
        assert!(animator.is_completed());
        assert_eq!(animator.surface().frames(), 2);

        assert!(animator.play(&mut timers));
        assert_eq!(animator.cursor(), Some(2000.0));
        run(&mut animator, &mut timers, 500);
        let first = animator.surface().series().next().expect("series");
        assert_eq!(first.points.len(), 1);
    }

    #[test]
    fn empty_dataset_cannot_play() {
        let mut timers = TimerQueue::new();
        let data = Arc::new(Dataset::new(DatasetKind::Gsp.schema(), Vec::new()));
        let mut animator = Animator::new(data, RecordingSurface::new(), AnimationConfig::default());
        assert_eq!(animator.toggle(&mut timers), "Play");
        assert_eq!(timers.active_count(), 0);
        assert_eq!(animator.render_full(), RedrawOutcome::Cleared);
    }

    #[test]
    fn non_positive_step_cannot_play() {
        for step in [0.0, -1.0, f64::NAN] {
            let mut timers = TimerQueue::new();
            let config = AnimationConfig {
                step,
                ..AnimationConfig::default()
            };
            let mut animator = Animator::new(gsp(2000..=2003), RecordingSurface::new(), config);
            assert_eq!(animator.toggle(&mut timers), "Play");
            assert!(!animator.is_playing());
            assert_eq!(timers.active_count(), 0);

            run(&mut animator, &mut timers, 60_000);
            assert_eq!(animator.surface().frames(), 0);
        }
    }
}
