//! Terminal chart of rating trajectories
//!
//! The chart is redrawn from a fresh `series_for_chart` call on every
//! tick, so matches recorded by other invocations show up on the next
//! refresh.

use crate::history::HistoryService;
use crate::rating::PlayerTrajectory;
use crate::types::Competition;
use crate::utils::display_rating;
use std::fmt::Write;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Widest sparkline drawn; longer series show only their most recent part
pub const DEFAULT_CHART_WIDTH: usize = 60;

/// Sparkline of `values` scaled between `min` and `max`
pub fn sparkline(values: &[f64], min: f64, max: f64) -> String {
    let span = max - min;

    values
        .iter()
        .map(|value| {
            if span <= f64::EPSILON {
                return BARS[BARS.len() / 2 - 1];
            }
            let level = ((value - min) / span * (BARS.len() - 1) as f64).round();
            BARS[(level.max(0.0) as usize).min(BARS.len() - 1)]
        })
        .collect()
}

/// One line per player: name, sparkline and current rating
///
/// All sparklines share the same vertical scale and the same window of
/// the most recent `width` points.
pub fn render_chart(competition: &Competition, series: &[PlayerTrajectory], width: usize) -> String {
    let mut out = String::new();
    let points = series.first().map(|entry| entry.ratings.len()).unwrap_or(0);
    let _ = writeln!(
        out,
        "{} ({} matches)",
        competition,
        points.saturating_sub(1)
    );

    if series.is_empty() {
        out.push_str("No matches recorded\n");
        return out;
    }

    let start = points.saturating_sub(width.max(1));
    let window = |entry: &PlayerTrajectory| -> Vec<f64> {
        entry.ratings.get(start..).unwrap_or_default().to_vec()
    };

    let (min, max) = series
        .iter()
        .flat_map(window)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(value), hi.max(value))
        });

    let name_width = series
        .iter()
        .map(|entry| entry.player_id.as_str().chars().count())
        .max()
        .unwrap_or(0);

    for entry in series {
        let current = entry.current().map(display_rating).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<name_width$} {} {:>4}",
            entry.player_id.as_str(),
            sparkline(&window(entry), min, max),
            current,
            name_width = name_width
        );
    }
    out
}

/// Redraw the chart every `interval` until `shutdown` resolves
///
/// `draw` receives each fresh set of series. With `max_frames` set the
/// loop also stops after that many frames. Returns the number of frames
/// drawn.
pub async fn watch<D, S>(
    service: &HistoryService,
    competition: &Competition,
    interval: Duration,
    max_frames: Option<usize>,
    mut draw: D,
    shutdown: S,
) -> crate::error::Result<usize>
where
    D: FnMut(&[PlayerTrajectory]) -> crate::error::Result<()>,
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut frames = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let series = service.series_for_chart(competition)?;
                draw(&series)?;
                frames += 1;
                debug!("Drew chart frame {} for {}", frames, competition);

                if max_frames.is_some_and(|max| frames >= max) {
                    return Ok(frames);
                }
            }
            _ = &mut shutdown => {
                info!("Stopping chart for {} after {} frames", competition, frames);
                return Ok(frames);
            }
        }
    }
}
