#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the missing streets binary.
//!
//! Each [`Phase`] of a conflation run gets its own `indicatif` line in a
//! shared [`MultiProgress`], and [`init_logger`] routes `log` output
//! through that same [`MultiProgress`] so log lines never tear a bar.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use missing_streets_street_models::progress::ProgressCallback;

pub use indicatif::MultiProgress;

/// A stage of the pipeline that reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Streaming highway elements out of the PBF extract.
    OsmRecords,
    /// Indexing the authoritative road features.
    AuthoritativeFeatures,
    /// Matching authoritative sectors against the crowd index.
    Matching,
    /// The build and match steps of a single `run`.
    Run,
}

impl Phase {
    const fn label(self) -> &'static str {
        match self {
            Self::OsmRecords => "OSM records",
            Self::AuthoritativeFeatures => "Authoritative features",
            Self::Matching => "Matching sectors",
            Self::Run => "Pipeline",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Self::OsmRecords => "cyan",
            Self::AuthoritativeFeatures => "yellow",
            Self::Matching => "magenta",
            Self::Run => "green",
        }
    }

    fn spinner_style(self) -> ProgressStyle {
        let color = self.color();
        // record counts run into the tens of millions
        let template = if self == Self::OsmRecords {
            format!("{{spinner:.{color}}} {{msg}} {{human_pos}} [{{elapsed}}]")
        } else {
            format!("{{spinner:.{color}}} {{msg}}")
        };
        ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn counted_style(self) -> ProgressStyle {
        let color = self.color();
        let template = if self == Self::Run {
            format!("{{msg}} {{wide_bar:.{color}/dim}} {{pos}}/{{len}} [{{elapsed_precise}}]")
        } else {
            format!("  {{msg}} {{wide_bar:.{color}/dim}} {{pos}}/{{len}} {{percent}}% [{{eta}}]")
        };
        ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    }
}

/// [`ProgressCallback`] drawn as one line of a [`MultiProgress`].
///
/// Starts as a spinner and becomes a bar once the total is reported.
pub struct IndicatifProgress {
    phase: Phase,
    bar: ProgressBar,
}

impl IndicatifProgress {
    fn new(multi: &MultiProgress, phase: Phase) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(phase.spinner_style());
        bar.set_message(phase.label());
        Self { phase, bar }
    }

    /// Adds the line for `phase` to `multi`.
    #[must_use]
    pub fn phase_bar(multi: &MultiProgress, phase: Phase) -> Arc<dyn ProgressCallback> {
        Arc::new(Self::new(multi, phase))
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_style(self.phase.counted_style());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] that every phase bar must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // already set when called twice in one process
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn phase_starts_as_labelled_spinner() {
        let progress = IndicatifProgress::new(&hidden(), Phase::OsmRecords);
        assert_eq!(progress.bar.length(), None);
        assert_eq!(progress.bar.message(), "OSM records");
    }

    #[test]
    fn reported_total_turns_spinner_into_bar() {
        let progress = IndicatifProgress::new(&hidden(), Phase::Matching);
        progress.set_total(40);
        progress.inc(3);
        progress.inc(2);
        assert_eq!(progress.bar.length(), Some(40));
        assert_eq!(progress.bar.position(), 5);
    }

    #[test]
    fn finish_keeps_summary_message() {
        let progress = IndicatifProgress::new(&hidden(), Phase::Run);
        progress.set_total(2);
        progress.set_message("Matching".to_string());
        progress.inc(2);
        progress.finish("3 missing streets in 1.0s".to_string());
        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.message(), "3 missing streets in 1.0s");
    }
}
