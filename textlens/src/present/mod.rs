//! Turns service results into something a person can read.

mod render;
mod view;

pub mod prelude {
    pub use super::render::{OutputFormat, render_result, render_sentiment, render_topics};
    pub use super::view::{LabelView, MetricRow, ResultView, ScoreRow};
}
