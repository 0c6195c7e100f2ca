use crate::models::prelude::{AnalysisResult, SentimentResult, TopicsResult};
use crate::present::view::{LabelView, ResultView, ScoreRow};
use anyhow::Result;
use clap::ValueEnum;
use itertools::Itertools;
use minijinja::{Environment, context};
use std::fmt::Write;

const MARKDOWN_TEMPLATE: &str = r#"# Text Analysis

> {{ view.text }}

## Sentiment: {{ view.sentiment.label }} ({{ view.sentiment.confidence }} confidence)

| Sentiment | Score |
|---|---|
{% for row in view.sentiment_scores -%}
| {{ row.name }} | {{ row.value }} |
{% endfor %}
## Topics

{% for topic in view.topics -%}
- {{ topic }}
{% else -%}
_No topics detected_
{% endfor %}
## Aspects

| Aspect | Sentiment |
|---|---|
{% for row in view.aspects -%}
| {{ row.name }} | {{ row.value }} |
{% endfor %}
## Emotion: {{ view.emotion.label }} ({{ view.emotion.confidence }} confidence)

| Emotion | Share |
|---|---|
{% for row in view.emotion_scores -%}
| {{ row.name }} | {{ row.value }} |
{% endfor %}
## Text Analysis

| Metric | Value |
|---|---|
{% for row in view.metrics -%}
| {{ row.name }} | {{ row.value }} |
{% endfor %}
## Keywords

{{ view.keywords | join(", ") }}
"#;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text for the terminal
    #[default]
    Summary,
    /// Markdown report
    Markdown,
    /// The service's JSON, pretty printed
    Json,
}

pub fn render_result(result: &AnalysisResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Summary => Ok(summary(&ResultView::from(result))),
        OutputFormat::Markdown => markdown(&ResultView::from(result)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

pub fn render_sentiment(result: &SentimentResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Summary | OutputFormat::Markdown => {
            let mut out = String::new();
            write_label(&mut out, "Sentiment", &LabelView::sentiment(result));
            write_rows(&mut out, &ScoreRow::sentiment_scores(result));
            Ok(out)
        }
    }
}

pub fn render_topics(result: &TopicsResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Summary | OutputFormat::Markdown => Ok(format!(
            "{}\n",
            joined_line("Topics", &result.topics)
        )),
    }
}

fn joined_line(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("{title} (0): none")
    } else {
        format!("{title} ({}): {}", items.len(), items.iter().join(", "))
    }
}

fn write_label(out: &mut String, title: &str, label: &LabelView) {
    writeln!(
        out,
        "{title}: {} ({} confidence)",
        label.label, label.confidence
    )
    .ok();
}

fn write_rows<'a>(out: &mut String, rows: impl IntoIterator<Item = &'a ScoreRow>) {
    for row in rows {
        writeln!(out, "  {}: {}", row.name, row.value).ok();
    }
}

fn summary(view: &ResultView) -> String {
    let mut out = String::new();

    writeln!(out, "Original Text").ok();
    writeln!(out, "  \"{}\"", view.text).ok();

    write_label(&mut out, "Sentiment", &view.sentiment);
    write_rows(&mut out, &view.sentiment_scores);

    writeln!(out, "{}", joined_line("Topics", &view.topics)).ok();

    writeln!(out, "Aspects").ok();
    write_rows(&mut out, &view.aspects);

    write_label(&mut out, "Emotion", &view.emotion);
    write_rows(&mut out, &view.emotion_scores);

    writeln!(out, "Text Analysis").ok();
    for metric in &view.metrics {
        writeln!(out, "  {}: {}", metric.name, metric.value).ok();
    }

    writeln!(out, "{}", joined_line("Keywords", &view.keywords)).ok();
    out
}

fn markdown(view: &ResultView) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("result.md", MARKDOWN_TEMPLATE)?;
    let template = env.get_template("result.md")?;
    Ok(template.render(context! { view => view })?)
}
