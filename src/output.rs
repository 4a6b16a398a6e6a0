//! Output formatting for dashboard reports.
//!
//! Supports plain text, pretty JSON, and CSV (one row per city card).

use std::io::Write;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::{CityCard, Dashboard, DensityCurve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(dashboard: &Dashboard) {
    debug!("{:#?}", dashboard);
}

/// Writes the report in the requested format.
pub fn render<W: Write>(dashboard: &Dashboard, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(dashboard, out),
        OutputFormat::Json => print_json(dashboard, out),
        OutputFormat::Csv => write_csv(dashboard, out),
    }
}

/// Writes any serializable value as pretty-printed JSON followed by a newline.
pub fn print_json<W: Write, T: Serialize + ?Sized>(value: &T, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    section: &'static str,
    city: &'a str,
    aqi: i64,
    severity: &'static str,
    color: &'static str,
    observed_at: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(section: &'static str, card: &'a CityCard) -> Self {
        CsvRow {
            section,
            city: &card.city,
            aqi: card.aqi,
            severity: card.severity.label(),
            color: card.color,
            observed_at: &card.observed_at,
        }
    }
}

/// Writes every card as a CSV row, headers included.
pub fn write_csv<W: Write>(dashboard: &Dashboard, out: &mut W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);

    if let Some(featured) = &dashboard.featured {
        writer.serialize(CsvRow::new("featured", &featured.card))?;
    }
    for card in &dashboard.best {
        writer.serialize(CsvRow::new("best", card))?;
    }
    for card in &dashboard.worst {
        writer.serialize(CsvRow::new("worst", card))?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes a human-readable summary.
pub fn print_text<W: Write>(dashboard: &Dashboard, out: &mut W) -> Result<()> {
    match &dashboard.featured {
        Some(featured) => {
            let card = &featured.card;
            writeln!(
                out,
                "{}: AQI {} ({}, {}), updated {}",
                card.city,
                card.aqi,
                card.severity.label(),
                card.color,
                card.observed_at
            )?;

            if let Some(forecast) = &featured.forecast {
                writeln!(out, "Forecast (PM2.5 daily avg):")?;
                for (i, (day, value)) in forecast.days.iter().zip(&forecast.values).enumerate() {
                    let marker = if forecast.today_index == Some(i) {
                        "  <- today"
                    } else {
                        ""
                    };
                    writeln!(out, "  {day}  {value:>6.1}{marker}")?;
                }
            }
        }
        None => writeln!(out, "{}: no reading available", dashboard.featured_city)?,
    }

    if let Some(ranking) = &dashboard.ranking {
        writeln!(
            out,
            "{} AQI percentile: {:.2}% of {} cities",
            dashboard.featured_city, ranking.percentile, ranking.sample_size
        )?;
        match &ranking.density {
            DensityCurve::Smooth { points } => {
                if let Some(peak) = ranking.density.peak() {
                    writeln!(
                        out,
                        "Density: {} samples, peak {:.5} at AQI {:.1}",
                        points.len(),
                        peak.y,
                        peak.x
                    )?;
                }
            }
            DensityCurve::Degenerate { at } => {
                writeln!(out, "Density: undefined, every value is {at}")?;
            }
        }
    }

    write_cards(out, "Best air quality", &dashboard.best)?;
    write_cards(out, "Worst air quality", &dashboard.worst)?;

    if !dashboard.failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "Failed to fetch:")?;
        for failure in &dashboard.failures {
            writeln!(out, "  {}: {}", failure.city, failure.reason)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Cities with collected data:")?;
    writeln!(out, "  {}", dashboard.cities.join(", "))?;

    Ok(())
}

fn write_cards<W: Write>(out: &mut W, title: &str, cards: &[CityCard]) -> Result<()> {
    if cards.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{title}:")?;
    for (i, card) in cards.iter().enumerate() {
        writeln!(
            out,
            "  {}. {:<24} {:>4}  {}  (updated {})",
            i + 1,
            card.city,
            card.aqi,
            card.severity.label(),
            card.observed_at
        )?;
    }
    Ok(())
}
