use std::fmt;

use polars::lazy::dsl::{col, lit};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use vidstats_parser::columns;

use crate::frame::{flag_values, take_rows, text_values};

pub const COUNTRY: &str = "country";

#[derive(Debug, Error)]
pub enum AudienceError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("channel export has no country/subscriber table")]
    MissingTable,
}

/// Coarse display grouping of viewer countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AudienceBucket {
    Usa,
    India,
    Other,
}

impl AudienceBucket {
    pub fn from_country_code(code: &str) -> Self {
        match code.trim() {
            "US" => AudienceBucket::Usa,
            "IN" => AudienceBucket::India,
            _ => AudienceBucket::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudienceBucket::Usa => "USA",
            AudienceBucket::India => "India",
            AudienceBucket::Other => "Other",
        }
    }
}

impl fmt::Display for AudienceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows of the country/subscriber table for one video title, with a `country` bucket
/// column, ordered unsubscribed viewers first, then subscribed, then rows with no flag.
/// The sort is stable.
pub fn classify_audience(
    country_table: &DataFrame,
    video_title: &str,
) -> Result<DataFrame, AudienceError> {
    let selected = country_table
        .clone()
        .lazy()
        .filter(col(columns::VIDEO_TITLE).eq(lit(video_title)))
        .collect()?;

    let buckets: Vec<&str> = text_values(&selected, columns::COUNTRY_CODE)?
        .iter()
        .map(|code| {
            code.as_deref()
                .map(AudienceBucket::from_country_code)
                .unwrap_or(AudienceBucket::Other)
                .label()
        })
        .collect();

    let flags = flag_values(&selected, columns::IS_SUBSCRIBED)?;
    let mut order: Vec<usize> = (0..selected.height()).collect();
    order.sort_by_key(|&idx| match flags[idx] {
        Some(false) => 0,
        Some(true) => 1,
        None => 2,
    });

    let mut classified = selected;
    classified.with_column(Series::new(COUNTRY.into(), buckets))?;
    let classified = take_rows(&classified, &order)?;

    debug!(
        video_title,
        rows = classified.height(),
        "classified audience rows"
    );
    Ok(classified)
}
