//! Test data generation for benchmarks.
//!
//! Generators are seeded so runs are reproducible.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabula_core::Record;
use uuid::Uuid;

/// Scale factor for benchmark data generation.
#[derive(Clone, Copy, Debug, Default)]
pub enum Scale {
    /// 100 records.
    Small,
    /// 10,000 records.
    #[default]
    Medium,
    /// 100,000 records.
    Large,
}

impl Scale {
    /// Get the record count for this scale.
    pub fn count(&self) -> usize {
        match self {
            Scale::Small => 100,
            Scale::Medium => 10_000,
            Scale::Large => 100_000,
        }
    }
}

/// A wide record mixing ids, timestamps, text and numbers.
#[derive(Debug, Clone, Record)]
pub struct Measurement {
    #[record(rename = "Guid")]
    pub guid: Uuid,
    #[record(rename = "DateTime")]
    pub date_time: NaiveDateTime,
    #[record(rename = "Text")]
    pub text: String,
    #[record(rename = "Number")]
    pub number: i32,
    #[record(rename = "Guid2")]
    pub guid2: Uuid,
    #[record(rename = "DateTime2")]
    pub date_time2: NaiveDateTime,
    #[record(rename = "Text2")]
    pub text2: String,
    #[record(rename = "Number2")]
    pub number2: i32,
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// `count` copies of one measurement.
pub fn repeat_measurement(count: usize) -> Vec<Measurement> {
    let sample = Measurement {
        guid: Uuid::from_u128(1),
        date_time: base_time(),
        text: "Text".into(),
        number: 0,
        guid2: Uuid::from_u128(2),
        date_time2: base_time(),
        text2: "Text2".into(),
        number2: 0,
    };
    vec![sample; count]
}

/// `count` distinct measurements generated from `seed`.
pub fn generate_measurements(count: usize, seed: u64) -> Vec<Measurement> {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = base_time();

    (0..count)
        .map(|i| {
            let word: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            Measurement {
                guid: Uuid::from_u128(rng.gen()),
                date_time: base + Duration::seconds(rng.gen_range(0..31_536_000)),
                text: format!("Text_{word}"),
                number: rng.gen_range(0..1_000),
                guid2: Uuid::from_u128(rng.gen()),
                date_time2: base + Duration::milliseconds(i as i64),
                text2: format!("Item {i}"),
                number2: (i % 97) as i32,
            }
        })
        .collect()
}
