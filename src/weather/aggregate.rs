use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;

use super::models::{DailyForecast, ForecastEntry};

/// Collapse a sub-daily forecast series into one summary per UTC calendar day.
///
/// Per day the minimum of `temp_min_c` and the maximum of `temp_max_c` are
/// kept; description and icon come from the first entry of that day in series
/// order. Days are returned ascending and cut to `max_days` (0 = no limit).
pub fn aggregate(entries: &[ForecastEntry], max_days: usize) -> Vec<DailyForecast> {
    let mut days: IndexMap<NaiveDate, DailyForecast> = IndexMap::new();

    for entry in entries {
        let Some(date) = calendar_date(entry.timestamp_unix) else {
            tracing::warn!(
                timestamp = entry.timestamp_unix,
                "Skipping forecast entry with out-of-range timestamp"
            );
            continue;
        };

        days.entry(date)
            .and_modify(|day| {
                day.temp_min_c = day.temp_min_c.min(entry.temp_min_c);
                day.temp_max_c = day.temp_max_c.max(entry.temp_max_c);
            })
            .or_insert_with(|| DailyForecast {
                date,
                temp_min_c: entry.temp_min_c,
                temp_max_c: entry.temp_max_c,
                description: entry.description.clone(),
                icon: entry.icon.clone(),
            });
    }

    let mut daily: Vec<DailyForecast> = days.into_values().collect();
    daily.sort_by_key(|d| d.date);

    if max_days > 0 {
        daily.truncate(max_days);
    }

    daily
}

fn calendar_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-05-01T00:00:00Z
    const MAY_1: i64 = 1714521600;
    const HOUR: i64 = 3600;
    const DAY: i64 = 24 * HOUR;

    fn entry(ts: i64, min: f64, max: f64, description: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp_unix: ts,
            temp_min_c: min,
            temp_max_c: max,
            description: description.to_string(),
            icon: format!("{}-icon", description),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_day_scenario() {
        let entries = vec![
            entry(MAY_1, 10.0, 15.0, "Clear"),
            entry(MAY_1 + 12 * HOUR, 12.0, 18.0, "Clouds"),
            entry(MAY_1 + DAY, 8.0, 14.0, "Rain"),
        ];

        let daily = aggregate(&entries, 5);

        assert_eq!(
            daily,
            vec![
                DailyForecast {
                    date: date(2024, 5, 1),
                    temp_min_c: 10.0,
                    temp_max_c: 18.0,
                    description: "Clear".to_string(),
                    icon: "Clear-icon".to_string(),
                },
                DailyForecast {
                    date: date(2024, 5, 2),
                    temp_min_c: 8.0,
                    temp_max_c: 14.0,
                    description: "Rain".to_string(),
                    icon: "Rain-icon".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(aggregate(&[], 0).is_empty());
        assert!(aggregate(&[], 3).is_empty());
        assert!(aggregate(&[], 5).is_empty());
    }

    #[test]
    fn test_first_entry_of_day_supplies_description() {
        let entries = vec![
            entry(MAY_1 + 21 * HOUR, 9.0, 11.0, "Snow"),
            entry(MAY_1 + 3 * HOUR, 5.0, 20.0, "Clear"),
            entry(MAY_1 + 6 * HOUR, 7.0, 8.0, "Fog"),
        ];

        let daily = aggregate(&entries, 5);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].description, "Snow");
        assert_eq!(daily[0].icon, "Snow-icon");
        assert_eq!(daily[0].temp_min_c, 5.0);
        assert_eq!(daily[0].temp_max_c, 20.0);
    }

    #[test]
    fn test_reordering_within_day_keeps_extremes() {
        let a = entry(MAY_1, 3.0, 9.0, "A");
        let b = entry(MAY_1 + 9 * HOUR, 1.0, 12.0, "B");
        let c = entry(MAY_1 + 15 * HOUR, 4.0, 10.0, "C");

        let forward = aggregate(&[a.clone(), b.clone(), c.clone()], 0);
        let backward = aggregate(&[c, b, a], 0);

        assert_eq!(forward[0].temp_min_c, backward[0].temp_min_c);
        assert_eq!(forward[0].temp_max_c, backward[0].temp_max_c);
        assert_eq!(forward[0].description, "A");
        assert_eq!(backward[0].description, "C");
    }

    #[test]
    fn test_days_are_sorted_ascending() {
        let entries = vec![
            entry(MAY_1 + 2 * DAY, 1.0, 2.0, "third"),
            entry(MAY_1, 1.0, 2.0, "first"),
            entry(MAY_1 + DAY, 1.0, 2.0, "second"),
        ];

        let dates: Vec<NaiveDate> = aggregate(&entries, 0).into_iter().map(|d| d.date).collect();

        assert_eq!(
            dates,
            vec![date(2024, 5, 1), date(2024, 5, 2), date(2024, 5, 3)]
        );
    }

    #[test]
    fn test_three_and_five_day_views_share_one_series() {
        let entries: Vec<ForecastEntry> = (0..40)
            .map(|slot| entry(MAY_1 + slot * 3 * HOUR, slot as f64, slot as f64 + 5.0, "x"))
            .collect();

        let three = aggregate(&entries, 3);
        let five = aggregate(&entries, 5);
        let all = aggregate(&entries, 0);

        assert_eq!(three.len(), 3);
        assert_eq!(five.len(), 5);
        assert_eq!(all.len(), 5);
        assert_eq!(three[..], five[..3]);
        assert_eq!(five[1].temp_min_c, 8.0);
        assert_eq!(five[1].temp_max_c, 20.0);
    }

    #[test]
    fn test_max_days_larger_than_available() {
        let entries = vec![entry(MAY_1, 1.0, 2.0, "only")];
        assert_eq!(aggregate(&entries, 5).len(), 1);
    }
}
