//! Integration tests for aqdash-common crate.

use aqdash_common::{
    compass_index, hour_label, month_name, AqError, Dataset, GapPolicy, Reading, Variable,
    WindOrder, COMPASS_POINTS,
};
use chrono::NaiveDate;

fn reading(day: u32, hour: u32, pm25: Option<f64>) -> Reading {
    let date = NaiveDate::from_ymd_opt(2014, 3, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap();
    let mut values = [None; 11];
    values[Variable::Pm25.index()] = pm25;
    Reading {
        year: 2014,
        month: 3,
        day,
        hour,
        date,
        values,
        wd: Some("NE".to_string()),
    }
}

#[test]
fn test_dataset_span_ignores_row_order() {
    let dataset = Dataset::new(
        "all_data.csv",
        vec![reading(5, 3, Some(1.0)), reading(2, 23, None), reading(9, 0, Some(4.0))],
    );

    assert_eq!(dataset.len(), 3);
    assert!(!dataset.is_empty());
    assert_eq!(dataset.source().to_str(), Some("all_data.csv"));

    let (first, last) = dataset.date_span().unwrap();
    assert_eq!(first.to_string(), "2014-03-02 23:00:00");
    assert_eq!(last.to_string(), "2014-03-09 00:00:00");
}

#[test]
fn test_empty_dataset_has_no_span() {
    let dataset = Dataset::new("empty.csv", Vec::new());
    assert!(dataset.is_empty());
    assert!(dataset.date_span().is_none());
}

#[test]
fn test_reading_accessors() {
    let r = reading(4, 17, Some(88.0));
    assert_eq!(r.pm25(), Some(88.0));
    assert_eq!(r.value(Variable::Co), None);
    assert_eq!(r.day_date(), NaiveDate::from_ymd_opt(2014, 3, 4).unwrap());
}

#[test]
fn test_labels() {
    assert_eq!(month_name(7), Some("July"));
    assert_eq!(hour_label(13).as_deref(), Some("1 PM"));
    assert_eq!(hour_label(24), None);
    assert_eq!(compass_index("NNW"), Some(15));
    assert_eq!(compass_index("calm"), None);
    assert_eq!(COMPASS_POINTS.len(), 16);
}

#[test]
fn test_policies_default_and_parse() {
    assert_eq!(GapPolicy::default(), GapPolicy::Reject);
    assert_eq!(WindOrder::default(), WindOrder::Compass);
    assert_eq!("INTERPOLATE".parse::<GapPolicy>(), Ok(GapPolicy::Interpolate));
    assert!("sideways".parse::<WindOrder>().is_err());
}

#[test]
fn test_error_messages_name_the_problem() {
    let err = AqError::schema("WSPM");
    assert_eq!(err.to_string(), "Schema error: missing required column 'WSPM'");

    let err = AqError::parse(12, "TEMP", "warm");
    assert_eq!(
        err.to_string(),
        "Parse error at row 12, column 'TEMP': cannot parse \"warm\""
    );
}
