//! End-to-end tests of the dashboard build.

use aqdash::{Dashboard, SectionId, SectionStatus, INDEX_FILE, SUMMARY_FILE};
use aqdash_common::test_utils::{hourly_readings, init_test_logging, CsvFixture, ReadingBuilder};
use aqdash_common::AqError;
use aqdash_config::{Config, ImageFormat};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn config_for(data: &Path, output: &Path) -> Config {
    let mut config = Config::default();
    config.data.path = data.display().to_string();
    config.output.directory = output.display().to_string();
    config
}

fn month_of_readings() -> CsvFixture {
    let start = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
    CsvFixture::from_readings(&hourly_readings(start, 28, |day, hour| {
        30.0 + f64::from(day % 7) * 5.0 + f64::from(hour)
    }))
}

#[test]
fn test_page_lists_every_section() {
    init_test_logging();
    let fixture = month_of_readings();
    let out = tempdir().unwrap();

    let output = Dashboard::new(config_for(fixture.path(), out.path()))
        .build()
        .unwrap();

    // Whether charts render depends on available fonts; the page is always written.
    assert_eq!(output.sections.len(), 5);
    assert_eq!(output.index, out.path().join(INDEX_FILE));
    let html = fs::read_to_string(&output.index).unwrap();
    assert_eq!(html.matches("<section ").count(), 5);
    for section in SectionId::ALL {
        assert!(html.contains(section.subheader()), "missing {section}");
        assert!(html.contains(section.caption()), "missing caption of {section}");
    }
    assert!(html.contains("672 readings"));

    for outcome in &output.sections {
        if let SectionStatus::Rendered { image } = &outcome.status {
            assert!(out.path().join(image).is_file());
            assert!(html.contains(&format!("src=\"{image}\"")));
        }
    }
    assert!(output.summary.is_none());
}

#[test]
fn test_missing_csv_writes_nothing() {
    let out = tempdir().unwrap();
    let page_dir = out.path().join("site");

    let err = Dashboard::new(config_for(&out.path().join("absent.csv"), &page_dir))
        .build()
        .unwrap_err();

    assert!(matches!(err, AqError::FileNotFound { .. }));
    assert!(!page_dir.join(INDEX_FILE).exists());
}

#[test]
fn test_short_dataset_fails_only_daily_section() {
    let start = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap();
    let fixture = CsvFixture::from_readings(&hourly_readings(start, 5, |day, hour| {
        f64::from(day * 10 + hour)
    }));
    let out = tempdir().unwrap();

    let output = Dashboard::new(config_for(fixture.path(), out.path()))
        .build()
        .unwrap();

    let daily = output.outcome(SectionId::DailyTrend).unwrap();
    match &daily.status {
        SectionStatus::Failed { message } => {
            assert!(message.contains("Insufficient data"), "{message}");
            assert!(message.contains("required 14, got 5"), "{message}");
        }
        other => panic!("daily section should fail, got {other:?}"),
    }
    assert!(!out.path().join("daily_trend.png").exists());

    // The other sections are computed; any failure there comes from rendering.
    for outcome in &output.sections {
        if outcome.section == SectionId::DailyTrend {
            continue;
        }
        if let SectionStatus::Failed { message } = &outcome.status {
            assert!(
                message.starts_with("Chart could not be rendered"),
                "{}: {message}",
                outcome.section
            );
        }
    }

    let html = fs::read_to_string(&output.index).unwrap();
    assert!(html.contains("class=\"error\""));
}

#[test]
fn test_summary_export() {
    let readings = vec![
        ReadingBuilder::at(2014, 1, 1, 0).pm25(10.0).wd("N").build(),
        ReadingBuilder::at(2014, 1, 1, 1).pm25(20.0).wd("N").build(),
        ReadingBuilder::at(2014, 1, 2, 0).pm25(30.0).wd("S").build(),
    ];
    let fixture = CsvFixture::from_readings(&readings);
    let out = tempdir().unwrap();
    let mut config = config_for(fixture.path(), out.path());
    config.output.write_summary_json = true;
    config.output.image_format = ImageFormat::Svg;

    let output = Dashboard::new(config).build().unwrap();

    let summary_path = output.summary.clone().unwrap();
    assert_eq!(summary_path, out.path().join(SUMMARY_FILE));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();

    assert_eq!(json["rows"], 3);
    assert_eq!(json["monthly"]["entries"][0]["name"], "January");
    assert_eq!(json["monthly"]["entries"][0]["median"], 20.0);
    assert!(json["daily"].is_null());
    assert!(json["errors"]["daily_trend"]
        .as_str()
        .unwrap()
        .contains("Insufficient data"));
    assert!(json["errors"].get("monthly").is_none());
}

#[test]
#[ignore = "needs system fonts"]
fn test_all_charts_render_with_fonts() {
    let fixture = month_of_readings();
    let out = tempdir().unwrap();

    let output = Dashboard::new(config_for(fixture.path(), out.path()))
        .build()
        .unwrap();

    assert!(output.is_complete(), "failed: {:?}", output.failed_sections());
    for section in SectionId::ALL {
        let image = out.path().join(format!("{}.png", section.file_stem()));
        assert!(image.metadata().unwrap().len() > 0);
    }
}
