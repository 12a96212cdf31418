//! Integration tests for aqdash-analysis crate.

use aqdash_analysis::{CsvLoader, PipelineSettings, ReportPipeline};
use aqdash_common::test_utils::{
    assert_approx_eq, hourly_readings, init_test_logging, CsvFixture, ReadingBuilder, CSV_HEADER,
};
use aqdash_common::{AqError, GapPolicy, Variable, WindOrder};
use chrono::NaiveDate;

#[test]
fn test_csv_file_to_report() {
    init_test_logging();

    let start = NaiveDate::from_ymd_opt(2013, 3, 1).unwrap();
    let readings = hourly_readings(start, 35, |day, hour| {
        40.0 + f64::from(day) + if hour < 6 { 20.0 } else { 0.0 }
    });
    let fixture = CsvFixture::from_readings(&readings);

    let dataset = ReportPipeline::load(fixture.path()).expect("fixture should load");
    assert_eq!(dataset.len(), 35 * 24);

    let report = ReportPipeline::default().run(&dataset);
    assert!(report.is_complete(), "failed: {:?}", report.failed_sections());

    let monthly = report.monthly.unwrap();
    assert_eq!(monthly.labels(), vec!["March", "April"]);

    let hourly = report.hourly.unwrap();
    assert_eq!(hourly.get(0), Some(77.0));
    assert_eq!(hourly.get(12), Some(57.0));

    let daily = report.daily.unwrap();
    assert_eq!(daily.series.len(), 35);
    // each day is 18 readings at the base level and 6 above it
    assert_eq!(daily.series.days[0].median, Some(40.0));
    let trend = daily.decomposition.trend_points();
    assert_eq!(trend.len(), 35 - 6);
    assert_approx_eq(trend[0].1, 43.0, 1e-9);

    let correlation = report.correlation.unwrap();
    assert!(correlation.is_symmetric(1e-12));
    assert_eq!(correlation.get(Variable::Pm25, Variable::Pm25), Some(1.0));
}

#[test]
fn test_small_dataset_medians_end_to_end() {
    let readings = vec![
        ReadingBuilder::at(2014, 1, 1, 0).pm25(10.0).wd("N").build(),
        ReadingBuilder::at(2014, 1, 1, 1).pm25(20.0).wd("N").build(),
        ReadingBuilder::at(2014, 1, 2, 0).pm25(30.0).wd("S").build(),
    ];
    let fixture = CsvFixture::from_readings(&readings);
    let dataset = CsvLoader::new().load(fixture.path()).unwrap();

    let report = ReportPipeline::default().run(&dataset);

    assert_eq!(report.monthly.unwrap().get("January"), Some(20.0));
    let wind = report.wind.unwrap();
    assert_eq!(wind.get("N"), Some(15.0));
    assert_eq!(wind.get("S"), Some(30.0));
    assert!(matches!(report.daily, Err(AqError::InsufficientData { .. })));
}

#[test]
fn test_missing_column_file() {
    let fixture = CsvFixture::from_text(
        "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,station\n1,2013,3,1,0,4,4,4,7,300,77,-0.7,1023,-18.8,0,NNW,Guanyuan\n",
    );

    match ReportPipeline::load(fixture.path()) {
        Err(err @ AqError::Schema { .. }) => assert!(err.to_string().contains("WSPM")),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_gap_day_with_both_policies() {
    let mut readings = hourly_readings(NaiveDate::from_ymd_opt(2015, 5, 1).unwrap(), 9, |d, _| {
        f64::from(d)
    });
    readings.extend(hourly_readings(
        NaiveDate::from_ymd_opt(2015, 5, 11).unwrap(),
        9,
        |d, _| f64::from(d + 10),
    ));
    let fixture = CsvFixture::from_readings(&readings);
    let dataset = ReportPipeline::load(fixture.path()).unwrap();

    let report = ReportPipeline::default().run(&dataset);
    match report.daily {
        Err(AqError::MissingValues { date, .. }) => {
            assert_eq!(date, NaiveDate::from_ymd_opt(2015, 5, 10));
        }
        other => panic!("expected missing values, got {other:?}"),
    }

    let interpolating = ReportPipeline::new(PipelineSettings {
        gap_policy: GapPolicy::Interpolate,
        ..PipelineSettings::default()
    });
    let daily = interpolating.run(&dataset).daily.unwrap();
    assert_eq!(daily.series.gaps().len(), 1);
    assert_approx_eq(daily.decomposition.observed[9], 9.0, 1e-12);
}

#[test]
fn test_na_rows_and_wind_order() {
    let text = format!(
        "{CSV_HEADER}\n\
         1,2013,3,1,0,NA,4,4,7,300,77,-0.7,1023,-18.8,0,NNW,4.4,Guanyuan\n\
         2,2013,3,1,1,9,8,4,7,300,77,-1.1,1023.2,-18.2,0,,4.7,Guanyuan\n\
         3,2013,3,1,2,12,8,4,7,300,77,-1.1,1023.2,-18.2,0,E,4.7,Guanyuan\n\
         4,2013,3,1,3,6,8,4,7,300,77,-1.1,1023.2,-18.2,0,NNW,4.7,Guanyuan\n"
    );
    let fixture = CsvFixture::from_text(&text);
    let dataset = CsvLoader::new().load(fixture.path()).unwrap();

    let compass = ReportPipeline::default().run(&dataset).wind.unwrap();
    assert_eq!(compass.labels(), vec!["E", "NNW"]);
    assert_eq!(compass.get("NNW"), Some(6.0));

    let lexical = ReportPipeline::new(PipelineSettings {
        wind_order: WindOrder::Lexical,
        ..PipelineSettings::default()
    })
    .run(&dataset)
    .wind
    .unwrap();
    assert_eq!(lexical.labels(), vec!["E", "NNW"]);
}
