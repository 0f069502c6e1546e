use climastat_analysis::{
    analysis::{AnalysisOutcome, AnalysisReport, ReportConfig},
    reading::LocationData,
    sample::{Quantity, Variable},
    selector::Branch,
    sheet::{SensorSheet, SheetValue, TemperatureUnit},
};

/// Deterministic jitter in `[-0.5, 0.5)`.
fn jitter(day: u32, hour: u32, salt: u32) -> f64 {
    f64::from((day * day * 13 + hour * hour * 7 + salt * 5 + day * hour) % 29) / 29.0 - 0.5
}

/// Builds a sheet with three readings a day; temperature cells use a decimal
/// comma, and the evening reading of day 5 is missing its humidity.
fn sheet_json(location: &str, base_temperature: f64, base_humidity: f64) -> String {
    let mut rows = vec![];
    for day in 1..=20_u32 {
        for (hour, t_offset, h_offset) in [(7, -1.5, 4.0), (13, 2.5, -6.0), (20, 0.5, 1.0)] {
            let noise = jitter(day, hour, 0);
            let temperature = base_temperature + t_offset + noise;
            let humidity = base_humidity + h_offset - 2.0 * noise + 0.5 * jitter(day, hour, 1);
            let humidity = if day == 5 && hour == 20 {
                "null".to_owned()
            } else {
                format!("{humidity:.1}")
            };
            let temperature = format!("{temperature:.2}").replace('.', ",");
            rows.push(format!(
                r#"{{ "date": "2024-05-{day:02}", "time": "{hour:02}:00", "temperature": "{temperature}", "humidity": {humidity} }}"#
            ));
        }
    }
    format!(
        r#"{{ "location": "{location}", "rows": [{}] }}"#,
        rows.join(",\n")
    )
}

fn load(json: &str) -> LocationData {
    let sheet: SensorSheet = serde_json::from_str(json).unwrap();
    LocationData::from_sheet(&sheet).unwrap()
}

#[test]
fn test_sheet_to_report() {
    let living_room = load(&sheet_json("Living room", 21.0, 48.0));
    let basement = load(&sheet_json("Basement", 15.0, 66.0));

    assert_eq!(living_room.readings.len(), 59);
    assert_eq!(living_room.skipped_rows, 1);
    assert_eq!(living_room.days.len(), 19);
    assert_eq!(living_room.incomplete_days.len(), 1);

    let report = AnalysisReport::build(&living_room, &basement, &ReportConfig::default());

    let t_mean = report.comparison.variables[0].outcome.completed().unwrap();
    assert_eq!(t_mean.label, Variable::TemperatureMean.label());
    assert!(t_mean.final_p_value() < 1e-4);
    if t_mean.branch() == Branch::NonParametric {
        assert!(t_mean.variance_p_value().is_none());
    }

    let temperature_effect = report
        .time_of_day
        .iter()
        .find(|effect| effect.location == "Living room" && effect.quantity == Quantity::Temperature)
        .unwrap();
    let anova = temperature_effect.outcome.completed().unwrap();
    assert_eq!(anova.subjects, 19);
    assert!(anova.p_value < 1e-6);

    let correlation = report.correlations[0].outcome.completed().unwrap();
    assert!(correlation.r < -0.9, "r = {}", correlation.r);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["locations"][1]["location"], "Basement");
    assert_eq!(json["distributions"].as_array().unwrap().len(), 8);
}

#[test]
fn test_fahrenheit_sheet_matches_celsius() {
    let celsius = load(&sheet_json("Office", 20.0, 50.0));
    let mut sheet: SensorSheet = serde_json::from_str(&sheet_json("Office", 20.0, 50.0)).unwrap();
    sheet.temperature_unit = TemperatureUnit::Fahrenheit;
    for row in &mut sheet.rows {
        let value = row.temperature.as_ref().and_then(SheetValue::parse).unwrap();
        row.temperature = Some(SheetValue::Number(value * 9.0 / 5.0 + 32.0));
    }
    let fahrenheit = LocationData::from_sheet(&sheet).unwrap();

    for (c, f) in celsius.days.iter().zip(&fahrenheit.days) {
        assert!((c.temperature_mean - f.temperature_mean).abs() < 1e-9);
        assert!((c.temperature_range - f.temperature_range).abs() < 1e-9);
    }
}

#[test]
fn test_identical_locations_show_no_difference() {
    let a = load(&sheet_json("North", 19.0, 55.0));
    let b = load(&sheet_json("South", 19.0, 55.0));
    let report = AnalysisReport::build(&a, &b, &ReportConfig::default());
    for comparison in &report.comparison.variables {
        match &comparison.outcome {
            AnalysisOutcome::Completed(result) => {
                assert!(!result.is_significant(), "{result}");
            }
            AnalysisOutcome::Failed { error } => panic!("{}: {error}", comparison.variable),
        }
    }
}
