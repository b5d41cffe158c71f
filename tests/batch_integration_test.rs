use anyhow::Result;
use card_format::utils::validation::Validate;
use card_format::{BatchChecker, CardEngine, FixedClock, OutputFormat, TomlConfig};
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use tempfile::TempDir;

fn engine() -> CardEngine<FixedClock> {
    let now = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    CardEngine::with_clock(FixedClock(now))
}

#[test]
fn test_batch_with_toml_config_and_files() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let config_path = temp_dir.path().join("card-format.toml");
    std::fs::write(
        &config_path,
        r#"
[output]
format = "json"

[batch]
delimiter = ";"
number_column = "pan"
expiry_column = "valid_thru"
cvc_column = "security_code"
"#,
    )?;

    let input_path = temp_dir.path().join("cards.csv");
    std::fs::write(
        &input_path,
        "pan;valid_thru;security_code\n\
         4242 4242 4242 4242;12/28;123\n\
         3782 822463 10005;01/27;1234\n\
         4242 4242 4242 4241;12/28;123\n\
         5555555555554444;05/24;123\n",
    )?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    assert_eq!(config.output_format(), OutputFormat::Json);

    let output_path = temp_dir.path().join("report.json");
    let checker = BatchChecker::new(engine(), config.batch_settings()?);
    let summary = checker.run(
        BufReader::new(File::open(&input_path)?),
        File::create(&output_path)?,
        config.output_format(),
    )?;

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.valid, 2);
    assert_eq!(summary.invalid, 2);

    let report = std::fs::read_to_string(&output_path)?;
    assert!(!report.contains("4242424242424242"));
    assert!(!report.contains("4242 4242 4242 4242"));

    let report: serde_json::Value = serde_json::from_str(&report)?;
    let rows = report.as_array().expect("report is an array");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["network"], "visa");
    assert_eq!(rows[0]["last_four"], "4242");
    assert_eq!(rows[0]["expiry"], "12 / 28");
    assert_eq!(rows[1]["network"], "amex");
    assert_eq!(rows[1]["cvc_valid"], true);
    assert_eq!(rows[2]["number_valid"], false);
    // 05/24 expired at the start of June 2024
    assert_eq!(rows[3]["expiry_valid"], false);
    assert_eq!(rows[3]["valid"], false);

    Ok(())
}

#[test]
fn test_batch_csv_report_to_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("report.csv");

    let input = "number,cvc\n6011111111111117,123\n9999999999999999,12\n";
    let checker = BatchChecker::new(engine(), TomlConfig::default().batch_settings()?);
    let summary = checker.run(input.as_bytes(), File::create(&output_path)?, OutputFormat::Text)?;
    assert_eq!(summary.valid, 1);

    let report = std::fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines[0],
        "line,network,last_four,number_valid,expiry,expiry_valid,cvc_valid,valid"
    );
    assert_eq!(lines[1], "2,discover,1117,true,,,true,true");
    assert_eq!(lines[2], "3,unknown,9999,false,,,false,false");

    Ok(())
}

#[test]
fn test_batch_rejects_malformed_config() {
    let config = TomlConfig::from_toml_str("[batch]\ndelimiter = \"ab\"\n").unwrap();
    assert!(config.validate().is_err());
    assert!(config.batch_settings().is_err());
}
