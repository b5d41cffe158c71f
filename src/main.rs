use card_format::config::Command;
use card_format::core::cards::{card_rules, validate_rule_table};
use card_format::core::keystroke::{network_label, UNKNOWN_NETWORK};
use card_format::utils::error::CardError;
use card_format::utils::{logger, validation::Validate};
use card_format::{BatchChecker, CardEngine, CliConfig, OutputFormat, TomlConfig};
use clap::Parser;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

fn main() {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (可選)
    let file_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}'", path);
                exit_with_error(&e);
            }
        },
        None => TomlConfig::default(),
    };

    // 初始化日誌
    if file_config.json_logs() {
        logger::init_json_logger(cli.verbose, file_config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, file_config.log_level());
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = file_config.validate() {
        tracing::error!("❌ Configuration validation failed");
        exit_with_error(&e);
    }

    if let Err(e) = validate_rule_table(card_rules()) {
        exit_with_error(&e);
    }

    let format = cli.format.unwrap_or_else(|| file_config.output_format());

    match run(&cli.command, &file_config, format) {
        Ok(code) => std::process::exit(code),
        Err(e) => exit_with_error(&e),
    }
}

/// 執行子命令，回傳結束碼 (0 = 有效, 1 = 無效)
fn run(
    command: &Command,
    file_config: &TomlConfig,
    format: OutputFormat,
) -> card_format::Result<i32> {
    let engine = CardEngine::new();

    match command {
        Command::Network { number } => {
            let network = engine.card_network_of(number);
            match format {
                OutputFormat::Text => println!("{}", network_label(number)),
                OutputFormat::Json => println!("{}", json!({ "network": network })),
            }
            Ok(if network.is_some() { 0 } else { 1 })
        }
        Command::ValidateNumber { number } => {
            let valid = engine.validate_number(number);
            let details = json!({ "network": engine.card_network_of(number) });
            print_verdict(format, valid, details);
            Ok(exit_code(valid))
        }
        Command::ValidateExpiry { month, year } => {
            let valid = engine.validate_expiry(month, year.as_deref());
            let parsed = match year {
                Some(_) => None,
                None => engine.parse_expiry(month),
            };
            match (format, parsed) {
                (OutputFormat::Text, Some(date)) => println!("{} ({})", verdict(valid), date),
                _ => print_verdict(format, valid, json!({ "parsed": parsed })),
            }
            Ok(exit_code(valid))
        }
        Command::ValidateCvc { cvc, network } => {
            let valid = engine.validate_cvc(cvc, network.as_deref());
            print_verdict(format, valid, json!({ "network": network }));
            Ok(exit_code(valid))
        }
        Command::FormatNumber { number } => {
            print_formatted(format, &engine.reformat_number(number));
            Ok(0)
        }
        Command::FormatExpiry { expiry } => {
            print_formatted(format, &engine.reformat_expiry(expiry));
            Ok(0)
        }
        Command::Check { number, expiry, cvc } => {
            let check = engine.check(number, expiry.as_deref(), cvc.as_deref());
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&check)?),
                OutputFormat::Text => {
                    let network = check.network.as_deref().unwrap_or(UNKNOWN_NETWORK);
                    println!("network:  {}", network);
                    println!(
                        "number:   {} ({})",
                        check.formatted_number,
                        verdict(check.number_valid)
                    );
                    if let (Some(formatted), Some(valid)) =
                        (&check.formatted_expiry, check.expiry_valid)
                    {
                        println!("expiry:   {} ({})", formatted, verdict(valid));
                    }
                    if let Some(valid) = check.cvc_valid {
                        println!("cvc:      {}", verdict(valid));
                    }
                }
            }
            Ok(exit_code(check.is_valid()))
        }
        Command::Batch { input, output } => {
            let settings = file_config.batch_settings()?;
            let checker = BatchChecker::new(engine, settings);
            tracing::info!("📁 Reading batch input from: {}", input);

            let reader = BufReader::new(File::open(input)?);
            let summary = match output {
                Some(path) => {
                    let writer = BufWriter::new(File::create(path)?);
                    let summary = checker.run(reader, writer, format)?;
                    tracing::info!("📁 Report saved to: {}", path);
                    summary
                }
                None => checker.run(reader, io::stdout().lock(), format)?,
            };
            Ok(exit_code(summary.invalid == 0))
        }
        Command::Networks => {
            let rules = card_rules();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rules)?),
                OutputFormat::Text => {
                    let mut stdout = io::stdout().lock();
                    for rule in rules {
                        writeln!(
                            stdout,
                            "{:<20} prefixes={} lengths={:?} cvc={:?} luhn={}",
                            rule.network_id,
                            rule.prefix_patterns.join(","),
                            rule.valid_lengths,
                            rule.valid_cvc_lengths,
                            rule.requires_luhn
                        )?;
                    }
                }
            }
            Ok(0)
        }
    }
}

fn verdict(valid: bool) -> &'static str {
    if valid {
        "valid"
    } else {
        "invalid"
    }
}

fn exit_code(valid: bool) -> i32 {
    if valid {
        0
    } else {
        1
    }
}

fn print_verdict(format: OutputFormat, valid: bool, mut details: serde_json::Value) {
    match format {
        OutputFormat::Text => println!("{}", verdict(valid)),
        OutputFormat::Json => {
            details["valid"] = json!(valid);
            println!("{}", details);
        }
    }
}

fn print_formatted(format: OutputFormat, formatted: &str) {
    match format {
        OutputFormat::Text => println!("{}", formatted),
        OutputFormat::Json => println!("{}", json!({ "formatted": formatted })),
    }
}

fn exit_with_error(e: &CardError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ card-format failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼 (1 保留給驗證失敗)
    std::process::exit(e.exit_code());
}
