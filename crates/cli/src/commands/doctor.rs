//! Doctor command - validate configuration and show status

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    rescue_groups: CheckResult,
    bluesky: CheckResult,
    instagram: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        rescue_groups: CheckResult::error("Not checked"),
        bluesky: CheckResult::error("Not checked"),
        instagram: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.rescue_groups = check_rescue_groups(config);
        report.bluesky = check_bluesky(config);
        report.instagram = check_instagram(config);
    }

    // Determine overall status
    let checks = [
        &report.config,
        &report.rescue_groups,
        &report.bluesky,
        &report.instagram,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn env_is_set(name: &str) -> bool {
    matches!(std::env::var(name), Ok(v) if !v.is_empty())
}

fn check_rescue_groups(config: &AppConfig) -> CheckResult {
    if !config.rescue_groups.enabled {
        return CheckResult::ok("RescueGroups source disabled");
    }

    let env_var = &config.rescue_groups.api_key_env;

    if env_var.is_empty() {
        return CheckResult::error("No API key env var configured");
    }

    if env_is_set(env_var) {
        CheckResult::ok(format!(
            "API key: {} (set), Species: {}, Postal code: {}",
            env_var, config.rescue_groups.species, config.rescue_groups.postal_code
        ))
    } else {
        CheckResult::warn(format!(
            "API key: {} (not set), Species: {}, Postal code: {}",
            env_var, config.rescue_groups.species, config.rescue_groups.postal_code
        ))
    }
}

fn check_bluesky(config: &AppConfig) -> CheckResult {
    if !config.bluesky.enabled {
        return CheckResult::ok("Bluesky posting disabled");
    }

    let handle_set =
        env_is_set(&config.bluesky.handle_env) || env_is_set(&config.bluesky.handle_fallback_env);
    let password_set = env_is_set(&config.bluesky.password_env)
        || env_is_set(&config.bluesky.password_fallback_env);

    match (handle_set, password_set) {
        (true, true) => CheckResult::ok(format!(
            "Credentials set ({} / {})",
            config.bluesky.handle_env, config.bluesky.password_env
        )),
        (true, false) => CheckResult::warn(format!(
            "Handle set but password not set ({} / {})",
            config.bluesky.password_env, config.bluesky.password_fallback_env
        )),
        (false, true) => CheckResult::warn(format!(
            "Password set but handle not set ({} / {})",
            config.bluesky.handle_env, config.bluesky.handle_fallback_env
        )),
        (false, false) => CheckResult::warn(format!(
            "Credentials not set ({} / {})",
            config.bluesky.handle_env, config.bluesky.password_env
        )),
    }
}

fn check_instagram(config: &AppConfig) -> CheckResult {
    if !config.instagram.enabled {
        return CheckResult::ok("Instagram posting disabled");
    }

    let handle_set = env_is_set(&config.instagram.handle_env);
    let password_set = env_is_set(&config.instagram.password_env);

    if handle_set && password_set {
        CheckResult::ok(format!(
            "Credentials set ({} / {})",
            config.instagram.handle_env, config.instagram.password_env
        ))
    } else {
        CheckResult::warn(format!(
            "Credentials not set ({} / {})",
            config.instagram.handle_env, config.instagram.password_env
        ))
    }
}

fn print_report(report: &DoctorReport) {
    println!("cutepets Doctor Report");
    println!("======================");
    println!();

    print_check("Config", &report.config);
    print_check("RescueGroups", &report.rescue_groups);
    print_check("Bluesky", &report.bluesky);
    print_check("Instagram", &report.instagram);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to run! Try: cutepets run --debug");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
