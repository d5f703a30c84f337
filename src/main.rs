use std::process::ExitCode;

use lanecheck::{device_abi_set, device_check_abis, host_abi_set, host_check_abis};
use lanecheck::{CheckConfig, CheckSummary};

fn print_summary(context: &str, summary: &CheckSummary) {
    println!("{context}:");
    for (kind, stats) in &summary.runs {
        println!(
            "  {:<8} {} lanes  {:>3} chunks compared, {} declined",
            kind.name(),
            kind.width(),
            stats.compared,
            stats.skipped
        );
    }
    let total = summary.total();
    println!(
        "  total    {} configurations, {} chunks compared, {} declined",
        summary.runs.len(),
        total.compared,
        total.skipped
    );
}

fn run() -> lanecheck::Result<()> {
    let config = CheckConfig::from_env()?;

    let host = host_check_abis(host_abi_set(), &config)?;
    print_summary("host", &host);

    // a host filter may name configurations the device set lacks
    let device_config = CheckConfig {
        on_mismatch: config.on_mismatch,
        abi_filter: config.abi_filter.as_ref().map(|abis| {
            abis.iter()
                .copied()
                .filter(|kind| device_abi_set().contains(kind))
                .collect()
        }),
    };
    if device_config.abi_filter.as_ref().is_some_and(Vec::is_empty) {
        println!("device: no selected configuration is available");
    } else {
        let device = device_check_abis(device_abi_set(), &device_config)?;
        print_summary("device", &device);
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lanecheck: {err}");
            ExitCode::FAILURE
        }
    }
}
