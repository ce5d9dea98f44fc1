use anyhow::Result;
use chrono::Local;
use clap::Parser;
use console::style;
use daylight_timelapse::cli::Cli;
use daylight_timelapse::component::timelapse_assembler::{RunSummary, TimelapseBuilder};
use daylight_timelapse::init;
use daylight_timelapse::signal::setup_shutdown_signal;
use log::{error, info};
use std::process::ExitCode;

const EXIT_JOB_FAILED: u8 = 1;
const EXIT_FATAL: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init::init(cli.debug);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("執行失敗: {e:#}");
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = cli.run_config(Local::now().date_naive())?;
    let shutdown_signal = setup_shutdown_signal();
    let builder = TimelapseBuilder::from_config(config, shutdown_signal)?;

    if cli.print_sun {
        let sun = builder.sun_window()?;
        let config = builder.config();
        println!("{} {}:", config.location, config.date);
        println!("  黎明: {}", sun.dawn.time());
        println!("  日出: {}", sun.sunrise.time());
        println!("  日落: {}", sun.sunset.time());
        println!("  黃昏: {}", sun.dusk.time());
        return Ok(ExitCode::SUCCESS);
    }

    let summary = builder.run()?;
    print_summary(&summary);

    let code = if summary.was_cancelled() {
        ExitCode::from(EXIT_CANCELLED)
    } else if summary.failed() > 0 {
        ExitCode::from(EXIT_JOB_FAILED)
    } else {
        ExitCode::SUCCESS
    };
    Ok(code)
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "{}",
        style(format!("=== {} 縮時影片 ({}) ===", summary.date, summary.window))
            .cyan()
            .bold()
    );

    if summary.no_files() {
        println!("{}", style("時段內沒有任何影像，未產生影片").yellow());
        info!("{} 沒有影像", summary.date);
        return;
    }

    println!("  影像: {} 張", summary.files_found);
    for job in &summary.jobs {
        match &job.result {
            Ok(path) => println!(
                "  {} {}s -> {}",
                style("成功").green(),
                job.duration,
                path.display()
            ),
            Err(e) => println!("  {} {}s: {e}", style("失敗").red(), job.duration),
        }
    }

    info!(
        "編碼任務完成 - 成功: {}, 失敗: {}",
        summary.succeeded(),
        summary.failed()
    );
}
