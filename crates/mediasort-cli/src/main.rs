mod logging;

use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use mediasort_core::settings::Settings;

#[derive(Parser)]
#[command(
    name = "mediasort",
    version,
    about = "Sort media files into a YYYY/MM/DD tree by capture date"
)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, default_value = "settings.json")]
    settings: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let t_total = std::time::Instant::now();

    let settings = Settings::load(&cli.settings)?;
    logging::prune_log(&settings.log_path(), settings.logfile_max_size)?;
    let _guard = logging::init(&settings.log_path(), &cli.log_level)?;
    tracing::info!(settings = %cli.settings.display(), "starting run");

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} {msg}")
            .unwrap(),
    );

    let pb_cb = pb.clone();
    let progress = move |stage: &str, current: u64, total: u64, message: &str| {
        if pb_cb.length() != Some(total) {
            pb_cb.set_length(total);
        }
        pb_cb.set_position(current);
        pb_cb.set_message(format!("{}: {}", stage, message));
    };

    let result = mediasort_core::run(&settings, &progress);
    pb.finish_and_clear();
    let report = result?;
    tracing::info!(
        moved = report.moved,
        skipped_unknown = report.skipped_unknown,
        resolution_failures = report.resolution_failures,
        move_failures = report.move_failures,
        "run complete"
    );

    eprintln!(
        "Done! {} files seen, {} moved, {} unknown type, {} unresolved, {} move errors ({:.2}s)",
        report.total_files,
        report.moved,
        report.skipped_unknown,
        report.resolution_failures,
        report.move_failures,
        t_total.elapsed().as_secs_f64()
    );

    Ok(())
}
