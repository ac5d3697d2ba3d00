use std::path::{Path, PathBuf};
use std::{env, process};

use batch_voucher_lib::{
    run_export, LocalDirSink, LocalDirSource, LogNotifier, NotificationSink, OutputProfile,
    OutputSink,
};
use log::info;

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (input_dir, output_dir) = match (args.next(), args.next()) {
        (Some(input), Some(output)) => (PathBuf::from(input), PathBuf::from(output)),
        _ => {
            eprintln!("Usage: batch_voucher_bin <input_dir> <output_dir> [profile.json]");
            process::exit(1);
        }
    };
    let profile = match args.next() {
        Some(path) => match OutputProfile::load(Path::new(&path)) {
            Ok(profile) => profile,
            Err(e) => {
                eprintln!("could not load profile {}: {}", path, e);
                process::exit(1);
            }
        },
        None => OutputProfile::default(),
    };

    let source = LocalDirSource::new(input_dir, profile.site_code.clone());
    let run_date = chrono::Local::now().date_naive();

    match run_export(&source, &output_dir, &profile, run_date) {
        Ok(summary) => {
            let publish = LocalDirSink
                .publish(&summary.produced)
                .and_then(|_| LogNotifier.send_reports(&summary.reports, &profile.report_recipients));
            if let Err(e) = publish {
                eprintln!("an error occurred: {:#?}", e);
                process::exit(1);
            }
            info!(
                "run complete: {} files produced, {} inputs skipped",
                summary.produced.len(),
                summary.failed
            );
            // A skipped input stays in place for the operator to inspect.
            process::exit(if summary.failed > 0 { 2 } else { 0 });
        }
        Err(e) => {
            eprintln!("an error occurred: {:#?}", e);
            process::exit(1);
        }
    }
}
