use core::time::Duration;
use std::{path::PathBuf, process::ExitCode};

use sdb::{
    config::{MaterializeOptions, Options, constants},
    merge::MergeStrategy,
};

fn seconds(s: &str) -> Result<Duration, String> {
    s.parse().map(Duration::from_secs).map_err(|e| format!("{e}"))
}

#[derive(clap::Parser)]
#[command(about = "Scrape the SteamDB sales table into a CSV file")]
struct Args {
    #[arg(long, default_value = constants::URL)]
    url: String,
    /// Destination file; repeat to write several copies.
    #[arg(
        short,
        long = "output",
        value_name = "file",
        default_values = [constants::OUTPUT, constants::SPLIT_OUTPUT],
    )]
    outputs: Vec<PathBuf>,
    #[arg(long)]
    headless: bool,
    #[arg(long, env = "PROXY_SERVER")]
    proxy: Option<String>,
    /// Seconds to wait for the page-size control.
    #[arg(long, value_parser = seconds, default_value = "30")]
    control_timeout: Duration,
    /// Seconds to let the table render after selecting every row.
    #[arg(long, value_parser = seconds, default_value = "5")]
    settle: Duration,
    #[arg(long, default_value_t = constants::SCROLLS)]
    scrolls: u32,
    #[arg(long, default_value_t = constants::SCROLL_STEP)]
    scroll_step: i64,
    /// Seconds to let new rows render after each scroll.
    #[arg(long, value_parser = seconds, default_value = "4")]
    scroll_pause: Duration,
    /// Stop after this many scrolls bring no new rows; 0 always scrolls to the end.
    #[arg(long, default_value_t = constants::IDLE_SCROLLS)]
    idle_scrolls: u32,
    #[arg(long, value_enum, default_value_t = MergeStrategy::Positional)]
    merge: MergeStrategy,
    /// Do not print a preview of the records.
    #[arg(short = 'q', long = "quiet", action = clap::ArgAction::SetFalse)]
    print: bool,
}

impl Args {
    fn options(&self) -> Options {
        Options {
            materialize: MaterializeOptions {
                control_timeout: self.control_timeout,
                settle: self.settle,
                scrolls: self.scrolls,
                scroll_step: self.scroll_step,
                scroll_pause: self.scroll_pause,
                idle_scrolls: self.idle_scrolls,
                ..MaterializeOptions::default()
            },
            merge: self.merge,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    use clap::Parser;

    pretty_env_logger::init_timed();

    let args = Args::parse();
    let options = args.options();
    tracing::info!(
        target: "main",
        "waiting at most {:?} for the table to render",
        options.materialize.wait_budget(),
    );

    let session = sdb::browser::Session::launch(args.headless, args.proxy.as_deref())?;
    let frame = sdb::pipeline::scrape(&session, &args.url, &options).await;
    // failures are logged by `close`
    let _ = session.close().await;

    let frame = match frame {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(target: "main", "\x1b[31mfailed to collect data: {e}\x1b[0m");
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Err(e) = sdb::output::write_all(&args.outputs, &frame) {
        tracing::error!(target: "main", "\x1b[31mfailed to write the output files: {e}\x1b[0m");
        return Ok(ExitCode::FAILURE);
    }

    if args.print {
        println!("{frame}");
    }

    Ok(ExitCode::SUCCESS)
}
