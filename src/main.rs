use std::path::PathBuf;

use clap::Parser;

use judger::app::App;
use judger::catalog::Catalog;

/// Browse a downloaded timetable and rate how bad each class group is.
/// Ratings are exported as JSON for the planner.
#[derive(Parser, Debug)]
#[command(name = "judger")]
struct Args {
    /// Timetable data file produced by the downloader
    data: PathBuf,
    /// Where to write the exported ratings
    #[arg(short, long, default_value = "data.json")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let catalog = Catalog::load(&args.data)?;
    let mut app = App::new(catalog, args.out);
    app.run()
}
