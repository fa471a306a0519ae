//! Native entry point for the `mapview` first-person GLB map viewer.

use std::path::Path;

use mapview::{options::Options, Viewer};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(location) = args.next() else {
        log::error!("Usage: mapview <location-or-file> [options.toml]");
        std::process::exit(1);
    };

    let options = match args.next() {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let viewer = Viewer::builder()
        .with_location(location)
        .with_options(options)
        .build();

    if let Err(e) = viewer.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
