use anyhow::{Context, Result};
use gallery_navigator::cli::CliOverrides;
use gallery_navigator::config::GalleryConfig;
use gallery_navigator::input::Input;
use gallery_navigator::navigator::Navigator;
use gallery_navigator::render::{FsImageLoader, RecordingRenderer};
use gallery_navigator::shell::{Session, SessionClock};
use gallery_navigator::source::JsonFileSource;
use gallery_navigator::time::{ManualClock, SystemClock};
use std::fs::File;
use std::io::{self, BufReader};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(cli) {
        log::error!("Application error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: CliOverrides) -> Result<()> {
    log::info!("Gallery navigator v{} starting", env!("CARGO_PKG_VERSION"));
    let mut config = GalleryConfig::load_or_default(cli.config_path());
    let overrides = cli.config_overrides();
    if !overrides.is_empty() {
        log::info!("[cli] overriding {}", overrides.applied_fields().join(", "));
        config.apply_overrides(&overrides);
    }

    let input = match &config.bindings_path {
        Some(path) => Input::from_config(path),
        None => Input::new(),
    };
    let mut navigator = Navigator::new(&config, RecordingRenderer::echoing(), FsImageLoader::new())
        .context("Invalid viewpoint configuration")?;

    match &config.collection_path {
        Some(path) => {
            let mut source = JsonFileSource::new(path);
            if let Err(err) = navigator.start(&mut source) {
                log::error!("{err}; navigation stays idle");
            }
        }
        None => log::error!("No collection configured (use --collection); navigation stays idle"),
    }

    let clock =
        if cli.realtime() { SessionClock::System(SystemClock::new()) } else { SessionClock::Manual(ManualClock::new()) };
    let mut session = Session::new(navigator, input, clock);
    match cli.script_path() {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open script {}", path.display()))?;
            session.run(BufReader::new(file))
        }
        None => session.run(io::stdin().lock()),
    }
}
