use crate::config::GalleryConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/gallery.json";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOverrides {
    config: Option<PathBuf>,
    collection: Option<PathBuf>,
    bindings: Option<PathBuf>,
    script: Option<PathBuf>,
    transition_ms: Option<u64>,
    realtime: bool,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            if !flag.starts_with("--") {
                bail!("Unexpected argument '{flag}'. Use --collection/--config/--bindings/--script with values.");
            }
            let key = &flag[2..];
            if key == "realtime" {
                overrides.realtime = true;
                continue;
            }
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => overrides.config = Some(PathBuf::from(value)),
                "collection" => overrides.collection = Some(PathBuf::from(value)),
                "bindings" => overrides.bindings = Some(PathBuf::from(value)),
                "script" => overrides.script = Some(PathBuf::from(value)),
                "transition-ms" => {
                    overrides.transition_ms = Some(
                        value.parse::<u64>().with_context(|| format!("Invalid transition duration '{value}'"))?,
                    );
                }
                _ => bail!(
                    "Unknown flag '{flag}'. Supported flags: --config, --collection, --bindings, --script, \
                     --transition-ms, --realtime."
                ),
            }
        }
        Ok(overrides)
    }

    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn script_path(&self) -> Option<&PathBuf> {
        self.script.as_ref()
    }

    pub fn realtime(&self) -> bool {
        self.realtime
    }

    pub fn config_overrides(&self) -> GalleryConfigOverrides {
        GalleryConfigOverrides {
            collection_path: self.collection.clone(),
            bindings_path: self.bindings.clone(),
            transition_ms: self.transition_ms,
        }
    }
}
