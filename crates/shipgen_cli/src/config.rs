//! Generator configuration file (`shipgen.ron`).

use anyhow::{Context, Result};
use shipgen::ShipConfig;
use std::path::Path;

/// Load a config from `path`. A missing file gives the defaults; an invalid
/// one is reported and also gives the defaults.
pub fn load(path: &Path) -> ShipConfig {
    if let Ok(data) = std::fs::read_to_string(path) {
        match ron::from_str(&data) {
            Ok(c) => return c,
            Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
        }
    }
    ShipConfig::default()
}

/// Write `config` as pretty RON.
pub fn save(config: &ShipConfig, path: &Path) -> Result<()> {
    let s = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())
        .context("serialising config")?;
    std::fs::write(path, s).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipgen::Seed;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ShipConfig = ron::from_str("(num_engines_max: 5, allow_vertical_symmetry: true)").unwrap();
        assert_eq!(config.num_engines_max, 5);
        assert!(config.allow_vertical_symmetry);
        assert_eq!(config.num_hull_segments_min, ShipConfig::default().num_hull_segments_min);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn seeds_parse_as_text_or_number() {
        let text: ShipConfig = ron::from_str(r#"(seed: Some("michael"))"#).unwrap();
        assert_eq!(text.seed, Some(Seed::Text("michael".into())));
        let number: ShipConfig = ron::from_str("(seed: Some(42))").unwrap();
        assert_eq!(number.seed, Some(Seed::Number(42)));
    }

    #[test]
    fn pretty_output_reads_back() {
        let config = ShipConfig::default().with_seed("round");
        let s = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back: ShipConfig = ron::from_str(&s).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load(Path::new("definitely/not/here/shipgen.ron"));
        assert_eq!(config, ShipConfig::default());
    }
}
