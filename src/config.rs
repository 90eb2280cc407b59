use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::face::{BackgroundKind, FaceSettings};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// surface geometry
    pub display: Option<DisplayConfig>,
    /// face behaviour and variant flags
    pub face: Option<FaceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FaceConfig {
    pub offset_bound: Option<i32>,      // 15 or 30 on the stock faces
    pub background: Option<BackgroundKind>,
    pub image_path: Option<PathBuf>,    // PNG, or SVG by extension
    pub audio_silent_mode: Option<bool>,
    pub chime: Option<bool>,
    pub tone_volume: Option<f32>,       // 0.0..=1.0
    pub rng_seed: Option<u64>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "tickface", about = "TickFace watch face simulator", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    /// burn-in offset bound in pixels
    #[arg(long)]
    pub offset_bound: Option<i32>,
    #[arg(long, value_enum)]
    pub background: Option<BackgroundKind>,
    /// background art, PNG or SVG
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub image: Option<PathBuf>,
    #[arg(long, action = ArgAction::Set)]
    pub audio_silent_mode: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub chime: Option<bool>,
    #[arg(long)]
    pub tone_volume: Option<f32>,
    /// seed the burn-in jitter for repeatable runs
    #[arg(long)]
    pub seed: Option<u64>,
    /// stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,
    /// enter ambient after this many seconds
    #[arg(long)]
    pub ambient_after: Option<u64>,
    /// write the last frame to this PNG on exit
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    /// Engine settings with defaults filled in
    pub fn face_settings(&self) -> FaceSettings {
        let mut settings = FaceSettings::default();
        if let Some(display) = self.display.as_ref() {
            if let Some(w) = display.width  { settings.width = w; }
            if let Some(h) = display.height { settings.height = h; }
        }
        if let Some(face) = self.face.as_ref() {
            if let Some(b) = face.offset_bound      { settings.offset_bound = b; }
            if let Some(b) = face.background        { settings.background = b; }
            if let Some(a) = face.audio_silent_mode { settings.audio_silent_mode = a; }
            if let Some(c) = face.chime             { settings.chime = c; }
            if let Some(v) = face.tone_volume       { settings.tone_volume = v; }
            settings.rng_seed = face.rng_seed;
        }
        settings
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.face.as_ref().and_then(|f| f.image_path.as_deref())
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Pretty YAML of effective config (nice for debugging)
    pub fn dump(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Layer defaults, YAML and `cli` overrides, then validate.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/tickface/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/tickface/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/tickface.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["tickface.yaml", "config/tickface.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    match (&mut dst.face, src.face) {
        (None, Some(c)) => dst.face = Some(c),
        (Some(d), Some(s)) => merge_face(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()  { dst.width = src.width; }
    if src.height.is_some() { dst.height = src.height; }
}

fn merge_face(dst: &mut FaceConfig, src: FaceConfig) {
    if src.offset_bound.is_some()      { dst.offset_bound = src.offset_bound; }
    if src.background.is_some()        { dst.background = src.background; }
    if src.image_path.is_some()        { dst.image_path = src.image_path; }
    if src.audio_silent_mode.is_some() { dst.audio_silent_mode = src.audio_silent_mode; }
    if src.chime.is_some()             { dst.chime = src.chime; }
    if src.tone_volume.is_some()       { dst.tone_volume = src.tone_volume; }
    if src.rng_seed.is_some()          { dst.rng_seed = src.rng_seed; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }

    if cli.width.is_some() || cli.height.is_some() {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        if cli.width.is_some()  { display.width = cli.width; }
        if cli.height.is_some() { display.height = cli.height; }
    }

    let any_face = cli.offset_bound.is_some()
        || cli.background.is_some()
        || cli.image.is_some()
        || cli.audio_silent_mode.is_some()
        || cli.chime.is_some()
        || cli.tone_volume.is_some()
        || cli.seed.is_some();
    if any_face {
        let face = cfg.face.get_or_insert_with(FaceConfig::default);
        if cli.offset_bound.is_some()      { face.offset_bound = cli.offset_bound; }
        if cli.background.is_some()        { face.background = cli.background; }
        if cli.image.is_some()             { face.image_path = cli.image.clone(); }
        if cli.audio_silent_mode.is_some() { face.audio_silent_mode = cli.audio_silent_mode; }
        if cli.chime.is_some()             { face.chime = cli.chime; }
        if cli.tone_volume.is_some()       { face.tone_volume = cli.tone_volume; }
        if cli.seed.is_some()              { face.rng_seed = cli.seed; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        if display.width == Some(0) || display.height == Some(0) {
            return Err(ConfigError::Validation("display width/height must be > 0".into()));
        }
    }
    if let Some(face) = cfg.face.as_ref() {
        if let Some(b) = face.offset_bound {
            if !(1..=64).contains(&b) {
                return Err(ConfigError::Validation("face offset_bound must be 1..=64".into()));
            }
        }
        if let Some(v) = face.tone_volume {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Validation("face tone_volume must be 0.0..=1.0".into()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["tickface"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn yaml_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tickface-{}-{}.yaml", name, std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_face_settings() {
        let cfg = Config::default();
        assert_eq!(cfg.face_settings(), FaceSettings::default());
        assert_eq!(cfg.log_level(), "info");
        assert!(cfg.image_path().is_none());
    }

    #[test]
    fn test_yaml_then_cli() {
        let path = yaml_file(
            "layered",
            "log_level: debug\n\
             display:\n  width: 390\n  height: 450\n\
             face:\n  offset_bound: 30\n  background: image\n  image_path: /tmp/face.png\n  chime: false\n",
        );
        let path_arg = path.to_string_lossy().to_string();
        let cfg = load_with(&cli(&["--config", &path_arg, "--height", "390", "--seed", "42"])).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(cfg.log_level(), "debug");
        let settings = cfg.face_settings();
        assert_eq!((settings.width, settings.height), (390, 390));
        assert_eq!(settings.offset_bound, 30);
        assert_eq!(settings.background, BackgroundKind::Image);
        assert!(!settings.chime);
        assert!(settings.audio_silent_mode);
        assert_eq!(settings.rng_seed, Some(42));
        assert_eq!(cfg.image_path(), Some(Path::new("/tmp/face.png")));
    }

    #[test]
    fn test_cli_flags() {
        let args = cli(&[
            "--background", "solid", "--audio-silent-mode", "false", "--tone-volume", "0.5",
            "--frames", "10", "--ambient-after", "3", "--dump-config",
        ]);
        assert_eq!(args.frames, Some(10));
        assert_eq!(args.ambient_after, Some(3));
        assert!(args.dump_config);

        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &args);
        let settings = cfg.face_settings();
        assert!(!settings.audio_silent_mode);
        assert_eq!(settings.tone_volume, 0.5);
        assert!(cfg.display.is_none());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut dst: Config = serde_yaml::from_str("face:\n  offset_bound: 30\n  chime: false\n").unwrap();
        let src: Config = serde_yaml::from_str("face:\n  chime: true\n").unwrap();
        merge(&mut dst, src);
        let face = dst.face.unwrap();
        assert_eq!(face.offset_bound, Some(30));
        assert_eq!(face.chime, Some(true));
    }

    #[test]
    fn test_validation() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--width", "0"]));
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));

        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--offset-bound", "0"]));
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--tone-volume", "1.5"]));
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--offset-bound", "15", "--tone-volume", "1.0"]));
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_with(&cli(&["--config", "/nonexistent/tickface.yaml"])).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_bad_yaml() {
        let path = yaml_file("bad", "face: [not, a, map\n");
        let path_arg = path.to_string_lossy().to_string();
        let err = load_with(&cli(&["--config", &path_arg]));
        let _ = fs::remove_file(&path);
        assert!(matches!(err, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_dump_round_trips() {
        let mut cfg = Config::default();
        apply_cli_overrides(&mut cfg, &cli(&["--offset-bound", "30", "--background", "image"]));
        let dumped = cfg.dump().unwrap();
        assert!(dumped.contains("offset_bound: 30"));
        assert!(dumped.contains("background: image"));
    }
}
