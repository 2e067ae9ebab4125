//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod logging;
mod render;

use clap::{ArgAction, Args, Parser, Subcommand};
use image::Rgb;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::composition::BlendMode;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, LayoutSetting, OutfitConfig};
use crate::outfit::{parse_entry, ColorProfile, LayerKind};
use crate::store::OutfitStore;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Outfit - compose character sprites from outfit codes
#[derive(Parser)]
#[command(name = "outfit")]
#[command(about = "Compose layered character sprites from outfit codes and render to PNG")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to outfits.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Asset root directory (overrides assets.root)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Outfit directory under the root (overrides assets.outfit_dir)
    #[arg(long, global = true)]
    pub outfit_dir: Option<String>,

    /// Body sprite layout: auto, modern or legacy
    #[arg(long, global = true)]
    pub layout: Option<LayoutSetting>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Color options for commands that compose outfits
#[derive(Args, Debug, Clone, Default)]
pub struct ColorArgs {
    /// Layer tint as kind=color, e.g. -c dress=#ff0000 (repeatable)
    #[arg(short = 'c', long = "color", value_parser = parse_tint)]
    pub tints: Vec<(LayerKind, Rgb<u8>)>,

    /// Named color profile from outfits.toml
    #[arg(short, long)]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose an outfit and write it as PNG
    Render {
        /// Outfit code (up to 10 digits: detail, hair, head, dress, body)
        code: u64,

        #[command(flatten)]
        colors: ColorArgs,

        /// Color for a whole-outfit adjustment (requires --blend)
        #[arg(long, requires = "blend")]
        adjust_color: Option<String>,

        /// Blend mode for the adjustment: normal, multiply, screen, overlay,
        /// add, subtract, difference, darken, lighten
        #[arg(long, requires = "adjust_color")]
        blend: Option<BlendMode>,

        /// Output file (default: outfit_{code}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the failsafe outfit as PNG (works even with broken assets)
    Failsafe {
        /// Output file (default: outfit_failsafe.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a single layer sprite as PNG
    Layer {
        /// Layer kind: body, dress, head, hair, detail, eyes, mouth
        kind: LayerKind,

        /// Layer index (0-99)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=99))]
        index: u8,

        /// Output file (default: {kind}_{index}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the available indices of a layer
    List {
        /// Layer kind: body, dress, head, hair, detail, eyes, mouth
        kind: LayerKind,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the layer indices packed in an outfit code
    Decode {
        /// Outfit code
        code: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pack layer indices into an outfit code
    Encode {
        #[arg(long, default_value = "0")]
        body: u8,
        #[arg(long, default_value = "0")]
        dress: u8,
        #[arg(long, default_value = "0")]
        head: u8,
        #[arg(long, default_value = "0")]
        hair: u8,
        #[arg(long, default_value = "0")]
        detail: u8,
    },

    /// Build many outfits in parallel and report cache statistics
    Prewarm {
        /// Outfit codes to build
        #[arg(required = true)]
        codes: Vec<u64>,

        #[command(flatten)]
        colors: ColorArgs,
    },
}

fn parse_tint(s: &str) -> Result<(LayerKind, Rgb<u8>), String> {
    parse_entry(s).map_err(|e| e.to_string())
}

/// Load config and apply global overrides.
pub(crate) fn load_effective_config(global: &GlobalArgs) -> Result<OutfitConfig, String> {
    let mut config = load_config(global.config.as_deref()).map_err(|e| e.to_string())?;
    let overrides = CliOverrides {
        root: global.root.clone(),
        outfit_dir: global.outfit_dir.clone(),
        layout: global.layout,
        cache_capacity: None,
    };
    merge_cli_overrides(&mut config, &overrides);
    Ok(config)
}

/// Load config and build a store, reporting errors on stderr.
pub(crate) fn open_store(global: &GlobalArgs) -> Result<(OutfitConfig, OutfitStore), ExitCode> {
    match load_effective_config(global) {
        Ok(config) => {
            let store = OutfitStore::from_config(&config);
            log::info!("assets at {} ({} layout)", config.assets.root.display(), store.layout());
            Ok((config, store))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

/// Combine a named profile with explicit tints; explicit tints win.
pub(crate) fn build_profile(config: &OutfitConfig, colors: &ColorArgs) -> Result<ColorProfile, String> {
    let mut profile = match &colors.profile {
        Some(name) => config.profile(name).ok_or_else(|| format!("unknown color profile '{}'", name))?,
        None => ColorProfile::PLAIN,
    };
    for (kind, color) in &colors.tints {
        profile = profile.with_tint(*kind, *color);
    }
    Ok(profile)
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.global.verbose, cli.global.quiet);

    match cli.command {
        Commands::Render { code, colors, adjust_color, blend, output } => render::run_render(
            &cli.global,
            code,
            &colors,
            adjust_color.as_deref(),
            blend,
            output.as_deref(),
        ),
        Commands::Failsafe { output } => render::run_failsafe(&cli.global, output.as_deref()),
        Commands::Layer { kind, index, output } => {
            render::run_layer(&cli.global, kind, index, output.as_deref())
        }
        Commands::List { kind, json } => info::run_list(&cli.global, kind, json),
        Commands::Decode { code, json } => info::run_decode(code, json),
        Commands::Encode { body, dress, head, hair, detail } => {
            info::run_encode(body, dress, head, hair, detail)
        }
        Commands::Prewarm { codes, colors } => info::run_prewarm(&cli.global, &codes, &colors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_args() {
        let cli = Cli::try_parse_from([
            "outfit", "render", "10020305", "-c", "hair=#00ff00", "--adjust-color", "red", "--blend",
            "multiply", "-o", "out.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Render { code, colors, adjust_color, blend, output } => {
                assert_eq!(code, 10020305);
                assert_eq!(colors.tints, vec![(LayerKind::Hair, Rgb([0, 255, 0]))]);
                assert_eq!(adjust_color.as_deref(), Some("red"));
                assert_eq!(blend, Some(BlendMode::Multiply));
                assert_eq!(output, Some(PathBuf::from("out.png")));
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_blend_requires_adjust_color() {
        assert!(Cli::try_parse_from(["outfit", "render", "1", "--blend", "screen"]).is_err());
    }

    #[test]
    fn test_unknown_blend_and_layout_rejected() {
        let blend = Cli::try_parse_from(["outfit", "render", "1", "--adjust-color", "red", "--blend", "dodge"]);
        assert!(blend.is_err());
        assert!(Cli::try_parse_from(["outfit", "list", "hair", "--layout", "retro"]).is_err());
    }

    #[test]
    fn test_bad_tint_rejected() {
        assert!(Cli::try_parse_from(["outfit", "render", "1", "-c", "body=red"]).is_err());
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from(["outfit", "list", "hair", "--layout", "legacy", "-vv"]).unwrap();
        assert_eq!(cli.global.layout, Some(LayoutSetting::Legacy));
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn test_build_profile_explicit_tints_win() {
        let mut config = OutfitConfig::default();
        config.profiles.insert(
            "guard".to_string(),
            crate::config::ProfileConfig {
                dress: Some("#0000ff".to_string()),
                hair: Some("#000000".to_string()),
                detail: None,
            },
        );
        let colors = ColorArgs {
            tints: vec![(LayerKind::Hair, Rgb([255, 255, 0]))],
            profile: Some("guard".to_string()),
        };

        let profile = build_profile(&config, &colors).unwrap();
        assert_eq!(profile.tint(LayerKind::Dress), Some(Rgb([0, 0, 255])));
        assert_eq!(profile.tint(LayerKind::Hair), Some(Rgb([255, 255, 0])));

        let missing = ColorArgs { profile: Some("thief".to_string()), ..Default::default() };
        assert!(build_profile(&config, &missing).is_err());
    }
}
