//! Render, failsafe and layer command implementations

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use image::RgbaImage;

use super::{build_profile, open_store, ColorArgs, GlobalArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::color::parse_rgb;
use crate::composition::BlendMode;
use crate::outfit::{LayerKind, OutfitCode};

/// Execute the render command
pub fn run_render(
    global: &GlobalArgs,
    code: u64,
    colors: &ColorArgs,
    adjust_color: Option<&str>,
    blend: Option<BlendMode>,
    output: Option<&Path>,
) -> ExitCode {
    let (config, store) = match open_store(global) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    let profile = match build_profile(&config, colors) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let adjust_color = match adjust_color.map(parse_rgb).transpose() {
        Ok(color) => color,
        Err(e) => {
            eprintln!("Error: invalid --adjust-color: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let code = OutfitCode(code);
    let outfit = match store.get_adjusted_outfit(code, &profile, adjust_color, blend) {
        Ok(outfit) => outfit,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(format!("outfit_{}.png", code)));
    save_png(&outfit, &output)
}

/// Execute the failsafe command
pub fn run_failsafe(global: &GlobalArgs, output: Option<&Path>) -> ExitCode {
    let (_, store) = match open_store(global) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    let outfit = store.get_failsafe_outfit();
    let output = output.unwrap_or(Path::new("outfit_failsafe.png"));
    save_png(&outfit, output)
}

/// Execute the layer command
pub fn run_layer(global: &GlobalArgs, kind: LayerKind, index: u8, output: Option<&Path>) -> ExitCode {
    let (_, store) = match open_store(global) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    let Some(sprite) = store.get_layer(kind, index) else {
        eprintln!("Error: no {} sprite with index {}", kind, index);
        return ExitCode::from(EXIT_ERROR);
    };
    if sprite.width() == 0 || sprite.height() == 0 {
        eprintln!("Error: {} {} is the empty layer, nothing to write", kind, index);
        return ExitCode::from(EXIT_ERROR);
    }

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(format!("{}_{}.png", kind, index)));
    save_png(&sprite, &output)
}

fn save_png(image: &RgbaImage, path: &Path) -> ExitCode {
    if let Err(e) = image.save(path) {
        eprintln!("Error: Failed to write '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {} ({}x{})", path.display(), image.width(), image.height());
    ExitCode::from(EXIT_SUCCESS)
}
