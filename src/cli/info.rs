//! Decode, encode, list and prewarm command implementations

use std::process::ExitCode;

use serde::Serialize;

use super::{build_profile, open_store, ColorArgs, GlobalArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::cache::CacheStats;
use crate::outfit::{LayerKind, OutfitCode, OutfitParts, MAX_OUTFIT_CODE};

#[derive(Serialize)]
struct DecodeOutput {
    code: OutfitCode,
    #[serde(flatten)]
    parts: OutfitParts,
}

#[derive(Serialize)]
struct ListOutput {
    kind: LayerKind,
    layout: String,
    indices: Vec<u8>,
}

#[derive(Serialize)]
struct PrewarmOutput {
    built: usize,
    failed: Vec<PrewarmFailure>,
    cache: CacheStats,
}

#[derive(Serialize)]
struct PrewarmFailure {
    code: OutfitCode,
    error: String,
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the decode command
pub fn run_decode(code: u64, json: bool) -> ExitCode {
    if code > MAX_OUTFIT_CODE {
        log::warn!("outfit code {} has more than 10 digits, the extra digits are ignored", code);
    }
    let code = OutfitCode(code);
    let parts = code.decode();

    if json {
        return print_json(&DecodeOutput { code, parts });
    }

    println!("Outfit {}", code);
    for kind in LayerKind::DRAW_ORDER {
        if let Some(index) = parts.index(kind) {
            println!("  {:<7}{}", kind.as_str(), index);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the encode command
pub fn run_encode(body: u8, dress: u8, head: u8, hair: u8, detail: u8) -> ExitCode {
    let parts = OutfitParts { body, dress, head, hair, detail };
    match parts.encode() {
        Ok(code) => {
            println!("{}", code);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
    }
}

/// Execute the list command
pub fn run_list(global: &GlobalArgs, kind: LayerKind, json: bool) -> ExitCode {
    let (_, store) = match open_store(global) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    let indices = store.available_indices(kind);
    if json {
        return print_json(&ListOutput { kind, layout: store.layout().to_string(), indices });
    }

    if indices.is_empty() {
        println!("No {} sprites found ({} layout)", kind, store.layout());
    } else {
        let joined: Vec<String> = indices.iter().map(u8::to_string).collect();
        println!("{}: {}", kind, joined.join(" "));
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the prewarm command
///
/// Prints a JSON report and exits with an error if any outfit failed.
pub fn run_prewarm(global: &GlobalArgs, codes: &[u64], colors: &ColorArgs) -> ExitCode {
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

    let requests: Vec<_> = codes.iter().map(|&code| (OutfitCode(code), profile.clone())).collect();
    let results = store.prewarm(&requests);

    let failed: Vec<PrewarmFailure> = requests
        .iter()
        .zip(&results)
        .filter_map(|((code, _), result)| {
            result.as_ref().err().map(|e| PrewarmFailure { code: *code, error: e.to_string() })
        })
        .collect();
    let report = PrewarmOutput { built: results.len() - failed.len(), failed, cache: store.cache_stats() };

    let status = print_json(&report);
    if report.failed.is_empty() {
        status
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
