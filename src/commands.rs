//! Command runners behind the `wtr` CLI.
use crate::authoring::{reset_to_default, save_custom_script};
use crate::cli::{
    DefaultArgs, GlobalArgs, InitArgs, ResetArgs, ResolveArgs, SaveArgs, ValidateArgs,
};
use crate::config::{
    config_stub, default_config, default_store_dir, load_config, write_config, ResolverConfig,
};
use crate::defaults::DefaultsStore;
use crate::registry::{load_registry, OverlayRegistry};
use crate::resolve::{ResolveRequest, Resolver};
use crate::store::FileStore;
use crate::validate::validate_script;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Effective settings after merging config file and flags.
struct Settings {
    store: FileStore,
    registry: OverlayRegistry,
    prefer_custom: bool,
    soft_fail: bool,
}

fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    let config: Option<ResolverConfig> = global.config.as_deref().map(load_config).transpose()?;
    let store_dir = match (&global.store, &config) {
        (Some(dir), _) => dir.clone(),
        (None, Some(config)) => config.store_dir.clone(),
        (None, None) => default_store_dir()?,
    };
    let overlays_path = global
        .overlays
        .clone()
        .or_else(|| config.as_ref().and_then(|config| config.overlays_path.clone()));
    let registry = match overlays_path {
        Some(path) => load_registry(&path)?,
        None => OverlayRegistry::empty(),
    };
    tracing::debug!(store = %store_dir.display(), "using custom script store");
    Ok(Settings {
        store: FileStore::new(store_dir),
        registry,
        prefer_custom: config.as_ref().is_none_or(|config| config.prefer_custom),
        soft_fail: config.as_ref().is_some_and(|config| config.soft_fail),
    })
}

fn builtin_defaults() -> Result<DefaultsStore> {
    DefaultsStore::builtin().context("load built-in walkthrough defaults")
}

fn read_candidate(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse JSON {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

pub fn run_init(args: InitArgs) -> Result<()> {
    let Some(path) = args.path else {
        println!("{}", config_stub()?);
        return Ok(());
    };
    if path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    write_config(&path, &default_config()?)?;
    println!("wrote {}", path.display());
    Ok(())
}

pub fn run_classes() -> Result<()> {
    for class in builtin_defaults()?.list_class_tokens() {
        println!("{class}");
    }
    Ok(())
}

pub fn run_default(args: DefaultArgs) -> Result<()> {
    let script = builtin_defaults()?.get_default(args.class_token)?;
    print_json(&script)
}

pub fn run_validate(args: ValidateArgs) -> Result<()> {
    let candidate = read_candidate(&args.file)?;
    let report = validate_script(&candidate);
    if args.json {
        print_json(&report)?;
    } else if report.ok {
        println!("ok: {}", args.file.display());
    } else {
        for problem in &report.problems {
            println!("{problem}");
        }
    }
    if report.ok {
        Ok(())
    } else {
        Err(anyhow!(
            "{} failed validation with {} problem(s)",
            args.file.display(),
            report.problems.len()
        ))
    }
}

pub fn run_resolve(global: &GlobalArgs, args: ResolveArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let defaults = builtin_defaults()?;
    let resolver = Resolver::new(&defaults, &settings.registry, &settings.store);
    let request = ResolveRequest {
        class_token: args.class_token,
        school_id: args.school,
        prefer_custom: settings.prefer_custom && !args.no_custom,
        soft_fail: settings.soft_fail || args.soft_fail,
        restrictions: args.restrictions,
        phase: args.phase,
    };
    let resolved = resolver.resolve(&request)?;
    print_json(&resolved)
}

pub fn run_save(global: &GlobalArgs, args: SaveArgs) -> Result<()> {
    if args.author.trim().is_empty() {
        return Err(anyhow!("--author must not be empty"));
    }
    let settings = load_settings(global)?;
    let candidate = read_candidate(&args.file)?;
    let record = save_custom_script(
        &settings.store,
        &args.school,
        args.class_token,
        &candidate,
        &args.author,
        &args.source,
    )?;
    println!(
        "saved {}/{} version {} to {}",
        args.school,
        args.class_token,
        record.version,
        settings
            .store
            .record_path(&args.school, args.class_token)
            .display()
    );
    Ok(())
}

pub fn run_reset(global: &GlobalArgs, args: ResetArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let removed = reset_to_default(&settings.store, &args.school, args.class_token)?;
    if removed {
        println!("removed custom walkthrough {}/{}", args.school, args.class_token);
    } else {
        println!(
            "no custom walkthrough for {}/{}; already using defaults",
            args.school, args.class_token
        );
    }
    Ok(())
}
