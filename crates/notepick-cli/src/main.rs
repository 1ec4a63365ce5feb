// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

mod config;

use anyhow::{Context, Result, bail};
use config::Config;
use notepick_app::{Catalog, Selector, SelectorCommand};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `notepick --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let catalog = match options.catalog_path.clone().or_else(|| config.catalog_path()) {
        Some(path) => notepick_catalog::load_path(&path).with_context(|| {
            format!(
                "open catalog {} -- if this path is wrong, set [catalog].path or NOTEPICK_CATALOG_PATH",
                path.display()
            )
        })?,
        None => notepick_catalog::builtin(),
    };

    if options.list_collections {
        print_collections(&catalog);
        return Ok(());
    }

    if options.check_only {
        return Ok(());
    }

    let mut selector = match config.random_seed() {
        Some(seed) => Selector::with_seed(&catalog, seed),
        None => Selector::new(&catalog),
    };
    if config.show_details() {
        selector.dispatch(SelectorCommand::ToggleDetails);
    }

    if let Some(key) = &options.select_key {
        if !catalog.contains(key) {
            bail!("unknown collection key {key:?}; run `notepick --list` to see available keys");
        }
        selector.set_selection(Some(key));
    }
    if options.random_pick {
        selector.dispatch(SelectorCommand::PickRandom);
    }

    notepick_tui::run_app(&mut selector)?;

    if let Some(key) = selector.selected_key() {
        println!("{key}");
    }
    Ok(())
}

fn print_collections(catalog: &Catalog) {
    for group in catalog.groups() {
        println!("{} ({})", group.display_name, group.key);
        for collection in &group.collections {
            println!("  {:<28} {}", collection.key, collection.primary_name);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    catalog_path: Option<PathBuf>,
    select_key: Option<String>,
    random_pick: bool,
    list_collections: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        catalog_path: None,
        select_key: None,
        random_pick: false,
        list_collections: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--catalog" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--catalog requires a file path"))?;
                notepick_catalog::validate_catalog_path(value.as_ref())?;
                options.catalog_path = Some(PathBuf::from(value.as_ref()));
            }
            "--select" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--select requires a collection key"))?;
                options.select_key = Some(value.as_ref().to_owned());
            }
            "--random" => {
                options.random_pick = true;
            }
            "--list" => {
                options.list_collections = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.select_key.is_some() && options.random_pick {
        bail!("--select and --random are mutually exclusive");
    }

    Ok(options)
}

fn print_help() {
    println!("notepick");
    println!("  --config <path>          Use a specific config path");
    println!("  --catalog <path>         Load a catalog TOML file instead of the built-in one");
    println!("  --select <key>           Start with the given collection selected");
    println!("  --random                 Start with a random collection selected");
    println!("  --list                   List catalog groups and collection keys");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and catalog, then exit");
    println!("  --help                   Show this help");
}
