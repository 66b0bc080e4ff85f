// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use partsheet_app::Gateway;
use partsheet_sheets::{MemoryGateway, SheetsClient};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

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

    runtime::init_logging();

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `partsheet --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let listen = match options.listen {
        Some(addr) => addr,
        None => config.listen_addr()?,
    };

    let gateway: Arc<dyn Gateway> = if options.demo {
        info!("using in-memory demo sheet");
        Arc::new(MemoryGateway::demo())
    } else {
        let client = SheetsClient::new(config.sheets_options()?).with_context(|| {
            format!(
                "invalid [sheet] config in {}; fix url/api_base_url/timeout values",
                options.config_path.display()
            )
        })?;
        if options.check_only {
            client.ping().with_context(|| {
                format!(
                    "read spreadsheet {} -- check the link and that it is shared with editor access",
                    client.spreadsheet_id()
                )
            })?;
        }
        Arc::new(client)
    };
    if options.check_only {
        println!("ok");
        return Ok(());
    }

    runtime::serve(gateway, listen)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    listen: Option<SocketAddr>,
    demo: bool,
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
        print_config_path: false,
        print_example: false,
        listen: None,
        demo: false,
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
            "--listen" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--listen requires an address like 127.0.0.1:8501")
                })?;
                options.listen = Some(config::parse_listen(value.as_ref())?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
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

    Ok(options)
}

fn print_help() {
    println!("partsheet: car-parts inventory over a shared spreadsheet");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --listen <addr>          Serve on this address instead of [server].listen");
    println!("  --demo                   Serve a seeded in-memory sheet");
    println!("  --check                  Validate config and read the sheet once");
    println!("  --help                   Show this help");
}
