//! # tagfig demo application
//!
//! A sample CLI tool showing how the tagfig loaders stack up. This is **not**
//! a real app; it exists to demonstrate and manually verify the pipeline.
//!
//! ## Running
//!
//! ```sh
//! DEMO_TOKEN=s3cret cargo run --example tagfig_demo
//! DEMO_TOKEN=s3cret cargo run --example tagfig_demo -- --port 9999 --verbose
//! DEMO_TOKEN=s3cret TAGFIG_DEMO_DISPLAY_COLOR=red cargo run --example tagfig_demo
//! TAGFIG_LOG=debug DEMO_TOKEN=s3cret cargo run --example tagfig_demo
//! cargo run --example tagfig_demo -- --help
//! ```
//!
//! A `tagfig-demo.yaml` in the working directory, `~/.tagfig-demo/` or the
//! platform config directory is merged between the defaults and the
//! environment.

mod config;

use tagfig::{
    CaseMode, DefaultLoader, EnvLoader, FileLoader, FlagLoader, RequiredValidator, SearchPath,
    Tagfig, TagfigBuilder, TagfigError,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::DemoConfig;

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env("TAGFIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

/// Defaults → file → environment → command line, then required checks.
fn make_pipeline() -> TagfigBuilder<DemoConfig> {
    Tagfig::builder::<DemoConfig>()
        .loader(DefaultLoader::new())
        .loader(FileLoader::search(
            "tagfig-demo.yaml",
            vec![
                SearchPath::Platform("tagfig-demo".into()),
                SearchPath::Home(".tagfig-demo".into()),
                SearchPath::Cwd,
            ],
        ))
        .loader(
            EnvLoader::new()
                .prefix("TAGFIG_DEMO")
                .case(CaseMode::Snake),
        )
        .loader(FlagLoader::new().name("tagfig-demo"))
        .validator(RequiredValidator::new())
}

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

fn main() {
    init_logging();

    let mut config = match make_pipeline().load_default() {
        Ok(config) => config,
        // `--help` and `--version` arrive as argument errors carrying the text.
        Err(TagfigError::InvalidArguments(message)) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Failed to load config:\n{e}");
            std::process::exit(1);
        }
    };

    let color = ansi_color_code(&config.display.color);
    println!("{color}{}{RESET}", config.name);
    if config.verbose {
        println!("{}", tagfig::ops::list_values(&mut config));
    } else {
        println!("listening on {}:{}", config.server.host, config.server.port);
    }
}
