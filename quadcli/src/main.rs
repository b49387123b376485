//responsible for turning point clouds and superquadric abstractions into svg images
//cli accepts input files, an svg location and optional view/render parameters

mod batch;
mod cli;
mod commands;

use std::error::Error;

use clap::Parser;
use cli::{Args, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Pointcloud {
            input,
            output,
            view,
            title,
            render,
        } => commands::pointcloud(&input, &output, view, title, &render)?,
        Command::Primitives {
            input,
            output,
            view,
            title,
            render,
        } => commands::primitives(&input, &output, view, title, &render)?,
        Command::Compare {
            cloud,
            primitives,
            output,
            views,
            render,
        } => commands::compare(
            &cloud,
            &primitives,
            &output,
            views.cloud_view,
            views.primitive_view,
            &render,
        )?,
        Command::Batch(batch_args) => {
            let report = batch::run(&batch_args)?;
            info!(
                rendered = report.rendered.len(),
                failed = report.failed.len(),
                "batch finished"
            );
        }
    }
    Ok(())
}
