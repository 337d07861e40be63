mod app;
mod args;
mod snapshot;

use std::process::ExitCode;

use anyhow::Result;
use winit::dpi::LogicalSize;

use trigon_engine::device::GpuInit;
use trigon_engine::logging::{LoggingConfig, init_logging};
use trigon_engine::render::{TriangleMesh, TriangleSource};
use trigon_engine::window::{RedrawMode, Runtime, RuntimeConfig};

use crate::app::TriangleApp;
use crate::args::{Args, Command, USAGE, Variant};

fn main() -> ExitCode {
    let args = match args::parse(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("trigon: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_logging(LoggingConfig::default());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let source = match args.variant {
        Variant::Buffered => TriangleSource::Buffered(TriangleMesh::default()),
        Variant::Builtin => TriangleSource::Builtin,
    };
    log::info!("trigon starting ({:?} variant)", args.variant);

    let gpu_init = GpuInit::default();

    if let Some(path) = &args.snapshot {
        return snapshot::write_png(path, source, args.clear, (args.width, args.height), gpu_init);
    }

    let config = RuntimeConfig {
        title: args.title,
        initial_size: LogicalSize::new(args.width as f64, args.height as f64),
        redraw: RedrawMode::OnDemand,
    };

    Runtime::run(config, gpu_init, TriangleApp::new(source, args.clear))
}
