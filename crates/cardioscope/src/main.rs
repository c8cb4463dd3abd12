use std::path::PathBuf;
use std::process::ExitCode;

use cardioscope::{
    FileLoader, MeshId, RecordingDisplay, RenderEngine, UnavailableXr, Viewer, ViewerConfig,
    ViewerError,
};
use cardioscope_render::save_image;
use clap::Parser;

/// Cardiac mesh viewer.
#[derive(Parser, Debug)]
#[command(name = "cardioscope", version, about)]
struct Args {
    /// JSON configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mesh id to show first (0 healthy, 1 afib, 2 hr; others show the default mesh).
    #[arg(short, long)]
    mesh: Option<MeshId>,

    /// Render one frame offscreen, save it to this PNG or JPEG file and exit.
    #[arg(long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Run the load without a window and print the resulting scene.
    #[arg(long, conflicts_with = "screenshot")]
    dry_run: bool,
}

fn main() -> ExitCode {
    let _ = env_logger::try_init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ViewerError> {
    let config = ViewerConfig::load_or_default(args.config.as_deref())?;
    let mesh = args.mesh.unwrap_or_else(|| config.startup_mesh());

    if args.dry_run {
        return dry_run(config, mesh);
    }
    if let Some(path) = &args.screenshot {
        return screenshot(config, mesh, path);
    }
    cardioscope::run(config, mesh)
}

fn dry_run(config: ViewerConfig, mesh: MeshId) -> Result<(), ViewerError> {
    let loader = FileLoader::new(config.base_dir.clone());
    let mut viewer = Viewer::new(config, RecordingDisplay::new(), Box::new(UnavailableXr));
    let outcome = pollster::block_on(viewer.load_mesh(mesh, true, &loader));
    println!("load outcome: {outcome:?}");
    print!("{}", viewer.display().summary());
    Ok(())
}

fn screenshot(config: ViewerConfig, mesh: MeshId, path: &std::path::Path) -> Result<(), ViewerError> {
    let loader = FileLoader::new(config.base_dir.clone());
    let (width, height) = (config.window.width, config.window.height);
    let engine = pollster::block_on(RenderEngine::new_headless(width, height))?;
    let mut viewer = Viewer::new(config, engine, Box::new(UnavailableXr));

    let outcome = pollster::block_on(viewer.load_mesh(mesh, true, &loader));
    log::info!("load outcome: {outcome:?}");

    let engine = viewer.display_mut();
    let pixels = engine.capture()?;
    save_image(path, &pixels, engine.width, engine.height, engine.format())?;
    Ok(())
}
