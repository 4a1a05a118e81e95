use std::path::PathBuf;

use clap::{ArgAction, Parser};

use rasterlab::config::Config;
use rasterlab::document::Document;
use rasterlab::session::{self, ClearOutcome};

#[derive(Parser, Debug)]
#[command(name = "rasterlab")]
#[command(version, about = "Layer-based raster editing engine")]
struct Cli {
    /// Render the stored document to a PNG file at this path
    #[arg(long, short = 'r', value_name = "PNG")]
    render: Option<PathBuf>,

    /// Show what is stored in the session directory
    #[arg(long, short = 'i', action = ArgAction::SetTrue)]
    inspect: bool,

    /// Remove stored session files
    #[arg(long, action = ArgAction::SetTrue)]
    clear: bool,

    /// Load configuration from an explicit path instead of the default
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let options = session::options_from_config(&config.session)?;

    if let Some(output) = &cli.render {
        let Some(snapshot) = session::load_document(&options)? else {
            log::error!("No stored document to render.");
            return Err(anyhow::anyhow!("nothing stored in the session directory"));
        };

        let mut document = Document::new(
            snapshot.canvas_width,
            snapshot.canvas_height,
            config.history.max_snapshots,
        )?;
        document.restore_snapshot(&snapshot)?;

        let flattened = document.render();
        image::save_buffer_with_format(
            output,
            flattened.data(),
            flattened.width(),
            flattened.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        log::info!(
            "Rendered {}x{} document ({} layers) to {}",
            flattened.width(),
            flattened.height(),
            document.stack().len(),
            output.display()
        );
    } else if cli.inspect {
        match session::inspect_session(&options)? {
            Some(info) => {
                println!("Stored document: {}", info.path.display());
                println!("  size:          {} bytes", info.size_bytes);
                println!("  compressed:    {}", info.compressed);
                println!("  last modified: {}", info.last_modified);
                println!("  canvas:        {}x{}", info.canvas_width, info.canvas_height);
                println!("  layers:        {}", info.layer_count);
            }
            None => println!("No document stored."),
        }
    } else if cli.clear {
        match session::clear_session(&options)? {
            ClearOutcome::Removed => println!("Stored session files removed."),
            ClearOutcome::NothingStored => println!("No document stored."),
        }
    } else {
        println!("rasterlab: layer-based raster editing engine");
        println!();
        println!("Usage:");
        println!("  rasterlab --render out.png   Flatten the stored document to a PNG");
        println!("  rasterlab --inspect          Show what is stored on disk");
        println!("  rasterlab --clear            Remove stored session files");
        println!("  rasterlab --help             Show help");
        println!();
        println!("The editing core itself is a library; see the crate docs for the");
        println!("Document / LayerStack / HistoryManager / ToolDispatcher API.");
    }

    Ok(())
}
