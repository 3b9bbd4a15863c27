use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use scene_wm::activation::activation_url;
use scene_wm::config::default_settings_path;
use scene_wm::constants::{DEFAULT_SCHEME, FRAME_KEY_VERSION};
use scene_wm::tracing_sub;
use scene_wm::{FrameSnapshot, FrameStore, JsonFileStore};

#[derive(Parser, Debug)]
#[command(
    name = "frame-tool",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect and edit the window frames saved by scene-wm"
)]
struct ToolCli {
    /// Settings file to operate on. Defaults to the platform config dir.
    #[arg(short = 's', long = "settings", value_name = "PATH", global = true)]
    settings: Option<PathBuf>,

    /// Frame key version to read and write.
    #[arg(long, value_name = "N", default_value_t = FRAME_KEY_VERSION, global = true)]
    key_version: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List scenes with a saved frame.
    List,
    /// Print the saved frame of a scene.
    Get {
        scene: String,
        /// Print the decoded frame and screen as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Forget the saved frame of a scene.
    Remove { scene: String },
    /// Forget every saved frame.
    Clear,
    /// Print the activation URL that opens a scene.
    Url {
        scene: String,
        #[arg(long, default_value = DEFAULT_SCHEME)]
        scheme: String,
    },
}

fn main() -> io::Result<()> {
    let cli = ToolCli::parse();
    tracing_sub::init_default(Level::WARN);

    if let Command::Url { scene, scheme } = &cli.command {
        let url = activation_url(scheme, scene).map_err(io::Error::other)?;
        println!("{url}");
        return Ok(());
    }

    let path = cli.settings.clone().unwrap_or_else(default_settings_path);
    let store = JsonFileStore::open(&path).map_err(io::Error::other)?;
    let mut frames = FrameStore::new(store, cli.key_version);

    match cli.command {
        Command::List => {
            let scenes = frames.saved_scenes();
            if scenes.is_empty() {
                println!("no saved frames in {}", path.display());
            }
            for scene in scenes {
                let raw = frames.load(&scene).map(|d| d.into_string()).unwrap_or_default();
                println!("{scene:<24} {raw}");
            }
        }
        Command::Get { scene, json } => {
            let Some(descriptor) = frames.load(&scene) else {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no saved frame for {scene}"),
                ));
            };
            if json {
                let snapshot = FrameSnapshot::parse(&descriptor).map_err(io::Error::other)?;
                let text = serde_json::to_string_pretty(&snapshot).map_err(io::Error::other)?;
                println!("{text}");
                return Ok(());
            }
            println!("{descriptor}");
            match FrameSnapshot::parse(&descriptor) {
                Ok(snapshot) => {
                    println!("frame  {}", snapshot.frame);
                    println!("screen {}", snapshot.screen);
                }
                Err(err) => {
                    tracing::warn!(%scene, error = %err, "saved frame is not a frame snapshot");
                }
            }
        }
        Command::Remove { scene } => {
            if frames.remove(&scene).map_err(io::Error::other)? {
                println!("removed {scene}");
            } else {
                println!("no saved frame for {scene}");
            }
        }
        Command::Clear => {
            let removed = frames.clear_all().map_err(io::Error::other)?;
            println!("removed {removed} saved frame(s)");
        }
        Command::Url { .. } => {}
    }
    Ok(())
}
