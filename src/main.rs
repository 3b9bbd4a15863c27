use std::io;
use std::path::PathBuf;

use clap::Parser;

use scene_wm::backend::headless::HeadlessDesktop;
use scene_wm::constants::DEFAULT_SCHEME;
use scene_wm::manager::OpenOutcome;
use scene_wm::runner::SceneRunner;
use scene_wm::tracing_sub;
use scene_wm::{
    JsonFileStore, MemoryStore, QueueChannel, Rect, SettingsStore, Size, UnitPoint,
    WindowHandle, WindowManager, WindowManagerConfig, WindowingLayer,
};

#[derive(Parser, Debug)]
#[command(
    name = "scene-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Walk through scene window placement on a simulated desktop"
)]
struct Cli {
    /// Settings file holding saved window frames. Defaults to the platform config dir.
    #[arg(short = 's', long = "settings", value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Keep saved frames in memory only.
    #[arg(long, conflicts_with = "settings")]
    ephemeral: bool,

    /// URL scheme used for activation requests.
    #[arg(long, default_value = DEFAULT_SCHEME)]
    scheme: String,

    /// Width of the simulated screen.
    #[arg(long, value_name = "POINTS", default_value_t = 1440.0)]
    width: f64,

    /// Height of the simulated screen.
    #[arg(long, value_name = "POINTS", default_value_t = 900.0)]
    height: f64,

    /// Forget saved frames before starting.
    #[arg(long)]
    reset: bool,

    /// Increase log output (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

struct DemoConfig {
    wm: WindowManagerConfig,
    screen: Rect,
    settings: Option<PathBuf>,
    reset: bool,
}

impl TryFrom<&Cli> for DemoConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(320.0..=16384.0).contains(&cli.width) || !(240.0..=16384.0).contains(&cli.height) {
            return Err("screen must be between 320x240 and 16384x16384".to_string());
        }
        let wm = WindowManagerConfig::new(&cli.scheme).map_err(|err| err.to_string())?;
        let settings = if cli.ephemeral {
            None
        } else {
            Some(
                cli.settings
                    .clone()
                    .unwrap_or_else(scene_wm::config::default_settings_path),
            )
        };
        Ok(Self {
            wm,
            screen: Rect::new(0.0, 0.0, cli.width, cli.height),
            settings,
            reset: cli.reset,
        })
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(tracing_sub::level_for_verbosity(cli.verbose));
    let config = DemoConfig::try_from(&cli).map_err(io::Error::other)?;

    match &config.settings {
        Some(path) => {
            println!("settings: {}", path.display());
            let store = JsonFileStore::open(path).map_err(io::Error::other)?;
            run(store, config)
        }
        None => {
            println!("settings: in memory");
            run(MemoryStore::new(), config)
        }
    }
}

fn run<S: SettingsStore>(store: S, config: DemoConfig) -> io::Result<()> {
    let desktop = HeadlessDesktop::with_screen(config.screen);
    let manager = WindowManager::new(config.wm, desktop, store, QueueChannel::new());
    let mut runner = SceneRunner::new(manager);

    if config.reset {
        let removed = runner
            .manager_mut()
            .clear_saved_frames()
            .map_err(io::Error::other)?;
        println!("reset: forgot {removed} saved frame(s)");
    }

    let wm = runner.manager_mut();
    let main = wm.register_scene(Some("main"), None, true, "MainView");
    wm.update_defaults(
        main.as_str(),
        Some(UnitPoint::TOP_LEADING),
        Some(Size::new(400.0, 200.0)),
    );
    let inspector = wm.register_scene(Some("inspector"), Some("Inspector"), false, "InspectorView");
    wm.set_default_anchor(inspector.as_str(), UnitPoint::CENTER);

    println!("menu:");
    for command in wm.new_window_commands() {
        let shortcut = command.shortcut.map(|s| s.display()).unwrap_or_default();
        println!("  {:<24} {shortcut}", command.label);
    }

    println!("\nopen main");
    let main_window = open_and_report(&mut runner, main.as_str())?;

    println!("\nopen main again");
    open_and_report(&mut runner, main.as_str())?;

    println!("\nopen inspector twice");
    runner.open(inspector.as_str()).map_err(io::Error::other)?;
    open_and_report(&mut runner, inspector.as_str())?;

    if let Some(window) = main_window {
        println!("\nclose main");
        runner.close(window);
        runner.pump();
        let saved = runner.manager().frames().load(main.as_str());
        println!("  saved frame: {}", saved.map(|d| d.to_string()).unwrap_or_default());
    }

    println!("\nopen main after close");
    open_and_report(&mut runner, main.as_str())?;

    let open = runner.manager().layer().window_count();
    for scene in [&main, &inspector] {
        for window in runner.manager().windows(scene.as_str()).to_vec() {
            runner.close(window);
        }
    }
    runner.pump();
    println!("\nclosed {open} window(s)");
    Ok(())
}

fn open_and_report<S: SettingsStore>(
    runner: &mut SceneRunner<S>,
    scene: &str,
) -> io::Result<Option<WindowHandle>> {
    let outcome = runner.open(scene).map_err(io::Error::other)?;
    if let OpenOutcome::ActivatedExisting(window) = outcome {
        println!("  {scene}: brought {window} to front");
    }
    let report = runner.pump();
    for window in &report.created {
        let desktop = runner.manager().layer();
        let ident = desktop
            .identifier(*window)
            .map(ToString::to_string)
            .unwrap_or_default();
        let frame = desktop.frame(*window).map(|f| f.to_string()).unwrap_or_default();
        let placement = runner
            .session(*window)
            .and_then(|session| session.placement())
            .map(|p| format!("{p:?}"))
            .unwrap_or_default();
        println!("  {ident:<22} {frame:<28} {placement}");
    }
    Ok(report.created.last().copied())
}
