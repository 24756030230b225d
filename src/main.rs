use clap::Parser;

use rust_sandbox::app::{
    self,
    AppConfig
};

/// # Global Arguments
#[derive(Debug, Parser)]
#[command(version, about = "2d physics sandbox", long_about = None)]
struct Cli {
    /// Window width in pixels
    #[arg(long = "width", value_name = "WIDTH", default_value_t = rust_sandbox::DEFAULT_WINDOW_WIDTH)]
    width: u32,

    /// Window height in pixels
    #[arg(long = "height", value_name = "HEIGHT", default_value_t = rust_sandbox::DEFAULT_WINDOW_HEIGHT)]
    height: u32,

    /// Physics steps per second
    #[arg(long = "physics-rate", value_name = "STEPS_PER_SECOND", default_value_t = 50)]
    physics_rate: u32,

    /// Start with the entity inspector overlay open
    #[arg(long = "overlay", default_value_t = false)]
    overlay: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .format_file(false)
        .format_line_number(true)
        .init();

    let cli_args = Cli::parse();
    log::info!("Got args: '{:?}'.", cli_args);

    let config = AppConfig {
        window_width: cli_args.width,
        window_height: cli_args.height,
        physics_timestep: 1.0 / cli_args.physics_rate.max(1) as f32,
        start_with_overlay: cli_args.overlay,
    };

    if let Err(e) = app::run(config) {
        log::error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
