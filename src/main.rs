use vantage::{ViewerApp, ViewerConfig};

const DEFAULT_CONFIG: &str = "vantage.toml";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // vantage [config.toml]
    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load(&path)?,
        None => ViewerConfig::load_or_default(DEFAULT_CONFIG),
    };

    ViewerApp::new(config).run()
}
