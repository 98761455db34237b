use anyhow::{bail, Context, Result};
use dashboard_service::{config::AppConfig, observability, views::ViewRequest, DashboardState};
use std::env;

/// Render one view as JSON on stdout, e.g.
/// `render_view reactive station="Statia Jucu 1" period=day`.
fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: render_view <overview|station|reactive|pattern|forecast> [key=value ...]");
    }
    let kind = args[1].parse()?;

    let mut params = serde_json::Map::new();
    for arg in &args[2..] {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("expected key=value, got '{arg}'");
        };
        params.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }
    let request: ViewRequest =
        serde_json::from_value(params.into()).context("invalid view parameters")?;

    // Point DASHBOARD_CONFIG at the config naming the data files.
    let cfg = AppConfig::load()?;
    let state = DashboardState::from_config(&cfg);

    let view = state.render(kind, &request)?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
