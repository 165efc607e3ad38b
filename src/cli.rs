// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "office-viewport")]
#[command(about = "3D office floor viewer", long_about = None)]
pub struct Cli {
    /// Office layout to show (assistant, ai-team, corporate)
    #[arg(long, env = "OFFICE_TEMPLATE", default_value = "corporate")]
    pub template: String,

    /// JSON array of agent records; a sample roster is used when omitted
    #[arg(long)]
    pub agents: Option<PathBuf>,

    /// JSON array of partners; the template's default network when omitted
    #[arg(long)]
    pub partners: Option<PathBuf>,

    /// Viewport config JSON
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run without a window and print a JSON summary
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    /// Pointer position to pick after the headless run, as X,Y in pixels
    #[arg(long, value_parser = parse_point)]
    pub pick: Option<(f32, f32)>,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Disable the debug HUD
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Print the resolved template as JSON and exit
    #[arg(long, default_value = "false")]
    pub dump_template: bool,
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x `{x}`: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y `{y}`: {e}"))?;
    Ok((x, y))
}
