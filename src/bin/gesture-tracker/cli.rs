use clap::Parser;

// Some defaults; some of which can be overriden via CLI args
const CONFIG_FILE_PATH: &str = "./gestures.json";
const EXECUTOR_URL: &str = "http://localhost:4000/api";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Where to load tracker tunables (created with defaults if missing)
    #[arg(long="configPath",default_value_t=String::from(CONFIG_FILE_PATH))]
    pub config_path: String,

    /// Base URL of the gesture executor API
    #[arg(long="executor.url",default_value_t=String::from(EXECUTOR_URL))]
    pub executor_url: String,

    /// Read detections from this file instead of stdin
    #[arg(long = "source.path")]
    pub source_path: Option<String>,

    /// Run this detector program and read detections from its stdout
    #[arg(long = "source.command")]
    pub source_command: Option<String>,

    /// Arguments for the detector program
    #[arg(long = "source.args", num_args = 0.., allow_hyphen_values = true)]
    pub source_args: Vec<String>,

    /// Log events instead of sending them to the executor
    #[arg(long = "dryRun")]
    pub dry_run: bool,

    #[arg(long = "loglevel",default_value_t=String::from("info"))]
    pub log_level: String,
}
