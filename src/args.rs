use crate::template_matching::SearchRegion;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Full run: reset, launch, wait for the window, run the sequence with restarts
    Run,
    /// Run the sequence once against whatever is on screen
    SequenceOnly,
    /// Probe a single template and report the match
    Locate {
        template: String,
        region: Option<SearchRegion>,
        timeout: Option<Duration>,
    },
    Screenshot,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub debug_mode: bool,
    pub images_dir: PathBuf,
    pub config_file: PathBuf,
    pub pause_on_exit: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse flags (without the program name). `None` means exit without running.
    pub fn parse_from<I, S>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mode: Option<Mode> = None;
        let mut debug_mode = false;
        let mut images_dir = PathBuf::from("images");
        let mut config_file = PathBuf::from(crate::lifecycle::SETTINGS_FILE);
        let mut pause_on_exit = true;
        let mut region: Option<SearchRegion> = None;
        let mut timeout: Option<Duration> = None;

        for arg in args {
            let arg = arg.as_ref();
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!(
                    "Anyi Automation v{} (© {} Vigor Solutions)",
                    env!("APP_VERSION_DISPLAY"),
                    env!("APP_BUILD_YEAR")
                );
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--no-pause" {
                pause_on_exit = false;
            } else if arg == "--sequence-only" {
                mode = Some(Mode::SequenceOnly);
            } else if arg == "--screenshot" || arg == "-s" {
                mode = Some(Mode::Screenshot);
            } else if let Some(val) = arg.strip_prefix("--images=") {
                images_dir = PathBuf::from(val);
            } else if let Some(val) = arg.strip_prefix("--config=") {
                config_file = PathBuf::from(val);
            } else if let Some(val) = arg.strip_prefix("--locate=") {
                mode = Some(Mode::Locate {
                    template: val.to_string(),
                    region: None,
                    timeout: None,
                });
            } else if let Some(val) = arg.strip_prefix("--region=") {
                match SearchRegion::parse(val) {
                    Some(r) => region = Some(r),
                    None => {
                        eprintln!("❌ Invalid region '{}', expected left,top,width,height", val);
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                match val.parse::<f64>().map(Duration::try_from_secs_f64) {
                    Ok(Ok(secs)) => timeout = Some(secs),
                    _ => {
                        eprintln!("❌ Invalid timeout value: {}", val);
                        return None;
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        let mode = match mode.unwrap_or(Mode::Run) {
            Mode::Locate { template, .. } => Mode::Locate {
                template,
                region,
                timeout,
            },
            other => {
                if region.is_some() || timeout.is_some() {
                    eprintln!("❌ --region and --timeout only apply to --locate");
                    return None;
                }
                other
            }
        };

        Some(Args {
            mode,
            debug_mode,
            images_dir,
            config_file,
            pause_on_exit,
        })
    }
}

fn print_help() {
    println!("🤖 Anyi Automation Tool");
    println!();
    println!("USAGE:");
    println!("    anyi-automation [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)          Restart Anyi.exe and run the sign-up sequence");
    println!("    --sequence-only     Run the sequence once against the current screen");
    println!("    --locate=NAME       Wait for one template (e.g. 1.png) and print its position");
    println!("    --region=L,T,W,H    Restrict --locate to a screen rectangle");
    println!("    --timeout=SECS      Timeout for --locate (default 30)");
    println!("    --screenshot, -s    Take a screenshot and save to file (cli-screenshot.png)");
    println!("    --images=DIR        Template directory (default: images)");
    println!("    --config=FILE       Launcher settings file (default: anyi_config.json)");
    println!("    --no-pause          Exit without waiting for Enter");
    println!("    --debug             Enable debug output for automation");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    anyi-automation");
    println!("    anyi-automation --sequence-only --debug");
    println!("    anyi-automation --locate=7.png --region=0,0,800,600 --timeout=5");
}
