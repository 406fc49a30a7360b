use anyi_automation::args::{Args, Mode};
use anyi_automation::automation::{Actuator, AutomationConfig, Locator, Sequencer};
use anyi_automation::desktop::{DesktopClient, NativeDesktop};
use anyi_automation::lifecycle::{
    ExeLauncher, Orchestrator, RunOutcome, SettingsStore, SystemProcesses, UserConfigCleanup,
};
use anyi_automation::logging;
use anyi_automation::template_matching::SearchRegion;
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };
    logging::init(args.debug_mode, Path::new(logging::LOG_FILE));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("❌ Failed to start runtime: {}", e);
            return;
        }
    };

    let succeeded = runtime.block_on(run(&args));
    if !succeeded {
        log::error!("❌ Automation did not complete");
    }

    if args.pause_on_exit {
        println!("Press Enter to exit...");
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }
}

async fn run(args: &Args) -> bool {
    if args.mode == Mode::Screenshot {
        return take_screenshot().await;
    }

    let desktop = match NativeDesktop::new() {
        Ok(desktop) => desktop,
        Err(e) => {
            log::error!("❌ Desktop backend unavailable: {}", e);
            return false;
        }
    };
    let config = AutomationConfig::default().with_templates_dir(&args.images_dir);
    let locator = Locator::new(desktop, config);
    report_missing_templates(&locator);

    match &args.mode {
        Mode::Run => {
            let settings = SettingsStore::load_or_default(&args.config_file);
            let launcher = ExeLauncher::new(settings, std::io::stdin().lock());
            let mut orchestrator = Orchestrator::new(
                Sequencer::new(Actuator::new(locator)),
                SystemProcesses::new(),
                UserConfigCleanup::for_current_user(),
                launcher,
            );
            orchestrator.run().await == RunOutcome::Completed
        }
        Mode::SequenceOnly => {
            let mut sequencer = Sequencer::new(Actuator::new(locator));
            sequencer.run_sequence().await
        }
        Mode::Locate {
            template,
            region,
            timeout,
        } => locate_once(locator, template, *region, *timeout).await,
        Mode::Screenshot => false,
    }
}

async fn locate_once(
    mut locator: Locator<NativeDesktop>,
    template: &str,
    region: Option<SearchRegion>,
    timeout: Option<Duration>,
) -> bool {
    match locator.locate(template, timeout, region).await {
        Some(found) => {
            println!("✅ {}", found.describe(template));
            true
        }
        None => {
            println!("❌ {} not found", template);
            false
        }
    }
}

fn report_missing_templates(locator: &Locator<NativeDesktop>) {
    let required = ["1.png", "2.png", "3.png", "4.png", "5.png", "6.png", "7.png"];
    let missing = locator.templates().missing(&required);
    if !missing.is_empty() {
        log::warn!(
            "⚠️ Missing templates in {}: {}",
            locator.templates().root().display(),
            missing.join(", ")
        );
    }
}

async fn take_screenshot() -> bool {
    let mut desktop = match NativeDesktop::new() {
        Ok(desktop) => desktop,
        Err(e) => {
            println!("❌ Desktop backend unavailable: {e}");
            return false;
        }
    };
    let (width, height) = desktop.screen_dimensions();
    println!("🖥️ Screen: {}x{} (backend={})", width, height, desktop.backend_name());
    match desktop.screen_capture().await {
        Ok(capture) => match capture.image.save("cli-screenshot.png") {
            Ok(()) => {
                println!("✅ Screenshot ({}ms) saved to cli-screenshot.png", capture.duration_ms);
                true
            }
            Err(e) => {
                println!("❌ Write failed: {e}");
                false
            }
        },
        Err(e) => {
            println!("❌ Screenshot failed: {e}");
            false
        }
    }
}
