use anyhow::Context;
use clap::Parser;
use eframe::egui;

use taskpad::cli::{self, Cli};
use taskpad::config::APP_NAME;
use taskpad::input::InputForm;
use taskpad::ui::TaskpadApp;
use taskpad::{Controller, FileStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    cli::init_tracing(cli.verbose, config.log_level.as_deref())?;

    let data_dir = config.data_dir();
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("failed to open task store in {}", data_dir.display()))?;
    let controller = Controller::load(store)
        .with_form(InputForm::new(config.default_priority, config.initial_category()));

    if let Some(command) = cli.command {
        let mut controller = controller;
        let stdout = std::io::stdout();
        return cli::run(command, &mut controller, &config, &mut stdout.lock());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 680.0])
            .with_min_inner_size([420.0, 360.0])
            .with_resizable(true)
            .with_title(APP_NAME)
            .with_app_id(APP_NAME),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |_cc| Ok(Box::new(TaskpadApp::new(controller, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the window: {e}"))
}
