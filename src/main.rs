use std::process::ExitCode;

use clap::Parser;
use eframe::egui;

use pixelpad::app::PixelPadApp;
use pixelpad::canvas::BLOCK_SIZE;
use pixelpad::cli::CliArgs;
use pixelpad::coords::window_size;
use pixelpad::io::BmpFile;
use pixelpad::project::EditorState;
use pixelpad::settings::EditorSettings;
use pixelpad::{log_err, log_info, logger};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    if let Err(e) = args.validate() {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    // Initialize session log (overwrites previous session log)
    logger::init();
    logger::set_echo(args.verbose);

    let settings = EditorSettings::load();

    // A file that exists but cannot be read must stop us before anything is written.
    let store = BmpFile::new(args.file.clone());
    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(e) => {
            log_err!("Cannot open {}: {}", args.file.display(), e);
            eprintln!("error: cannot open '{}': {}", args.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let (width, height) = args.initial_size(&settings);
    let editor = EditorState::open(store, loaded, BLOCK_SIZE, width, height);
    let size = window_size(editor.canvas(), editor.block());
    log_info!(
        "Editing {} ({}x{} cells, window {}x{})",
        args.file.display(),
        editor.canvas().width(),
        editor.canvas().height(),
        size.width,
        size.height
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size.width, size.height])
            .with_resizable(false)
            .with_title(format!("PixelPad - {}", editor.display_title())),
        ..Default::default()
    };

    match eframe::run_native(
        "PixelPad",
        options,
        Box::new(move |_cc| Box::new(PixelPadApp::new(editor, settings))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("Window system error: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
