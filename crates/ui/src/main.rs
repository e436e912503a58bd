use wayline_ui::WaylineApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional trip log path on the command line; everything else loads
    // through the Open button or drag & drop.
    let initial = std::env::args().nth(1).and_then(|path| {
        std::fs::read(&path)
            .inspect_err(|e| log::error!("failed to read {path}: {e}"))
            .ok()
    });

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "wayline",
        options,
        Box::new(move |cc| Ok(Box::new(WaylineApp::new(cc, initial)))),
    )
}
