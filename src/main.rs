mod app;
mod data;
mod sim;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding startups.json and fields.json
    #[arg(long, default_value = "data")]
    data_dir: String,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "startup-atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::AtlasApp::new(
                cc,
                args.data_dir.clone().into(),
            )))
        }),
    )
}
