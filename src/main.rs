mod actions;
mod app;
mod graph_store;
mod highlight;
mod layout;
mod path;
mod state;
mod store;

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Pathboard",
        native_options,
        Box::new(|_cc| Ok(Box::new(app::App::new()))),
    )
}
