mod backend;
mod config;
mod hotkeys;
mod library;
mod player;
mod playlist;
mod runtime;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    colog::init();
    runtime::run()
}
