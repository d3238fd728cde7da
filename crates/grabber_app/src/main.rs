mod app;
mod effects;
mod persistence;
mod render;
mod settings;

fn main() -> anyhow::Result<()> {
    app::run()
}
