mod command;
mod schema;
mod script;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
