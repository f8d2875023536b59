use quill::{cmdline, environment};

fn main() -> std::io::Result<()> {
    pretty_env_logger::init();
    let env = environment::Environment::global();
    let interface = cmdline::setup()?;
    println!("Quill Version {}", env!("CARGO_PKG_VERSION"));
    println!("Press Ctrl+c to Exit\n");
    cmdline::repl(&interface, &env);
    cmdline::save_history(&interface)
}
