use crate::environment::Environment;
use crate::interpreter;
use ansi_term::Colour;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::path::PathBuf;
use std::rc::Rc;

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("quill")?;
    interface.set_prompt("quill> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".quill_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

// Reader diagnostics and Error values both start their printed form in a
// recognisable way; colour them when talking to a person rather than a pipe.
fn render(output: String) -> String {
    let is_error = output.starts_with("Error:")
        || output.starts_with("unclosed")
        || output.starts_with("unexpected")
        || output.starts_with("tokenizer failed");
    match is_error && atty::is(atty::Stream::Stdout) {
        true => Colour::Red.paint(output).to_string(),
        false => output,
    }
}

pub fn repl<T: Terminal>(interface: &Interface<T>, env: &Rc<Environment>) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                interface.add_history_unique(line.clone());
                writeln!(interface, "{}", render(interpreter::rep(env, &line))).ok();
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}
