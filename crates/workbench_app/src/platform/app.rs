use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_info, engine_warn};
use workbench_core::{update, Msg, Session};

use super::config::load_config;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::render;
use crate::cli::Cli;

/// Everything the main loop reacts to.
pub enum Input {
    Line(String),
    Engine(Msg),
    Closed,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let (mut config, source) = load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    engine_logging::initialize(&config.log_settings());
    match &source {
        Some(path) => engine_info!("Loaded config from {:?}", path),
        None => engine_info!("No config file; using defaults"),
    }
    engine_info!("workbench starting; backend={}", config.base_url);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let runner = EffectRunner::new(config.engine_settings(), input_tx.clone())?;
    spawn_stdin_reader(input_tx);

    let mut controller = Controller::new(runner);
    println!("Type `help` for commands.");
    controller.show();
    if let Some(path) = cli.document {
        controller.dispatch_msg(Msg::UploadRequested { path });
    }
    prompt();

    let mut input_closed = false;
    while let Ok(input) = input_rx.recv() {
        match input {
            Input::Line(line) => match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Dispatch(msg))) => controller.dispatch_msg(msg),
                Ok(Some(Command::Show)) => controller.show(),
                Ok(Some(Command::Help)) => println!("{HELP}"),
                Ok(Some(Command::Quit)) => break,
                Err(err) => println!("{err:#}"),
            },
            Input::Engine(msg) => {
                controller.runner.settle();
                controller.dispatch_msg(msg);
            }
            Input::Closed => input_closed = true,
        }
        if input_closed {
            // Scripted input: finish what the script started.
            if controller.runner.is_idle() {
                break;
            }
            continue;
        }
        prompt();
    }
    engine_info!("workbench exiting");
    Ok(())
}

struct Controller {
    session: Session,
    runner: EffectRunner,
}

impl Controller {
    fn new(runner: EffectRunner) -> Self {
        Self {
            session: Session::new(),
            runner,
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let session = std::mem::take(&mut self.session);
        let (mut session, effects) = update(session, msg);
        self.runner.enqueue(effects);
        if session.consume_dirty() {
            print!("\n{}", render(&session.view()));
        }
        self.session = session;
    }

    fn show(&self) {
        print!("{}", render(&self.session.view()));
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if input_tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = input_tx.send(Input::Closed);
    });
}
