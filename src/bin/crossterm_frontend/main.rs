use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use structopt::StructOpt;

use chip_8_vm::emulator::output::SharedOutput;
use chip_8_vm::emulator::{Config, Emulator, Quirks, Session};

mod crossterm_io;
mod key_manager;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm_io::CrosstermScreen;
use key_manager::{KeyManager, HOLD_TIMEOUT};

/// Redraw at roughly the rate the timers tick.
const FRAME_TIME: Duration = Duration::from_millis(1_000 / 60);

/// The program options.
#[derive(StructOpt, Debug)]
#[structopt(name = "crossterm_frontend")]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Pause between two instructions
    #[structopt(long, default_value = "2")]
    cycle_delay_ms: u64,

    /// Seed for the random number generator
    #[structopt(long)]
    seed: Option<u64>,

    /// Let FX55/FX65 advance I like the COSMAC VIP did
    #[structopt(long)]
    increment_index: bool,

    /// Start paused, then step with `n`
    #[structopt(long)]
    paused: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let mut config = Config::new()
        .with_cycle_delay(Duration::from_millis(opt.cycle_delay_ms))
        .with_quirks(Quirks {
            load_store_increments_index: opt.increment_index,
        });
    if let Some(seed) = opt.seed {
        config = config.with_rng_seed(seed);
    }

    // Load instructions into emulator memory
    let output = SharedOutput::new();
    let mut emulator = Emulator::with_config(output.clone(), config);
    emulator.load(&program)?;

    let session = Session::start(emulator);
    if opt.paused {
        session.control().pause();
    }

    let result = event_loop(&session, &output);
    let emulator = session.stop()?;
    log::info!("Final state\n{}", emulator.snapshot());
    result
}

fn event_loop(session: &Session<SharedOutput>, output: &SharedOutput) -> Result<(), Box<dyn Error>> {
    let mut screen = CrosstermScreen::new()?;
    let mut key_manager = KeyManager::new(session.keypad().clone(), HOLD_TIMEOUT);
    let control = session.control();
    let mut status = None;

    loop {
        if event::poll(FRAME_TIME)? {
            if let Event::Key(KeyEvent { code, modifiers }) = event::read()? {
                match code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char(' ') if control.is_paused() => control.resume(),
                    KeyCode::Char(' ') => control.pause(),
                    KeyCode::Char('n') => control.step_once(),
                    code => {
                        key_manager.press(code, Instant::now());
                    }
                }
            }
        }
        key_manager.release_expired(Instant::now());

        if output.take_dirty() {
            let frame = output.frame().clone();
            screen.draw(&frame)?;
        }

        let current = (session.timers().is_sound_active(), control.is_paused());
        if status != Some(current) {
            screen.draw_status(current.0, current.1)?;
            status = Some(current);
        }
    }

    Ok(())
}
