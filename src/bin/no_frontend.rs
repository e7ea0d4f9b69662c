use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use structopt::StructOpt;

use chip_8_vm::emulator::output::DummyOutput;
use chip_8_vm::emulator::{Config, Emulator, Quirks, Result, Session};

/// How long a key from `--press` is held down.
const KEY_HOLD: Duration = Duration::from_millis(50);

/// Run a program without a screen for a while, then print what it drew.
#[derive(StructOpt, Debug)]
#[structopt(name = "no_frontend")]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// How long to run before printing the result
    #[structopt(long, default_value = "1000")]
    duration_ms: u64,

    /// Pause between two instructions
    #[structopt(long, default_value = "2")]
    cycle_delay_ms: u64,

    /// Seed for the random number generator
    #[structopt(long)]
    seed: Option<u64>,

    /// Let FX55/FX65 advance I like the COSMAC VIP did
    #[structopt(long)]
    increment_index: bool,

    /// Record a snapshot after every cycle
    #[structopt(short, long)]
    debug: bool,

    /// Keys to press while running, as hex digits (e.g. `-p 5 -p a`)
    #[structopt(short, long, parse(try_from_str = parse_key))]
    press: Vec<u8>,
}

fn parse_key(src: &str) -> std::result::Result<u8, String> {
    match u8::from_str_radix(src, 16) {
        Ok(key) if key <= 0xF => Ok(key),
        _ => Err(format!("{:?} is not a key, use 0-F", src)),
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let mut config = Config::new()
        .with_cycle_delay(Duration::from_millis(opt.cycle_delay_ms))
        .with_quirks(Quirks {
            load_store_increments_index: opt.increment_index,
        })
        .with_debug(opt.debug);
    if let Some(seed) = opt.seed {
        config = config.with_rng_seed(seed);
    }

    // Load instructions into emulator memory
    let mut emulator = Emulator::with_config(DummyOutput::new(), config);
    emulator.load(&program)?;

    // Start execution, spreading the key presses over the run
    let session = Session::start(emulator);
    let slice = Duration::from_millis(opt.duration_ms) / (opt.press.len() as u32 + 1);
    for key in &opt.press {
        thread::sleep(slice);
        log::info!("Pressing {:X}", key);
        session.keypad().set_key_down(*key);
        thread::sleep(KEY_HOLD.min(slice));
        session.keypad().set_key_up(*key);
    }
    thread::sleep(slice);

    let emulator = session.stop()?;
    print!("{}", emulator.framebuffer());
    println!();
    print!("{}", emulator.snapshot());
    if emulator.timers().is_sound_active() {
        println!("sound on");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_hex_digits() {
        assert_eq!(parse_key("0"), Ok(0x0));
        assert_eq!(parse_key("a"), Ok(0xA));
        assert_eq!(parse_key("F"), Ok(0xF));
        assert!(parse_key("10").is_err());
        assert!(parse_key("g").is_err());
    }
}
