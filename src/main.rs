//! LRU Virtual Memory Manager - Main Entry Point
//!
//! Usage: lru-virtual-memory [OPTIONS] [INPUT_FILE] [OUTPUT_FILE]
//!
//! With no input file, translates a single demo address on a 100-frame
//! manager and prints the physical address.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use thiserror::Error;

use vm_manager::io::{format_results, read_virtual_addresses, write_results, InputError};
use vm_manager::translation::{to_output, translate_batch, TranslationOutcome};
use vm_manager::{
    FaultKind, SimConfig, VirtualAddress, VirtualMemoryManager, VmError, DEFAULT_NUM_FRAMES,
    DEFAULT_PAGE_SIZE, DEMO_ADDRESS,
};

/// Command-line configuration
#[derive(Parser, Debug)]
#[command(name = "lru-virtual-memory")]
#[command(about = "Demand-paged virtual memory simulator with LRU replacement")]
#[command(version)]
struct Cli {
    /// File containing virtual addresses (whitespace-separated)
    input_file: Option<PathBuf>,

    /// Output file for physical addresses (stdout if omitted)
    output_file: Option<PathBuf>,

    /// Number of physical frames
    #[arg(short, long, default_value_t = DEFAULT_NUM_FRAMES, allow_negative_numbers = true)]
    frames: i64,

    /// Page and frame size in bytes
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE, allow_negative_numbers = true)]
    page_size: i64,

    /// Print detailed translation information
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Vm(#[from] VmError),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Input(_) => ExitCode::from(2),
            Self::Vm(e) if e.is_consistency_error() => ExitCode::from(4),
            Self::Vm(_) => ExitCode::from(3),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Run the VM manager and handle any errors
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Main logic separated from main() for cleaner error handling
fn run(cli: &Cli) -> Result<(), CliError> {
    let config = SimConfig {
        num_frames: cli.frames,
        page_size: cli.page_size,
    };
    let mut vmm = config.build()?;

    let Some(input_file) = &cli.input_file else {
        let pa = vmm.translate(DEMO_ADDRESS)?;
        println!("Physical Address: {}", pa);
        return Ok(());
    };

    if cli.verbose {
        eprintln!("=== VM Manager ===");
        eprintln!("Input file:  {}", input_file.display());
        match &cli.output_file {
            Some(path) => eprintln!("Output file: {}", path.display()),
            None => eprintln!("Output file: <stdout>"),
        }
        eprintln!("Frames:      {}", vmm.num_frames());
        eprintln!("Page size:   {}", vmm.page_size());
        eprintln!();
    }

    let vas = read_virtual_addresses(input_file)?;
    let outcomes = translate_batch(&mut vmm, &vas);

    if cli.verbose {
        print_trace(&vmm, &outcomes);
        print_summary(&vmm, &outcomes);
    }

    let results = to_output(&outcomes);
    match &cli.output_file {
        Some(path) => write_results(path, &results)?,
        None => println!("{}", format_results(&results)),
    }

    // A consistency error ends the batch; surface it after writing what we have
    if let Some(Err(e)) = outcomes.last().map(|o| &o.result) {
        if e.is_consistency_error() {
            return Err(e.clone().into());
        }
    }
    if cli.verbose {
        vmm.check_invariants()?;
    }
    Ok(())
}

fn print_trace(vmm: &VirtualMemoryManager, outcomes: &[TranslationOutcome]) {
    for outcome in outcomes {
        let decomposed = if outcome.va >= 0 {
            VirtualAddress::from_raw(outcome.va as u64, vmm.page_size()).to_string()
        } else {
            format!("VA({})", outcome.va)
        };
        let fault_info = match outcome.fault() {
            Some(FaultKind::FreeFrame { frame }) => format!(" [fault -> free frame {}]", frame),
            Some(FaultKind::Eviction { victim, frame }) => {
                format!(" [fault -> evicted page {} from frame {}]", victim, frame)
            }
            Some(FaultKind::AlreadyResident { .. }) | None => String::new(),
        };
        match &outcome.result {
            Ok(t) => eprintln!("{} -> PA {}{}", decomposed, t.physical, fault_info),
            Err(e) => eprintln!("{} -> ERROR: {}", decomposed, e),
        }
    }
}

fn print_summary(vmm: &VirtualMemoryManager, outcomes: &[TranslationOutcome]) {
    let stats = vmm.stats();
    let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
    eprintln!();
    eprintln!("=== Summary ===");
    eprintln!("Translations: {}", stats.translations);
    eprintln!("Hits:         {}", stats.hits);
    eprintln!("Faults:       {}", stats.faults);
    eprintln!("Evictions:    {}", stats.evictions);
    eprintln!("Hit ratio:    {:.2}%", stats.hit_ratio() * 100.0);
    eprintln!("Failed:       {}", failures);
    eprintln!("Resident (LRU first): {:?}", vmm.resident_pages());
    eprintln!();
}
