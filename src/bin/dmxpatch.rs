//! dmxpatch command-line tool

use clap::{Parser, Subcommand};
use dmxpatch::dmx::dipswitch::{self, Orientation, SwitchOrder};
use dmxpatch::dmx::export;
use dmxpatch::dmx::plan::OverflowPolicy;
use dmxpatch::exit_codes::{
    EXIT_ADDRESSING_ERROR, EXIT_EXPORT_ERROR, EXIT_INVALID_ARGS, EXIT_STATE_ERROR, EXIT_SUCCESS,
};
use dmxpatch::library::{self, FixtureRecord};
use dmxpatch::store::{DipState, StateStore};
use dmxpatch::{api, utils};
use std::path::PathBuf;
use std::{env, panic, process};

const VERSION: &str = dmxpatch::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "DMX bulk addressing field tool")]
struct Args {
    /// Log level (trace, debug, info, warn, error; prefix json: for JSON)
    #[arg(long)]
    log_level: Option<String>,

    /// State file path (defaults to the per-user data directory)
    #[arg(long)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the addressing table from the saved plan and parameters
    Generate {
        /// First address to use (1-512)
        #[arg(long)]
        start: Option<u16>,

        /// First universe to use
        #[arg(long)]
        universe: Option<u32>,

        /// Unused channels after each fixture
        #[arg(long)]
        gap: Option<u32>,

        /// Overflow policy at the universe boundary (reset, carry)
        #[arg(long)]
        policy: Option<String>,

        /// Footprint for the quick single-group flow (used when the plan is empty)
        #[arg(long)]
        footprint: Option<u16>,

        /// Quantity for the quick single-group flow
        #[arg(long)]
        quantity: Option<u32>,

        /// Write a CSV patch sheet to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print tab-separated clipboard text instead of the table
        #[arg(long)]
        copy: bool,

        /// Print rows as JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// Manage the fixture plan
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Manage the fixture library
    Lib {
        #[command(subcommand)]
        action: LibAction,
    },

    /// Map an address onto the DIP-switch bank (or switches back to an address)
    Dip {
        /// DMX address to map (1-511)
        address: Option<u16>,

        /// Comma-separated switch numbers that are ON (e.g. 1,3,6)
        #[arg(long)]
        switches: Option<String>,

        /// Render with the ON position pointing down
        #[arg(long)]
        on_down: bool,

        /// Number the bank right-to-left (fixture mounted upside down)
        #[arg(long)]
        rtl: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PlanAction {
    /// Show the plan in addressing order
    List,

    /// Append a fixture group, from the library or given explicitly
    Add {
        /// Library search term (brand, model, mode or notes)
        search: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        mode: Option<String>,

        /// Channel footprint (required without a library match)
        #[arg(long)]
        footprint: Option<u16>,

        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Remove one entry by its position
    Remove {
        /// 1-based position in the plan
        index: usize,
    },

    /// Move an entry to a new position
    Move {
        /// 1-based position to move from
        from: usize,
        /// 1-based position to move to
        to: usize,
    },

    /// Change an entry's quantity
    SetQty {
        /// 1-based position in the plan
        index: usize,
        quantity: u32,
    },

    /// Remove all entries
    Clear,
}

#[derive(Subcommand, Debug)]
enum LibAction {
    /// List the library, optionally filtered
    List {
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a fixture definition
    Add {
        #[arg(long)]
        brand: String,

        #[arg(long)]
        model: String,

        #[arg(long, default_value = "")]
        mode: String,

        /// Channel footprint (1-512)
        #[arg(long)]
        footprint: u16,

        /// Comma-separated reference URLs
        #[arg(long, default_value = "")]
        links: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Remove a fixture definition by id
    Remove {
        id: String,
    },
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {panic_info}");
        process::exit(dmxpatch::exit_codes::EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic");
            process::exit(dmxpatch::exit_codes::EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("dmxpatch {}", dmxpatch::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();

    if let Some(ref level) = args.log_level {
        dmxpatch::logger::JsonLogger::init_with_level(level);
    } else {
        dmxpatch::logger::JsonLogger::init();
    }

    let store = match args.state {
        Some(path) => StateStore::open(path),
        None => StateStore::open(utils::get_state_dir().join("state.json")),
    };

    match args.command {
        Command::Generate {
            start,
            universe,
            gap,
            policy,
            footprint,
            quantity,
            csv,
            copy,
            json,
        } => cmd_generate(
            &store, start, universe, gap, policy, footprint, quantity, csv, copy, json,
        ),
        Command::Plan { action } => cmd_plan(&store, action),
        Command::Lib { action } => cmd_lib(&store, action),
        Command::Dip {
            address,
            switches,
            on_down,
            rtl,
        } => cmd_dip(&store, address, switches, on_down, rtl),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    store: &StateStore,
    start: Option<u16>,
    universe: Option<u32>,
    gap: Option<u32>,
    policy: Option<String>,
    footprint: Option<u16>,
    quantity: Option<u32>,
    csv: Option<PathBuf>,
    copy: bool,
    json: bool,
) -> i32 {
    let mut addressing = store.load().addressing;

    if let Some(start) = start {
        addressing.params.start = start;
    }
    if let Some(universe) = universe {
        addressing.params.universe = universe;
    }
    if let Some(gap) = gap {
        addressing.params.gap = gap;
    }
    if let Some(policy) = policy {
        match policy.to_lowercase().parse::<OverflowPolicy>() {
            Ok(parsed) => addressing.params.overflow_policy = parsed,
            Err(e) => {
                eprintln!("Error: {e}");
                return EXIT_INVALID_ARGS;
            }
        }
    }
    if let Some(footprint) = footprint {
        addressing.footprint = footprint;
    }
    if let Some(quantity) = quantity {
        addressing.quantity = quantity;
    }

    let rows = match api::generate(&addressing) {
        Ok(rows) => rows,
        Err(e) => {
            // The saved state is left untouched on failure.
            eprintln!("Error: {e}");
            return EXIT_ADDRESSING_ERROR;
        }
    };

    if let Some(csv_path) = csv {
        if let Err(e) = std::fs::write(&csv_path, export::to_csv(&rows)) {
            eprintln!("Error: Failed to write CSV: {e}");
            return EXIT_EXPORT_ERROR;
        }
        println!("✓ Wrote {} rows to {}", rows.len(), csv_path.display());
    } else if copy {
        println!("{}", export::to_clipboard_text(&rows));
    } else if json {
        match serde_json::to_string_pretty(&rows) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error: Failed to encode rows: {e}");
                return EXIT_EXPORT_ERROR;
            }
        }
    } else {
        println!("{}", export::to_table(&rows));
        if let Some(last) = rows.last() {
            println!();
            println!(
                "{} fixtures, universes {}-{}",
                rows.len(),
                rows[0].universe,
                last.universe
            );
        }
    }

    // Every generate remembers its effective parameters. Subscribers see
    // the change.
    if let Err(e) = store.save_addressing(addressing) {
        eprintln!("Error: Failed to save state: {e}");
        return EXIT_STATE_ERROR;
    }

    EXIT_SUCCESS
}

fn cmd_plan(store: &StateStore, action: PlanAction) -> i32 {
    match action {
        PlanAction::List => {
            let plan = store.load_plan();
            if plan.is_empty() {
                println!("Plan is empty. Add fixtures with: dmxpatch plan add <search>");
                return EXIT_SUCCESS;
            }
            for (index, entry) in plan.iter().enumerate() {
                let name = entry.spec.display_name();
                let mode = entry.spec.mode.trim();
                let mode = if mode.is_empty() { "–" } else { mode };
                println!(
                    "{:>3}. {} — {} • {}ch x {}",
                    index + 1,
                    if name.is_empty() { "(ad-hoc)" } else { name.as_str() },
                    mode,
                    entry.spec.footprint,
                    entry.quantity
                );
            }
            EXIT_SUCCESS
        }

        PlanAction::Add {
            search,
            brand,
            model,
            mode,
            footprint,
            quantity,
        } => {
            let entry = if let Some(ref query) = search {
                let records = store.load_library();
                let found = library::search(&records, query);
                match found.first() {
                    Some(record) => {
                        if found.len() > 1 {
                            println!("{} matches, using: {}", found.len(), record.display_label());
                        }
                        record.to_plan_entry(quantity)
                    }
                    None => {
                        eprintln!("Error: No library fixture matches '{query}'");
                        return EXIT_INVALID_ARGS;
                    }
                }
            } else {
                let Some(footprint) = footprint else {
                    eprintln!("Error: --footprint is required without a library search");
                    return EXIT_INVALID_ARGS;
                };
                let spec = dmxpatch::FixtureSpec {
                    brand: brand.unwrap_or_default(),
                    model: model.unwrap_or_default(),
                    mode: mode.unwrap_or_default(),
                    footprint,
                };
                dmxpatch::PlanEntry::new(spec, quantity.max(1))
            };

            let mut plan = store.load_plan();

            // Same spec again just bumps the quantity.
            if let Some(existing) = plan.iter_mut().find(|e| e.spec == entry.spec) {
                existing.quantity += entry.quantity;
            } else {
                plan.push(entry);
            }

            if let Err(e) = store.save_plan(plan) {
                eprintln!("Error: Failed to save plan: {e}");
                return EXIT_STATE_ERROR;
            }
            println!("✓ Added to plan");
            EXIT_SUCCESS
        }

        PlanAction::Remove { index } => {
            let mut plan = store.load_plan();
            if index == 0 || index > plan.len() {
                eprintln!("Error: Plan position {index} out of range (1-{})", plan.len());
                return EXIT_INVALID_ARGS;
            }
            plan.remove(index - 1);
            if let Err(e) = store.save_plan(plan) {
                eprintln!("Error: Failed to save plan: {e}");
                return EXIT_STATE_ERROR;
            }
            println!("✓ Removed entry {index}");
            EXIT_SUCCESS
        }

        PlanAction::Move { from, to } => {
            let mut plan = store.load_plan();
            let len = plan.len();
            if from == 0 || from > len || to == 0 || to > len {
                eprintln!("Error: Plan positions out of range (1-{len})");
                return EXIT_INVALID_ARGS;
            }
            let entry = plan.remove(from - 1);
            plan.insert(to - 1, entry);
            if let Err(e) = store.save_plan(plan) {
                eprintln!("Error: Failed to save plan: {e}");
                return EXIT_STATE_ERROR;
            }
            println!("✓ Moved entry {from} to {to}");
            EXIT_SUCCESS
        }

        PlanAction::SetQty { index, quantity } => {
            let mut plan = store.load_plan();
            if index == 0 || index > plan.len() {
                eprintln!("Error: Plan position {index} out of range (1-{})", plan.len());
                return EXIT_INVALID_ARGS;
            }
            plan[index - 1].quantity = quantity.max(1);
            if let Err(e) = store.save_plan(plan) {
                eprintln!("Error: Failed to save plan: {e}");
                return EXIT_STATE_ERROR;
            }
            println!("✓ Quantity updated");
            EXIT_SUCCESS
        }

        PlanAction::Clear => {
            if let Err(e) = store.save_plan(Vec::new()) {
                eprintln!("Error: Failed to save plan: {e}");
                return EXIT_STATE_ERROR;
            }
            println!("✓ Plan cleared");
            EXIT_SUCCESS
        }
    }
}

fn cmd_lib(store: &StateStore, action: LibAction) -> i32 {
    match action {
        LibAction::List { search } => {
            let mut records = store.load_library();
            library::sort_for_listing(&mut records);

            let query = search.unwrap_or_default();
            let mut shown = 0usize;
            for record in records.iter().filter(|r| r.matches(&query)) {
                println!("{}  {}", record.id, record.display_label());
                if !record.links.trim().is_empty() {
                    let short: Vec<String> = record
                        .links
                        .split(',')
                        .map(str::trim)
                        .filter(|link| !link.is_empty())
                        .map(utils::short_url)
                        .collect();
                    println!("      {}", short.join("  "));
                }
                shown += 1;
            }

            if shown == 0 {
                println!("No fixtures match.");
            }
            EXIT_SUCCESS
        }

        LibAction::Add {
            brand,
            model,
            mode,
            footprint,
            links,
            notes,
        } => {
            let record = FixtureRecord::new(&brand, &model, &mode, footprint)
                .with_links(&links)
                .with_notes(&notes);
            let label = record.display_label();

            let mut records = store.load_library();
            library::upsert(&mut records, record);

            if let Err(e) = store.save_library(records) {
                eprintln!("Error: Failed to save library: {e}");
                return EXIT_STATE_ERROR;
            }
            println!("✓ Added {label}");
            EXIT_SUCCESS
        }

        LibAction::Remove { id } => {
            let Ok(id) = id.parse::<uuid::Uuid>() else {
                eprintln!("Error: Invalid fixture id: {id}");
                return EXIT_INVALID_ARGS;
            };

            let mut records = store.load_library();
            if !library::remove(&mut records, id) {
                eprintln!("Error: No fixture with id {id}");
                return EXIT_INVALID_ARGS;
            }

            if let Err(e) = store.save_library(records) {
                eprintln!("Error: Failed to save library: {e}");
                return EXIT_STATE_ERROR;
            }
            println!("✓ Removed {id}");
            EXIT_SUCCESS
        }
    }
}

fn cmd_dip(
    store: &StateStore,
    address: Option<u16>,
    switches: Option<String>,
    on_down: bool,
    rtl: bool,
) -> i32 {
    let saved = store.load_dip();

    let orientation = if on_down {
        Orientation::OnDown
    } else {
        saved.orientation
    };
    let order = if rtl { SwitchOrder::RightToLeft } else { saved.order };

    let address = if let Some(raw) = switches {
        let mut numbers = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.parse::<usize>() {
                Ok(number) => numbers.push(number),
                Err(_) => {
                    eprintln!("Error: Invalid switch number: {part}");
                    return EXIT_INVALID_ARGS;
                }
            }
        }
        match dipswitch::address_from_numbers(&numbers, order) {
            Some(address) => address,
            None => {
                eprintln!("Error: Switch numbers must be 1-9");
                return EXIT_INVALID_ARGS;
            }
        }
    } else {
        dipswitch::clamp_address(u32::from(address.unwrap_or(saved.address)))
    };

    println!("{}", dipswitch::render_bank(address, orientation, order));

    if let Err(e) = store.save_dip(DipState {
        address,
        orientation,
        order,
    }) {
        eprintln!("Error: Failed to save state: {e}");
        return EXIT_STATE_ERROR;
    }

    EXIT_SUCCESS
}
