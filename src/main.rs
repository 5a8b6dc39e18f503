// SPDX-License-Identifier: MIT
//
// countdown: a terminal countdown timer.
//
// The binary only wires the crates together:
//
//   countdown-term → cbreak keyboard, ANSI output, in-place redraw region
//   countdown-core → duration parsing, timer state, tick loop, panel renderer
//
// Flow:
//
//   argv → Cli (duration parsed and validated, or exit 2 with usage)
//   stdin → KeySource ─┐
//   MonotonicClock ────┼─► TimerLoop ─► PanelSink → stdout
//   TimerSettings ─────┘
//
// Terminal state is restored on every exit path: the key source and the
// live region are RAII guards, a panic hook covers panics, and a Ctrl-C
// handler covers SIGINT/SIGTERM/SIGHUP (exit status 130).

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use countdown_core::{MonotonicClock, PanelSink, TimerLoop};
use countdown_term::{keys, terminal};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .init();

    debug!(?cli, "parsed arguments");

    terminal::restore_on_interrupt().context("failed to install the Ctrl-C handler")?;

    let mut keys = keys::open_stdin().context("failed to enter cbreak mode")?;
    let mut sink = PanelSink::stdout().context("failed to prepare the terminal")?;
    let clock = MonotonicClock;

    TimerLoop::new(keys.as_mut(), &mut sink, &clock, cli.settings())
        .run(cli.duration)
        .context("render failed")?;

    Ok(())
}
