mod config;

use anyhow::Result;
use clap::Parser;
use config::{Args, Config, Mode};
use log::debug;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tickcraft::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::try_from(Args::parse())?;
    debug!("starting with {:?}", config);

    let ticks = Arc::new(AtomicU64::new(0));
    let mode = config.mode;
    let counter = counter_element(config, ticks.clone());

    match mode {
        Mode::Once => counter.print()?,
        Mode::Ticks(limit) => {
            let mut mount = Mount::new(counter, Scheduler::system());
            smol::block_on(mount.terminal_render_loop(reached(&ticks, limit)))?;
        }
        Mode::Forever => smol::block_on(counter.render_loop())?,
    }

    Ok(())
}

/// Builds the counter described by `config`, adding one to `ticks` on every increment.
fn counter_element(config: Config, ticks: Arc<AtomicU64>) -> Element<Counter> {
    element!(Counter(
        initial_value: config.initial_value,
        period: config.period,
        image_src: config.image_src,
        image_alt: config.image_alt,
        on_tick: move |_: i64| {
            ticks.fetch_add(1, Ordering::SeqCst);
        },
    ))
}

fn reached(ticks: &AtomicU64, limit: u64) -> impl FnMut() -> bool + '_ {
    move || ticks.load(Ordering::SeqCst) >= limit
}
