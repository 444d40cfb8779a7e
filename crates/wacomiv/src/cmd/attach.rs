use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cmd::AttachArgs;
use crate::exit::{setup_error, CliError, CliResult, SUCCESS};
use crate::output::{print_queued, EventPrinter, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(args: AttachArgs, format: OutputFormat) -> CliResult<i32> {
    let link = args.line.link_config()?;
    let config = args.line.setup_config(true)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let attached =
        wacomiv_setup::attach(&args.line.device, &link, config, EventPrinter::new())
            .map_err(|err| setup_error("setup failed", err))?;
    let tablet = attached.tablet().clone();

    let mut out = std::io::stdout();
    let mut printed = 0usize;
    // take under the device lock, print outside it
    let mut drain = |printed: &mut usize| {
        let queued = tablet.with_sink(EventPrinter::take_queued);
        let limit = args.count.map(|count| count.saturating_sub(*printed));
        *printed += print_queued(&mut out, &queued, format, limit);
    };

    while running.load(Ordering::SeqCst) && !attached.is_finished() {
        drain(&mut printed);
        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    let hung_up = attached.is_finished();
    let detached = attached.detach();
    drain(&mut printed);
    detached.map_err(|err| setup_error("tablet line failed", err))?;
    tracing::info!(printed, hung_up, "detached from tablet");

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
