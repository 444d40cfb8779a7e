use wacomiv_tablet::NullSink;

use crate::cmd::ProbeArgs;
use crate::exit::{setup_error, CliResult, SUCCESS};
use crate::output::{print_setup, OutputFormat};

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let link = args.line.link_config()?;
    let config = args.line.setup_config(false)?;

    let attached = wacomiv_setup::attach(&args.line.device, &link, config, NullSink)
        .map_err(|err| setup_error("probe failed", err))?;
    print_setup(attached.report(), format);

    attached
        .detach()
        .map_err(|err| setup_error("probe failed", err))?;
    Ok(SUCCESS)
}
