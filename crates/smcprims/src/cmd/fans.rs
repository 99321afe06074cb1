use smcprims_client::SmcClient;
use smcprims_transport::Transport;

use crate::cmd::FansArgs;
use crate::exit::{smc_error, CliResult, SUCCESS};
use crate::output::{print_fan_report, OutputFormat};

pub fn run<T: Transport>(
    client: &mut SmcClient<T>,
    _args: FansArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    let report = client
        .fan_report()
        .map_err(|e| smc_error("read fan count", e))?;
    print_fan_report(&report, format);
    Ok(SUCCESS)
}
